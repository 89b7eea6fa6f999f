//! Time zone and locale of the running host.

use tracing::debug;

use crate::locale::Locale;
use crate::zone::TimeZone;

const LOCALE_VARIABLES: [&str; 3] = ["LC_ALL", "LC_TIME", "LANG"];

/// The host's time zone, or `UTC` if it cannot be determined.
pub fn system_time_zone() -> TimeZone {
    match iana_time_zone::get_timezone() {
        Ok(name) => TimeZone::from_identifier(&name).unwrap_or_else(|e| {
            debug!(%name, error = %e, "host zone not recognised, using UTC");
            TimeZone::utc()
        }),
        Err(e) => {
            debug!(error = %e, "host zone unavailable, using UTC");
            TimeZone::utc()
        }
    }
}

/// The host's locale from `LC_ALL`, `LC_TIME` or `LANG` (first non-empty
/// one wins), or `en_US_POSIX` if none parses.
pub fn system_locale() -> Locale {
    let found = LOCALE_VARIABLES
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty());
    match found {
        Some(value) => Locale::new(&value).unwrap_or_else(|e| {
            debug!(%value, error = %e, "host locale not recognised, using en_US_POSIX");
            Locale::posix()
        }),
        None => Locale::posix(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_lookups_never_fail() {
        assert!(!system_time_zone().identifier().is_empty());
        assert!(!system_locale().identifier().is_empty());
    }
}
