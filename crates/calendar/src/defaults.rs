//! Process-wide default time zone and locale.
//!
//! Read lazily from the host on first use. [`install`] replaces them;
//! calendars built with [`Calendar::autoupdating_current`] see the change
//! on their next access, snapshot calendars do not.
//!
//! [`Calendar::autoupdating_current`]: crate::Calendar::autoupdating_current

use std::sync::LazyLock;

use almanac_host::{Locale, TimeZone, system_locale, system_time_zone};
use parking_lot::RwLock;
use tracing::info;

/// Default settings for new calendars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Zone used when a calendar is not given one.
    pub time_zone: TimeZone,
    /// Locale used when a calendar is not given one.
    pub locale: Locale,
}

impl Defaults {
    /// The host's zone and locale.
    pub fn from_host() -> Self {
        Self {
            time_zone: system_time_zone(),
            locale: system_locale(),
        }
    }
}

static DEFAULTS: LazyLock<RwLock<Defaults>> = LazyLock::new(|| RwLock::new(Defaults::from_host()));

/// A copy of the current defaults.
pub fn current() -> Defaults {
    DEFAULTS.read().clone()
}

/// The current default time zone.
pub fn time_zone() -> TimeZone {
    DEFAULTS.read().time_zone.clone()
}

/// The current default locale.
pub fn locale() -> Locale {
    DEFAULTS.read().locale.clone()
}

/// Replaces the defaults, returning the previous ones.
pub fn install(defaults: Defaults) -> Defaults {
    info!(time_zone = %defaults.time_zone, locale = %defaults.locale, "installing calendar defaults");
    std::mem::replace(&mut *DEFAULTS.write(), defaults)
}

/// Re-reads the defaults from the host.
pub fn reset() -> Defaults {
    install(Defaults::from_host())
}
