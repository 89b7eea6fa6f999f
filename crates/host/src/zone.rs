//! Time zones: named IANA zones backed by `chrono-tz`, and fixed offsets
//! from GMT.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeZone as _};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HostError;

// chrono's representable range is roughly +/-262,000 years.
const MAX_SECONDS: i64 = 8_000_000_000_000;

/// The UTC offset(s) that apply to a local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalOffsets {
    /// Exactly one offset applies.
    Single(i32),
    /// The wall-clock time occurs twice, e.g. when clocks are set back.
    Ambiguous {
        /// Offset of the first occurrence.
        earlier: i32,
        /// Offset of the second occurrence.
        later: i32,
    },
    /// The wall-clock time was skipped, e.g. when clocks are set forward.
    Skipped {
        /// Offset in force before the transition.
        before: i32,
        /// Offset in force after the transition.
        after: i32,
    },
}

/// Maps instants and local wall-clock times to UTC offsets.
///
/// Seconds are counted from the Unix epoch. Local seconds are the
/// wall-clock reading expressed on the same scale.
pub trait TimeZoneResolver {
    /// Offset from UTC in seconds at the given UTC instant.
    fn offset_seconds(&self, utc_seconds: i64) -> i32;

    /// Offsets applying to a local wall-clock time.
    fn local_offsets(&self, local_seconds: i64) -> LocalOffsets;

    /// UTC seconds for a local wall-clock time. Repeated times resolve to
    /// the first occurrence; skipped times are read with the offset in
    /// force before the transition, which moves them forward by the gap.
    fn utc_from_local(&self, local_seconds: i64) -> i64 {
        match self.local_offsets(local_seconds) {
            LocalOffsets::Single(offset) => local_seconds - i64::from(offset),
            LocalOffsets::Ambiguous { earlier, .. } => local_seconds - i64::from(earlier),
            LocalOffsets::Skipped { before, .. } => local_seconds - i64::from(before),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ZoneKind {
    Named(Tz),
    Fixed(i32),
}

/// A time zone identified by an IANA name or a fixed GMT offset.
#[derive(Debug, Clone)]
pub struct TimeZone {
    identifier: String,
    kind: ZoneKind,
}

impl TimeZone {
    /// Resolves a zone identifier.
    ///
    /// Accepts IANA names (including backward-compatible links such as
    /// `US/Pacific`), `GMT`, and `GMT±h`, `GMT±hh`, `GMT±hhmm` or
    /// `GMT±hh:mm` offsets.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownZone`] if the identifier is neither.
    pub fn from_identifier(identifier: &str) -> Result<Self, HostError> {
        if let Some(seconds) = parse_gmt_offset(identifier) {
            return Ok(Self::fixed(seconds));
        }
        identifier
            .parse::<Tz>()
            .map(|tz| Self {
                identifier: tz.name().to_string(),
                kind: ZoneKind::Named(tz),
            })
            .map_err(|_| HostError::UnknownZone {
                zone: identifier.to_string(),
            })
    }

    /// A zone with a constant offset from GMT. The zero offset is
    /// identified as `GMT`.
    pub fn fixed(seconds_from_gmt: i32) -> Self {
        Self {
            identifier: gmt_identifier(seconds_from_gmt),
            kind: ZoneKind::Fixed(seconds_from_gmt),
        }
    }

    /// The IANA `UTC` zone.
    pub fn utc() -> Self {
        Self {
            identifier: Tz::UTC.name().to_string(),
            kind: ZoneKind::Named(Tz::UTC),
        }
    }

    /// Returns the zone identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the constant offset if this is a fixed-offset zone.
    pub fn fixed_offset(&self) -> Option<i32> {
        match self.kind {
            ZoneKind::Fixed(seconds) => Some(seconds),
            ZoneKind::Named(_) => None,
        }
    }
}

impl TimeZoneResolver for TimeZone {
    fn offset_seconds(&self, utc_seconds: i64) -> i32 {
        match self.kind {
            ZoneKind::Fixed(seconds) => seconds,
            ZoneKind::Named(tz) => match naive(utc_seconds) {
                Some(utc) => tz.offset_from_utc_datetime(&utc).fix().local_minus_utc(),
                None => 0,
            },
        }
    }

    fn local_offsets(&self, local_seconds: i64) -> LocalOffsets {
        let tz = match self.kind {
            ZoneKind::Fixed(seconds) => return LocalOffsets::Single(seconds),
            ZoneKind::Named(tz) => tz,
        };
        let Some(local) = naive(local_seconds) else {
            return LocalOffsets::Single(0);
        };
        match tz.offset_from_local_datetime(&local) {
            LocalResult::Single(offset) => LocalOffsets::Single(offset.fix().local_minus_utc()),
            LocalResult::Ambiguous(earlier, later) => LocalOffsets::Ambiguous {
                earlier: earlier.fix().local_minus_utc(),
                later: later.fix().local_minus_utc(),
            },
            LocalResult::None => LocalOffsets::Skipped {
                before: self.offset_seconds(local_seconds - 86_400),
                after: self.offset_seconds(local_seconds + 86_400),
            },
        }
    }
}

impl PartialEq for TimeZone {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.fixed_offset() == other.fixed_offset()
    }
}

impl Eq for TimeZone {}

impl Hash for TimeZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
        self.fixed_offset().hash(state);
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl Serialize for TimeZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.identifier)
    }
}

impl<'de> Deserialize<'de> for TimeZone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let identifier = String::deserialize(deserializer)?;
        TimeZone::from_identifier(&identifier).map_err(serde::de::Error::custom)
    }
}

fn naive(seconds: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(seconds.clamp(-MAX_SECONDS, MAX_SECONDS), 0).map(|dt| dt.naive_utc())
}

fn gmt_identifier(seconds: i32) -> String {
    if seconds == 0 {
        return "GMT".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("GMT{sign}{:02}{:02}", minutes / 60, minutes % 60)
}

fn parse_gmt_offset(identifier: &str) -> Option<i32> {
    let rest = identifier.strip_prefix("GMT")?;
    if rest.is_empty() {
        return Some(0);
    }
    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        3 => (digits[..1].parse::<i32>().ok()?, digits[1..].parse::<i32>().ok()?),
        _ => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
    };
    if hours > 18 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_zero_is_gmt() {
        let tz = TimeZone::fixed(0);
        assert_eq!(tz.identifier(), "GMT");
        assert_eq!(tz.offset_seconds(1_000_000), 0);
    }

    #[test]
    fn fixed_identifiers() {
        assert_eq!(TimeZone::fixed(19_800).identifier(), "GMT+0530");
        assert_eq!(TimeZone::fixed(-28_800).identifier(), "GMT-0800");
    }

    #[test]
    fn parses_gmt_offsets() {
        assert_eq!(parse_gmt_offset("GMT"), Some(0));
        assert_eq!(parse_gmt_offset("GMT+5"), Some(18_000));
        assert_eq!(parse_gmt_offset("GMT-08"), Some(-28_800));
        assert_eq!(parse_gmt_offset("GMT+05:30"), Some(19_800));
        assert_eq!(parse_gmt_offset("GMT+0545"), Some(20_700));
        assert_eq!(parse_gmt_offset("GMT+25"), None);
        assert_eq!(parse_gmt_offset("GMTx"), None);
        assert_eq!(parse_gmt_offset("America/Chicago"), None);
    }

    #[test]
    fn named_zone_offsets_follow_dst() {
        let ny = TimeZone::from_identifier("America/New_York").unwrap();
        // 2019-01-01T00:00:00Z, EST
        assert_eq!(ny.offset_seconds(1_546_300_800), -5 * 3600);
        // 2019-07-01T00:00:00Z, EDT
        assert_eq!(ny.offset_seconds(1_561_939_200), -4 * 3600);
    }

    #[test]
    fn backward_links_resolve() {
        let tz = TimeZone::from_identifier("US/Pacific").unwrap();
        assert_eq!(tz.identifier(), "US/Pacific");
    }

    #[test]
    fn unknown_zone_is_error() {
        let err = TimeZone::from_identifier("Nowhere/Special").unwrap_err();
        assert_eq!(
            err,
            HostError::UnknownZone {
                zone: "Nowhere/Special".into()
            }
        );
    }

    #[test]
    fn skipped_local_time_moves_forward() {
        let la = TimeZone::from_identifier("America/Los_Angeles").unwrap();
        // 2021-03-14 02:30 local does not exist.
        let local = 1_615_689_000;
        assert_eq!(
            la.local_offsets(local),
            LocalOffsets::Skipped {
                before: -8 * 3600,
                after: -7 * 3600
            }
        );
        // Read as PST, which lands on 03:30 PDT.
        assert_eq!(la.utc_from_local(local), local + 8 * 3600);
    }

    #[test]
    fn repeated_local_time_takes_first_occurrence() {
        let la = TimeZone::from_identifier("America/Los_Angeles").unwrap();
        // 2021-11-07 01:30 local happens twice.
        let local = 1_636_248_600;
        assert_eq!(
            la.local_offsets(local),
            LocalOffsets::Ambiguous {
                earlier: -7 * 3600,
                later: -8 * 3600
            }
        );
        assert_eq!(la.utc_from_local(local), local + 7 * 3600);
    }

    #[test]
    fn equality_by_identifier() {
        assert_eq!(TimeZone::utc(), TimeZone::from_identifier("UTC").unwrap());
        assert_ne!(TimeZone::utc(), TimeZone::fixed(0));
        assert_eq!(TimeZone::fixed(0), TimeZone::from_identifier("GMT").unwrap());
    }
}
