//! Absolute points in time.

use std::time::{SystemTime, UNIX_EPOCH};

use almanac_astro::FixedDay;
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::field::Field;

/// Seconds from the Unix epoch to the reference date 2001-01-01T00:00:00Z.
pub const UNIX_TO_REFERENCE_SECONDS: i64 = 978_307_200;

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Fixed day number of 1970-01-01.
pub(crate) const UNIX_EPOCH_DAY: i64 = 719_163;

/// First local day the calendars read: January 1 of Gregorian year
/// -100000. Earlier instants decode as this day.
pub const FIRST_SUPPORTED_DAY: FixedDay = FixedDay::new(-36_524_615);

/// Last local day the calendars read: December 31 of Gregorian year
/// 100000. Later instants decode as this day.
pub const LAST_SUPPORTED_DAY: FixedDay = FixedDay::new(36_524_250);

fn out_of_range(day: i64) -> CalendarError {
    let year = almanac_astro::gregorian_year_from_fixed(FixedDay::new(day));
    CalendarError::InvalidComponent {
        field: Field::Year,
        value: i64::from(year),
    }
}

/// Checks that a day lies within the supported range.
pub(crate) fn supported_day(day: FixedDay) -> Result<FixedDay, CalendarError> {
    if (FIRST_SUPPORTED_DAY..=LAST_SUPPORTED_DAY).contains(&day) {
        Ok(day)
    } else {
        Err(out_of_range(day.get()))
    }
}

/// Checks that an instant falls on a supported UTC day.
pub(crate) fn supported_instant(instant: Instant) -> Result<Instant, CalendarError> {
    let day = UNIX_EPOCH_DAY.saturating_add(instant.unix_seconds().div_euclid(SECONDS_PER_DAY));
    supported_day(FixedDay::new(day)).map(|_| instant)
}

/// An absolute point in time, counted in seconds and nanoseconds from the
/// reference date 2001-01-01T00:00:00Z. Carries no time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Instant {
    seconds: i64,
    nanos: u32,
}

impl Instant {
    /// The reference date itself.
    pub const REFERENCE: Instant = Instant {
        seconds: 0,
        nanos: 0,
    };

    /// Creates an instant from whole seconds since the reference date plus
    /// a nanosecond part. Nanoseconds past one second carry into seconds.
    pub fn new(seconds: i64, nanos: u32) -> Self {
        let carry = i64::from(nanos) / NANOS_PER_SECOND;
        Self {
            seconds: seconds.saturating_add(carry),
            nanos: (i64::from(nanos) % NANOS_PER_SECOND) as u32,
        }
    }

    /// Creates an instant from fractional seconds since the reference date.
    pub fn from_reference_seconds(seconds: f64) -> Self {
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round() as u32;
        Self::new(whole as i64, nanos)
    }

    /// Creates an instant from whole seconds since the Unix epoch.
    pub fn from_unix_seconds(seconds: i64) -> Self {
        Self::new(seconds - UNIX_TO_REFERENCE_SECONDS, 0)
    }

    /// The current system time.
    pub fn now() -> Self {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => Self::new(
                d.as_secs() as i64 - UNIX_TO_REFERENCE_SECONDS,
                d.subsec_nanos(),
            ),
            Err(e) => {
                let d = e.duration();
                Self::from_nanos_since_reference(
                    -(d.as_nanos() as i128) - i128::from(UNIX_TO_REFERENCE_SECONDS) * 1_000_000_000,
                )
            }
        }
    }

    /// Fractional seconds since the reference date.
    pub fn seconds_since_reference(self) -> f64 {
        self.seconds as f64 + f64::from(self.nanos) / 1e9
    }

    /// Whole seconds since the reference date, rounded down.
    pub fn whole_seconds(self) -> i64 {
        self.seconds
    }

    /// Nanoseconds past [`whole_seconds`](Self::whole_seconds).
    pub fn subsec_nanos(self) -> u32 {
        self.nanos
    }

    /// Whole seconds since the Unix epoch, rounded down. Saturates at the
    /// ends of the `i64` range.
    pub fn unix_seconds(self) -> i64 {
        self.seconds.saturating_add(UNIX_TO_REFERENCE_SECONDS)
    }

    /// Total nanoseconds since the reference date.
    pub fn nanos_since_reference(self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    /// Creates an instant from total nanoseconds since the reference date,
    /// saturating at the ends of the `i64` seconds range.
    pub fn from_nanos_since_reference(nanos: i128) -> Self {
        let per = i128::from(NANOS_PER_SECOND);
        Self {
            seconds: nanos
                .div_euclid(per)
                .clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64,
            nanos: nanos.rem_euclid(per) as u32,
        }
    }

    /// This instant moved by a signed number of nanoseconds.
    pub fn add_nanos(self, nanos: i128) -> Self {
        Self::from_nanos_since_reference(self.nanos_since_reference() + nanos)
    }

    /// This instant moved by a signed number of seconds.
    pub fn add_seconds(self, seconds: i64) -> Self {
        Self {
            seconds: self.seconds.saturating_add(seconds),
            nanos: self.nanos,
        }
    }

    /// Signed nanoseconds from `earlier` to `self`.
    pub fn nanos_since(self, earlier: Instant) -> i128 {
        self.nanos_since_reference() - earlier.nanos_since_reference()
    }
}

/// Wall-clock reading of an instant at a given UTC offset. The day is
/// clamped to the supported range; the time of day is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LocalTime {
    pub(crate) day: FixedDay,
    /// Seconds past local midnight.
    pub(crate) second_of_day: i64,
    pub(crate) nanos: u32,
}

impl LocalTime {
    pub(crate) fn from_instant(instant: Instant, offset_seconds: i32) -> Self {
        let local = instant.unix_seconds().saturating_add(i64::from(offset_seconds));
        let day = UNIX_EPOCH_DAY.saturating_add(local.div_euclid(SECONDS_PER_DAY));
        Self {
            day: FixedDay::new(day).clamp(FIRST_SUPPORTED_DAY, LAST_SUPPORTED_DAY),
            second_of_day: local.rem_euclid(SECONDS_PER_DAY),
            nanos: instant.subsec_nanos(),
        }
    }

    pub(crate) fn hour(self) -> i64 {
        self.second_of_day / 3600
    }

    pub(crate) fn minute(self) -> i64 {
        self.second_of_day / 60 % 60
    }

    pub(crate) fn second(self) -> i64 {
        self.second_of_day % 60
    }
}

/// Local seconds since the Unix epoch for a day and a second of that day.
pub(crate) fn local_seconds(day: FixedDay, second_of_day: i64) -> i64 {
    (day.get() - UNIX_EPOCH_DAY) * SECONDS_PER_DAY + second_of_day
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_and_reference_agree() {
        let t = Instant::from_unix_seconds(UNIX_TO_REFERENCE_SECONDS);
        assert_eq!(t, Instant::REFERENCE);
        assert_eq!(t.unix_seconds(), UNIX_TO_REFERENCE_SECONDS);
    }

    #[test]
    fn fractional_seconds_floor() {
        let t = Instant::from_reference_seconds(-1.25);
        assert_eq!(t.whole_seconds(), -2);
        assert_eq!(t.subsec_nanos(), 750_000_000);
    }

    #[test]
    fn nanos_carry() {
        let t = Instant::new(10, 2_500_000_000);
        assert_eq!(t.whole_seconds(), 12);
        assert_eq!(t.subsec_nanos(), 500_000_000);
    }

    #[test]
    fn ordering_and_differences_are_exact() {
        let a = Instant::from_reference_seconds(471_025_151.123);
        let b = a.add_seconds(200);
        assert!(b > a);
        assert_eq!(b.nanos_since(a), 200_000_000_000);
        assert_eq!(a.add_nanos(-1).nanos_since(a), -1);
    }

    #[test]
    fn local_time_splits_day() {
        // 1970-01-01T23:30:00Z at +01:00 is 00:30 on Jan 2.
        let t = Instant::from_unix_seconds(23 * 3600 + 1800);
        let local = LocalTime::from_instant(t, 3600);
        assert_eq!(local.day.get(), UNIX_EPOCH_DAY + 1);
        assert_eq!(local.hour(), 0);
        assert_eq!(local.minute(), 30);
        assert_eq!(local_seconds(local.day, local.second_of_day), 24 * 3600 + 1800);
    }

    #[test]
    fn supported_range_bounds() {
        assert_eq!(FIRST_SUPPORTED_DAY, almanac_astro::fixed_from_gregorian(-100_000, 1, 1));
        assert_eq!(LAST_SUPPORTED_DAY, almanac_astro::fixed_from_gregorian(100_000, 12, 31));
        assert!(supported_day(LAST_SUPPORTED_DAY).is_ok());
        assert!(matches!(
            supported_day(LAST_SUPPORTED_DAY + 1),
            Err(CalendarError::InvalidComponent { field: Field::Year, value: 100_001 })
        ));
        assert!(supported_instant(Instant::new(i64::MAX, 0)).is_err());
        assert!(supported_instant(Instant::REFERENCE).is_ok());
    }

    #[test]
    fn far_instants_clamp_to_the_supported_days() {
        let late = LocalTime::from_instant(Instant::new(i64::MAX / 2, 0), 3600);
        assert_eq!(late.day, LAST_SUPPORTED_DAY);
        let early = LocalTime::from_instant(Instant::new(i64::MIN / 2, 0), -3600);
        assert_eq!(early.day, FIRST_SUPPORTED_DAY);
        assert!((0..SECONDS_PER_DAY).contains(&early.second_of_day));
    }

    #[test]
    fn local_time_before_epoch() {
        let local = LocalTime::from_instant(Instant::from_unix_seconds(-1), 0);
        assert_eq!(local.day.get(), UNIX_EPOCH_DAY - 1);
        assert_eq!(local.second_of_day, 86_399);
    }
}
