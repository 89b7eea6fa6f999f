//! Day reckoning: fixed day numbers, fractional moments and the
//! proleptic Gregorian mapping used to anchor every other calendar.

use std::ops::{Add, Sub};

/// A fixed day number: day 1 is January 1 of year 1 in the proleptic
/// Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedDay(i64);

impl FixedDay {
    /// Creates a fixed day from its raw day number.
    pub const fn new(day: i64) -> Self {
        Self(day)
    }

    /// Returns the raw day number.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns the moment at the start (midnight) of this day.
    pub fn as_moment(self) -> Moment {
        Moment(self.0 as f64)
    }

    /// Day of the week, 0 = Sunday through 6 = Saturday.
    pub fn day_of_week(self) -> u8 {
        // Day 0 is a Sunday.
        self.0.rem_euclid(7) as u8
    }
}

impl Add<i64> for FixedDay {
    type Output = FixedDay;

    fn add(self, rhs: i64) -> FixedDay {
        FixedDay(self.0 + rhs)
    }
}

impl Sub<i64> for FixedDay {
    type Output = FixedDay;

    fn sub(self, rhs: i64) -> FixedDay {
        FixedDay(self.0 - rhs)
    }
}

impl Sub for FixedDay {
    type Output = i64;

    fn sub(self, rhs: FixedDay) -> i64 {
        self.0 - rhs.0
    }
}

/// A fractional day count on the same scale as [`FixedDay`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Moment(f64);

impl Moment {
    /// Creates a moment from a fractional day count.
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the fractional day count.
    pub const fn inner(self) -> f64 {
        self.0
    }

    /// Returns the fixed day containing this moment.
    pub fn as_fixed(self) -> FixedDay {
        FixedDay(self.0.floor() as i64)
    }
}

impl Add<f64> for Moment {
    type Output = Moment;

    fn add(self, rhs: f64) -> Moment {
        Moment(self.0 + rhs)
    }
}

impl Sub<f64> for Moment {
    type Output = Moment;

    fn sub(self, rhs: f64) -> Moment {
        Moment(self.0 - rhs)
    }
}

impl Sub for Moment {
    type Output = f64;

    fn sub(self, rhs: Moment) -> f64 {
        self.0 - rhs.0
    }
}

/// Whether `year` is a leap year in the proleptic Gregorian calendar.
pub const fn is_gregorian_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a Gregorian month.
pub const fn gregorian_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_gregorian_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Fixed day of a proleptic Gregorian date. Month and day are not
/// range-checked.
pub fn fixed_from_gregorian(year: i32, month: u8, day: u8) -> FixedDay {
    let prior = i64::from(year) - 1;
    let mut fixed = 365 * prior + prior.div_euclid(4) - prior.div_euclid(100) + prior.div_euclid(400);
    fixed += (367 * i64::from(month) - 362).div_euclid(12);
    if month > 2 {
        fixed -= if is_gregorian_leap_year(year) { 1 } else { 2 };
    }
    FixedDay(fixed + i64::from(day))
}

/// Gregorian year containing a fixed day.
pub fn gregorian_year_from_fixed(date: FixedDay) -> i32 {
    let d0 = date.0 - 1;
    let n400 = d0.div_euclid(146_097);
    let d1 = d0.rem_euclid(146_097);
    let n100 = d1.div_euclid(36_524);
    let d2 = d1.rem_euclid(36_524);
    let n4 = d2.div_euclid(1_461);
    let d3 = d2.rem_euclid(1_461);
    let n1 = d3.div_euclid(365);
    let year = 400 * n400 + 100 * n100 + 4 * n4 + n1;
    let year = if n100 == 4 || n1 == 4 { year } else { year + 1 };
    // Saturates for days whose year does not fit an i32.
    year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Proleptic Gregorian `(year, month, day)` of a fixed day.
pub fn gregorian_from_fixed(date: FixedDay) -> (i32, u8, u8) {
    let year = gregorian_year_from_fixed(date);
    let prior_days = date - fixed_from_gregorian(year, 1, 1);
    let correction = if date < fixed_from_gregorian(year, 3, 1) {
        0
    } else if is_gregorian_leap_year(year) {
        1
    } else {
        2
    };
    let month = ((12 * (prior_days + correction) + 373).div_euclid(367)) as u8;
    let day = (date - fixed_from_gregorian(year, month, 1) + 1) as u8;
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_anchors() {
        assert_eq!(fixed_from_gregorian(1, 1, 1).get(), 1);
        assert_eq!(fixed_from_gregorian(1970, 1, 1).get(), 719_163);
        assert_eq!(fixed_from_gregorian(2001, 1, 1).get(), 730_486);
    }

    #[test]
    fn inverse_over_leap_boundaries() {
        for (y, m, d) in [(2000, 2, 29), (1900, 3, 1), (-44, 3, 15), (0, 12, 31), (2024, 12, 31)] {
            let fixed = fixed_from_gregorian(y, m, d);
            assert_eq!(gregorian_from_fixed(fixed), (y, m, d));
        }
    }

    #[test]
    fn day_of_week_anchor() {
        // 2001-01-01 was a Monday.
        assert_eq!(fixed_from_gregorian(2001, 1, 1).day_of_week(), 1);
        // 1970-01-01 was a Thursday.
        assert_eq!(fixed_from_gregorian(1970, 1, 1).day_of_week(), 4);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(gregorian_days_in_month(2000, 2), 29);
        assert_eq!(gregorian_days_in_month(1900, 2), 28);
        assert_eq!(gregorian_days_in_month(2021, 9), 30);
        assert_eq!(gregorian_days_in_month(2021, 12), 31);
    }

    #[test]
    fn year_saturates_far_from_the_epoch() {
        assert_eq!(gregorian_year_from_fixed(FixedDay::new(i64::MAX / 2)), i32::MAX);
        assert_eq!(gregorian_year_from_fixed(FixedDay::new(i64::MIN / 2)), i32::MIN);
        let last = fixed_from_gregorian(100_000, 12, 31);
        assert_eq!(gregorian_from_fixed(last), (100_000, 12, 31));
        assert_eq!(gregorian_from_fixed(fixed_from_gregorian(-100_000, 1, 1)), (-100_000, 1, 1));
    }

    #[test]
    fn moment_floor() {
        assert_eq!(Moment::new(-0.25).as_fixed(), FixedDay::new(-1));
        assert_eq!(Moment::new(10.99).as_fixed(), FixedDay::new(10));
    }
}
