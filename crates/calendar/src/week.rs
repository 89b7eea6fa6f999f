//! Week numbering under a first weekday and a minimum number of days in
//! the first week.
//!
//! Weekdays are numbered 1 (Sunday) to 7 (Saturday) whatever the first
//! weekday is; the rules only decide where weeks begin.

use almanac_astro::FixedDay;

use crate::error::CalendarError;
use crate::system::CalendarSystem;

/// Weekday of a fixed day, 1 = Sunday.
pub(crate) fn weekday_of(day: FixedDay) -> u8 {
    day.day_of_week() + 1
}

/// Where weeks start and which partial week counts as the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekRules {
    first_weekday: u8,
    minimum_days: u8,
}

impl WeekRules {
    /// ISO 8601: weeks start on Monday and week 1 holds the first Thursday.
    pub const ISO: WeekRules = WeekRules {
        first_weekday: 2,
        minimum_days: 4,
    };

    /// Rules with a first weekday (1 = Sunday) and a minimum number of
    /// days the first week must have inside its year or month.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidSetting`] if either value is outside
    /// 1..=7.
    pub fn new(first_weekday: u8, minimum_days: u8) -> Result<Self, CalendarError> {
        check_setting("first weekday", first_weekday)?;
        check_setting("minimum days in first week", minimum_days)?;
        Ok(Self {
            first_weekday,
            minimum_days,
        })
    }

    /// The first day of the week, 1 = Sunday.
    pub fn first_weekday(self) -> u8 {
        self.first_weekday
    }

    /// Minimum days in the first week.
    pub fn minimum_days(self) -> u8 {
        self.minimum_days
    }

    /// Position of a weekday within the week, 0 for the first weekday.
    pub fn relative_weekday(self, weekday: u8) -> i64 {
        (i64::from(weekday) - i64::from(self.first_weekday)).rem_euclid(7)
    }

    /// Week number of a day within a period (a year or a month), given the
    /// 1-based day of the period and its weekday. Days before the first
    /// full-enough week are in week 0.
    pub fn week_number(self, day_of_period: i64, weekday: u8) -> i64 {
        let period_start = (self.relative_weekday(weekday) - day_of_period + 1).rem_euclid(7);
        let week = (day_of_period + period_start - 1).div_euclid(7);
        if 7 - period_start >= i64::from(self.minimum_days) {
            week + 1
        } else {
            week
        }
    }

    /// First day of week 1 of a period beginning on `period_start`.
    pub fn first_week_start(self, period_start: FixedDay) -> FixedDay {
        let offset = self.relative_weekday(weekday_of(period_start));
        let start = period_start - offset;
        if 7 - offset < i64::from(self.minimum_days) {
            start + 7
        } else {
            start
        }
    }

    /// Day of a week number and weekday in a period beginning on
    /// `period_start`.
    pub fn day_of_week_in_period(self, period_start: FixedDay, week: i64, weekday: u8) -> FixedDay {
        self.first_week_start(period_start) + (week - 1) * 7 + self.relative_weekday(weekday)
    }

    /// Week of year of a day and the extended year that owns that week.
    ///
    /// The last days of a year can fall in week 1 of the next year, and
    /// the first days in the last week of the previous one.
    pub fn week_of_year(self, system: &dyn CalendarSystem, day: FixedDay) -> (i32, i64) {
        let year = system.date_from_fixed(day).year;
        let day_of_year = day - system.start_of_year(year) + 1;
        let weekday = weekday_of(day);
        let week = self.week_number(day_of_year, weekday);
        if week == 0 {
            let previous = day_of_year + i64::from(system.days_in_year(year - 1));
            return (year - 1, self.week_number(previous, weekday));
        }
        let length = i64::from(system.days_in_year(year));
        if day_of_year >= length - 5 {
            let relative = self.relative_weekday(weekday);
            let last_relative = (relative + length - day_of_year).rem_euclid(7);
            let spills = day_of_year + 7 - relative > length;
            if 6 - last_relative >= i64::from(self.minimum_days) && spills {
                return (year + 1, 1);
            }
        }
        (year, week)
    }
}

fn check_setting(name: &'static str, value: u8) -> Result<(), CalendarError> {
    if (1..=7).contains(&value) {
        Ok(())
    } else {
        Err(CalendarError::InvalidSetting {
            name,
            value: i64::from(value),
        })
    }
}
