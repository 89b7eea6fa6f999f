//! The Hebrew lunisolar calendar.
//!
//! Months use fixed numbers 1..=13 starting at Tishri; month 6 (Adar I)
//! only exists in leap years, so a common year skips from 5 to 7.

use almanac_astro::FixedDay;

use super::{CalendarSystem, SystemDate, checked_date, checked_month};
use crate::error::CalendarError;
use crate::era::{Era, EraCounting, EraTable};
use crate::field::Field;
use crate::identifier::CalendarIdentifier;

const HEBREW_EPOCH: i64 = -1_373_427;
const ADAR_I: u8 = 6;

/// The arithmetic Hebrew calendar.
#[derive(Debug, Clone)]
pub struct Hebrew {
    eras: EraTable,
}

impl Hebrew {
    /// Creates the calendar with its single Anno Mundi era.
    pub fn new() -> Self {
        Self {
            eras: EraTable::from_ordered(vec![Era::new("AM", None, 1, EraCounting::Forward)]),
        }
    }

    /// Days from the epoch to Tishri 1 before the postponement for
    /// neighbouring year lengths.
    fn elapsed_days(year: i32) -> i64 {
        let y = i64::from(year);
        let months_elapsed = (235 * y - 234).div_euclid(19);
        let parts_elapsed = 12_084 + 13_753 * months_elapsed;
        let days = 29 * months_elapsed + parts_elapsed.div_euclid(25_920);
        if (3 * (days + 1)).rem_euclid(7) < 3 {
            days + 1
        } else {
            days
        }
    }

    fn year_length_correction(year: i32) -> i64 {
        let ny0 = Self::elapsed_days(year - 1);
        let ny1 = Self::elapsed_days(year);
        let ny2 = Self::elapsed_days(year + 1);
        if ny2 - ny1 == 356 {
            2
        } else if ny1 - ny0 == 382 {
            1
        } else {
            0
        }
    }

    fn new_year(year: i32) -> FixedDay {
        FixedDay::new(HEBREW_EPOCH + Self::elapsed_days(year) + Self::year_length_correction(year))
    }

    fn year_length(year: i32) -> i64 {
        Self::new_year(year + 1) - Self::new_year(year)
    }

    fn label_length(year: i32, label: u8) -> u8 {
        let length = Self::year_length(year);
        match label {
            1 | 5 | 8 | 10 | 12 => 30,
            2 if length % 10 == 5 => 30,
            2 => 29,
            3 if length % 10 == 3 => 29,
            3 => 30,
            ADAR_I => 30,
            _ => 29,
        }
    }

    fn leap(year: i32) -> bool {
        (7 * i64::from(year) + 1).rem_euclid(19) < 7
    }
}

impl Default for Hebrew {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarSystem for Hebrew {
    fn identifier(&self) -> CalendarIdentifier {
        CalendarIdentifier::Hebrew
    }

    fn epoch(&self) -> FixedDay {
        Self::new_year(1)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        Self::leap(year)
    }

    fn months_in_year(&self, year: i32) -> u8 {
        if Self::leap(year) { 13 } else { 12 }
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        let month = checked_month(self, year, i64::from(month))?;
        Ok(Self::label_length(year, self.month_label(year, month).0))
    }

    fn is_leap_month(&self, year: i32, month: u8) -> bool {
        Self::leap(year) && month == ADAR_I
    }

    fn days_in_year(&self, year: i32) -> u16 {
        Self::year_length(year) as u16
    }

    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError> {
        checked_date(self, date)?;
        let before: i64 = (1..date.month)
            .map(|m| i64::from(Self::label_length(date.year, self.month_label(date.year, m).0)))
            .sum();
        Ok(Self::new_year(date.year) + before + i64::from(date.day) - 1)
    }

    fn date_from_fixed(&self, day: FixedDay) -> SystemDate {
        let average_year = 35_975_351.0 / 98_496.0;
        let mut year = ((day - FixedDay::new(HEBREW_EPOCH)) as f64 / average_year).floor() as i32;
        while Self::new_year(year + 1) <= day {
            year += 1;
        }
        while Self::new_year(year) > day {
            year -= 1;
        }
        let mut remaining = day - Self::new_year(year);
        let mut month = 1;
        loop {
            let length = i64::from(Self::label_length(year, self.month_label(year, month).0));
            if remaining < length || month == self.months_in_year(year) {
                break;
            }
            remaining -= length;
            month += 1;
        }
        SystemDate::new(year, month, (remaining + 1) as u8)
    }

    fn eras(&self) -> &EraTable {
        &self.eras
    }

    fn month_label(&self, year: i32, month: u8) -> (u8, bool) {
        if Self::leap(year) {
            (month, month == ADAR_I)
        } else if month >= ADAR_I {
            (month + 1, false)
        } else {
            (month, false)
        }
    }

    fn ordinal_month(&self, year: i32, month: i64, leap: Option<bool>) -> Result<u8, CalendarError> {
        let invalid = CalendarError::InvalidComponent {
            field: Field::Month,
            value: month,
        };
        let label = u8::try_from(month).map_err(|_| invalid.clone())?;
        if !(1..=13).contains(&label) {
            return Err(invalid);
        }
        if leap.is_some_and(|l| l != (label == ADAR_I)) {
            return Err(CalendarError::InvalidComponent {
                field: Field::IsLeapMonth,
                value: i64::from(leap == Some(true)),
            });
        }
        match (Self::leap(year), label) {
            (true, _) => Ok(label),
            (false, ADAR_I) => Err(invalid),
            (false, l) if l > ADAR_I => Ok(l - 1),
            (false, l) => Ok(l),
        }
    }
}
