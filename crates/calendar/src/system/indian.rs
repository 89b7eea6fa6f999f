//! The Indian national (Saka) calendar.

use almanac_astro::{FixedDay, fixed_from_gregorian, gregorian_year_from_fixed, is_gregorian_leap_year};

use super::{CalendarSystem, SystemDate, checked_date, checked_month};
use crate::error::CalendarError;
use crate::era::{Era, EraCounting, EraTable};
use crate::identifier::CalendarIdentifier;

const SAKA_OFFSET: i32 = 78;

/// The Saka calendar. Year starts on March 22 (March 21 in Gregorian leap
/// years); Chaitra has 30 days (31 in leap years), the next five months 31
/// and the rest 30.
#[derive(Debug, Clone)]
pub struct Indian {
    eras: EraTable,
}

impl Indian {
    /// Creates the calendar with its single Saka era.
    pub fn new() -> Self {
        Self {
            eras: EraTable::from_ordered(vec![Era::new("Saka", None, 1, EraCounting::Forward)]),
        }
    }

    fn new_year(year: i32) -> FixedDay {
        let gregorian = year + SAKA_OFFSET;
        let day = if is_gregorian_leap_year(gregorian) { 21 } else { 22 };
        fixed_from_gregorian(gregorian, 3, day)
    }

    fn month_length(year: i32, month: u8) -> u8 {
        match month {
            1 if is_gregorian_leap_year(year + SAKA_OFFSET) => 31,
            1 => 30,
            2..=6 => 31,
            _ => 30,
        }
    }
}

impl Default for Indian {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarSystem for Indian {
    fn identifier(&self) -> CalendarIdentifier {
        CalendarIdentifier::Indian
    }

    fn epoch(&self) -> FixedDay {
        Self::new_year(1)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_gregorian_leap_year(year + SAKA_OFFSET)
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        let month = checked_month(self, year, i64::from(month))?;
        Ok(Self::month_length(year, month))
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if self.is_leap_year(year) { 366 } else { 365 }
    }

    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError> {
        checked_date(self, date)?;
        let before: i64 = (1..date.month)
            .map(|m| i64::from(Self::month_length(date.year, m)))
            .sum();
        Ok(Self::new_year(date.year) + before + i64::from(date.day) - 1)
    }

    fn date_from_fixed(&self, day: FixedDay) -> SystemDate {
        let mut year = gregorian_year_from_fixed(day) - SAKA_OFFSET;
        if day < Self::new_year(year) {
            year -= 1;
        }
        let mut remaining = day - Self::new_year(year);
        let mut month = 1;
        while month < 12 && remaining >= i64::from(Self::month_length(year, month)) {
            remaining -= i64::from(Self::month_length(year, month));
            month += 1;
        }
        SystemDate::new(year, month, (remaining + 1) as u8)
    }

    fn eras(&self) -> &EraTable {
        &self.eras
    }
}
