//! The Persian (solar hijri) calendar under the 33-year arithmetic rule.

use almanac_astro::FixedDay;

use super::{CalendarSystem, SystemDate, checked_date, checked_month};
use crate::error::CalendarError;
use crate::era::{Era, EraCounting, EraTable};
use crate::identifier::CalendarIdentifier;

const PERSIAN_EPOCH: i64 = 226_896;

/// The arithmetic Persian calendar: six 31-day months, five 30-day months
/// and a final month of 29 or 30 days.
#[derive(Debug, Clone)]
pub struct Persian {
    eras: EraTable,
}

impl Persian {
    /// Creates the calendar with its single Anno Persico era.
    pub fn new() -> Self {
        Self {
            eras: EraTable::from_ordered(vec![Era::new("AP", None, 1, EraCounting::Forward)]),
        }
    }

    fn new_year(year: i32) -> FixedDay {
        let y = i64::from(year);
        FixedDay::new(PERSIAN_EPOCH - 1 + 365 * (y - 1) + (8 * y + 21).div_euclid(33))
    }

    fn days_before_month(month: u8) -> i64 {
        let m = i64::from(month);
        if m <= 7 { 31 * (m - 1) } else { 30 * (m - 1) + 6 }
    }
}

impl Default for Persian {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarSystem for Persian {
    fn identifier(&self) -> CalendarIdentifier {
        CalendarIdentifier::Persian
    }

    fn epoch(&self) -> FixedDay {
        Self::new_year(1)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        (25 * i64::from(year) + 11).rem_euclid(33) < 8
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        let month = checked_month(self, year, i64::from(month))?;
        Ok(match month {
            1..=6 => 31,
            7..=11 => 30,
            _ if self.is_leap_year(year) => 30,
            _ => 29,
        })
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if self.is_leap_year(year) { 366 } else { 365 }
    }

    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError> {
        checked_date(self, date)?;
        Ok(Self::new_year(date.year) + Self::days_before_month(date.month) + i64::from(date.day) - 1)
    }

    fn date_from_fixed(&self, day: FixedDay) -> SystemDate {
        let since_epoch = day.get() - PERSIAN_EPOCH + 1;
        let mut year = (1 + (33 * since_epoch + 3).div_euclid(12_053)) as i32;
        while Self::new_year(year) > day {
            year -= 1;
        }
        while Self::new_year(year + 1) <= day {
            year += 1;
        }
        let into_year = day - Self::new_year(year);
        let month = if into_year < 216 {
            into_year / 31 + 1
        } else {
            (into_year - 6) / 30 + 1
        } as u8;
        let dom = (into_year - Self::days_before_month(month) + 1) as u8;
        SystemDate::new(year, month, dom)
    }

    fn eras(&self) -> &EraTable {
        &self.eras
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_astro::fixed_from_gregorian;

    #[test]
    fn mehr_1397() {
        let p = Persian::new();
        assert_eq!(
            p.date_from_fixed(fixed_from_gregorian(2018, 10, 10)),
            SystemDate::new(1397, 7, 18)
        );
    }

    #[test]
    fn nowruz() {
        let p = Persian::new();
        assert_eq!(
            p.fixed_from_date(SystemDate::new(1397, 1, 1)).unwrap(),
            fixed_from_gregorian(2018, 3, 21)
        );
        assert_eq!(
            p.fixed_from_date(SystemDate::new(1403, 1, 1)).unwrap(),
            fixed_from_gregorian(2024, 3, 20)
        );
    }

    #[test]
    fn esfand_length() {
        let p = Persian::new();
        assert!(p.is_leap_year(1403));
        assert_eq!(p.days_in_month(1403, 12).unwrap(), 30);
        assert_eq!(p.days_in_month(1402, 12).unwrap(), 29);
    }
}
