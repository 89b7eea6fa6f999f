//! Calendars sharing Gregorian months: Gregorian, ISO-8601, Buddhist,
//! Republic of China and Japanese. They differ only in their eras.

use almanac_astro::{
    FixedDay, fixed_from_gregorian, gregorian_days_in_month, gregorian_from_fixed,
    is_gregorian_leap_year,
};

use super::japanese::japanese_eras;
use super::{CalendarSystem, SystemDate, checked_date, checked_month};
use crate::error::CalendarError;
use crate::era::{Era, EraCounting, EraTable};
use crate::identifier::CalendarIdentifier;

/// Proleptic Gregorian arithmetic with a calendar-specific era table.
/// Extended years are Gregorian years (year 0 is 1 BC).
#[derive(Debug, Clone)]
pub struct Gregorian {
    identifier: CalendarIdentifier,
    eras: EraTable,
}

impl Gregorian {
    /// The Gregorian calendar with BC/AD eras.
    pub fn new() -> Self {
        Self {
            identifier: CalendarIdentifier::Gregorian,
            eras: common_eras(),
        }
    }

    /// The ISO-8601 calendar; identical arithmetic and eras.
    pub fn iso8601() -> Self {
        Self {
            identifier: CalendarIdentifier::Iso8601,
            eras: common_eras(),
        }
    }

    /// The Thai Buddhist calendar: one era, year 1 is 543 BC.
    pub fn buddhist() -> Self {
        Self {
            identifier: CalendarIdentifier::Buddhist,
            eras: EraTable::from_ordered(vec![Era::new("BE", None, -542, EraCounting::Forward)]),
        }
    }

    /// The Minguo calendar: year 1 is 1912.
    pub fn republic_of_china() -> Self {
        Self {
            identifier: CalendarIdentifier::RepublicOfChina,
            eras: EraTable::from_ordered(vec![
                Era::new("Before R.O.C.", None, 1911, EraCounting::Backward)
                    .with_native_name("民國前"),
                Era::new(
                    "Minguo",
                    Some(fixed_from_gregorian(1912, 1, 1)),
                    1912,
                    EraCounting::Forward,
                )
                .with_native_name("民國"),
            ]),
        }
    }

    /// The Japanese calendar with the built-in imperial eras.
    pub fn japanese() -> Self {
        Self::japanese_with_eras(japanese_eras())
    }

    /// The Japanese calendar with a caller-supplied era table, e.g. the
    /// built-in one with a newly proclaimed era appended.
    pub fn japanese_with_eras(eras: EraTable) -> Self {
        Self {
            identifier: CalendarIdentifier::Japanese,
            eras,
        }
    }
}

impl Default for Gregorian {
    fn default() -> Self {
        Self::new()
    }
}

fn common_eras() -> EraTable {
    EraTable::from_ordered(vec![
        Era::new("BC", None, 0, EraCounting::Backward).with_native_name("紀元前"),
        Era::new(
            "AD",
            Some(fixed_from_gregorian(1, 1, 1)),
            1,
            EraCounting::Forward,
        )
        .with_native_name("西暦"),
    ])
}

impl CalendarSystem for Gregorian {
    fn identifier(&self) -> CalendarIdentifier {
        self.identifier
    }

    fn epoch(&self) -> FixedDay {
        FixedDay::new(1)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_gregorian_leap_year(year)
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        let month = checked_month(self, year, i64::from(month))?;
        Ok(gregorian_days_in_month(year, month))
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if is_gregorian_leap_year(year) { 366 } else { 365 }
    }

    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError> {
        checked_date(self, date)?;
        Ok(fixed_from_gregorian(date.year, date.month, date.day))
    }

    fn date_from_fixed(&self, day: FixedDay) -> SystemDate {
        let (year, month, day) = gregorian_from_fixed(day);
        SystemDate::new(year, month, day)
    }

    fn eras(&self) -> &EraTable {
        &self.eras
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buddhist_year_offset() {
        let b = Gregorian::buddhist();
        let day = fixed_from_gregorian(2019, 6, 1);
        assert_eq!(b.era_and_year(day, 2019), (0, 2562));
        assert_eq!(b.extended_year(0, 2562).unwrap(), 2019);
    }

    #[test]
    fn minguo_years() {
        let roc = Gregorian::republic_of_china();
        assert_eq!(roc.era_and_year(fixed_from_gregorian(2020, 1, 1), 2020), (1, 109));
        assert_eq!(roc.era_and_year(fixed_from_gregorian(1911, 12, 31), 1911), (0, 1));
        assert_eq!(roc.extended_year(0, 2).unwrap(), 1910);
    }

    #[test]
    fn bc_years() {
        let g = Gregorian::new();
        assert_eq!(g.era_and_year(fixed_from_gregorian(0, 6, 1), 0), (0, 1));
        assert_eq!(g.extended_year(1, 2016).unwrap(), 2016);
    }

    #[test]
    fn rejects_february_thirtieth() {
        let g = Gregorian::new();
        assert!(g.fixed_from_date(SystemDate::new(2020, 2, 30)).is_err());
        assert!(g.fixed_from_date(SystemDate::new(2020, 2, 29)).is_ok());
        assert!(g.fixed_from_date(SystemDate::new(2019, 2, 29)).is_err());
    }
}
