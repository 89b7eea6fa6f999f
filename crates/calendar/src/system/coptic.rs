//! Coptic and Ethiopian calendars: twelve 30-day months and a five- or
//! six-day thirteenth month, with a leap year every fourth year.

use almanac_astro::FixedDay;

use super::{CalendarSystem, SystemDate, checked_date, checked_month};
use crate::error::CalendarError;
use crate::era::{Era, EraCounting, EraTable};
use crate::identifier::CalendarIdentifier;

const COPTIC_EPOCH: i64 = 103_605;
const ETHIOPIC_EPOCH: i64 = 2_796;
const AMETE_ALEM_OFFSET: i32 = 5_500;

/// The Alexandrian month structure shared by the Coptic and Ethiopian
/// calendars, differing in epoch and eras.
#[derive(Debug, Clone)]
pub struct Coptic {
    identifier: CalendarIdentifier,
    epoch: FixedDay,
    eras: EraTable,
}

impl Coptic {
    /// The Coptic calendar (Era of the Martyrs).
    pub fn coptic() -> Self {
        let epoch = FixedDay::new(COPTIC_EPOCH);
        Self {
            identifier: CalendarIdentifier::Coptic,
            epoch,
            eras: EraTable::from_ordered(vec![
                Era::new("ERA0", None, 0, EraCounting::Backward),
                Era::new("ERA1", Some(epoch), 1, EraCounting::Forward),
            ]),
        }
    }

    /// The Ethiopian calendar counting from the Incarnation, with earlier
    /// years in the Amete Alem era.
    pub fn ethiopic_amete_mihret() -> Self {
        let epoch = FixedDay::new(ETHIOPIC_EPOCH);
        Self {
            identifier: CalendarIdentifier::EthiopicAmeteMihret,
            epoch,
            eras: EraTable::from_ordered(vec![
                Era::new("ERA0", None, 1 - AMETE_ALEM_OFFSET, EraCounting::Forward),
                Era::new("ERA1", Some(epoch), 1, EraCounting::Forward),
            ]),
        }
    }

    /// The Ethiopian calendar counting every year in the Amete Alem era.
    pub fn ethiopic_amete_alem() -> Self {
        Self {
            identifier: CalendarIdentifier::EthiopicAmeteAlem,
            epoch: FixedDay::new(ETHIOPIC_EPOCH),
            eras: EraTable::from_ordered(vec![Era::new(
                "ERA0",
                None,
                1 - AMETE_ALEM_OFFSET,
                EraCounting::Forward,
            )]),
        }
    }

    fn new_year(&self, year: i32) -> FixedDay {
        let y = i64::from(year);
        self.epoch - 1 + 365 * (y - 1) + y.div_euclid(4) + 1
    }
}

impl CalendarSystem for Coptic {
    fn identifier(&self) -> CalendarIdentifier {
        self.identifier
    }

    fn epoch(&self) -> FixedDay {
        self.epoch
    }

    fn is_leap_year(&self, year: i32) -> bool {
        year.rem_euclid(4) == 3
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        13
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        let month = checked_month(self, year, i64::from(month))?;
        Ok(match month {
            13 if self.is_leap_year(year) => 6,
            13 => 5,
            _ => 30,
        })
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if self.is_leap_year(year) { 366 } else { 365 }
    }

    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError> {
        checked_date(self, date)?;
        Ok(self.new_year(date.year) + 30 * (i64::from(date.month) - 1) + i64::from(date.day) - 1)
    }

    fn date_from_fixed(&self, day: FixedDay) -> SystemDate {
        let year = (4 * (day - self.epoch) + 1463).div_euclid(1461) as i32;
        let into_year = day - self.new_year(year);
        let month = (into_year.div_euclid(30) + 1) as u8;
        let dom = (into_year - 30 * (i64::from(month) - 1) + 1) as u8;
        SystemDate::new(year, month, dom)
    }

    fn eras(&self) -> &EraTable {
        &self.eras
    }
}
