//! Islamic calendars: two arithmetic (tabular) variants and two that follow
//! the moon.

use almanac_astro::{FixedDay, MEAN_SYNODIC_MONTH, nth_new_moon};

use super::{CalendarSystem, SystemDate, checked_date, checked_month};
use crate::error::CalendarError;
use crate::era::{Era, EraCounting, EraTable};
use crate::identifier::CalendarIdentifier;

/// 1 Muharram 1 AH, Friday July 16, 622 (Julian).
const CIVIL_EPOCH: i64 = 227_015;
/// 1 Muharram 1 AH, Thursday July 15, 622 (Julian).
const TABULAR_EPOCH: i64 = 227_014;
/// Lunation index of the new moon preceding 1 Muharram 1 AH.
const FIRST_LUNATION: i64 = 7_687;
/// 10631 days in every 30-year cycle.
const MEAN_YEAR_DAYS: f64 = 10_631.0 / 30.0;
/// Umm al-Qura reckons in Mecca, UTC+3.
const MECCA_OFFSET_DAYS: f64 = 3.0 / 24.0;

fn hijri_eras() -> EraTable {
    EraTable::from_ordered(vec![Era::new("AH", None, 1, EraCounting::Forward)])
}

/// The tabular Islamic calendar: 30-year cycle with 11 leap years, odd
/// months of 30 days and even months of 29 (the twelfth has 30 in leap
/// years).
#[derive(Debug, Clone)]
pub struct IslamicArithmetic {
    identifier: CalendarIdentifier,
    epoch: FixedDay,
    eras: EraTable,
}

impl IslamicArithmetic {
    /// Civil epoch (Friday).
    pub fn civil() -> Self {
        Self {
            identifier: CalendarIdentifier::IslamicCivil,
            epoch: FixedDay::new(CIVIL_EPOCH),
            eras: hijri_eras(),
        }
    }

    /// Astronomical epoch (Thursday).
    pub fn tabular() -> Self {
        Self {
            identifier: CalendarIdentifier::IslamicTabular,
            epoch: FixedDay::new(TABULAR_EPOCH),
            eras: hijri_eras(),
        }
    }

    fn fixed(&self, year: i32, month: u8, day: u8) -> FixedDay {
        let (y, m) = (i64::from(year), i64::from(month));
        self.epoch - 1
            + (y - 1) * 354
            + (3 + 11 * y).div_euclid(30)
            + 29 * (m - 1)
            + m.div_euclid(2)
            + i64::from(day)
    }
}

impl CalendarSystem for IslamicArithmetic {
    fn identifier(&self) -> CalendarIdentifier {
        self.identifier
    }

    fn epoch(&self) -> FixedDay {
        self.epoch
    }

    fn mean_year_days(&self) -> f64 {
        MEAN_YEAR_DAYS
    }

    fn is_leap_year(&self, year: i32) -> bool {
        (14 + 11 * i64::from(year)).rem_euclid(30) < 11
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        let month = checked_month(self, year, i64::from(month))?;
        Ok(match month {
            12 if self.is_leap_year(year) => 30,
            m if m % 2 == 1 => 30,
            _ => 29,
        })
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if self.is_leap_year(year) { 355 } else { 354 }
    }

    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError> {
        checked_date(self, date)?;
        Ok(self.fixed(date.year, date.month, date.day))
    }

    fn date_from_fixed(&self, day: FixedDay) -> SystemDate {
        let year = (30 * (day - self.epoch) + 10_646).div_euclid(10_631) as i32;
        let prior_days = day - self.fixed(year, 1, 1);
        let month = ((11 * prior_days + 330).div_euclid(325)) as u8;
        let dom = (day - self.fixed(year, month, 1) + 1) as u8;
        SystemDate::new(year, month, dom)
    }

    fn eras(&self) -> &EraTable {
        &self.eras
    }
}

/// How a lunar Islamic calendar turns a new moon into a month start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrescentRule {
    /// The month starts on the UTC day of the conjunction, or the next day
    /// when the conjunction is at or after noon.
    Astronomical,
    /// The month starts on the day after the conjunction in Mecca, or the
    /// day after that when the conjunction is at or after 18:00 local time.
    UmmAlQura,
}

/// A lunar Islamic calendar whose months begin with observed-style new
/// moons. Month lengths are 29 or 30 days and years 354 or 355.
///
/// Umm al-Qura is approximated by its conjunction-before-sunset rule in
/// Mecca rather than the official published tables.
#[derive(Debug, Clone)]
pub struct IslamicLunar {
    identifier: CalendarIdentifier,
    rule: CrescentRule,
    eras: EraTable,
}

impl IslamicLunar {
    /// Months from the astronomical new moon.
    pub fn astronomical() -> Self {
        Self {
            identifier: CalendarIdentifier::Islamic,
            rule: CrescentRule::Astronomical,
            eras: hijri_eras(),
        }
    }

    /// Months following the Umm al-Qura rule.
    pub fn umm_al_qura() -> Self {
        Self {
            identifier: CalendarIdentifier::IslamicUmmAlQura,
            rule: CrescentRule::UmmAlQura,
            eras: hijri_eras(),
        }
    }

    /// First day of the month `index` months after 1 Muharram 1 AH.
    fn month_start(&self, index: i64) -> FixedDay {
        let conjunction = nth_new_moon(FIRST_LUNATION + index).inner();
        let day = match self.rule {
            CrescentRule::Astronomical => (conjunction - 0.5).ceil(),
            CrescentRule::UmmAlQura => {
                let local = conjunction + MECCA_OFFSET_DAYS;
                let day = local.floor();
                if local - day < 0.75 { day + 1.0 } else { day + 2.0 }
            }
        };
        FixedDay::new(day as i64)
    }

    fn month_index(year: i32, month: u8) -> i64 {
        12 * (i64::from(year) - 1) + i64::from(month) - 1
    }
}

impl CalendarSystem for IslamicLunar {
    fn identifier(&self) -> CalendarIdentifier {
        self.identifier
    }

    fn epoch(&self) -> FixedDay {
        self.month_start(0)
    }

    fn mean_year_days(&self) -> f64 {
        MEAN_YEAR_DAYS
    }

    fn is_leap_year(&self, year: i32) -> bool {
        self.days_in_year(year) > 354
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        let month = checked_month(self, year, i64::from(month))?;
        let index = Self::month_index(year, month);
        Ok((self.month_start(index + 1) - self.month_start(index)) as u8)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        let first = Self::month_index(year, 1);
        (self.month_start(first + 12) - self.month_start(first)) as u16
    }

    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError> {
        checked_date(self, date)?;
        Ok(self.month_start(Self::month_index(date.year, date.month)) + i64::from(date.day) - 1)
    }

    fn date_from_fixed(&self, day: FixedDay) -> SystemDate {
        let mut index = ((day - self.month_start(0)) as f64 / MEAN_SYNODIC_MONTH).floor() as i64;
        while self.month_start(index + 1) <= day {
            index += 1;
        }
        while self.month_start(index) > day {
            index -= 1;
        }
        let year = (index.div_euclid(12) + 1) as i32;
        let month = (index.rem_euclid(12) + 1) as u8;
        let dom = (day - self.month_start(index) + 1) as u8;
        SystemDate::new(year, month, dom)
    }

    fn eras(&self) -> &EraTable {
        &self.eras
    }
}
