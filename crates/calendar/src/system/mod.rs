//! Calendar systems: the per-calendar rules the codec is parameterised by.
//!
//! Every system works in *extended years* (a continuous year count with
//! no era breaks) and *ordinal months* (1..=`months_in_year`, counting a
//! lunisolar leap month in sequence). Eras and displayed month numbers
//! are mapped on top of that.

use std::fmt;
use std::sync::LazyLock;

use almanac_astro::FixedDay;

use crate::error::CalendarError;
use crate::era::EraTable;
use crate::field::Field;
use crate::identifier::CalendarIdentifier;
use crate::instant::{
    FIRST_SUPPORTED_DAY, Instant, LAST_SUPPORTED_DAY, SECONDS_PER_DAY, UNIX_EPOCH_DAY,
};

mod chinese;
mod coptic;
mod gregorian;
mod hebrew;
mod indian;
mod islamic;
mod japanese;
mod persian;

pub use chinese::Chinese;
pub use coptic::Coptic;
pub use gregorian::Gregorian;
pub use hebrew::Hebrew;
pub use indian::Indian;
pub use islamic::{IslamicArithmetic, IslamicLunar};
pub use japanese::japanese_eras;
pub use persian::Persian;

/// A date in a system's extended year and ordinal month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemDate {
    /// Extended year.
    pub year: i32,
    /// Ordinal month, 1-based.
    pub month: u8,
    /// Day of the month, 1-based.
    pub day: u8,
}

impl SystemDate {
    /// Creates a date without validating it.
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

/// The rules of one calendar system.
pub trait CalendarSystem: fmt::Debug + Send + Sync {
    /// Which calendar this is.
    fn identifier(&self) -> CalendarIdentifier;

    /// Fixed day of extended year 1, month 1, day 1.
    fn epoch(&self) -> FixedDay;

    /// Whether the extended year is a leap year (has a leap day or a leap
    /// month).
    fn is_leap_year(&self, year: i32) -> bool;

    /// Number of months in the extended year.
    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    /// Number of days in an ordinal month.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] if the month is outside
    /// 1..=`months_in_year(year)`.
    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError>;

    /// Whether an ordinal month is an inserted leap month.
    fn is_leap_month(&self, _year: i32, _month: u8) -> bool {
        false
    }

    /// Average length of a year in days.
    fn mean_year_days(&self) -> f64 {
        365.2425
    }

    /// Number of days in the extended year.
    fn days_in_year(&self, year: i32) -> u16 {
        (1..=self.months_in_year(year))
            .map(|m| u16::from(self.days_in_month(year, m).unwrap_or(0)))
            .sum()
    }

    /// Fixed day of a date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] if the month or day is
    /// out of range.
    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError>;

    /// Date of a fixed day.
    fn date_from_fixed(&self, day: FixedDay) -> SystemDate;

    /// First day of an extended year.
    fn start_of_year(&self, year: i32) -> FixedDay {
        // Month 1 day 1 exists in every year of every system.
        self.fixed_from_date(SystemDate::new(year, 1, 1))
            .unwrap_or_else(|_| self.epoch())
    }

    /// The calendar's eras.
    fn eras(&self) -> &EraTable;

    /// Era index and year within the era for a day in extended year `year`.
    fn era_and_year(&self, day: FixedDay, year: i32) -> (i64, i64) {
        let index = self.eras().index_of(day);
        let year_in_era = self
            .eras()
            .get(index)
            .map_or(i64::from(year), |era| era.year_in_era(year));
        (index as i64, year_in_era)
    }

    /// Extended year of a year within an era.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] if the era index is out
    /// of range or the year does not fit.
    fn extended_year(&self, era: i64, year: i64) -> Result<i32, CalendarError> {
        let entry = usize::try_from(era)
            .ok()
            .and_then(|i| self.eras().get(i))
            .ok_or(CalendarError::InvalidComponent {
                field: Field::Era,
                value: era,
            })?;
        let extended = entry.extended_year(year).ok_or(CalendarError::InvalidComponent {
            field: Field::Year,
            value: year,
        })?;
        checked_year(self, i64::from(extended))
    }

    /// Era assumed when components leave the era out: the most recent one.
    fn default_era(&self) -> i64 {
        self.eras().len().saturating_sub(1) as i64
    }

    /// Displayed month number and leap flag of an ordinal month.
    fn month_label(&self, _year: i32, month: u8) -> (u8, bool) {
        (month, false)
    }

    /// Ordinal month of a displayed month number and optional leap flag.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] if no such month exists
    /// in the year.
    fn ordinal_month(&self, year: i32, month: i64, leap: Option<bool>) -> Result<u8, CalendarError> {
        if leap == Some(true) {
            return Err(CalendarError::InvalidComponent {
                field: Field::IsLeapMonth,
                value: 1,
            });
        }
        checked_month(self, year, month)
    }

    /// Start of the calendar's epoch day at UTC midnight.
    fn epoch_date(&self) -> Instant {
        Instant::from_unix_seconds((self.epoch().get() - UNIX_EPOCH_DAY) * SECONDS_PER_DAY)
    }
}

/// Validates that an extended year overlaps the supported day range,
/// placing its start by the system's mean year length. A year of margin
/// on each side admits the partial years at both ends.
pub(crate) fn checked_year<S: CalendarSystem + ?Sized>(system: &S, year: i64) -> Result<i32, CalendarError> {
    let mean = system.mean_year_days();
    let start = system.epoch().get() as f64 + (year as f64 - 1.0) * mean;
    let range = FIRST_SUPPORTED_DAY.get() as f64 - mean..=LAST_SUPPORTED_DAY.get() as f64 + mean;
    match i32::try_from(year) {
        Ok(checked) if range.contains(&start) => Ok(checked),
        _ => Err(CalendarError::InvalidComponent {
            field: Field::Year,
            value: year,
        }),
    }
}

/// Validates a month number against the year's month count.
pub(crate) fn checked_month<S: CalendarSystem + ?Sized>(
    system: &S,
    year: i32,
    month: i64,
) -> Result<u8, CalendarError> {
    match u8::try_from(month) {
        Ok(m) if m >= 1 && m <= system.months_in_year(year) => Ok(m),
        _ => Err(CalendarError::InvalidComponent {
            field: Field::Month,
            value: month,
        }),
    }
}

/// Validates a date's month and day, returning the month length.
pub(crate) fn checked_date<S: CalendarSystem + ?Sized>(
    system: &S,
    date: SystemDate,
) -> Result<u8, CalendarError> {
    let length = system.days_in_month(date.year, date.month)?;
    if date.day == 0 || date.day > length {
        return Err(CalendarError::InvalidComponent {
            field: Field::Day,
            value: i64::from(date.day),
        });
    }
    Ok(length)
}

static GREGORIAN: LazyLock<Gregorian> = LazyLock::new(Gregorian::new);
static ISO8601: LazyLock<Gregorian> = LazyLock::new(Gregorian::iso8601);
static BUDDHIST: LazyLock<Gregorian> = LazyLock::new(Gregorian::buddhist);
static REPUBLIC_OF_CHINA: LazyLock<Gregorian> = LazyLock::new(Gregorian::republic_of_china);
static JAPANESE: LazyLock<Gregorian> = LazyLock::new(Gregorian::japanese);
static COPTIC: LazyLock<Coptic> = LazyLock::new(Coptic::coptic);
static AMETE_MIHRET: LazyLock<Coptic> = LazyLock::new(Coptic::ethiopic_amete_mihret);
static AMETE_ALEM: LazyLock<Coptic> = LazyLock::new(Coptic::ethiopic_amete_alem);
static HEBREW: LazyLock<Hebrew> = LazyLock::new(Hebrew::new);
static INDIAN: LazyLock<Indian> = LazyLock::new(Indian::new);
static PERSIAN: LazyLock<Persian> = LazyLock::new(Persian::new);
static ISLAMIC_CIVIL: LazyLock<IslamicArithmetic> = LazyLock::new(IslamicArithmetic::civil);
static ISLAMIC_TABULAR: LazyLock<IslamicArithmetic> = LazyLock::new(IslamicArithmetic::tabular);
static ISLAMIC: LazyLock<IslamicLunar> = LazyLock::new(IslamicLunar::astronomical);
static UMM_AL_QURA: LazyLock<IslamicLunar> = LazyLock::new(IslamicLunar::umm_al_qura);
static CHINESE: LazyLock<Chinese> = LazyLock::new(Chinese::new);

/// The shared built-in system for an identifier.
pub fn system_for(identifier: CalendarIdentifier) -> &'static dyn CalendarSystem {
    match identifier {
        CalendarIdentifier::Gregorian => &*GREGORIAN,
        CalendarIdentifier::Iso8601 => &*ISO8601,
        CalendarIdentifier::Buddhist => &*BUDDHIST,
        CalendarIdentifier::RepublicOfChina => &*REPUBLIC_OF_CHINA,
        CalendarIdentifier::Japanese => &*JAPANESE,
        CalendarIdentifier::Coptic => &*COPTIC,
        CalendarIdentifier::EthiopicAmeteMihret => &*AMETE_MIHRET,
        CalendarIdentifier::EthiopicAmeteAlem => &*AMETE_ALEM,
        CalendarIdentifier::Hebrew => &*HEBREW,
        CalendarIdentifier::Indian => &*INDIAN,
        CalendarIdentifier::Persian => &*PERSIAN,
        CalendarIdentifier::IslamicCivil => &*ISLAMIC_CIVIL,
        CalendarIdentifier::IslamicTabular => &*ISLAMIC_TABULAR,
        CalendarIdentifier::Islamic => &*ISLAMIC,
        CalendarIdentifier::IslamicUmmAlQura => &*UMM_AL_QURA,
        CalendarIdentifier::Chinese => &*CHINESE,
    }
}
