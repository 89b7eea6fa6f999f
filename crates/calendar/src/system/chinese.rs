//! The Chinese lunisolar calendar.
//!
//! Months begin on the day of the new moon in Beijing local time. A year
//! (from one new year to the next) has 12 or 13 months; in a 13-month
//! year the first month containing no major solar term is the leap month
//! and repeats the number of the month before it. Years are counted in
//! 60-year cycles, which serve as the calendar's eras.

use std::collections::BTreeMap;
use std::sync::Arc;

use almanac_astro::{
    FixedDay, MEAN_SYNODIC_MONTH, MEAN_TROPICAL_YEAR, Moment, WINTER,
    estimate_prior_solar_longitude, fixed_from_gregorian, new_moon_at_or_after, new_moon_before,
    solar_longitude_at,
};
use parking_lot::Mutex;
use tracing::trace;

use super::{CalendarSystem, SystemDate, checked_date, checked_month, checked_year};
use crate::error::CalendarError;
use crate::era::EraTable;
use crate::field::Field;
use crate::identifier::CalendarIdentifier;

const CYCLE_YEARS: i64 = 60;
/// The 60-year cycle containing 1984..=2043.
const CURRENT_CYCLE: i64 = 78;
const CACHE_LIMIT: usize = 512;

/// Beijing offset from UT as a fraction of a day: local mean time of
/// the Beijing meridian before 1929, UTC+8 afterwards.
fn beijing_offset(day: FixedDay) -> f64 {
    if day < fixed_from_gregorian(1929, 1, 1) {
        1397.0 / 180.0 / 24.0
    } else {
        8.0 / 24.0
    }
}

/// Universal moment of local midnight starting `day`.
fn midnight(day: FixedDay) -> Moment {
    day.as_moment() - beijing_offset(day)
}

/// Local day containing a universal moment.
fn local_day(moment: Moment) -> FixedDay {
    (moment + beijing_offset(moment.as_fixed())).as_fixed()
}

fn new_moon_on_or_after(day: FixedDay) -> FixedDay {
    local_day(new_moon_at_or_after(midnight(day)))
}

fn new_moon_prior(day: FixedDay) -> FixedDay {
    local_day(new_moon_before(midnight(day)))
}

/// Index 1..=12 of the last major solar term at or before local midnight.
fn major_term(day: FixedDay) -> i64 {
    let longitude = solar_longitude_at(midnight(day));
    (2 + (longitude / 30.0).floor() as i64 - 1).rem_euclid(12) + 1
}

fn winter_solstice_on_or_before(day: FixedDay) -> FixedDay {
    let approx = estimate_prior_solar_longitude(WINTER, midnight(day + 1));
    let mut solstice = Moment::new(approx.inner() - 1.0).as_fixed();
    while WINTER >= solar_longitude_at(midnight(solstice + 1)) {
        solstice = solstice + 1;
    }
    solstice
}

/// New year of the year whose eleventh month contains the solstice on
/// `solstice`.
fn new_year_in_sui(solstice: FixedDay) -> FixedDay {
    let next_solstice = winter_solstice_on_or_before(solstice + 370);
    let m12 = new_moon_on_or_after(solstice + 1);
    let m13 = new_moon_on_or_after(m12 + 1);
    let m14 = new_moon_on_or_after(m13 + 1);
    let next_m11 = new_moon_prior(next_solstice + 1);
    let lunations = ((next_m11 - m12) as f64 / MEAN_SYNODIC_MONTH).round() as i64;
    let leap_in_sui = lunations == 12
        && (major_term(m12) == major_term(m13) || major_term(m13) == major_term(m14));
    if leap_in_sui { m14 } else { m13 }
}

fn new_year_on_or_before(day: FixedDay) -> FixedDay {
    let new_year = new_year_in_sui(winter_solstice_on_or_before(day));
    if day >= new_year {
        new_year
    } else {
        new_year_in_sui(winter_solstice_on_or_before(day - 180))
    }
}

/// First day of the cycle-1 year-1 new year month, 2637 BCE.
fn reference_day() -> FixedDay {
    fixed_from_gregorian(-2636, 2, 15)
}

/// Month layout of one Chinese year.
#[derive(Debug)]
struct YearData {
    /// Extended year: years elapsed since the reference, 1-based.
    year: i32,
    /// First day of each ordinal month.
    starts: Vec<FixedDay>,
    /// Next year's new year.
    end: FixedDay,
    /// Zero-based ordinal index of the leap month.
    leap: Option<usize>,
}

impl YearData {
    fn compute(new_year: FixedDay) -> Self {
        let end = new_year_on_or_before(new_year + 400);
        let mut starts = vec![new_year];
        loop {
            let last = starts[starts.len() - 1];
            let next = new_moon_on_or_after(last + 28);
            if next >= end {
                break;
            }
            starts.push(next);
        }
        let leap = if starts.len() == 13 {
            let terms: Vec<i64> = starts.iter().chain([&end]).map(|d| major_term(*d)).collect();
            Some(terms.windows(2).position(|w| w[0] == w[1]).unwrap_or(12))
        } else {
            None
        };
        let elapsed =
            (1.5 - 1.0 / 12.0 + (new_year - reference_day()) as f64 / MEAN_TROPICAL_YEAR).floor();
        Self {
            year: elapsed as i32,
            starts,
            end,
            leap,
        }
    }

    fn new_year(&self) -> FixedDay {
        self.starts[0]
    }

    fn month_start(&self, ordinal: u8) -> Option<FixedDay> {
        let index = usize::from(ordinal).checked_sub(1)?;
        if index == self.starts.len() {
            Some(self.end)
        } else {
            self.starts.get(index).copied()
        }
    }

    fn ordinal_of(&self, day: FixedDay) -> u8 {
        self.starts.partition_point(|start| *start <= day) as u8
    }
}

/// The Chinese calendar. Computed years are memoized.
#[derive(Debug)]
pub struct Chinese {
    eras: EraTable,
    years: Mutex<BTreeMap<FixedDay, Arc<YearData>>>,
}

impl Chinese {
    /// Creates the calendar with an empty year cache.
    pub fn new() -> Self {
        Self {
            eras: EraTable::new(),
            years: Mutex::new(BTreeMap::new()),
        }
    }

    fn cached(&self, day: FixedDay) -> Option<Arc<YearData>> {
        let years = self.years.lock();
        let (_, data) = years.range(..=day).next_back()?;
        (day < data.end).then(|| Arc::clone(data))
    }

    fn store(&self, data: YearData) -> Arc<YearData> {
        let data = Arc::new(data);
        let mut years = self.years.lock();
        if years.len() >= CACHE_LIMIT {
            years.clear();
        }
        years.insert(data.new_year(), Arc::clone(&data));
        data
    }

    /// Year containing a fixed day.
    fn year_containing(&self, day: FixedDay) -> Arc<YearData> {
        if let Some(data) = self.cached(day) {
            return data;
        }
        let new_year = new_year_on_or_before(day);
        trace!(day = day.get(), new_year = new_year.get(), "computing chinese year");
        self.store(YearData::compute(new_year))
    }

    /// Year with an extended year number.
    fn year(&self, year: i32) -> Arc<YearData> {
        let middle = (f64::from(year) - 0.5) * MEAN_TROPICAL_YEAR;
        let mut data = self.year_containing(reference_day() + middle.floor() as i64);
        for _ in 0..4 {
            if data.year < year {
                data = self.year_containing(data.end);
            } else if data.year > year {
                data = self.year_containing(data.new_year() - 1);
            } else {
                break;
            }
        }
        data
    }
}

impl Default for Chinese {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarSystem for Chinese {
    fn identifier(&self) -> CalendarIdentifier {
        CalendarIdentifier::Chinese
    }

    fn epoch(&self) -> FixedDay {
        self.year(1).new_year()
    }

    fn is_leap_year(&self, year: i32) -> bool {
        self.year(year).leap.is_some()
    }

    fn months_in_year(&self, year: i32) -> u8 {
        self.year(year).starts.len() as u8
    }

    fn days_in_month(&self, year: i32, month: u8) -> Result<u8, CalendarError> {
        let month = checked_month(self, year, i64::from(month))?;
        let data = self.year(year);
        match (data.month_start(month), data.month_start(month + 1)) {
            (Some(start), Some(end)) => Ok((end - start) as u8),
            _ => Err(CalendarError::InvalidComponent {
                field: Field::Month,
                value: i64::from(month),
            }),
        }
    }

    fn is_leap_month(&self, year: i32, month: u8) -> bool {
        self.year(year).leap == usize::from(month).checked_sub(1)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        let data = self.year(year);
        (data.end - data.new_year()) as u16
    }

    fn fixed_from_date(&self, date: SystemDate) -> Result<FixedDay, CalendarError> {
        checked_date(self, date)?;
        let data = self.year(date.year);
        let start = data
            .month_start(date.month)
            .ok_or(CalendarError::InvalidComponent {
                field: Field::Month,
                value: i64::from(date.month),
            })?;
        Ok(start + i64::from(date.day) - 1)
    }

    fn date_from_fixed(&self, day: FixedDay) -> SystemDate {
        let data = self.year_containing(day);
        let month = data.ordinal_of(day);
        let start = data.month_start(month).unwrap_or(day);
        SystemDate::new(data.year, month, (day - start + 1) as u8)
    }

    fn eras(&self) -> &EraTable {
        &self.eras
    }

    fn era_and_year(&self, _day: FixedDay, year: i32) -> (i64, i64) {
        let elapsed = i64::from(year) - 1;
        (
            elapsed.div_euclid(CYCLE_YEARS) + 1,
            elapsed.rem_euclid(CYCLE_YEARS) + 1,
        )
    }

    fn extended_year(&self, era: i64, year: i64) -> Result<i32, CalendarError> {
        if !(1..=CYCLE_YEARS).contains(&year) {
            return Err(CalendarError::InvalidComponent {
                field: Field::Year,
                value: year,
            });
        }
        let extended = era
            .checked_sub(1)
            .and_then(|cycles| cycles.checked_mul(CYCLE_YEARS))
            .and_then(|base| base.checked_add(year))
            .ok_or(CalendarError::InvalidComponent {
                field: Field::Era,
                value: era,
            })?;
        checked_year(self, extended)
    }

    fn default_era(&self) -> i64 {
        CURRENT_CYCLE
    }

    fn month_label(&self, year: i32, month: u8) -> (u8, bool) {
        let index = usize::from(month.saturating_sub(1));
        match self.year(year).leap {
            Some(leap) if index == leap => (month - 1, true),
            Some(leap) if index > leap => (month - 1, false),
            _ => (month, false),
        }
    }

    fn ordinal_month(&self, year: i32, month: i64, leap: Option<bool>) -> Result<u8, CalendarError> {
        let invalid = CalendarError::InvalidComponent {
            field: Field::Month,
            value: month,
        };
        let label = match u8::try_from(month) {
            Ok(m @ 1..=12) => m,
            _ => return Err(invalid),
        };
        let data = self.year(year);
        match (leap, data.leap) {
            (Some(true), Some(index)) if usize::from(label) == index => Ok(label + 1),
            (Some(true), _) => Err(CalendarError::InvalidComponent {
                field: Field::IsLeapMonth,
                value: 1,
            }),
            (_, Some(index)) if usize::from(label) > index => Ok(label + 1),
            _ => Ok(label),
        }
    }
}
