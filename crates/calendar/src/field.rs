//! Calendar fields and sets of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// A calendar field that can be decoded from an instant, supplied when
/// encoding, added, differenced or matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Index into the calendar's era list (the sexagenary cycle for Chinese).
    Era,
    /// Year within the era.
    Year,
    /// Year that owns the week given by [`Field::WeekOfYear`].
    YearForWeekOfYear,
    /// Month, 1-based. A lunisolar leap month shares the number of the
    /// month it follows.
    Month,
    /// Whether the month is a leap month.
    IsLeapMonth,
    /// Week of the year under the calendar's week rules.
    WeekOfYear,
    /// Week of the month under the calendar's week rules.
    WeekOfMonth,
    /// Day of the year, 1-based.
    DayOfYear,
    /// Day of the month, 1-based.
    Day,
    /// Day of the week, 1 = Sunday through 7 = Saturday.
    Weekday,
    /// Occurrence of the weekday within the month (2 for "second Tuesday").
    WeekdayOrdinal,
    /// Hour, 0..=23.
    Hour,
    /// Minute, 0..=59.
    Minute,
    /// Second, 0..=59.
    Second,
    /// Nanosecond, 0..1_000_000_000.
    Nanosecond,
}

impl Field {
    /// Every field, from the largest unit to the smallest.
    pub const ALL: [Field; 15] = [
        Field::Era,
        Field::Year,
        Field::YearForWeekOfYear,
        Field::Month,
        Field::IsLeapMonth,
        Field::WeekOfYear,
        Field::WeekOfMonth,
        Field::DayOfYear,
        Field::Day,
        Field::Weekday,
        Field::WeekdayOrdinal,
        Field::Hour,
        Field::Minute,
        Field::Second,
        Field::Nanosecond,
    ];

    /// The field's name as used in identifiers and configuration.
    pub fn name(self) -> &'static str {
        match self {
            Field::Era => "era",
            Field::Year => "year",
            Field::YearForWeekOfYear => "yearForWeekOfYear",
            Field::Month => "month",
            Field::IsLeapMonth => "isLeapMonth",
            Field::WeekOfYear => "weekOfYear",
            Field::WeekOfMonth => "weekOfMonth",
            Field::DayOfYear => "dayOfYear",
            Field::Day => "day",
            Field::Weekday => "weekday",
            Field::WeekdayOrdinal => "weekdayOrdinal",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Nanosecond => "nanosecond",
        }
    }

    /// Whether the field describes the time of day rather than the date.
    pub fn is_time(self) -> bool {
        matches!(
            self,
            Field::Hour | Field::Minute | Field::Second | Field::Nanosecond
        )
    }

    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CalendarError::UnknownName {
                kind: "field",
                name: s.to_string(),
            })
    }
}

/// A set of [`Field`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldSet(u32);

impl FieldSet {
    /// The empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Every field.
    pub fn all() -> Self {
        Field::ALL.into_iter().collect()
    }

    /// Era, year, month and day.
    pub fn date() -> Self {
        [Field::Era, Field::Year, Field::Month, Field::Day].into()
    }

    /// Hour, minute, second and nanosecond.
    pub fn time() -> Self {
        [Field::Hour, Field::Minute, Field::Second, Field::Nanosecond].into()
    }

    /// Returns the set with `field` added.
    pub const fn with(self, field: Field) -> Self {
        Self(self.0 | field.bit())
    }

    /// Adds a field.
    pub fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    /// Whether the set contains `field`.
    pub const fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    /// Whether the set contains any field of `other`.
    pub const fn intersects(self, other: FieldSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Fields in the set, largest unit first.
    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl<const N: usize> From<[Field; N]> for FieldSet {
    fn from(fields: [Field; N]) -> Self {
        fields.into_iter().collect()
    }
}
