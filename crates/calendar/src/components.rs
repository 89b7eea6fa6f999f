//! Decomposed calendar fields.

use almanac_host::TimeZone;
use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldSet};

/// Calendar fields relative to a calendar system and a time zone.
///
/// Every field is optional; an absent field is distinct from zero. The
/// same type describes a delta for [`Calendar::date_by_adding`] and the
/// result of [`Calendar::date_components_between`].
///
/// [`Calendar::date_by_adding`]: crate::Calendar::date_by_adding
/// [`Calendar::date_components_between`]: crate::Calendar::date_components_between
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DateComponents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_for_week_of_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_leap_month: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_of_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_of_month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday_ordinal: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nanosecond: Option<i64>,
    /// Zone the fields are expressed in; the calendar's zone when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
}

/// A calendar-relative delta. Absent fields add nothing.
pub type ComponentDelta = DateComponents;

impl DateComponents {
    /// Empty components.
    pub fn new() -> Self {
        Self::default()
    }

    /// Year, month and day.
    pub fn ymd(year: i64, month: i64, day: i64) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            ..Self::default()
        }
    }

    /// Returns the components with `field` set to `value`. For
    /// [`Field::IsLeapMonth`] any non-zero value means `true`.
    pub fn with(mut self, field: Field, value: i64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Returns the components with the time zone set.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Value of a field. [`Field::IsLeapMonth`] reads as 0 or 1.
    pub fn value(&self, field: Field) -> Option<i64> {
        match field {
            Field::IsLeapMonth => self.is_leap_month.map(i64::from),
            _ => *self.slot(field),
        }
    }

    /// Sets or clears a field.
    pub fn set(&mut self, field: Field, value: Option<i64>) {
        match field {
            Field::IsLeapMonth => self.is_leap_month = value.map(|v| v != 0),
            _ => {
                if let Some(slot) = self.slot_mut(field) {
                    *slot = value;
                }
            }
        }
    }

    /// The set of fields that are present.
    pub fn fields(&self) -> FieldSet {
        Field::ALL
            .into_iter()
            .filter(|f| self.value(*f).is_some())
            .collect()
    }

    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    fn slot(&self, field: Field) -> &Option<i64> {
        match field {
            Field::Era => &self.era,
            Field::Year => &self.year,
            Field::YearForWeekOfYear => &self.year_for_week_of_year,
            Field::Month => &self.month,
            Field::WeekOfYear => &self.week_of_year,
            Field::WeekOfMonth => &self.week_of_month,
            Field::DayOfYear => &self.day_of_year,
            Field::Day => &self.day,
            Field::Weekday => &self.weekday,
            Field::WeekdayOrdinal => &self.weekday_ordinal,
            Field::Hour => &self.hour,
            Field::Minute => &self.minute,
            Field::Second => &self.second,
            Field::Nanosecond => &self.nanosecond,
            Field::IsLeapMonth => &None,
        }
    }

    fn slot_mut(&mut self, field: Field) -> Option<&mut Option<i64>> {
        let slot = match field {
            Field::Era => &mut self.era,
            Field::Year => &mut self.year,
            Field::YearForWeekOfYear => &mut self.year_for_week_of_year,
            Field::Month => &mut self.month,
            Field::WeekOfYear => &mut self.week_of_year,
            Field::WeekOfMonth => &mut self.week_of_month,
            Field::DayOfYear => &mut self.day_of_year,
            Field::Day => &mut self.day,
            Field::Weekday => &mut self.weekday,
            Field::WeekdayOrdinal => &mut self.weekday_ordinal,
            Field::Hour => &mut self.hour,
            Field::Minute => &mut self.minute,
            Field::Second => &mut self.second,
            Field::Nanosecond => &mut self.nanosecond,
            Field::IsLeapMonth => return None,
        };
        Some(slot)
    }
}
