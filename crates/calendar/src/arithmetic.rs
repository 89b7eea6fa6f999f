//! Adding component deltas to instants and measuring the components
//! between two instants.

use almanac_astro::FixedDay;
use tracing::{debug, instrument, trace};

use crate::codec::Reckoner;
use crate::components::{ComponentDelta, DateComponents};
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::instant::{Instant, NANOS_PER_SECOND, supported_day, supported_instant};
use crate::system::{CalendarSystem, SystemDate, checked_year};
use crate::week::weekday_of;

const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND as i128;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: f64 = 86_400e9;

fn overflow(field: Field, value: i64) -> CalendarError {
    CalendarError::InvalidComponent { field, value }
}

fn delta_of(delta: &ComponentDelta, field: Field) -> i64 {
    delta.value(field).unwrap_or(0)
}

/// Sum of several delta fields, each scaled, or an error naming the first
/// field when the sum overflows.
fn scaled_sum(delta: &ComponentDelta, parts: &[(Field, i64)]) -> Result<i64, CalendarError> {
    parts.iter().try_fold(0_i64, |sum, &(field, scale)| {
        let value = delta_of(delta, field);
        value
            .checked_mul(scale)
            .and_then(|v| sum.checked_add(v))
            .ok_or(overflow(field, value))
    })
}

/// Nanoseconds of a delta's hour, minute, second and nanosecond fields.
fn time_nanos(delta: &ComponentDelta) -> i128 {
    i128::from(delta_of(delta, Field::Hour)) * NANOS_PER_HOUR
        + i128::from(delta_of(delta, Field::Minute)) * NANOS_PER_MINUTE
        + i128::from(delta_of(delta, Field::Second)) * i128::from(NANOS_PER_SECOND)
        + i128::from(delta_of(delta, Field::Nanosecond))
}

/// Ordinal month in `year` for a displayed month carried over from
/// another year. A leap month that the year lacks becomes the plain month
/// of the same number, or the following one when that does not exist
/// either (Adar I in a Hebrew common year becomes Adar).
fn place_month(
    system: &dyn CalendarSystem,
    year: i32,
    label: u8,
    leap: bool,
) -> Result<u8, CalendarError> {
    let label = i64::from(label);
    system
        .ordinal_month(year, label, Some(leap))
        .or_else(|_| system.ordinal_month(year, label, Some(false)))
        .or_else(|_| system.ordinal_month(year, label + 1, None))
}

/// Position `offset` days into a period of `length` days, moved by `weeks`
/// whole weeks and wrapped inside the period.
fn wrap_weeks(offset: i64, weeks: i64, length: i64) -> i64 {
    let span_weeks = (length + 6) / 7;
    let span = 7 * span_weeks;
    let moved = (offset + 7 * weeks.rem_euclid(span_weeks)).rem_euclid(span);
    if moved >= length { moved - 7 } else { moved }
}

impl Reckoner<'_> {
    /// Adds a delta to an instant.
    ///
    /// Without wrapping, fields carry into larger units the way ordinary
    /// date arithmetic does, from the era down to the nanosecond; a day
    /// that does not exist in the target month is clamped to its last day.
    /// With wrapping, each field moves within its own range and never
    /// changes a larger field; an era delta steps through the era table
    /// keeping the year within the era, and is ignored by calendars
    /// without one.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] if the result leaves the
    /// supported range of days.
    pub fn add(
        &self,
        instant: Instant,
        delta: &ComponentDelta,
        wrapping: bool,
    ) -> Result<Instant, CalendarError> {
        if wrapping {
            self.add_wrapping(instant, delta)
        } else {
            self.add_carrying(instant, delta)
        }
    }

    fn add_carrying(&self, instant: Instant, delta: &ComponentDelta) -> Result<Instant, CalendarError> {
        let system = self.system;
        let calendar_delta = delta
            .fields()
            .iter()
            .any(|f| !f.is_time() && delta.value(f).is_some_and(|v| v != 0));
        if !calendar_delta {
            return supported_instant(instant.add_nanos(time_nanos(delta)));
        }

        let local = self.local(instant);
        let mut date = system.date_from_fixed(local.day);
        let (label, leap) = system.month_label(date.year, date.month);
        let mut relabel = false;

        let eras = delta_of(delta, Field::Era);
        if eras != 0 {
            let (era, year) = system.era_and_year(local.day, date.year);
            date.year = system.extended_year(era.saturating_add(eras), year)?;
            relabel = true;
        }
        let years = scaled_sum(delta, &[(Field::Year, 1), (Field::YearForWeekOfYear, 1)])?;
        if years != 0 {
            date.year = checked_year(system, i64::from(date.year).saturating_add(years))?;
            relabel = true;
        }
        if relabel {
            date.month = place_month(system, date.year, label, leap)?;
        }

        let months = delta_of(delta, Field::Month);
        if months != 0 {
            // No year has more than 13 months.
            checked_year(system, i64::from(date.year) + months / 13)?;
            let mut index = i64::from(date.month) - 1 + months;
            let mut year = date.year;
            while index < 0 {
                year = checked_year(system, i64::from(year) - 1)?;
                index += i64::from(system.months_in_year(year));
            }
            while index >= i64::from(system.months_in_year(year)) {
                index -= i64::from(system.months_in_year(year));
                year = checked_year(system, i64::from(year) + 1)?;
            }
            date = SystemDate::new(year, (index + 1) as u8, date.day);
        }
        date.day = date.day.min(system.days_in_month(date.year, date.month)?);

        let days = scaled_sum(
            delta,
            &[
                (Field::Day, 1),
                (Field::DayOfYear, 1),
                (Field::Weekday, 1),
                (Field::WeekOfYear, 7),
                (Field::WeekOfMonth, 7),
                (Field::WeekdayOrdinal, 7),
            ],
        )?;
        let start = supported_day(system.fixed_from_date(date)?)?;
        let day = start
            .get()
            .checked_add(days)
            .map(FixedDay::new)
            .ok_or(overflow(Field::Day, days))
            .and_then(supported_day)?;
        trace!(?date, days, "carried calendar delta");

        let moved = self.instant_from_local(day, local.second_of_day, local.nanos);
        supported_instant(moved.add_nanos(time_nanos(delta)))
    }

    fn add_wrapping(&self, instant: Instant, delta: &ComponentDelta) -> Result<Instant, CalendarError> {
        let system = self.system;
        let local = self.local(instant);
        let mut date = system.date_from_fixed(local.day);
        let (label, leap) = system.month_label(date.year, date.month);
        let mut relabel = false;

        // Eras cycle through the era table keeping the year within the era;
        // a calendar without an era table ignores them.
        let eras = delta_of(delta, Field::Era);
        let era_count = system.eras().len() as i64;
        if eras != 0 && era_count > 0 {
            let (era, year) = system.era_and_year(local.day, date.year);
            date.year = system.extended_year((era + eras.rem_euclid(era_count)).rem_euclid(era_count), year)?;
            relabel = true;
        }
        let years = scaled_sum(delta, &[(Field::Year, 1), (Field::YearForWeekOfYear, 1)])?;
        if years != 0 {
            date.year = checked_year(system, i64::from(date.year).saturating_add(years))?;
            relabel = true;
        }
        if relabel {
            date.month = place_month(system, date.year, label, leap)?;
        }
        let months = delta_of(delta, Field::Month);
        if months != 0 {
            let count = i64::from(system.months_in_year(date.year));
            date.month = ((i64::from(date.month) - 1 + months.rem_euclid(count)).rem_euclid(count) + 1) as u8;
        }
        let month_length = i64::from(system.days_in_month(date.year, date.month)?);
        date.day = date.day.min(month_length as u8);

        let month_weeks = scaled_sum(delta, &[(Field::WeekOfMonth, 1), (Field::WeekdayOrdinal, 1)])?;
        if month_weeks != 0 {
            date.day = (wrap_weeks(i64::from(date.day) - 1, month_weeks, month_length) + 1) as u8;
        }
        let days = delta_of(delta, Field::Day);
        if days != 0 {
            date.day = ((i64::from(date.day) - 1 + days.rem_euclid(month_length)).rem_euclid(month_length) + 1) as u8;
        }
        let mut day = supported_day(system.fixed_from_date(date)?)?;

        let year_start = system.start_of_year(date.year);
        let year_length = i64::from(system.days_in_year(date.year));
        let year_weeks = delta_of(delta, Field::WeekOfYear);
        if year_weeks != 0 {
            day = year_start + wrap_weeks(day - year_start, year_weeks, year_length);
        }
        let year_days = delta_of(delta, Field::DayOfYear);
        if year_days != 0 {
            day = year_start + (day - year_start + year_days.rem_euclid(year_length)).rem_euclid(year_length);
        }
        let weekdays = delta_of(delta, Field::Weekday);
        if weekdays != 0 {
            let position = self.rules.relative_weekday(weekday_of(day));
            day = day + ((position + weekdays.rem_euclid(7)).rem_euclid(7) - position);
        }

        let wrap = |field: Field, value: i64, range: i64| {
            (value + delta_of(delta, field).rem_euclid(range)).rem_euclid(range)
        };
        let hour = wrap(Field::Hour, local.hour(), 24);
        let minute = wrap(Field::Minute, local.minute(), 60);
        let second = wrap(Field::Second, local.second(), 60);
        let nanos = wrap(Field::Nanosecond, i64::from(local.nanos), NANOS_PER_SECOND);
        Ok(self.instant_from_local(day, hour * 3600 + minute * 60 + second, nanos as u32))
    }

    /// Components between two instants in the requested units.
    ///
    /// Units are counted from the largest down: years, months, weeks and
    /// days are whole calendar units counted from `from` without passing
    /// `to`, and hours, minutes, seconds and nanoseconds split the exact
    /// time that remains. An era field reports the change of era index.
    /// Other fields are left unset. Counts are negative when `to` is
    /// before `from`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] if an intermediate date
    /// leaves the representable range of the calendar.
    #[instrument(level = "debug", skip(self))]
    pub fn difference(
        &self,
        from: Instant,
        to: Instant,
        fields: FieldSet,
    ) -> Result<DateComponents, CalendarError> {
        let mut result = DateComponents::new();
        let mut offset = ComponentDelta::new();

        if fields.contains(Field::Era) {
            let era_of = |instant: Instant| {
                let day = self.local(instant).day;
                self.system.era_and_year(day, self.system.date_from_fixed(day).year).0
            };
            result.era = Some(era_of(to) - era_of(from));
        }

        let units: [(&[Field], Field, f64); 4] = [
            (&[Field::Year, Field::YearForWeekOfYear], Field::Year, 365.2425),
            (&[Field::Month], Field::Month, 30.436875),
            (&[Field::WeekOfYear, Field::WeekOfMonth], Field::WeekOfYear, 7.0),
            (&[Field::Day, Field::DayOfYear], Field::Day, 1.0),
        ];
        for (requested, unit, days) in units {
            let wanted: Vec<Field> = requested.iter().copied().filter(|f| fields.contains(*f)).collect();
            if wanted.is_empty() {
                continue;
            }
            let count = self.whole_units(from, to, &offset, unit, days)?;
            offset.set(unit, Some(count));
            for field in wanted {
                result.set(field, Some(count));
            }
        }

        let cursor = if offset.is_empty() {
            from
        } else {
            self.add_carrying(from, &offset)?
        };
        let mut remaining = to.nanos_since(cursor);
        let time_units = [
            (Field::Hour, NANOS_PER_HOUR),
            (Field::Minute, NANOS_PER_MINUTE),
            (Field::Second, i128::from(NANOS_PER_SECOND)),
            (Field::Nanosecond, 1),
        ];
        for (field, size) in time_units {
            if fields.contains(field) {
                let count = remaining / size;
                remaining -= count * size;
                result.set(field, Some(count as i64));
            }
        }
        debug!(?result, "difference");
        Ok(result)
    }

    /// Largest count `n` (smallest when counting backwards) of `unit` such
    /// that adding `offset` plus `n` units to `from` does not pass `to`.
    ///
    /// The count is estimated from the average unit length, widened by
    /// doubling until it brackets the answer, then bisected. Counts that
    /// leave the calendar's range are treated as passing `to`.
    fn whole_units(
        &self,
        from: Instant,
        to: Instant,
        offset: &ComponentDelta,
        unit: Field,
        unit_days: f64,
    ) -> Result<i64, CalendarError> {
        let step: i64 = if to >= from { 1 } else { -1 };
        let passes = |n: i64| {
            let mut delta = offset.clone();
            delta.set(unit, Some(n * step));
            match self.add_carrying(from, &delta) {
                Ok(reached) if step > 0 => reached > to,
                Ok(reached) => reached < to,
                Err(_) => true,
            }
        };

        let base = if offset.is_empty() { from } else { self.add_carrying(from, offset)? };
        let estimate = (to.nanos_since(base) as f64 / (unit_days * NANOS_PER_DAY))
            .trunc()
            .abs() as i64;

        // `low` never passes `to` and `high` always does.
        let mut low;
        let mut high;
        if estimate > 0 && passes(estimate) {
            high = estimate;
            low = 0;
            let mut width = 1_i64;
            while width < high {
                if !passes(high - width) {
                    low = high - width;
                    break;
                }
                high -= width;
                width = width.saturating_mul(2);
            }
        } else {
            low = estimate;
            let mut width = 1_i64;
            loop {
                let next = low.saturating_add(width);
                if next == low || passes(next) {
                    high = next;
                    break;
                }
                low = next;
                width = width.saturating_mul(2);
            }
        }
        while high - low > 1 {
            let middle = low + (high - low) / 2;
            if passes(middle) {
                high = middle;
            } else {
                low = middle;
            }
        }
        trace!(?unit, estimate, count = low * step, "whole units");
        Ok(low * step)
    }
}
