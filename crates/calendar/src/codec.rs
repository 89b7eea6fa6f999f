//! Conversion between instants and components.
//!
//! A [`Reckoner`] binds a calendar system, a time zone and week rules.
//! Decoding shifts an instant into local wall-clock time and reads the
//! requested fields off the system's tables; encoding goes the other way
//! and rejects components that are incomplete or contradict each other.

use almanac_astro::FixedDay;
use almanac_host::TimeZoneResolver;

use crate::components::DateComponents;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::instant::{Instant, LocalTime, NANOS_PER_SECOND, local_seconds, supported_day};
use crate::system::{CalendarSystem, SystemDate};
use crate::week::{WeekRules, weekday_of};

/// Fields that need the system date of the day.
const CALENDAR_FIELDS: FieldSet = FieldSet::new()
    .with(Field::Era)
    .with(Field::Year)
    .with(Field::YearForWeekOfYear)
    .with(Field::Month)
    .with(Field::IsLeapMonth)
    .with(Field::WeekOfYear)
    .with(Field::WeekOfMonth)
    .with(Field::DayOfYear)
    .with(Field::Day)
    .with(Field::WeekdayOrdinal);

/// Longest week-of-year count of any calendar.
const MAX_WEEKS_IN_YEAR: i64 = 56;

/// Fields whose values are fixed by the era when one is given.
const ERA_RELATIVE: [Field; 3] = [Field::Era, Field::Year, Field::YearForWeekOfYear];

/// A calendar system read in a time zone under week rules.
#[derive(Clone, Copy)]
pub struct Reckoner<'a> {
    pub(crate) system: &'a dyn CalendarSystem,
    pub(crate) zone: &'a dyn TimeZoneResolver,
    pub(crate) rules: WeekRules,
}

impl<'a> Reckoner<'a> {
    /// Binds a system, a zone and week rules.
    pub fn new(
        system: &'a dyn CalendarSystem,
        zone: &'a dyn TimeZoneResolver,
        rules: WeekRules,
    ) -> Self {
        Self {
            system,
            zone,
            rules,
        }
    }

    /// The bound calendar system.
    pub fn system(&self) -> &'a dyn CalendarSystem {
        self.system
    }

    /// The bound week rules.
    pub fn rules(&self) -> WeekRules {
        self.rules
    }

    /// Offset from UTC in force at an instant.
    pub fn offset_at(&self, instant: Instant) -> i32 {
        self.zone.offset_seconds(instant.unix_seconds())
    }

    pub(crate) fn local(&self, instant: Instant) -> LocalTime {
        LocalTime::from_instant(instant, self.offset_at(instant))
    }

    /// Instant of a local wall-clock time. Repeated times take the first
    /// occurrence and skipped times move forward by the gap.
    pub(crate) fn instant_from_local(&self, day: FixedDay, second_of_day: i64, nanos: u32) -> Instant {
        let utc = self.zone.utc_from_local(local_seconds(day, second_of_day));
        Instant::from_unix_seconds(utc).add_nanos(i128::from(nanos))
    }

    /// Decodes the requested fields of an instant.
    pub fn decode(&self, instant: Instant, fields: FieldSet) -> DateComponents {
        decode(self.system, instant, self.offset_at(instant), fields, self.rules)
    }

    /// Date-level fields of a fixed day.
    pub(crate) fn decode_day(&self, day: FixedDay, fields: FieldSet) -> DateComponents {
        let local = LocalTime {
            day,
            second_of_day: 0,
            nanos: 0,
        };
        decode_local(self.system, local, fields, self.rules)
    }

    /// Encodes components into an instant.
    ///
    /// # Errors
    ///
    /// See [`encode`].
    pub fn encode(&self, components: &DateComponents) -> Result<Instant, CalendarError> {
        encode(self.system, components, self.zone, self.rules)
    }

    /// Fixed day named by the date-level fields of `components`.
    pub(crate) fn resolve_day(&self, components: &DateComponents) -> Result<FixedDay, CalendarError> {
        let system = self.system;
        let era = components.era.unwrap_or_else(|| system.default_era());
        let weekday = match components.weekday {
            Some(w) => checked_weekday(w)?,
            None => self.rules.first_weekday(),
        };

        if let (Some(year), Some(month)) = (components.year, components.month) {
            let year = system.extended_year(era, year)?;
            let month = system.ordinal_month(year, month, components.is_leap_month)?;
            if let Some(day) = components.day {
                let day = u8::try_from(day).map_err(|_| CalendarError::InvalidComponent {
                    field: Field::Day,
                    value: day,
                })?;
                return system.fixed_from_date(SystemDate::new(year, month, day));
            }
            if components.weekday.is_some() {
                let first = system.fixed_from_date(SystemDate::new(year, month, 1))?;
                let length = i64::from(system.days_in_month(year, month)?);
                let last = first + (length - 1);
                let (field, value, day) = if let Some(ordinal) = components.weekday_ordinal {
                    if !(-6..=6).contains(&ordinal) {
                        return Err(CalendarError::InvalidComponent {
                            field: Field::WeekdayOrdinal,
                            value: ordinal,
                        });
                    }
                    let day = if ordinal > 0 {
                        first + (i64::from(weekday) - i64::from(weekday_of(first))).rem_euclid(7)
                            + (ordinal - 1) * 7
                    } else {
                        last - (i64::from(weekday_of(last)) - i64::from(weekday)).rem_euclid(7)
                            + (ordinal + 1) * 7
                    };
                    (Field::WeekdayOrdinal, ordinal, day)
                } else if let Some(week) = components.week_of_month {
                    if !(0..=6).contains(&week) {
                        return Err(CalendarError::InvalidComponent {
                            field: Field::WeekOfMonth,
                            value: week,
                        });
                    }
                    let day = self.rules.day_of_week_in_period(first, week, weekday);
                    (Field::WeekOfMonth, week, day)
                } else {
                    return Err(CalendarError::invalid_date(
                        "a weekday needs a weekday ordinal or a week of month",
                    ));
                };
                let zero_ordinal = field == Field::WeekdayOrdinal && value == 0;
                if day < first || day > last || zero_ordinal {
                    return Err(CalendarError::InvalidComponent { field, value });
                }
                return Ok(day);
            }
            return Err(CalendarError::invalid_date("components name no day of the month"));
        }

        if let (Some(year), Some(day_of_year)) = (components.year, components.day_of_year) {
            let year = system.extended_year(era, year)?;
            if !(1..=i64::from(system.days_in_year(year))).contains(&day_of_year) {
                return Err(CalendarError::InvalidComponent {
                    field: Field::DayOfYear,
                    value: day_of_year,
                });
            }
            return Ok(system.start_of_year(year) + (day_of_year - 1));
        }

        if let (Some(year), Some(week)) = (components.year_for_week_of_year, components.week_of_year) {
            let year = system.extended_year(era, year)?;
            if !(1..=MAX_WEEKS_IN_YEAR).contains(&week) {
                return Err(CalendarError::InvalidComponent {
                    field: Field::WeekOfYear,
                    value: week,
                });
            }
            let start = system.start_of_year(year);
            return Ok(self.rules.day_of_week_in_period(start, week, weekday));
        }

        Err(CalendarError::invalid_date(
            "components need a year with a month and day, a day of year, or a week of year",
        ))
    }
}

/// Reads the requested fields of `instant` in `system`, shifted by a UTC
/// offset. The time zone of the result is left unset.
pub fn decode(
    system: &dyn CalendarSystem,
    instant: Instant,
    offset_seconds: i32,
    fields: FieldSet,
    rules: WeekRules,
) -> DateComponents {
    decode_local(system, LocalTime::from_instant(instant, offset_seconds), fields, rules)
}

fn decode_local(
    system: &dyn CalendarSystem,
    local: LocalTime,
    fields: FieldSet,
    rules: WeekRules,
) -> DateComponents {
    let mut components = DateComponents::new();
    let day = local.day;

    if fields.intersects(CALENDAR_FIELDS) {
        let date = system.date_from_fixed(day);
        let (era, year) = system.era_and_year(day, date.year);
        let (month, leap) = system.month_label(date.year, date.month);
        for field in fields.iter() {
            let value = match field {
                Field::Era => era,
                Field::Year => year,
                Field::Month => i64::from(month),
                Field::IsLeapMonth => i64::from(leap),
                Field::Day => i64::from(date.day),
                Field::DayOfYear => day - system.start_of_year(date.year) + 1,
                Field::WeekdayOrdinal => (i64::from(date.day) - 1) / 7 + 1,
                Field::WeekOfMonth => rules.week_number(i64::from(date.day), weekday_of(day)),
                Field::WeekOfYear => rules.week_of_year(system, day).1,
                Field::YearForWeekOfYear => {
                    let (owner, _) = rules.week_of_year(system, day);
                    system.era_and_year(day, owner).1
                }
                _ => continue,
            };
            components.set(field, Some(value));
        }
    }

    if fields.contains(Field::Weekday) {
        components.weekday = Some(i64::from(weekday_of(day)));
    }
    if fields.contains(Field::Hour) {
        components.hour = Some(local.hour());
    }
    if fields.contains(Field::Minute) {
        components.minute = Some(local.minute());
    }
    if fields.contains(Field::Second) {
        components.second = Some(local.second());
    }
    if fields.contains(Field::Nanosecond) {
        components.nanosecond = Some(i64::from(local.nanos));
    }
    components
}

/// Turns components into an instant.
///
/// The date comes from one of: year, month and day; year, month, weekday
/// and a weekday ordinal or week of month; year and day of year; or year
/// for week of year, week of year and weekday. A missing era is the
/// system's default era, a missing weekday the first weekday, and missing
/// time fields are zero. The wall-clock time is placed with `zone`.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidComponent`] for a value outside its
/// range, and [`CalendarError::AmbiguousOrInvalidDate`] when the date
/// fields are insufficient or any supplied field disagrees with the date
/// they produce.
pub fn encode(
    system: &dyn CalendarSystem,
    components: &DateComponents,
    zone: &dyn TimeZoneResolver,
    rules: WeekRules,
) -> Result<Instant, CalendarError> {
    let reckoner = Reckoner::new(system, zone, rules);
    let day = supported_day(reckoner.resolve_day(components)?)?;
    check_consistent(&reckoner, day, components)?;

    let hour = checked_time(Field::Hour, components.hour, 24)?;
    let minute = checked_time(Field::Minute, components.minute, 60)?;
    let second = checked_time(Field::Second, components.second, 60)?;
    let nanos = checked_time(Field::Nanosecond, components.nanosecond, NANOS_PER_SECOND)?;
    let second_of_day = hour * 3600 + minute * 60 + second;
    Ok(reckoner.instant_from_local(day, second_of_day, nanos as u32))
}

fn check_consistent(
    reckoner: &Reckoner<'_>,
    day: FixedDay,
    components: &DateComponents,
) -> Result<(), CalendarError> {
    let given: FieldSet = components
        .fields()
        .iter()
        .filter(|f| !f.is_time())
        .filter(|f| components.era.is_some() || !ERA_RELATIVE.contains(f))
        .filter(|f| *f != Field::WeekdayOrdinal || components.weekday_ordinal > Some(0))
        .collect();
    let actual = reckoner.decode_day(day, given);
    for field in given.iter() {
        let (want, got) = (components.value(field), actual.value(field));
        if want != got {
            return Err(CalendarError::invalid_date(format!(
                "{field} is {}, not {}",
                got.unwrap_or_default(),
                want.unwrap_or_default()
            )));
        }
    }
    Ok(())
}

fn checked_weekday(weekday: i64) -> Result<u8, CalendarError> {
    match u8::try_from(weekday) {
        Ok(w @ 1..=7) => Ok(w),
        _ => Err(CalendarError::InvalidComponent {
            field: Field::Weekday,
            value: weekday,
        }),
    }
}

pub(crate) fn checked_time(field: Field, value: Option<i64>, limit: i64) -> Result<i64, CalendarError> {
    match value {
        None => Ok(0),
        Some(v) if (0..limit).contains(&v) => Ok(v),
        Some(v) => Err(CalendarError::InvalidComponent { field, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::CalendarIdentifier;
    use crate::system::system_for;
    use almanac_host::TimeZone;

    fn utc_gregorian() -> (TimeZone, &'static dyn CalendarSystem) {
        (TimeZone::utc(), system_for(CalendarIdentifier::Gregorian))
    }

    fn us_rules() -> WeekRules {
        WeekRules::new(1, 1).unwrap()
    }

    #[test]
    fn decodes_only_requested_fields() {
        let (_, g) = utc_gregorian();
        // 2016-10-04T00:00:00Z
        let t = Instant::from_unix_seconds(1_475_539_200);
        let c = decode(g, t, 0, [Field::Year, Field::Month, Field::Day].into(), us_rules());
        assert_eq!(c, DateComponents::ymd(2016, 10, 4));
    }

    #[test]
    fn decode_applies_offset() {
        let (_, g) = utc_gregorian();
        let t = Instant::from_unix_seconds(1_475_539_200);
        let c = decode(g, t, -3600, [Field::Day, Field::Hour].into(), us_rules());
        assert_eq!(c.day, Some(3));
        assert_eq!(c.hour, Some(23));
    }

    #[test]
    fn encodes_ymd_at_midnight() {
        let (zone, g) = utc_gregorian();
        let t = encode(g, &DateComponents::ymd(2016, 10, 4), &zone, us_rules()).unwrap();
        assert_eq!(t.unix_seconds(), 1_475_539_200);
    }

    #[test]
    fn contradictory_weekday_is_rejected() {
        let (zone, g) = utc_gregorian();
        // 2016-10-04 was a Tuesday (3).
        let ok = DateComponents::ymd(2016, 10, 4).with(Field::Weekday, 3);
        assert!(encode(g, &ok, &zone, us_rules()).is_ok());
        let bad = DateComponents::ymd(2016, 10, 4).with(Field::Weekday, 5);
        assert!(matches!(
            encode(g, &bad, &zone, us_rules()),
            Err(CalendarError::AmbiguousOrInvalidDate { .. })
        ));
    }

    #[test]
    fn missing_day_is_rejected() {
        let (zone, g) = utc_gregorian();
        let c = DateComponents::new().with(Field::Year, 2016).with(Field::Month, 10);
        assert!(matches!(
            encode(g, &c, &zone, us_rules()),
            Err(CalendarError::AmbiguousOrInvalidDate { .. })
        ));
    }

    #[test]
    fn out_of_range_time_is_invalid_component() {
        let (zone, g) = utc_gregorian();
        let c = DateComponents::ymd(2016, 10, 4).with(Field::Hour, 24);
        assert_eq!(
            encode(g, &c, &zone, us_rules()),
            Err(CalendarError::InvalidComponent {
                field: Field::Hour,
                value: 24
            })
        );
    }

    #[test]
    fn alternative_date_routes() {
        let (zone, g) = utc_gregorian();
        let expected = encode(g, &DateComponents::ymd(2016, 10, 4), &zone, us_rules()).unwrap();

        let by_day_of_year = DateComponents::new()
            .with(Field::Year, 2016)
            .with(Field::DayOfYear, 278);
        assert_eq!(encode(g, &by_day_of_year, &zone, us_rules()).unwrap(), expected);

        // First Tuesday of October 2016.
        let by_ordinal = DateComponents::new()
            .with(Field::Year, 2016)
            .with(Field::Month, 10)
            .with(Field::Weekday, 3)
            .with(Field::WeekdayOrdinal, 1);
        assert_eq!(encode(g, &by_ordinal, &zone, us_rules()).unwrap(), expected);

        let by_week = DateComponents::new()
            .with(Field::YearForWeekOfYear, 2016)
            .with(Field::WeekOfYear, 41)
            .with(Field::Weekday, 3);
        assert_eq!(encode(g, &by_week, &zone, us_rules()).unwrap(), expected);
    }

    #[test]
    fn last_weekday_of_month() {
        let (zone, g) = utc_gregorian();
        // Last Monday of May 2021 is the 31st.
        let c = DateComponents::new()
            .with(Field::Year, 2021)
            .with(Field::Month, 5)
            .with(Field::Weekday, 2)
            .with(Field::WeekdayOrdinal, -1);
        let t = encode(g, &c, &zone, us_rules()).unwrap();
        assert_eq!(decode(g, t, 0, [Field::Day].into(), us_rules()).day, Some(31));
    }

    #[test]
    fn skipped_wall_time_moves_forward() {
        let zone = TimeZone::from_identifier("America/Los_Angeles").unwrap();
        let g = system_for(CalendarIdentifier::Gregorian);
        // 2021-03-14 02:30 does not exist in Los Angeles.
        let c = DateComponents::ymd(2021, 3, 14).with(Field::Hour, 2).with(Field::Minute, 30);
        let t = encode(g, &c, &zone, us_rules()).unwrap();
        let back = decode(g, t, zone.offset_seconds(t.unix_seconds()), FieldSet::time(), us_rules());
        assert_eq!(back.hour, Some(3));
        assert_eq!(back.minute, Some(30));
    }
}
