//! The [`Calendar`] facade.

use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use almanac_host::{BuiltinLocaleData, Locale, LocaleDefaults, TimeZone};
use tracing::debug;

use crate::codec::Reckoner;
use crate::components::{ComponentDelta, DateComponents};
use crate::defaults;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::identifier::CalendarIdentifier;
use crate::instant::{Instant, NANOS_PER_SECOND};
use crate::search::{MatchingPolicy, SearchDirection};
use crate::system::{CalendarSystem, system_for};
use crate::week::{WeekRules, weekday_of};

const LOCALE_DATA: BuiltinLocaleData = BuiltinLocaleData;

#[derive(Debug, Clone)]
enum SystemChoice {
    Builtin(CalendarIdentifier),
    Custom(Arc<dyn CalendarSystem>),
}

impl SystemChoice {
    fn get(&self) -> &dyn CalendarSystem {
        match self {
            SystemChoice::Builtin(identifier) => system_for(*identifier),
            SystemChoice::Custom(system) => system.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Settings {
    /// Follows the process defaults until first mutated.
    Autoupdating,
    Snapshot {
        time_zone: TimeZone,
        locale: Locale,
        first_weekday: Option<u8>,
        minimum_days: Option<u8>,
    },
}

/// A calendar system together with a time zone, a locale and week rules.
///
/// `Calendar` is a value: clones are independent, and equality and
/// hashing cover the identifier, zone, locale, first weekday and minimum
/// days in the first week. Calendars from
/// [`autoupdating_current`](Self::autoupdating_current) equal each other
/// and no snapshot calendar.
///
/// Decoding never fails. [`date`](Self::date),
/// [`date_by_adding`](Self::date_by_adding) and
/// [`next_date`](Self::next_date) return `None` where no instant fits; the
/// `try_` forms say why.
///
/// ```
/// use almanac_calendar::{Calendar, CalendarIdentifier, DateComponents, Field};
/// use almanac_host::TimeZone;
///
/// let calendar = Calendar::new(CalendarIdentifier::Gregorian).with_time_zone(TimeZone::utc());
/// let instant = calendar.date(&DateComponents::ymd(2016, 10, 4)).unwrap();
/// let parts = calendar.date_components([Field::Year, Field::Month, Field::Day].into(), instant);
/// assert_eq!(parts, DateComponents::ymd(2016, 10, 4));
/// ```
#[derive(Debug, Clone)]
pub struct Calendar {
    system: SystemChoice,
    settings: Settings,
}

impl Calendar {
    /// A calendar of the given system with the current default zone and
    /// locale.
    pub fn new(identifier: CalendarIdentifier) -> Self {
        Self::snapshot(SystemChoice::Builtin(identifier))
    }

    /// A calendar using a custom system, such as a Japanese calendar with
    /// extra eras.
    pub fn with_system(system: Arc<dyn CalendarSystem>) -> Self {
        Self::snapshot(SystemChoice::Custom(system))
    }

    /// A Gregorian calendar fixed to the defaults at the time of the call.
    pub fn current() -> Self {
        Self::new(CalendarIdentifier::Gregorian)
    }

    /// A Gregorian calendar that reads the process defaults on every
    /// access. The first mutation turns it into a snapshot.
    pub fn autoupdating_current() -> Self {
        Self {
            system: SystemChoice::Builtin(CalendarIdentifier::Gregorian),
            settings: Settings::Autoupdating,
        }
    }

    fn snapshot(system: SystemChoice) -> Self {
        let defaults = defaults::current();
        Self {
            system,
            settings: Settings::Snapshot {
                time_zone: defaults.time_zone,
                locale: defaults.locale,
                first_weekday: None,
                minimum_days: None,
            },
        }
    }

    /// Returns the calendar with a time zone.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.set_time_zone(time_zone);
        self
    }

    /// Returns the calendar with a locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.set_locale(locale);
        self
    }

    /// Returns the calendar with a first weekday (1 = Sunday).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidSetting`] outside 1..=7.
    pub fn with_first_weekday(mut self, weekday: u8) -> Result<Self, CalendarError> {
        self.set_first_weekday(weekday)?;
        Ok(self)
    }

    /// Returns the calendar with a minimum number of days in the first
    /// week.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidSetting`] outside 1..=7.
    pub fn with_minimum_days_in_first_week(mut self, days: u8) -> Result<Self, CalendarError> {
        self.set_minimum_days_in_first_week(days)?;
        Ok(self)
    }

    /// The calendar system's identifier.
    pub fn identifier(&self) -> CalendarIdentifier {
        self.system().identifier()
    }

    /// The calendar system.
    pub fn system(&self) -> &dyn CalendarSystem {
        self.system.get()
    }

    /// Whether the calendar follows the process defaults.
    pub fn is_autoupdating(&self) -> bool {
        self.settings == Settings::Autoupdating
    }

    /// The calendar's time zone.
    pub fn time_zone(&self) -> TimeZone {
        match &self.settings {
            Settings::Autoupdating => defaults::time_zone(),
            Settings::Snapshot { time_zone, .. } => time_zone.clone(),
        }
    }

    /// Sets the time zone.
    pub fn set_time_zone(&mut self, zone: TimeZone) {
        if let Settings::Snapshot { time_zone, .. } = self.settings_mut() {
            *time_zone = zone;
        }
    }

    /// The calendar's locale.
    pub fn locale(&self) -> Locale {
        match &self.settings {
            Settings::Autoupdating => defaults::locale(),
            Settings::Snapshot { locale, .. } => locale.clone(),
        }
    }

    /// Sets the locale. Week rules that were not set explicitly follow it.
    pub fn set_locale(&mut self, value: Locale) {
        if let Settings::Snapshot { locale, .. } = self.settings_mut() {
            *locale = value;
        }
    }

    /// The first day of the week, 1 = Sunday.
    pub fn first_weekday(&self) -> u8 {
        match &self.settings {
            Settings::Snapshot {
                first_weekday: Some(weekday),
                ..
            } => *weekday,
            _ if self.identifier() == CalendarIdentifier::Iso8601 => WeekRules::ISO.first_weekday(),
            _ => LOCALE_DATA.first_weekday(&self.locale()),
        }
    }

    /// Sets the first day of the week.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidSetting`] outside 1..=7.
    pub fn set_first_weekday(&mut self, weekday: u8) -> Result<(), CalendarError> {
        WeekRules::new(weekday, 1)?;
        if let Settings::Snapshot { first_weekday, .. } = self.settings_mut() {
            *first_weekday = Some(weekday);
        }
        Ok(())
    }

    /// Minimum days of a year or month that its first week must contain.
    pub fn minimum_days_in_first_week(&self) -> u8 {
        match &self.settings {
            Settings::Snapshot {
                minimum_days: Some(days),
                ..
            } => *days,
            _ if self.identifier() == CalendarIdentifier::Iso8601 => WeekRules::ISO.minimum_days(),
            _ => LOCALE_DATA.minimum_days_in_first_week(&self.locale()),
        }
    }

    /// Sets the minimum days in the first week.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidSetting`] outside 1..=7.
    pub fn set_minimum_days_in_first_week(&mut self, days: u8) -> Result<(), CalendarError> {
        WeekRules::new(1, days)?;
        if let Settings::Snapshot { minimum_days, .. } = self.settings_mut() {
            *minimum_days = Some(days);
        }
        Ok(())
    }

    /// The week rules in effect.
    pub fn week_rules(&self) -> WeekRules {
        WeekRules::new(self.first_weekday(), self.minimum_days_in_first_week())
            .unwrap_or(WeekRules::ISO)
    }

    /// Settings to mutate, detaching an autoupdating calendar from the
    /// defaults first.
    fn settings_mut(&mut self) -> &mut Settings {
        if self.settings == Settings::Autoupdating {
            debug!("snapshotting autoupdating calendar");
            let defaults = defaults::current();
            self.settings = Settings::Snapshot {
                time_zone: defaults.time_zone,
                locale: defaults.locale,
                first_weekday: None,
                minimum_days: None,
            };
        }
        &mut self.settings
    }

    fn reckon<R>(&self, zone: Option<&TimeZone>, f: impl FnOnce(&Reckoner<'_>) -> R) -> R {
        let own;
        let zone = match zone {
            Some(zone) => zone,
            None => {
                own = self.time_zone();
                &own
            }
        };
        f(&Reckoner::new(self.system(), zone, self.week_rules()))
    }

    /// Decodes the requested fields of an instant in the calendar's zone.
    pub fn date_components(&self, fields: FieldSet, instant: Instant) -> DateComponents {
        self.reckon(None, |r| r.decode(instant, fields))
    }

    /// Decodes every field of an instant in `zone`, recording the zone in
    /// the result. The calendar is not changed.
    pub fn date_components_in(&self, zone: &TimeZone, instant: Instant) -> DateComponents {
        self.reckon(Some(zone), |r| r.decode(instant, FieldSet::all()))
            .with_time_zone(zone.clone())
    }

    /// Components between two instants; empty if the difference cannot be
    /// represented.
    pub fn date_components_between(&self, fields: FieldSet, from: Instant, to: Instant) -> DateComponents {
        self.try_date_components_between(fields, from, to)
            .unwrap_or_else(|e| {
                debug!(error = %e, "difference not representable");
                DateComponents::new()
            })
    }

    /// Components between two instants.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] if an intermediate date
    /// leaves the calendar's range.
    pub fn try_date_components_between(
        &self,
        fields: FieldSet,
        from: Instant,
        to: Instant,
    ) -> Result<DateComponents, CalendarError> {
        self.reckon(None, |r| r.difference(from, to, fields))
    }

    /// The instant named by components, read in their zone if they carry
    /// one and in the calendar's zone otherwise.
    pub fn date(&self, components: &DateComponents) -> Option<Instant> {
        self.try_date(components).ok()
    }

    /// See [`date`](Self::date).
    ///
    /// # Errors
    ///
    /// See [`encode`](crate::codec::encode).
    pub fn try_date(&self, components: &DateComponents) -> Result<Instant, CalendarError> {
        self.reckon(components.time_zone.as_ref(), |r| r.encode(components))
    }

    /// Adds a delta to an instant, carrying or wrapping.
    pub fn date_by_adding(&self, delta: &ComponentDelta, instant: Instant, wrapping: bool) -> Option<Instant> {
        self.try_date_by_adding(delta, instant, wrapping).ok()
    }

    /// See [`date_by_adding`](Self::date_by_adding).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] if the result leaves the
    /// calendar's range.
    pub fn try_date_by_adding(
        &self,
        delta: &ComponentDelta,
        instant: Instant,
        wrapping: bool,
    ) -> Result<Instant, CalendarError> {
        self.reckon(None, |r| r.add(instant, delta, wrapping))
    }

    /// Next instant matching a pattern, or `None`.
    pub fn next_date(
        &self,
        after: Instant,
        matching: &DateComponents,
        policy: MatchingPolicy,
        direction: SearchDirection,
    ) -> Option<Instant> {
        self.try_next_date(after, matching, policy, direction)
            .ok()
            .flatten()
    }

    /// See [`next_date`](Self::next_date).
    ///
    /// # Errors
    ///
    /// Returns an error for an empty pattern or out-of-range time fields.
    pub fn try_next_date(
        &self,
        after: Instant,
        matching: &DateComponents,
        policy: MatchingPolicy,
        direction: SearchDirection,
    ) -> Result<Option<Instant>, CalendarError> {
        self.reckon(None, |r| r.next_date(after, matching, policy, direction))
    }

    /// One field of an instant. The leap-month flag reads as 0 or 1.
    pub fn component(&self, field: Field, instant: Instant) -> i64 {
        self.date_components([field].into(), instant)
            .value(field)
            .unwrap_or_default()
    }

    /// Start of the local day containing an instant.
    pub fn start_of_day(&self, instant: Instant) -> Instant {
        self.reckon(None, |r| {
            let local = r.local(instant);
            r.instant_from_local(local.day, 0, 0)
        })
    }

    /// Whether an instant falls on the locale's weekend.
    pub fn is_date_in_weekend(&self, instant: Instant) -> bool {
        let weekday = self.reckon(None, |r| weekday_of(r.local(instant).day));
        let (start, end) = LOCALE_DATA.weekend(&self.locale());
        if start <= end {
            (start..=end).contains(&weekday)
        } else {
            weekday >= start || weekday <= end
        }
    }

    /// Valid values of `smaller` within the `larger` unit containing an
    /// instant, e.g. the days of the current month. `None` for pairs that
    /// do not nest or have no bound.
    pub fn range_of(&self, smaller: Field, larger: Field, instant: Instant) -> Option<Range<i64>> {
        let system = self.system();
        let rules = self.week_rules();
        let day = self.reckon(None, |r| r.local(instant).day);
        let date = system.date_from_fixed(day);
        let year_length = i64::from(system.days_in_year(date.year));
        let month_length = i64::from(system.days_in_month(date.year, date.month).ok()?);
        let year_start = system.start_of_year(date.year);
        let month_start = day - (i64::from(date.day) - 1);

        let range = match (smaller, larger) {
            (Field::Year, Field::Era) => {
                let eras = system.eras();
                let index = eras.index_of(day);
                let end = eras.end_of(index)?;
                let last = system.date_from_fixed(end - 1).year;
                1..system.era_and_year(end - 1, last).1 + 1
            }
            (Field::Month, Field::Year) => {
                let labels = (1..=system.months_in_year(date.year))
                    .map(|m| i64::from(system.month_label(date.year, m).0));
                let (low, high) = labels.fold((i64::MAX, i64::MIN), |(lo, hi), l| (lo.min(l), hi.max(l)));
                low..high + 1
            }
            (Field::Day, Field::Month) => 1..month_length + 1,
            (Field::Day | Field::DayOfYear, Field::Year) => 1..year_length + 1,
            (Field::WeekOfYear, Field::Year | Field::YearForWeekOfYear) => {
                let end = year_start + (year_length - 1);
                let first = rules.week_number(1, weekday_of(year_start));
                first..rules.week_number(year_length, weekday_of(end)) + 1
            }
            (Field::WeekOfMonth, Field::Month) => {
                let end = month_start + (month_length - 1);
                let first = rules.week_number(1, weekday_of(month_start));
                first..rules.week_number(month_length, weekday_of(end)) + 1
            }
            (Field::WeekdayOrdinal, Field::Month) => 1..(month_length - 1) / 7 + 2,
            (Field::Weekday, Field::WeekOfYear | Field::WeekOfMonth) => 1..8,
            (Field::Hour, Field::Day) => 0..24,
            (Field::Minute, Field::Hour) | (Field::Second, Field::Minute) => 0..60,
            (Field::Nanosecond, Field::Second) => 0..NANOS_PER_SECOND,
            _ => return None,
        };
        Some(range)
    }

    /// Era names in order. Locales with native names for the eras (such
    /// as Japanese) get those.
    pub fn era_symbols(&self) -> Vec<String> {
        let native = self.locale().language() == "ja";
        self.system()
            .eras()
            .iter()
            .map(|era| match era.native_name() {
                Some(name) if native => name.to_string(),
                _ => era.name().to_string(),
            })
            .collect()
    }

    /// Symbol for times before noon.
    pub fn am_symbol(&self) -> String {
        LOCALE_DATA.am_symbol(&self.locale())
    }

    /// Symbol for times from noon on.
    pub fn pm_symbol(&self) -> String {
        LOCALE_DATA.pm_symbol(&self.locale())
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::current()
    }
}

impl PartialEq for Calendar {
    fn eq(&self, other: &Self) -> bool {
        let same_system = match (&self.system, &other.system) {
            (SystemChoice::Builtin(a), SystemChoice::Builtin(b)) => a == b,
            (a, b) => {
                a.get().identifier() == b.get().identifier() && a.get().eras() == b.get().eras()
            }
        };
        same_system
            && match (&self.settings, &other.settings) {
                (Settings::Autoupdating, Settings::Autoupdating) => true,
                (Settings::Snapshot { .. }, Settings::Snapshot { .. }) => {
                    self.time_zone() == other.time_zone()
                        && self.locale() == other.locale()
                        && self.first_weekday() == other.first_weekday()
                        && self.minimum_days_in_first_week() == other.minimum_days_in_first_week()
                }
                _ => false,
            }
    }
}

impl Eq for Calendar {}

impl Hash for Calendar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier().hash(state);
        self.is_autoupdating().hash(state);
        if !self.is_autoupdating() {
            self.time_zone().hash(state);
            self.locale().hash(state);
            self.first_weekday().hash(state);
            self.minimum_days_in_first_week().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(identifier: CalendarIdentifier) -> Calendar {
        Calendar::new(identifier)
            .with_time_zone(TimeZone::utc())
            .with_locale(Locale::new("en_US").unwrap())
    }

    #[test]
    fn copies_are_independent() {
        let original = utc(CalendarIdentifier::Gregorian);
        let mut copy = original.clone();
        assert_eq!(copy, original);
        copy.set_first_weekday(2).unwrap();
        assert_ne!(copy, original);
        assert_eq!(original.first_weekday(), 1);
    }

    #[test]
    fn iso_week_rules_ignore_locale() {
        let iso = utc(CalendarIdentifier::Iso8601);
        assert_eq!(iso.first_weekday(), 2);
        assert_eq!(iso.minimum_days_in_first_week(), 4);
        let gregorian = utc(CalendarIdentifier::Gregorian).with_locale(Locale::new("de_DE").unwrap());
        assert_eq!(gregorian.first_weekday(), 2);
        assert_eq!(gregorian.minimum_days_in_first_week(), 4);
    }

    #[test]
    fn invalid_settings_leave_calendar_unchanged() {
        let mut calendar = utc(CalendarIdentifier::Gregorian);
        assert!(calendar.set_first_weekday(0).is_err());
        assert!(calendar.set_minimum_days_in_first_week(9).is_err());
        assert_eq!(calendar, utc(CalendarIdentifier::Gregorian));
    }

    #[test]
    fn range_of_days_in_month() {
        let calendar = utc(CalendarIdentifier::Gregorian);
        let t = calendar.date(&DateComponents::ymd(2020, 2, 10)).unwrap();
        assert_eq!(calendar.range_of(Field::Day, Field::Month, t), Some(1..30));
        assert_eq!(calendar.range_of(Field::Month, Field::Year, t), Some(1..13));
        assert_eq!(calendar.range_of(Field::Hour, Field::Day, t), Some(0..24));
        assert_eq!(calendar.range_of(Field::Day, Field::Hour, t), None);
    }

    #[test]
    fn hebrew_month_range_skips_adar_one_in_common_years() {
        let calendar = utc(CalendarIdentifier::Hebrew);
        let t = Instant::from_unix_seconds(1_600_000_000);
        assert_eq!(calendar.range_of(Field::Month, Field::Year, t), Some(1..14));
    }

    #[test]
    fn start_of_day_in_zone() {
        let calendar = utc(CalendarIdentifier::Gregorian)
            .with_time_zone(TimeZone::from_identifier("America/New_York").unwrap());
        // 2021-06-01T15:00:00Z is 11:00 in New York.
        let t = Instant::from_unix_seconds(1_622_559_600);
        assert_eq!(calendar.start_of_day(t).unix_seconds(), 1_622_520_000);
    }
}
