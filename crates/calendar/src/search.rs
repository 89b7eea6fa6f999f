//! Searching for the next instant that matches a partial pattern of
//! components.
//!
//! The search walks local days in the requested direction. On each day
//! whose date fields match, it tries the wall-clock times the pattern
//! allows, in order, and returns the first that lies strictly beyond the
//! starting instant. Patterns naming a year jump straight to that year.

use std::fmt;
use std::str::FromStr;

use almanac_astro::FixedDay;
use almanac_host::LocalOffsets;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::codec::{Reckoner, checked_time};
use crate::components::DateComponents;
use crate::error::CalendarError;
use crate::field::{Field, FieldSet};
use crate::instant::{Instant, LocalTime, NANOS_PER_SECOND, local_seconds};

/// Days a search may walk before giving up: sixty years, enough for any
/// weekday and leap-day combination to recur.
pub const MAX_SEARCH_DAYS: i64 = 366 * 60;

/// What to do when the pattern names a time or day that does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchingPolicy {
    /// Only exact matches count; missing times and days are skipped.
    Strict,
    /// Take the first instant after the missing time, or the start of the
    /// day after a missing day. Unspecified smaller fields are zero.
    #[default]
    NextTime,
    /// Keep the pattern's time and move to the next existing time or day.
    /// Unspecified smaller fields are taken from the starting instant.
    NextTimePreservingSmallerComponents,
    /// Keep the pattern's time and move to the previous existing time or
    /// day. Unspecified smaller fields are taken from the starting instant.
    PreviousTimePreservingSmallerComponents,
}

impl MatchingPolicy {
    /// Every policy.
    pub const ALL: [MatchingPolicy; 4] = [
        MatchingPolicy::Strict,
        MatchingPolicy::NextTime,
        MatchingPolicy::NextTimePreservingSmallerComponents,
        MatchingPolicy::PreviousTimePreservingSmallerComponents,
    ];

    /// The policy's name.
    pub fn name(self) -> &'static str {
        match self {
            MatchingPolicy::Strict => "strict",
            MatchingPolicy::NextTime => "nextTime",
            MatchingPolicy::NextTimePreservingSmallerComponents => {
                "nextTimePreservingSmallerComponents"
            }
            MatchingPolicy::PreviousTimePreservingSmallerComponents => {
                "previousTimePreservingSmallerComponents"
            }
        }
    }

    fn preserves_smaller(self) -> bool {
        matches!(
            self,
            MatchingPolicy::NextTimePreservingSmallerComponents
                | MatchingPolicy::PreviousTimePreservingSmallerComponents
        )
    }
}

impl fmt::Display for MatchingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatchingPolicy {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchingPolicy::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CalendarError::UnknownName {
                kind: "matching policy",
                name: s.to_string(),
            })
    }
}

/// Which way a search walks from its starting instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchDirection {
    /// Later instants.
    #[default]
    Forward,
    /// Earlier instants.
    Backward,
}

impl SearchDirection {
    fn step(self) -> i64 {
        match self {
            SearchDirection::Forward => 1,
            SearchDirection::Backward => -1,
        }
    }

    fn beyond(self, candidate: Instant, start: Instant) -> bool {
        match self {
            SearchDirection::Forward => candidate > start,
            SearchDirection::Backward => candidate < start,
        }
    }
}

impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchDirection::Forward => "forward",
            SearchDirection::Backward => "backward",
        })
    }
}

impl FromStr for SearchDirection {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(SearchDirection::Forward),
            "backward" => Ok(SearchDirection::Backward),
            _ => Err(CalendarError::UnknownName {
                kind: "search direction",
                name: s.to_string(),
            }),
        }
    }
}

/// Wall-clock times of day a pattern allows, in ascending order, as
/// (second of day, nanosecond).
fn times_of_day(pattern: &DateComponents, policy: MatchingPolicy, start: LocalTime) -> Vec<(i64, u32)> {
    let fields = [
        (pattern.hour, start.hour(), 24),
        (pattern.minute, start.minute(), 60),
        (pattern.second, start.second(), 60),
    ];
    let smallest = fields.iter().rposition(|(value, _, _)| value.is_some());
    let preserve = policy.preserves_smaller();

    // Each field is fixed, free (iterated) or defaulted.
    let choices: Vec<Vec<i64>> = fields
        .iter()
        .enumerate()
        .map(|(index, (value, current, range))| match value {
            Some(v) => vec![*v],
            None if pattern.nanosecond.is_some() || smallest.is_some_and(|s| index < s) => {
                (0..*range).collect()
            }
            None if preserve => vec![*current],
            None => vec![0],
        })
        .collect();
    let nanos = match pattern.nanosecond {
        Some(n) => n as u32,
        None if preserve => start.nanos,
        None => 0,
    };

    let mut times = Vec::new();
    for hour in &choices[0] {
        for minute in &choices[1] {
            for second in &choices[2] {
                times.push((hour * 3600 + minute * 60 + second, nanos));
            }
        }
    }
    times
}

impl Reckoner<'_> {
    /// Next instant strictly after (or before, searching backwards)
    /// `start` whose components match every field of `pattern`.
    ///
    /// Returns `Ok(None)` when nothing matches within the year a pattern
    /// names, or within [`MAX_SEARCH_DAYS`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidComponent`] for a time field outside
    /// its range, and [`CalendarError::AmbiguousOrInvalidDate`] for an
    /// empty pattern.
    #[instrument(level = "debug", skip(self, pattern))]
    pub fn next_date(
        &self,
        start: Instant,
        pattern: &DateComponents,
        policy: MatchingPolicy,
        direction: SearchDirection,
    ) -> Result<Option<Instant>, CalendarError> {
        if pattern.is_empty() {
            return Err(CalendarError::invalid_date("empty search pattern"));
        }
        checked_time(Field::Hour, pattern.hour, 24)?;
        checked_time(Field::Minute, pattern.minute, 60)?;
        checked_time(Field::Second, pattern.second, 60)?;
        checked_time(Field::Nanosecond, pattern.nanosecond, NANOS_PER_SECOND)?;

        let date_fields: FieldSet = pattern.fields().iter().filter(|f| !f.is_time()).collect();
        let local = self.local(start);
        let times = times_of_day(pattern, policy, local);
        let mut day = local.day;

        let year_limit = match pattern.year {
            Some(year) => {
                let current = self.system.date_from_fixed(day).year;
                let era = pattern
                    .era
                    .unwrap_or_else(|| self.system.era_and_year(day, current).0);
                let target = match self.system.extended_year(era, year) {
                    Ok(target) => target,
                    Err(_) => return Ok(None),
                };
                let step = direction.step();
                let offset = i64::from(target) - i64::from(current);
                if offset * step < 0 {
                    debug!(target, current, "pattern year already passed");
                    return Ok(None);
                }
                if offset > 0 {
                    day = self.system.start_of_year(target);
                } else if offset < 0 {
                    day = self.system.start_of_year(target + 1) - 1;
                }
                Some(target)
            }
            None => None,
        };

        for _ in 0..MAX_SEARCH_DAYS {
            if year_limit.is_some_and(|y| self.system.date_from_fixed(day).year != y) {
                break;
            }
            if let Some(found) =
                self.match_on_day(day, pattern, date_fields, &times, policy, direction, start)
            {
                return Ok(Some(found));
            }
            day = day + direction.step();
        }
        debug!("no match");
        Ok(None)
    }

    #[allow(clippy::too_many_arguments)]
    fn match_on_day(
        &self,
        day: FixedDay,
        pattern: &DateComponents,
        date_fields: FieldSet,
        times: &[(i64, u32)],
        policy: MatchingPolicy,
        direction: SearchDirection,
        start: Instant,
    ) -> Option<Instant> {
        let decoded = self.decode_day(day, date_fields);
        let matches = date_fields.iter().all(|f| decoded.value(f) == pattern.value(f));
        if !matches {
            return self.missing_day(day, pattern, date_fields, times, policy, direction, start);
        }

        let ordered: Box<dyn Iterator<Item = &(i64, u32)>> = match direction {
            SearchDirection::Forward => Box::new(times.iter()),
            SearchDirection::Backward => Box::new(times.iter().rev()),
        };
        for &(second_of_day, nanos) in ordered {
            let Some(candidate) = self.place(day, second_of_day, nanos, policy, direction, start)
            else {
                continue;
            };
            if direction.beyond(candidate, start) {
                trace!(day = day.get(), second_of_day, "matched");
                return Some(candidate);
            }
        }
        None
    }

    /// Instant of a wall-clock time under the policy, or `None` if the
    /// time does not exist and the policy skips it.
    fn place(
        &self,
        day: FixedDay,
        second_of_day: i64,
        nanos: u32,
        policy: MatchingPolicy,
        direction: SearchDirection,
        start: Instant,
    ) -> Option<Instant> {
        let local = local_seconds(day, second_of_day);
        let utc = |offset: i32| {
            Instant::from_unix_seconds(local - i64::from(offset)).add_nanos(i128::from(nanos))
        };
        match self.zone.local_offsets(local) {
            LocalOffsets::Single(offset) => Some(utc(offset)),
            LocalOffsets::Ambiguous { earlier, later } => {
                let first = utc(earlier);
                let second = utc(later);
                match direction {
                    SearchDirection::Forward if !direction.beyond(first, start) => Some(second),
                    SearchDirection::Backward if direction.beyond(second, start) => Some(second),
                    _ => Some(first),
                }
            }
            LocalOffsets::Skipped { before, after } => match policy {
                MatchingPolicy::Strict => None,
                MatchingPolicy::NextTime => Some(self.transition_between(utc(after), utc(before))),
                MatchingPolicy::NextTimePreservingSmallerComponents => Some(utc(before)),
                MatchingPolicy::PreviousTimePreservingSmallerComponents => Some(utc(after)),
            },
        }
    }

    /// First instant in `(low, high]` whose offset differs from the offset
    /// at `low`: the moment clocks jumped forward.
    fn transition_between(&self, low: Instant, high: Instant) -> Instant {
        let before = self.offset_at(low);
        let (mut low, mut high) = (low.unix_seconds(), high.unix_seconds());
        while high - low > 1 {
            let middle = low + (high - low) / 2;
            if self.zone.offset_seconds(middle) == before {
                low = middle;
            } else {
                high = middle;
            }
        }
        Instant::from_unix_seconds(high)
    }

    /// Handles a pattern day that the month lacks (such as February 30)
    /// when `day` is the last day of a month otherwise matching.
    #[allow(clippy::too_many_arguments)]
    fn missing_day(
        &self,
        day: FixedDay,
        pattern: &DateComponents,
        date_fields: FieldSet,
        times: &[(i64, u32)],
        policy: MatchingPolicy,
        direction: SearchDirection,
        start: Instant,
    ) -> Option<Instant> {
        let wanted = pattern.day?;
        if policy == MatchingPolicy::Strict {
            return None;
        }
        let date = self.system.date_from_fixed(day);
        let length = self.system.days_in_month(date.year, date.month).ok()?;
        if date.day != length || wanted <= i64::from(length) {
            return None;
        }
        let others: FieldSet = date_fields.iter().filter(|f| *f != Field::Day).collect();
        let decoded = self.decode_day(day, others);
        if !others.iter().all(|f| decoded.value(f) == pattern.value(f)) {
            return None;
        }

        let &(second_of_day, nanos) = times.first()?;
        let (target, second_of_day, nanos) = match policy {
            MatchingPolicy::NextTime => (day + 1, 0, 0),
            MatchingPolicy::NextTimePreservingSmallerComponents => (day + 1, second_of_day, nanos),
            _ => (day, second_of_day, nanos),
        };
        trace!(day = day.get(), wanted, "pattern day missing from month");
        let candidate = self.instant_from_local(target, second_of_day, nanos);
        direction.beyond(candidate, start).then_some(candidate)
    }
}
