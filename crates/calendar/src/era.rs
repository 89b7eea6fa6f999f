//! Era tables.

use almanac_astro::FixedDay;

use crate::error::CalendarError;

/// How years are numbered within an era.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraCounting {
    /// Era year 1 is the anchor year and numbers increase with time.
    Forward,
    /// Era year 1 is the anchor year and numbers increase into the past
    /// (as in years BC).
    Backward,
}

/// A named segment of a calendar's year numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Era {
    name: String,
    native_name: Option<String>,
    start: Option<FixedDay>,
    anchor_year: i32,
    counting: EraCounting,
}

impl Era {
    /// An era beginning on `start` (or unbounded into the past when `None`)
    /// whose year 1 is the calendar's extended year `anchor_year`.
    pub fn new(
        name: impl Into<String>,
        start: Option<FixedDay>,
        anchor_year: i32,
        counting: EraCounting,
    ) -> Self {
        Self {
            name: name.into(),
            native_name: None,
            start,
            anchor_year,
            counting,
        }
    }

    /// Returns the era with a name in the calendar's own language.
    pub fn with_native_name(mut self, name: impl Into<String>) -> Self {
        self.native_name = Some(name.into());
        self
    }

    /// Returns the era name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the native-language name, if one is known.
    pub fn native_name(&self) -> Option<&str> {
        self.native_name.as_deref()
    }

    /// Returns the first day of the era.
    pub fn start(&self) -> Option<FixedDay> {
        self.start
    }

    /// Year within this era of an extended year.
    pub fn year_in_era(&self, extended_year: i32) -> i64 {
        let (ext, anchor) = (i64::from(extended_year), i64::from(self.anchor_year));
        match self.counting {
            EraCounting::Forward => ext - anchor + 1,
            EraCounting::Backward => anchor - ext + 1,
        }
    }

    /// Extended year of a year within this era.
    pub fn extended_year(&self, year: i64) -> Option<i32> {
        let anchor = i64::from(self.anchor_year);
        let ext = match self.counting {
            EraCounting::Forward => year.checked_add(anchor)?.checked_sub(1)?,
            EraCounting::Backward => anchor.checked_sub(year)?.checked_add(1)?,
        };
        i32::try_from(ext).ok()
    }
}

/// Eras of a calendar, ordered by start day.
///
/// Lookup is a search by day, so appending a new era leaves the numbering
/// of every earlier day untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraTable {
    eras: Vec<Era>,
}

impl EraTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table from eras already known to be in start order.
    pub(crate) fn from_ordered(eras: Vec<Era>) -> Self {
        Self { eras }
    }

    /// Appends an era.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::EraOrder`] if the era has no start while the
    /// table is not empty, or does not start after the last era.
    pub fn push(&mut self, era: Era) -> Result<(), CalendarError> {
        if let Some(last) = self.eras.last() {
            let ordered = match (last.start, era.start) {
                (None, Some(_)) => true,
                (Some(prev), Some(next)) => next > prev,
                (_, None) => false,
            };
            if !ordered {
                return Err(CalendarError::EraOrder {
                    name: era.name.clone(),
                });
            }
        }
        self.eras.push(era);
        Ok(())
    }

    /// Returns the table with `era` appended.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn with(mut self, era: Era) -> Result<Self, CalendarError> {
        self.push(era)?;
        Ok(self)
    }

    /// Number of eras.
    pub fn len(&self) -> usize {
        self.eras.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }

    /// Era at an index.
    pub fn get(&self, index: usize) -> Option<&Era> {
        self.eras.get(index)
    }

    /// All eras in order.
    pub fn iter(&self) -> impl Iterator<Item = &Era> {
        self.eras.iter()
    }

    /// Index of the era containing `day`. Days before the first era's start
    /// belong to the first era.
    pub fn index_of(&self, day: FixedDay) -> usize {
        let started = self
            .eras
            .partition_point(|era| era.start.is_none_or(|start| start <= day));
        started.saturating_sub(1)
    }

    /// Day after the last day of the era at `index`, if the era has ended.
    pub fn end_of(&self, index: usize) -> Option<FixedDay> {
        self.eras.get(index + 1).and_then(|next| next.start)
    }
}
