//! Error types for the almanac-calendar crate.

use almanac_host::HostError;

use crate::field::Field;

/// Error type for all fallible operations in the almanac-calendar crate.
///
/// The [`Calendar`](crate::Calendar) facade turns these into `None` for
/// `date`, `date_by_adding` and `next_date`; the `try_*` forms surface
/// them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// A field value is outside the valid range for the calendar system,
    /// e.g. month 13 in a Gregorian year.
    #[error("invalid {field} component: {value}")]
    InvalidComponent {
        /// The offending field.
        field: Field,
        /// The value that was supplied.
        value: i64,
    },

    /// Components are missing, contradict each other, or name a date that
    /// does not exist.
    #[error("ambiguous or invalid date: {reason}")]
    AmbiguousOrInvalidDate {
        /// What was wrong with the components.
        reason: String,
    },

    /// A time-zone identifier could not be resolved.
    #[error("unknown time zone: {zone:?}")]
    UnknownZone {
        /// The identifier that was looked up.
        zone: String,
    },

    /// A locale identifier could not be resolved.
    #[error("unknown locale: {locale:?}")]
    UnknownLocale {
        /// The identifier that was looked up.
        locale: String,
    },

    /// A week setting is outside 1..=7.
    #[error("invalid {name}: {value} (must be 1..=7)")]
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// The value that was supplied.
        value: i64,
    },

    /// An era appended to an era table does not start after the last era.
    #[error("era {name:?} must start after the last era in the table")]
    EraOrder {
        /// Name of the rejected era.
        name: String,
    },

    /// A calendar identifier, field or policy name was not recognised.
    #[error("unknown {kind}: {name:?}")]
    UnknownName {
        /// What kind of name was parsed.
        kind: &'static str,
        /// The unrecognised name.
        name: String,
    },
}

impl CalendarError {
    pub(crate) fn invalid_date(reason: impl Into<String>) -> Self {
        CalendarError::AmbiguousOrInvalidDate {
            reason: reason.into(),
        }
    }
}

impl From<HostError> for CalendarError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::UnknownZone { zone } => CalendarError::UnknownZone { zone },
            HostError::UnknownLocale { locale } => CalendarError::UnknownLocale { locale },
        }
    }
}
