//! Error types for the almanac-host crate.

/// Error type for host lookups that cannot be resolved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// Returned when a time-zone identifier names neither an IANA zone
    /// nor a `GMT±hh[:mm]` offset.
    #[error("unknown time zone: {zone:?}")]
    UnknownZone {
        /// The identifier that was looked up.
        zone: String,
    },

    /// Returned when a locale identifier is not well formed.
    #[error("unknown locale: {locale:?}")]
    UnknownLocale {
        /// The identifier that was looked up.
        locale: String,
    },
}
