//! # almanac-host
//!
//! The two lookups the calendar engine needs from its environment: UTC
//! offsets for a time zone, and week and day-period conventions for a
//! locale.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["zone identifier"] -->|"TimeZone::from_identifier()"| B["TimeZone"]
//!     B -->|"offset_seconds()"| C["UTC offset"]
//!     B -->|"local_offsets()"| D["LocalOffsets"]
//!     E["locale identifier"] -->|"Locale::new()"| F["Locale"]
//!     F -->|"LocaleDefaults"| G["first weekday, min days, weekend, AM/PM"]
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `zone` | Named and fixed-offset zones, local-time resolution |
//! | `locale` | Locale identifiers and regional calendar defaults |
//! | `system` | The running host's zone and locale |
//! | `error` | Error types |

mod error;
mod locale;
mod system;
mod zone;

pub use error::HostError;
pub use locale::{BuiltinLocaleData, Locale, LocaleDefaults};
pub use system::{system_locale, system_time_zone};
pub use zone::{LocalOffsets, TimeZone, TimeZoneResolver};
