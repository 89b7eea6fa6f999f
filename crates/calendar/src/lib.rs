//! # almanac-calendar
//!
//! Conversion between instants and calendar components across sixteen
//! calendar systems, with calendar arithmetic, differences and date
//! search.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Instant"] -->|"decode()"| B["DateComponents"]
//!     B -->|"encode()"| A
//!     S["CalendarSystem"] --> R["Reckoner"]
//!     Z["TimeZone"] --> R
//!     W["WeekRules"] --> R
//!     R -->|".add() / .difference()"| A
//!     R -->|".next_date()"| A
//!     C["Calendar"] -->|"binds"| R
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use almanac_calendar::{Calendar, CalendarIdentifier, Field, Instant};
//! use almanac_host::{Locale, TimeZone};
//!
//! let japanese = Calendar::new(CalendarIdentifier::Japanese)
//!     .with_time_zone(TimeZone::utc())
//!     .with_locale(Locale::new("en_US").unwrap());
//! // 2019-05-01T00:00:00Z, the first day of Reiwa.
//! let instant = Instant::from_unix_seconds(1_556_668_800);
//! let parts = japanese.date_components([Field::Era, Field::Year].into(), instant);
//! assert_eq!(japanese.era_symbols()[parts.era.unwrap() as usize], "Reiwa");
//! assert_eq!(parts.year, Some(1));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `instant` | Absolute instants counted from 2001-01-01T00:00:00Z |
//! | `field` | Calendar fields and field sets |
//! | `components` | Decomposed components and deltas |
//! | `identifier` | The sixteen calendar identifiers |
//! | `era` | Ordered, appendable era tables |
//! | `system` | Per-calendar rules |
//! | `week` | Week numbering rules |
//! | `codec` | Instant to components and back |
//! | `arithmetic` | Adding deltas and measuring differences |
//! | `search` | Next-date search and matching policies |
//! | `defaults` | Process-wide default zone and locale |
//! | `calendar` | The `Calendar` facade |
//! | `error` | Error types |

mod arithmetic;
mod calendar;
pub mod codec;
mod components;
pub mod defaults;
mod era;
mod error;
mod field;
mod identifier;
mod instant;
mod search;
pub mod system;
mod week;

pub use calendar::Calendar;
pub use codec::Reckoner;
pub use components::{ComponentDelta, DateComponents};
pub use era::{Era, EraCounting, EraTable};
pub use error::CalendarError;
pub use field::{Field, FieldSet};
pub use identifier::CalendarIdentifier;
pub use instant::{FIRST_SUPPORTED_DAY, Instant, LAST_SUPPORTED_DAY, UNIX_TO_REFERENCE_SECONDS};
pub use search::{MAX_SEARCH_DAYS, MatchingPolicy, SearchDirection};
pub use system::{CalendarSystem, SystemDate, system_for};
pub use week::WeekRules;
