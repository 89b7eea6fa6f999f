//! # almanac-astro
//!
//! Day reckoning and the astronomical moments needed by the lunisolar
//! and lunar calendars: solar longitude for solar terms and solstices,
//! and new moons for month starts.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["FixedDay"] -->|".as_moment()"| B["Moment (UT)"]
//!     B -->|"julian_centuries()"| C["centuries since J2000 (TT)"]
//!     C -->|"solar_longitude()"| D["degrees"]
//!     E["lunation index"] -->|"nth_new_moon()"| B
//!     B -->|"new_moon_index_at_or_after()"| E
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `day` | Fixed day numbers, moments and the proleptic Gregorian mapping |
//! | `ephemeris` | Universal and dynamical time |
//! | `solar` | Apparent solar longitude |
//! | `lunar` | New moons |

mod day;
mod ephemeris;
mod lunar;
mod solar;

pub use day::{
    FixedDay, Moment, fixed_from_gregorian, gregorian_days_in_month, gregorian_from_fixed,
    gregorian_year_from_fixed, is_gregorian_leap_year,
};
pub use ephemeris::{J2000, ephemeris_correction, julian_centuries};
pub use lunar::{
    MEAN_SYNODIC_MONTH, NEW_MOON_ZERO, new_moon_at_or_after, new_moon_before,
    new_moon_index_at_or_after, nth_new_moon,
};
pub use solar::{
    MEAN_TROPICAL_YEAR, WINTER, estimate_prior_solar_longitude, solar_longitude,
    solar_longitude_at,
};
