//! Conversion between universal and dynamical time.

use crate::day::{Moment, fixed_from_gregorian, gregorian_year_from_fixed};

/// Noon on January 1, 2000 (TT), as a moment.
pub const J2000: Moment = Moment::new(730_120.5);

/// Difference between dynamical and universal time at `moment`, in days.
///
/// Piecewise polynomial fits over historical year ranges; outside the
/// fitted ranges a parabolic extrapolation around 1820 is used.
pub fn ephemeris_correction(moment: Moment) -> f64 {
    let year = gregorian_year_from_fixed(moment.as_fixed());
    let y = f64::from(year);
    let c = (fixed_from_gregorian(year, 7, 1).get() - 693_596) as f64 / 36_525.0;
    let y2000 = y - 2000.0;
    let y1700 = y - 1700.0;
    let y1600 = y - 1600.0;
    let y1000 = (y - 1000.0) / 100.0;
    let y0 = y / 100.0;
    let y1820 = (y - 1820.0) / 100.0;

    match year {
        2051..=2150 => (-20.0 + 32.0 * y1820 * y1820 + 0.5628 * (2150.0 - y)) / 86_400.0,
        2006..=2050 => (62.92 + 0.32217 * y2000 + 0.005589 * y2000.powi(2)) / 86_400.0,
        1987..=2005 => {
            (63.86 + 0.3345 * y2000 - 0.060374 * y2000.powi(2)
                + 0.0017275 * y2000.powi(3)
                + 0.000651814 * y2000.powi(4)
                + 0.00002373599 * y2000.powi(5))
                / 86_400.0
        }
        1900..=1986 => poly(
            c,
            &[
                -0.00002, 0.000297, 0.025184, -0.181133, 0.553040, -0.861938, 0.677066, -0.212591,
            ],
        ),
        1800..=1899 => poly(
            c,
            &[
                -0.000009, 0.003844, 0.083563, 0.865736, 4.867575, 15.845535, 31.332267,
                38.291999, 28.316289, 11.636204, 2.043794,
            ],
        ),
        1700..=1799 => {
            poly(y1700, &[8.118780842, -0.005092142, 0.003336121, -0.0000266484]) / 86_400.0
        }
        1600..=1699 => poly(y1600, &[120.0, -0.9808, -0.01532, 0.000140272128]) / 86_400.0,
        500..=1599 => {
            poly(
                y1000,
                &[
                    1574.2,
                    -556.01,
                    71.23472,
                    0.319781,
                    -0.8503463,
                    -0.005050998,
                    0.0083572073,
                ],
            ) / 86_400.0
        }
        -499..=499 => {
            poly(
                y0,
                &[
                    10583.6,
                    -1014.41,
                    33.78311,
                    -5.952053,
                    -0.1798452,
                    0.022174192,
                    0.0090316521,
                ],
            ) / 86_400.0
        }
        _ => (-20.0 + 32.0 * y1820 * y1820) / 86_400.0,
    }
}

/// Dynamical time at universal `moment`.
pub fn dynamical_from_universal(moment: Moment) -> Moment {
    moment + ephemeris_correction(moment)
}

/// Universal time at dynamical `moment`.
pub fn universal_from_dynamical(moment: Moment) -> Moment {
    moment - ephemeris_correction(moment)
}

/// Julian centuries of dynamical time since J2000.
pub fn julian_centuries(moment: Moment) -> f64 {
    (dynamical_from_universal(moment) - J2000) / 36_525.0
}

/// Evaluates a polynomial with coefficients in ascending order.
pub(crate) fn poly(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &a| acc * x + a)
}
