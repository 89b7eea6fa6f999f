//! Apparent solar longitude.

use crate::day::Moment;
use crate::ephemeris::julian_centuries;

/// Mean length of the tropical year, in days.
pub const MEAN_TROPICAL_YEAR: f64 = 365.242189;

/// Solar longitude of the December solstice, in degrees.
pub const WINTER: f64 = 270.0;

const COEFFICIENTS: [f64; 49] = [
    403_406.0, 195_207.0, 119_433.0, 112_392.0, 3891.0, 2819.0, 1721.0, 660.0, 350.0, 334.0,
    314.0, 268.0, 242.0, 234.0, 158.0, 132.0, 129.0, 114.0, 99.0, 93.0, 86.0, 78.0, 72.0, 68.0,
    64.0, 46.0, 38.0, 37.0, 32.0, 29.0, 28.0, 27.0, 27.0, 25.0, 24.0, 21.0, 21.0, 20.0, 18.0,
    17.0, 14.0, 13.0, 13.0, 13.0, 12.0, 10.0, 10.0, 10.0, 10.0,
];

const ADDENDS: [f64; 49] = [
    270.54861, 340.19128, 63.91854, 331.26220, 317.843, 86.631, 240.052, 310.26, 247.23, 260.87,
    297.82, 343.14, 166.79, 81.53, 3.50, 132.75, 182.95, 162.03, 29.8, 266.4, 249.2, 157.6, 257.8,
    185.1, 69.9, 8.0, 197.1, 250.4, 65.3, 162.7, 341.5, 291.6, 98.5, 146.7, 110.0, 5.2, 342.6,
    230.9, 256.1, 45.3, 242.9, 115.2, 151.8, 285.3, 53.3, 126.6, 205.7, 85.9, 146.1,
];

const MULTIPLIERS: [f64; 49] = [
    0.9287892, 35999.1376958, 35999.4089666, 35998.7287385, 71998.20261, 71998.4403, 36000.35726,
    71997.4812, 32964.4678, -19.4410, 445267.1117, 45036.8840, 3.1008, 22518.4434, -19.9739,
    65928.9345, 9038.0293, 3034.7684, 33718.148, 3034.448, -2280.773, 29929.992, 31556.493,
    149.588, 9037.750, 107997.405, -4444.176, 151.771, 67555.316, 31556.080, -4561.540,
    107996.706, 1221.655, 62894.167, 31437.369, 14578.298, -31931.757, 34777.243, 1221.999,
    62894.511, -4442.039, 107997.909, 119.066, 16859.071, -4.578, 26895.292, -39.127, 12297.536,
    90073.778,
];

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Apparent solar longitude in degrees `[0, 360)` for a time given in
/// Julian centuries since J2000.
pub fn solar_longitude(centuries: f64) -> f64 {
    let c = centuries;
    let periodic: f64 = COEFFICIENTS
        .iter()
        .zip(ADDENDS.iter())
        .zip(MULTIPLIERS.iter())
        .map(|((x, y), z)| x * sin_deg(y + z * c))
        .sum();
    let lambda = 282.7771834 + 36_000.769_537_44 * c + 0.000_005_729_577_951_308_232 * periodic;
    let aberration = 0.000_097_4 * cos_deg(177.63 + 35_999.018_48 * c) - 0.005_575;
    let a = 124.90 - 1934.134 * c + 0.002063 * c * c;
    let b = 201.11 + 72_001.5377 * c + 0.00057 * c * c;
    let nutation = -0.004778 * sin_deg(a) - 0.0003667 * sin_deg(b);
    (lambda + aberration + nutation).rem_euclid(360.0)
}

/// Solar longitude at a universal `moment`.
pub fn solar_longitude_at(moment: Moment) -> f64 {
    solar_longitude(julian_centuries(moment))
}

/// Estimate of the last moment at or before `moment` at which the sun
/// reached longitude `angle`.
pub fn estimate_prior_solar_longitude(angle: f64, moment: Moment) -> Moment {
    let rate = MEAN_TROPICAL_YEAR / 360.0;
    let tau = moment - rate * (solar_longitude_at(moment) - angle).rem_euclid(360.0);
    let delta = (solar_longitude_at(tau) - angle + 180.0).rem_euclid(360.0) - 180.0;
    let estimate = tau - rate * delta;
    if estimate < moment { estimate } else { moment }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::fixed_from_gregorian;
    use approx::assert_abs_diff_eq;

    #[test]
    fn longitude_near_equinox_and_solstice() {
        // 2000-03-20 07:35 UT, March equinox.
        let equinox = fixed_from_gregorian(2000, 3, 20).as_moment() + 7.58 / 24.0;
        let lon = solar_longitude_at(equinox);
        let wrapped = if lon > 180.0 { lon - 360.0 } else { lon };
        assert_abs_diff_eq!(wrapped, 0.0, epsilon = 0.01);

        // 2020-12-21 10:02 UT, December solstice.
        let solstice = fixed_from_gregorian(2020, 12, 21).as_moment() + 10.03 / 24.0;
        assert_abs_diff_eq!(solar_longitude_at(solstice), WINTER, epsilon = 0.01);
    }

    #[test]
    fn prior_estimate_is_not_after_moment() {
        let m = fixed_from_gregorian(2021, 2, 1).as_moment();
        let est = estimate_prior_solar_longitude(WINTER, m);
        assert!(est <= m);
        // Within a few days of the 2020 solstice.
        let solstice = fixed_from_gregorian(2020, 12, 21).as_moment();
        assert!((est - solstice).abs() < 3.0);
    }
}
