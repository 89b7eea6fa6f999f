//! Mean and true new moons.

use tracing::trace;

use crate::day::Moment;
use crate::ephemeris::{J2000, universal_from_dynamical};

/// Mean length of the synodic month, in days.
pub const MEAN_SYNODIC_MONTH: f64 = 29.530588861;

/// Moment of new moon number zero (January 11, 1 CE).
pub const NEW_MOON_ZERO: Moment = Moment::new(11.458922815770109);

// (sine coefficient, eccentricity exponent, solar anomaly, lunar anomaly, moon argument)
const CORRECTIONS: [(f64, i32, f64, f64, f64); 24] = [
    (-0.40720, 0, 0.0, 1.0, 0.0),
    (0.17241, 1, 1.0, 0.0, 0.0),
    (0.01608, 0, 0.0, 2.0, 0.0),
    (0.01039, 0, 0.0, 0.0, 2.0),
    (0.00739, 1, -1.0, 1.0, 0.0),
    (-0.00514, 1, 1.0, 1.0, 0.0),
    (0.00208, 2, 2.0, 0.0, 0.0),
    (-0.00111, 0, 0.0, 1.0, -2.0),
    (-0.00057, 0, 0.0, 1.0, 2.0),
    (0.00056, 1, 1.0, 2.0, 0.0),
    (-0.00042, 0, 0.0, 3.0, 0.0),
    (0.00042, 1, 1.0, 0.0, 2.0),
    (0.00038, 1, 1.0, 0.0, -2.0),
    (-0.00024, 1, -1.0, 2.0, 0.0),
    (-0.00007, 0, 2.0, 1.0, 0.0),
    (0.00004, 0, 0.0, 2.0, -2.0),
    (0.00004, 0, 3.0, 0.0, 0.0),
    (0.00003, 0, 1.0, 1.0, -2.0),
    (0.00003, 0, 0.0, 2.0, 2.0),
    (-0.00003, 0, 1.0, 1.0, 2.0),
    (0.00003, 0, -1.0, 1.0, 2.0),
    (-0.00002, 0, -1.0, 1.0, -2.0),
    (-0.00002, 0, 1.0, 3.0, 0.0),
    (0.00002, 0, 0.0, 4.0, 0.0),
];

// (addend, multiplier, coefficient)
const ADDITIONAL: [(f64, f64, f64); 13] = [
    (251.88, 0.016321, 0.000165),
    (251.83, 26.651886, 0.000164),
    (349.42, 36.412478, 0.000126),
    (84.66, 18.206239, 0.000110),
    (141.74, 53.303771, 0.000062),
    (207.14, 2.453732, 0.000060),
    (154.84, 7.306860, 0.000056),
    (34.52, 27.261239, 0.000047),
    (207.19, 0.121824, 0.000042),
    (291.34, 1.844379, 0.000040),
    (161.72, 24.198154, 0.000037),
    (239.56, 25.513099, 0.000035),
    (331.55, 3.592518, 0.000023),
];

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

/// Universal moment of the `n`-th new moon after [`NEW_MOON_ZERO`].
pub fn nth_new_moon(n: i64) -> Moment {
    let k = n as f64 - 24_724.0;
    let c = k / 1236.85;
    let approx = J2000
        + (5.09766 + MEAN_SYNODIC_MONTH * 1236.85 * c + 0.00015437 * c * c - 0.00000015 * c.powi(3)
            + 0.00000000073 * c.powi(4));
    let e = 1.0 - 0.002516 * c - 0.0000074 * c * c;
    let solar_anomaly =
        2.5534 + 1236.85 * 29.10535670 * c - 0.0000014 * c * c - 0.00000011 * c.powi(3);
    let lunar_anomaly = 201.5643 + 385.81693528 * 1236.85 * c + 0.0107582 * c * c
        + 0.00001238 * c.powi(3)
        - 0.000000058 * c.powi(4);
    let moon_argument = 160.7108 + 390.67050284 * 1236.85 * c - 0.0016118 * c * c
        - 0.00000227 * c.powi(3)
        + 0.000000011 * c.powi(4);
    let omega = 124.7746 + -1.56375588 * 1236.85 * c + 0.0020672 * c * c + 0.00000215 * c.powi(3);

    let mut correction = -0.00017 * sin_deg(omega);
    for (v, w, x, y, z) in CORRECTIONS {
        correction += v
            * e.powi(w)
            * sin_deg(x * solar_anomaly + y * lunar_anomaly + z * moon_argument);
    }
    let extra = 0.000325 * sin_deg(299.77 + 132.8475848 * c - 0.009173 * c * c);
    let additional: f64 = ADDITIONAL
        .iter()
        .map(|(i, j, l)| l * sin_deg(i + j * k))
        .sum();

    universal_from_dynamical(approx + correction + extra + additional)
}

/// Index of the first new moon at or after `moment`.
pub fn new_moon_index_at_or_after(moment: Moment) -> i64 {
    let mut n = ((moment - NEW_MOON_ZERO) / MEAN_SYNODIC_MONTH).floor() as i64;
    while nth_new_moon(n) < moment {
        n += 1;
    }
    while nth_new_moon(n - 1) >= moment {
        n -= 1;
    }
    trace!(n, "new moon index");
    n
}

/// First new moon at or after `moment`.
pub fn new_moon_at_or_after(moment: Moment) -> Moment {
    nth_new_moon(new_moon_index_at_or_after(moment))
}

/// Last new moon strictly before `moment`.
pub fn new_moon_before(moment: Moment) -> Moment {
    nth_new_moon(new_moon_index_at_or_after(moment) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::fixed_from_gregorian;
    use approx::assert_abs_diff_eq;

    #[test]
    fn new_moon_of_january_2000() {
        // 2000-01-06 18:14 UT.
        let expected = fixed_from_gregorian(2000, 1, 6).as_moment() + (18.0 + 14.0 / 60.0) / 24.0;
        let found = new_moon_at_or_after(fixed_from_gregorian(2000, 1, 1).as_moment());
        assert_abs_diff_eq!(found.inner(), expected.inner(), epsilon = 2.0 / 1440.0);
    }

    #[test]
    fn before_and_after_bracket_moment() {
        let m = fixed_from_gregorian(2020, 6, 6).as_moment();
        let before = new_moon_before(m);
        let after = new_moon_at_or_after(m);
        assert!(before < m);
        assert!(after >= m);
        assert_abs_diff_eq!(after - before, MEAN_SYNODIC_MONTH, epsilon = 0.6);
    }

    #[test]
    fn index_is_exact_at_new_moon() {
        let n = 24_724;
        let moon = nth_new_moon(n);
        assert_eq!(new_moon_index_at_or_after(moon), n);
        assert_eq!(new_moon_index_at_or_after(moon + 1e-6), n + 1);
    }
}
