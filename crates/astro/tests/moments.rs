use almanac_astro::{
    FixedDay, MEAN_SYNODIC_MONTH, WINTER, estimate_prior_solar_longitude, fixed_from_gregorian,
    gregorian_from_fixed, new_moon_at_or_after, new_moon_before, solar_longitude_at,
};
use approx::assert_abs_diff_eq;

#[test]
fn gregorian_roundtrip_over_four_centuries() {
    let start = fixed_from_gregorian(1800, 1, 1).get();
    let end = fixed_from_gregorian(2200, 1, 1).get();
    for d in (start..end).step_by(17) {
        let (y, m, day) = gregorian_from_fixed(FixedDay::new(d));
        assert_eq!(
            fixed_from_gregorian(y, m, day).get(),
            d,
            "roundtrip failed for {y}-{m}-{day}"
        );
    }
}

#[test]
fn lunations_in_a_year_average_to_the_mean() {
    let mut moment = fixed_from_gregorian(2019, 1, 1).as_moment();
    let first = new_moon_at_or_after(moment);
    moment = first + 1.0;
    let mut last = first;
    for _ in 0..12 {
        last = new_moon_at_or_after(moment);
        moment = last + 1.0;
    }
    assert_abs_diff_eq!((last - first) / 12.0, MEAN_SYNODIC_MONTH, epsilon = 0.1);
}

#[test]
fn new_moon_before_is_strictly_before() {
    let moon = new_moon_at_or_after(fixed_from_gregorian(2023, 3, 1).as_moment());
    let previous = new_moon_before(moon);
    assert!(previous < moon);
    assert!(moon - previous > 29.0);
}

#[test]
fn winter_solstice_estimate_lands_in_december() {
    let jan = fixed_from_gregorian(2024, 1, 10).as_moment();
    let est = estimate_prior_solar_longitude(WINTER, jan);
    let (y, m, d) = gregorian_from_fixed(est.as_fixed());
    assert_eq!((y, m), (2023, 12));
    assert!((20..=23).contains(&d), "unexpected solstice day {d}");
    assert_abs_diff_eq!(solar_longitude_at(est), WINTER, epsilon = 0.05);
}
