use std::collections::HashSet;
use std::sync::Arc;

use almanac_astro::fixed_from_gregorian;
use almanac_calendar::system::{Gregorian, japanese_eras};
use almanac_calendar::{
    Calendar, CalendarError, CalendarIdentifier, DateComponents, Era, EraCounting, Field,
    FieldSet, Instant, MatchingPolicy, SearchDirection,
};
use almanac_host::{Locale, TimeZone};

fn en_us(zone: &str) -> Calendar {
    Calendar::new(CalendarIdentifier::Gregorian)
        .with_time_zone(TimeZone::from_identifier(zone).unwrap())
        .with_locale(Locale::new("en_US").unwrap())
}

fn ymd_hms(calendar: &Calendar, y: i64, mo: i64, d: i64, h: i64, mi: i64, s: i64) -> Instant {
    let c = DateComponents::ymd(y, mo, d)
        .with(Field::Hour, h)
        .with(Field::Minute, mi)
        .with(Field::Second, s);
    calendar.date(&c).unwrap()
}

#[test]
fn component_construction() {
    let calendar = en_us("UTC");
    let t = calendar.date(&DateComponents::ymd(2016, 10, 4)).unwrap();
    let c = calendar.date_components([Field::Year, Field::Month, Field::Day].into(), t);
    assert_eq!(c, DateComponents::ymd(2016, 10, 4));
    assert_eq!(calendar.component(Field::Weekday, t), 3);
}

#[test]
fn weekend_predicate() {
    let calendar = en_us("UTC");
    let monday = calendar.date(&DateComponents::ymd(2018, 12, 10)).unwrap();
    let saturday = calendar.date(&DateComponents::ymd(2017, 1, 7)).unwrap();
    assert!(!calendar.is_date_in_weekend(monday));
    assert!(calendar.is_date_in_weekend(saturday));

    let iran = calendar.clone().with_locale(Locale::new("fa_IR").unwrap());
    let friday = calendar.date(&DateComponents::ymd(2017, 1, 6)).unwrap();
    assert!(iran.is_date_in_weekend(friday));
    assert!(!iran.is_date_in_weekend(saturday));
}

#[test]
fn wrapping_and_carrying_addition() {
    let calendar = en_us("UTC");
    let start = calendar.date(&DateComponents::ymd(1970, 1, 1)).unwrap();
    let delta = DateComponents::new().with(Field::Day, 60);
    let fields: FieldSet = [Field::Year, Field::Month, Field::Day].into();

    let wrapped = calendar.date_by_adding(&delta, start, true).unwrap();
    assert_eq!(calendar.date_components(fields, wrapped), DateComponents::ymd(1970, 1, 30));
    let carried = calendar.date_by_adding(&delta, start, false).unwrap();
    assert_eq!(calendar.date_components(fields, carried), DateComponents::ymd(1970, 3, 2));
}

#[test]
fn difference_in_seconds() {
    let calendar = en_us("America/New_York");
    let from = Instant::from_reference_seconds(-123_456_789.5);
    let to = from.add_seconds(200);
    let d = calendar.date_components_between([Field::Second].into(), from, to);
    assert_eq!(d, DateComponents::new().with(Field::Second, 200));
}

#[test]
fn difference_in_days_across_dst() {
    let calendar = en_us("America/New_York");
    let from = ymd_hms(&calendar, 2021, 3, 13, 12, 0, 0);
    let to = ymd_hms(&calendar, 2021, 3, 15, 12, 0, 0);
    let d = calendar.date_components_between([Field::Day, Field::Hour].into(), from, to);
    assert_eq!(d.day, Some(2));
    assert_eq!(d.hour, Some(0));
}

#[test]
fn next_date_preserving_smaller_components() {
    let calendar = en_us("US/Pacific");
    let start = ymd_hms(&calendar, 2020, 1, 1, 0, 0, 0);
    let pattern = DateComponents::new()
        .with(Field::Day, 2)
        .with(Field::Hour, 0)
        .with(Field::Minute, 0)
        .with(Field::Second, 0);
    let found = calendar.next_date(
        start,
        &pattern,
        MatchingPolicy::NextTimePreservingSmallerComponents,
        SearchDirection::Forward,
    );
    assert_eq!(found, Some(ymd_hms(&calendar, 2020, 1, 2, 0, 0, 0)));
}

#[test]
fn next_date_impossible_year() {
    let calendar = en_us("US/Pacific");
    let start = ymd_hms(&calendar, 2020, 1, 1, 0, 0, 0);
    let pattern = DateComponents::ymd(2019, 2, 1)
        .with(Field::Hour, 0)
        .with(Field::Minute, 0)
        .with(Field::Second, 0);
    let found = calendar.next_date(
        start,
        &pattern,
        MatchingPolicy::NextTimePreservingSmallerComponents,
        SearchDirection::Forward,
    );
    assert_eq!(found, None);
}

#[test]
fn next_date_rejects_invalid_time() {
    let calendar = en_us("UTC");
    let pattern = DateComponents::new().with(Field::Hour, 25);
    assert_eq!(
        calendar.next_date(Instant::REFERENCE, &pattern, MatchingPolicy::Strict, SearchDirection::Forward),
        None
    );
    assert_eq!(
        calendar.try_next_date(Instant::REFERENCE, &pattern, MatchingPolicy::Strict, SearchDirection::Forward),
        Err(CalendarError::InvalidComponent {
            field: Field::Hour,
            value: 25
        })
    );
}

#[test]
fn equality_and_hashing_cover_all_settings() {
    let base = en_us("UTC");
    let variants = [
        base.clone(),
        base.clone().with_time_zone(TimeZone::from_identifier("Asia/Tokyo").unwrap()),
        base.clone().with_locale(Locale::new("de_DE").unwrap()),
        base.clone().with_first_weekday(3).unwrap(),
        base.clone().with_minimum_days_in_first_week(5).unwrap(),
        en_us("UTC").with_time_zone(TimeZone::utc()),
    ];
    let distinct: HashSet<Calendar> = variants.iter().cloned().collect();
    assert_eq!(distinct.len(), 5);
    assert_eq!(variants[0], variants[5]);

    let hebrew = Calendar::new(CalendarIdentifier::Hebrew)
        .with_time_zone(TimeZone::utc())
        .with_locale(Locale::new("en_US").unwrap());
    assert_ne!(base, hebrew);
}

#[test]
fn autoupdating_calendars() {
    let a = Calendar::autoupdating_current();
    let b = Calendar::autoupdating_current();
    assert_eq!(a, b);
    assert!(a.is_autoupdating());
    assert_ne!(a, Calendar::current());

    let mut c = Calendar::autoupdating_current();
    c.set_time_zone(TimeZone::fixed(3600));
    assert!(!c.is_autoupdating());
    assert_eq!(c.time_zone().identifier(), "GMT+0100");
    assert!(a.is_autoupdating());
}

#[test]
fn gmt_zone_identifier() {
    let calendar = en_us("UTC").with_time_zone(TimeZone::fixed(0));
    assert_eq!(calendar.time_zone().identifier(), "GMT");
    let t = Instant::from_unix_seconds(0);
    assert_eq!(calendar.component(Field::Hour, t), 0);
}

#[test]
fn decoding_in_another_zone_leaves_calendar_alone() {
    let calendar = en_us("UTC");
    let new_york = TimeZone::from_identifier("America/New_York").unwrap();
    // 2019-01-01T03:00:00Z is still December 31 in New York.
    let t = Instant::from_unix_seconds(1_546_311_600);
    let c = calendar.date_components_in(&new_york, t);
    assert_eq!((c.year, c.month, c.day, c.hour), (Some(2018), Some(12), Some(31), Some(22)));
    assert_eq!(c.time_zone.as_ref(), Some(&new_york));
    assert_eq!(calendar.time_zone(), TimeZone::utc());
    assert_eq!(calendar.component(Field::Day, t), 1);
}

#[test]
fn components_zone_overrides_calendar_zone() {
    let calendar = en_us("UTC");
    let tokyo = TimeZone::from_identifier("Asia/Tokyo").unwrap();
    let c = DateComponents::ymd(2019, 1, 1).with_time_zone(tokyo);
    assert_eq!(calendar.date(&c), Some(Instant::from_unix_seconds(1_546_268_400)));
}

#[test]
fn era_and_day_period_symbols() {
    let japanese = Calendar::new(CalendarIdentifier::Japanese).with_locale(Locale::new("ja_JP").unwrap());
    assert_eq!(japanese.era_symbols().last().map(String::as_str), Some("令和"));
    assert_eq!(japanese.am_symbol(), "午前");
    assert_eq!(japanese.pm_symbol(), "午後");

    let gregorian = en_us("UTC");
    assert_eq!(gregorian.era_symbols(), vec!["BC", "AD"]);
    assert_eq!(gregorian.am_symbol(), "AM");
}

#[test]
fn appended_japanese_era() {
    let start = fixed_from_gregorian(2040, 1, 1);
    let eras = japanese_eras()
        .with(Era::new("Future", Some(start), 2040, EraCounting::Forward))
        .unwrap();
    let calendar = Calendar::with_system(Arc::new(Gregorian::japanese_with_eras(eras)))
        .with_time_zone(TimeZone::utc());
    let fields: FieldSet = [Field::Era, Field::Year].into();

    let before = Instant::from_unix_seconds(1_893_456_000); // 2030-01-01
    let c = calendar.date_components(fields, before);
    assert_eq!((c.era, c.year), (Some(4), Some(12)));

    let after = Instant::from_unix_seconds(2_222_121_600); // 2040-06-01
    let c = calendar.date_components(fields, after);
    assert_eq!((c.era, c.year), (Some(5), Some(1)));
    assert_eq!(calendar.era_symbols().last().map(String::as_str), Some("Future"));

    assert_ne!(calendar, Calendar::new(CalendarIdentifier::Japanese).with_time_zone(TimeZone::utc()));
}

#[test]
fn out_of_order_era_is_rejected() {
    let result = japanese_eras().with(Era::new(
        "Early",
        Some(fixed_from_gregorian(2000, 1, 1)),
        2000,
        EraCounting::Forward,
    ));
    assert!(matches!(result, Err(CalendarError::EraOrder { .. })));
}

#[test]
fn start_of_day_and_ranges() {
    let calendar = en_us("America/New_York");
    let t = ymd_hms(&calendar, 2020, 2, 10, 15, 30, 0);
    assert_eq!(calendar.start_of_day(t), ymd_hms(&calendar, 2020, 2, 10, 0, 0, 0));
    assert_eq!(calendar.range_of(Field::Day, Field::Month, t), Some(1..30));
    assert_eq!(calendar.range_of(Field::Day, Field::Year, t), Some(1..367));
    assert_eq!(calendar.range_of(Field::Weekday, Field::WeekOfYear, t), Some(1..8));
}
