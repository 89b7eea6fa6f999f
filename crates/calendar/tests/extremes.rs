use almanac_astro::fixed_from_gregorian;
use almanac_calendar::{
    Calendar, CalendarError, CalendarIdentifier, DateComponents, FIRST_SUPPORTED_DAY, Field,
    FieldSet, Instant, LAST_SUPPORTED_DAY,
};
use almanac_host::{Locale, TimeZone};

fn calendar(identifier: CalendarIdentifier) -> Calendar {
    Calendar::new(identifier)
        .with_time_zone(TimeZone::utc())
        .with_locale(Locale::new("en_US").unwrap())
}

fn far_instants() -> [Instant; 6] {
    [
        Instant::new(i64::MAX / 2, 0),
        Instant::new(i64::MIN / 2, 0),
        Instant::new(i64::MAX, 999_999_999),
        Instant::new(i64::MIN, 0),
        Instant::from_reference_seconds(1e15),
        Instant::from_reference_seconds(-1e15),
    ]
}

#[test]
fn far_instants_decode_at_the_supported_bounds() {
    let gregorian = calendar(CalendarIdentifier::Gregorian);
    let fields: FieldSet = [Field::Era, Field::Year, Field::Month, Field::Day].into();
    let last = gregorian.date_components(fields, Instant::new(i64::MAX / 2, 0));
    assert_eq!(last, DateComponents::ymd(100_000, 12, 31).with(Field::Era, 1));
    let first = gregorian.date_components(fields, Instant::new(i64::MIN / 2, 0));
    // Year -100000 is 100001 BC.
    assert_eq!(first, DateComponents::ymd(100_001, 1, 1).with(Field::Era, 0));
    assert_eq!(LAST_SUPPORTED_DAY, fixed_from_gregorian(100_000, 12, 31));
    assert_eq!(FIRST_SUPPORTED_DAY, fixed_from_gregorian(-100_000, 1, 1));
}

#[test]
fn every_calendar_decodes_far_instants() {
    for identifier in CalendarIdentifier::ALL {
        let calendar = calendar(identifier);
        for instant in far_instants() {
            let components = calendar.date_components(FieldSet::all(), instant);
            assert!(components.year.is_some(), "{identifier} at {instant:?}");
            let encoded = calendar.try_date(&components);
            assert!(encoded.is_ok(), "{identifier} at {instant:?}: {encoded:?}");
            let again = calendar.date_components(FieldSet::all(), encoded.unwrap());
            assert_eq!(again, components, "{identifier} at {instant:?}");
        }
    }
}

#[test]
fn years_past_the_bounds_do_not_encode() {
    let gregorian = calendar(CalendarIdentifier::Gregorian);
    assert!(gregorian.try_date(&DateComponents::ymd(100_000, 12, 31)).is_ok());
    assert!(matches!(
        gregorian.try_date(&DateComponents::ymd(100_001, 1, 1)),
        Err(CalendarError::InvalidComponent { field: Field::Year, .. })
    ));
    let chinese = calendar(CalendarIdentifier::Chinese);
    let far = DateComponents::ymd(1, 1, 1).with(Field::Era, 1_000_000);
    assert!(chinese.try_date(&far).is_err());
    assert!(gregorian.try_date(&DateComponents::ymd(i64::MAX, 1, 1)).is_err());
}

#[test]
fn arithmetic_stops_at_the_bounds() {
    let gregorian = calendar(CalendarIdentifier::Gregorian);
    let start = gregorian.try_date(&DateComponents::ymd(2000, 1, 1)).unwrap();
    for (field, value) in [
        (Field::Year, 200_000),
        (Field::Month, i64::MAX),
        (Field::Day, i64::MIN),
        (Field::WeekOfYear, i64::MAX / 2),
        (Field::Hour, i64::MAX),
    ] {
        let delta = DateComponents::new().with(field, value);
        assert!(
            gregorian.try_date_by_adding(&delta, start, false).is_err(),
            "{field} by {value}"
        );
    }
    let islamic = calendar(CalendarIdentifier::Islamic);
    let delta = DateComponents::new().with(Field::Month, 10_000_000);
    assert!(islamic.try_date_by_adding(&delta, start, false).is_err());
}
