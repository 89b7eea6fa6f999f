use almanac_calendar::{Calendar, CalendarIdentifier, DateComponents, Field, FieldSet, Instant};
use almanac_host::{Locale, TimeZone};

fn calendar(identifier: CalendarIdentifier) -> Calendar {
    Calendar::new(identifier)
        .with_time_zone(TimeZone::utc())
        .with_locale(Locale::new("en_US").unwrap())
}

fn date_fields() -> FieldSet {
    [
        Field::Era,
        Field::Year,
        Field::Month,
        Field::IsLeapMonth,
        Field::Day,
    ]
    .into()
}

fn decode(identifier: CalendarIdentifier, unix: i64) -> DateComponents {
    calendar(identifier).date_components(date_fields(), Instant::from_unix_seconds(unix))
}

fn assert_date(c: &DateComponents, era: i64, year: i64, month: i64, leap: bool, day: i64) {
    assert_eq!(
        (c.era, c.year, c.month, c.is_leap_month, c.day),
        (Some(era), Some(year), Some(month), Some(leap), Some(day)),
        "decoded {c:?}"
    );
}

#[test]
fn gregorian_date() {
    assert_date(&decode(CalendarIdentifier::Gregorian, 1_449_332_351), 1, 2015, 12, false, 5);
}

#[test]
fn hebrew_adar_ii() {
    // 2019-03-14 falls in Adar II 5779, which reads as plain month 7.
    let c = decode(CalendarIdentifier::Hebrew, 1_552_580_351);
    assert_date(&c, 0, 5779, 7, false, 7);
}

#[test]
fn chinese_leap_fourth_month() {
    let c = decode(CalendarIdentifier::Chinese, 1_591_460_351);
    assert_date(&c, 78, 37, 4, true, 15);
}

#[test]
fn persian_date() {
    assert_date(&decode(CalendarIdentifier::Persian, 1_539_146_705), 0, 1397, 7, false, 18);
}

#[test]
fn japanese_era_boundary() {
    let heisei = decode(CalendarIdentifier::Japanese, 1_556_633_400);
    assert_date(&heisei, 3, 31, 4, false, 30);
    let reiwa = decode(CalendarIdentifier::Japanese, 1_556_719_800);
    assert_date(&reiwa, 4, 1, 5, false, 1);

    let symbols = calendar(CalendarIdentifier::Japanese).era_symbols();
    assert_eq!(symbols[3], "Heisei");
    assert_eq!(symbols[4], "Reiwa");
}

#[test]
fn japanese_day_after_era_end_is_invalid() {
    let japanese = calendar(CalendarIdentifier::Japanese);
    let heisei_may = DateComponents::ymd(31, 5, 1).with(Field::Era, 3);
    assert_eq!(japanese.date(&heisei_may), None);
    assert!(japanese.try_date(&heisei_may).is_err());
    let heisei_april = DateComponents::ymd(31, 4, 30).with(Field::Era, 3);
    assert_eq!(
        japanese.date(&heisei_april),
        Some(Instant::from_unix_seconds(1_556_582_400))
    );
}

#[test]
fn coptic_and_ethiopic_new_year_2019() {
    // 2019-09-12T00:00:00Z
    let t = 1_568_246_400;
    assert_date(&decode(CalendarIdentifier::Coptic, t), 1, 1736, 1, false, 1);
    assert_date(&decode(CalendarIdentifier::EthiopicAmeteMihret, t), 1, 2012, 1, false, 1);
    assert_date(&decode(CalendarIdentifier::EthiopicAmeteAlem, t), 0, 7512, 1, false, 1);
}

#[test]
fn indian_date() {
    // 2020-01-26T00:00:00Z
    assert_date(&decode(CalendarIdentifier::Indian, 1_579_996_800), 0, 1941, 11, false, 6);
}

#[test]
fn islamic_variants_on_2018_09_11() {
    // 2018-09-11T00:00:00Z
    let t = 1_536_624_000;
    assert_date(&decode(CalendarIdentifier::IslamicTabular, t), 0, 1440, 1, false, 1);
    assert_date(&decode(CalendarIdentifier::IslamicUmmAlQura, t), 0, 1440, 1, false, 1);
    assert_date(&decode(CalendarIdentifier::Islamic, t), 0, 1440, 1, false, 2);
    assert_date(&decode(CalendarIdentifier::IslamicCivil, t), 0, 1439, 12, false, 30);
}

#[test]
fn buddhist_and_republic_of_china_years() {
    // 2020-06-01T00:00:00Z
    let t = 1_590_969_600;
    assert_eq!(decode(CalendarIdentifier::Buddhist, t).year, Some(2563));
    let roc = decode(CalendarIdentifier::RepublicOfChina, t);
    assert_eq!((roc.era, roc.year), (Some(1), Some(109)));
    let before = decode(CalendarIdentifier::RepublicOfChina, -1_893_456_000);
    assert_eq!((before.era, before.year), (Some(0), Some(2)));
}

#[test]
fn iso8601_matches_gregorian_dates() {
    let t = 1_449_332_351;
    let iso = decode(CalendarIdentifier::Iso8601, t);
    let gregorian = decode(CalendarIdentifier::Gregorian, t);
    assert_eq!(iso, gregorian);
}

#[test]
fn chinese_has_no_era_symbols() {
    assert!(calendar(CalendarIdentifier::Chinese).era_symbols().is_empty());
}

#[test]
fn leap_month_flag_is_false_for_solar_calendars() {
    for identifier in [
        CalendarIdentifier::Gregorian,
        CalendarIdentifier::Persian,
        CalendarIdentifier::Coptic,
        CalendarIdentifier::Indian,
    ] {
        let c = calendar(identifier);
        assert_eq!(c.component(Field::IsLeapMonth, Instant::REFERENCE), 0, "{identifier}");
    }
}

#[test]
fn chinese_leap_month_encodes() {
    let chinese = calendar(CalendarIdentifier::Chinese);
    let leap = DateComponents::ymd(37, 4, 15)
        .with(Field::Era, 78)
        .with(Field::IsLeapMonth, 1);
    assert_eq!(
        chinese.date(&leap),
        Some(Instant::from_unix_seconds(1_591_401_600))
    );
    let plain = DateComponents::ymd(37, 4, 15).with(Field::Era, 78);
    assert_eq!(
        chinese.date(&plain),
        Some(Instant::from_unix_seconds(1_588_809_600))
    );
}
