use almanac_calendar::defaults::{self, Defaults};
use almanac_calendar::{Calendar, Field, Instant};
use almanac_host::{Locale, TimeZone};

// Defaults are process-wide, so everything touching them lives in one test.
#[test]
fn installed_defaults_reach_autoupdating_calendars_only() {
    let tokyo = Defaults {
        time_zone: TimeZone::from_identifier("Asia/Tokyo").unwrap(),
        locale: Locale::new("ja_JP").unwrap(),
    };
    defaults::install(tokyo.clone());
    assert_eq!(defaults::current(), tokyo);

    let snapshot = Calendar::current();
    let live = Calendar::autoupdating_current();
    assert_eq!(snapshot.time_zone(), tokyo.time_zone);
    assert_eq!(live.locale(), tokyo.locale);

    let berlin = Defaults {
        time_zone: TimeZone::from_identifier("Europe/Berlin").unwrap(),
        locale: Locale::new("de_DE").unwrap(),
    };
    let previous = defaults::install(berlin.clone());
    assert_eq!(previous, tokyo);

    assert_eq!(snapshot.time_zone(), tokyo.time_zone);
    assert_eq!(live.time_zone(), berlin.time_zone);
    assert_eq!(live.first_weekday(), 2);
    assert_eq!(snapshot.first_weekday(), 1);

    // 1970-01-01T00:00:00Z is 09:00 in Tokyo and 01:00 in Berlin.
    let epoch = Instant::from_unix_seconds(0);
    assert_eq!(snapshot.component(Field::Hour, epoch), 9);
    assert_eq!(live.component(Field::Hour, epoch), 1);

    let restored = defaults::reset();
    assert_eq!(restored, berlin);
}
