//! Pure conversion functions: TOML config and CLI strings -> calendar API types.

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};

use almanac_calendar::{
    Calendar, CalendarIdentifier, DateComponents, FieldSet, Instant, MatchingPolicy,
    SearchDirection, UNIX_TO_REFERENCE_SECONDS,
};
use almanac_host::{Locale, TimeZone};

use crate::cli::CalendarArgs;
use crate::config::{CalendarToml, SearchToml};

/// Parses a calendar identifier name.
pub fn parse_identifier(s: &str) -> Result<CalendarIdentifier> {
    s.parse()
        .with_context(|| format!("unknown calendar: {s:?}"))
}

/// Parses a comma-separated field list into a [`FieldSet`].
pub fn parse_fields(s: &str) -> Result<FieldSet> {
    let mut fields = FieldSet::new();
    for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        fields.insert(name.parse()?);
    }
    if fields.is_empty() {
        bail!("field list is empty");
    }
    Ok(fields)
}

/// Parses components from a JSON object with camelCase field names.
pub fn parse_components(s: &str) -> Result<DateComponents> {
    let value: Value = serde_json::from_str(s).with_context(|| format!("invalid JSON: {s}"))?;
    if !value.is_object() {
        bail!("components must be a JSON object, got {s}");
    }
    serde_json::from_value(value).with_context(|| format!("invalid components: {s}"))
}

/// Parses a matching policy name.
pub fn parse_policy(s: &str) -> Result<MatchingPolicy> {
    match s.parse() {
        Ok(policy) => Ok(policy),
        Err(_) => bail!("unknown matching policy: {s:?}"),
    }
}

/// Parses a search direction name.
pub fn parse_direction(s: &str) -> Result<SearchDirection> {
    match s.parse() {
        Ok(direction) => Ok(direction),
        Err(_) => bail!("unknown search direction: {s:?}"),
    }
}

/// Converts Unix seconds, possibly fractional, into an [`Instant`].
pub fn instant_from_unix(seconds: f64) -> Result<Instant> {
    if !seconds.is_finite() {
        bail!("instant must be finite, got {seconds}");
    }
    Ok(Instant::from_reference_seconds(
        seconds - UNIX_TO_REFERENCE_SECONDS as f64,
    ))
}

/// JSON rendering of an instant.
pub fn instant_json(instant: Instant) -> Value {
    json!({
        "unix": instant.seconds_since_reference() + UNIX_TO_REFERENCE_SECONDS as f64,
        "sinceReference": instant.seconds_since_reference(),
    })
}

/// Builds a [`Calendar`] from the config table, with command-line flags
/// taking precedence.
pub fn build_calendar(table: &CalendarToml, args: &CalendarArgs) -> Result<Calendar> {
    let identifier = parse_identifier(args.calendar.as_deref().unwrap_or(&table.identifier))?;
    let mut calendar = Calendar::new(identifier);

    if let Some(zone) = args.time_zone.as_deref().or(table.time_zone.as_deref()) {
        calendar.set_time_zone(TimeZone::from_identifier(zone)?);
    }
    if let Some(locale) = args.locale.as_deref().or(table.locale.as_deref()) {
        calendar.set_locale(Locale::new(locale)?);
    }
    if let Some(weekday) = args.first_weekday.or(table.first_weekday) {
        calendar.set_first_weekday(weekday)?;
    }
    if let Some(days) = args.minimum_days.or(table.minimum_days_in_first_week) {
        calendar.set_minimum_days_in_first_week(days)?;
    }
    Ok(calendar)
}

/// Resolves the search policy and direction from flags and config.
pub fn build_search(
    table: &SearchToml,
    policy: Option<&str>,
    direction: Option<&str>,
) -> Result<(MatchingPolicy, SearchDirection)> {
    Ok((
        parse_policy(policy.unwrap_or(&table.policy))?,
        parse_direction(direction.unwrap_or(&table.direction))?,
    ))
}

#[cfg(test)]
mod tests {
    use almanac_calendar::Field;

    use super::*;

    #[test]
    fn fields_parse_case_insensitively() {
        let fields = parse_fields("Year, month,DAY").unwrap();
        assert_eq!(fields, [Field::Year, Field::Month, Field::Day].into());
        assert!(parse_fields(" , ").is_err());
        assert!(parse_fields("year,fortnight").is_err());
    }

    #[test]
    fn components_from_json() {
        let c = parse_components(r#"{"year":2016,"month":10,"day":4,"isLeapMonth":false}"#).unwrap();
        assert_eq!(c, DateComponents::ymd(2016, 10, 4).with(Field::IsLeapMonth, 0));
        assert!(parse_components("[1,2]").is_err());
    }

    #[test]
    fn components_reject_non_objects() {
        for text in ["[2016, 10, 4]", "2016", "\"2016-10-04\"", "null"] {
            let err = parse_components(text).unwrap_err();
            assert!(err.to_string().contains("JSON object"), "{text}: {err}");
        }
        assert!(parse_components(r#"{"fortnight":1}"#).is_err());
    }

    #[test]
    fn flags_override_config() {
        let table = CalendarToml {
            identifier: "hebrew".to_string(),
            time_zone: Some("Asia/Jerusalem".to_string()),
            locale: Some("he_IL".to_string()),
            first_weekday: None,
            minimum_days_in_first_week: Some(4),
        };
        let args = CalendarArgs {
            calendar: Some("persian".to_string()),
            time_zone: Some("GMT+0330".to_string()),
            ..CalendarArgs::default()
        };
        let calendar = build_calendar(&table, &args).unwrap();
        assert_eq!(calendar.identifier(), CalendarIdentifier::Persian);
        assert_eq!(calendar.time_zone().identifier(), "GMT+0330");
        assert_eq!(calendar.locale().identifier(), "he_IL");
        assert_eq!(calendar.minimum_days_in_first_week(), 4);
    }

    #[test]
    fn bad_settings_are_reported() {
        let table = CalendarToml::default();
        let bad_zone = CalendarArgs {
            time_zone: Some("Mars/Olympus".to_string()),
            ..CalendarArgs::default()
        };
        assert!(build_calendar(&table, &bad_zone).is_err());
        let bad_weekday = CalendarArgs {
            first_weekday: Some(8),
            ..CalendarArgs::default()
        };
        assert!(build_calendar(&table, &bad_weekday).is_err());
        assert!(parse_identifier("julian").is_err());
    }

    #[test]
    fn search_settings() {
        let table = SearchToml::default();
        assert_eq!(
            build_search(&table, None, Some("backward")).unwrap(),
            (MatchingPolicy::NextTime, SearchDirection::Backward)
        );
        assert!(build_search(&table, Some("closest"), None).is_err());
    }

    #[test]
    fn unix_instants() {
        let instant = instant_from_unix(978_307_200.0).unwrap();
        assert_eq!(instant, Instant::REFERENCE);
        assert_eq!(instant_json(instant)["unix"], json!(978_307_200.0));
        assert!(instant_from_unix(f64::NAN).is_err());
    }
}
