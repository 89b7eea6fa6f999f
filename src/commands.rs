//! Subcommand runners. Each loads the configuration, builds a calendar and
//! prints its result as JSON on stdout.

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use tracing::{info, info_span};

use almanac_calendar::{Calendar, FieldSet, Instant};

use crate::cli::{AddArgs, CalendarArgs, DecodeArgs, DiffArgs, EncodeArgs, NextArgs};
use crate::config::{self, AlmanacConfig};
use crate::convert;

fn setup(args: &CalendarArgs) -> Result<(AlmanacConfig, Calendar)> {
    let config = config::load(&args.config)?;
    let calendar = convert::build_calendar(&config.calendar, args)?;
    info!(
        calendar = %calendar.identifier(),
        time_zone = %calendar.time_zone(),
        locale = %calendar.locale(),
        "calendar ready"
    );
    Ok((config, calendar))
}

fn emit(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{text}");
    Ok(())
}

/// Decodes an instant.
pub fn decode(args: DecodeArgs) -> Result<()> {
    let _cmd = info_span!("decode").entered();
    let (_, calendar) = setup(&args.calendar)?;
    let instant = match args.at {
        Some(seconds) => convert::instant_from_unix(seconds)?,
        None => Instant::now(),
    };
    let fields = match args.fields.as_deref() {
        Some(list) => convert::parse_fields(list)?,
        None => FieldSet::all(),
    };
    let components = calendar.date_components(fields, instant);
    emit(&serde_json::to_value(&components)?)
}

/// Encodes components.
pub fn encode(args: EncodeArgs) -> Result<()> {
    let _cmd = info_span!("encode").entered();
    let (_, calendar) = setup(&args.calendar)?;
    let components = convert::parse_components(&args.components)?;
    let instant = calendar
        .try_date(&components)
        .context("components do not name an instant")?;
    emit(&convert::instant_json(instant))
}

/// Adds a delta.
pub fn add(args: AddArgs) -> Result<()> {
    let _cmd = info_span!("add").entered();
    let (_, calendar) = setup(&args.calendar)?;
    let start = convert::instant_from_unix(args.at)?;
    let delta = convert::parse_components(&args.delta)?;
    let instant = calendar
        .try_date_by_adding(&delta, start, args.wrapping)
        .context("delta leaves the calendar's range")?;
    emit(&json!({
        "instant": convert::instant_json(instant),
        "components": calendar.date_components(FieldSet::all(), instant),
    }))
}

/// Measures a difference.
pub fn diff(args: DiffArgs) -> Result<()> {
    let _cmd = info_span!("diff").entered();
    let (_, calendar) = setup(&args.calendar)?;
    let from = convert::instant_from_unix(args.from)?;
    let to = convert::instant_from_unix(args.to)?;
    let fields = convert::parse_fields(&args.fields)?;
    let components = calendar.try_date_components_between(fields, from, to)?;
    emit(&serde_json::to_value(&components)?)
}

/// Searches for the next match.
pub fn next(args: NextArgs) -> Result<()> {
    let _cmd = info_span!("next").entered();
    let (config, calendar) = setup(&args.calendar)?;
    let after = convert::instant_from_unix(args.after)?;
    let pattern = convert::parse_components(&args.pattern)?;
    let (policy, direction) = convert::build_search(
        &config.search,
        args.policy.as_deref(),
        args.direction.as_deref(),
    )?;
    info!(%policy, %direction, "searching");
    match calendar.try_next_date(after, &pattern, policy, direction)? {
        Some(instant) => emit(&json!({
            "instant": convert::instant_json(instant),
            "components": calendar.date_components(FieldSet::all(), instant),
        })),
        None => bail!("no instant matches the pattern"),
    }
}

/// Lists era names.
pub fn eras(args: CalendarArgs) -> Result<()> {
    let _cmd = info_span!("eras").entered();
    let (_, calendar) = setup(&args)?;
    emit(&json!({
        "calendar": calendar.identifier().as_str(),
        "eras": calendar.era_symbols(),
        "am": calendar.am_symbol(),
        "pm": calendar.pm_symbol(),
        "firstWeekday": calendar.first_weekday(),
        "minimumDaysInFirstWeek": calendar.minimum_days_in_first_week(),
    }))
}
