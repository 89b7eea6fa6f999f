use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Almanac calendar conversion and search.
#[derive(Parser)]
#[command(
    name = "almanac",
    version,
    about = "Calendar conversion, arithmetic and date search across calendar systems"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Decode an instant into calendar components.
    Decode(DecodeArgs),
    /// Encode calendar components into an instant.
    Encode(EncodeArgs),
    /// Add a component delta to an instant.
    Add(AddArgs),
    /// Measure the components between two instants.
    Diff(DiffArgs),
    /// Find the next instant matching a component pattern.
    Next(NextArgs),
    /// List the era names of a calendar.
    Eras(CalendarArgs),
}

/// Calendar selection shared by every subcommand. Flags override the
/// `[calendar]` table of the configuration file.
#[derive(clap::Args, Clone, Default)]
pub struct CalendarArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "almanac.toml")]
    pub config: PathBuf,

    /// Calendar identifier (e.g. gregorian, hebrew, islamicUmmAlQura).
    #[arg(long)]
    pub calendar: Option<String>,

    /// Time zone identifier (IANA name or GMT offset).
    #[arg(short = 'z', long)]
    pub time_zone: Option<String>,

    /// Locale identifier (e.g. en_US, ja_JP).
    #[arg(short, long)]
    pub locale: Option<String>,

    /// First day of the week, 1 = Sunday.
    #[arg(long)]
    pub first_weekday: Option<u8>,

    /// Minimum days in the first week of a year or month.
    #[arg(long)]
    pub minimum_days: Option<u8>,
}

/// Arguments for the `decode` subcommand.
#[derive(clap::Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub calendar: CalendarArgs,

    /// Instant as Unix seconds; now when omitted.
    #[arg(long, allow_hyphen_values = true)]
    pub at: Option<f64>,

    /// Comma-separated fields to decode; all when omitted.
    #[arg(short, long)]
    pub fields: Option<String>,
}

/// Arguments for the `encode` subcommand.
#[derive(clap::Args)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub calendar: CalendarArgs,

    /// Components as JSON, e.g. '{"year":2016,"month":10,"day":4}'.
    pub components: String,
}

/// Arguments for the `add` subcommand.
#[derive(clap::Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub calendar: CalendarArgs,

    /// Starting instant as Unix seconds.
    #[arg(long, allow_hyphen_values = true)]
    pub at: f64,

    /// Delta as JSON, e.g. '{"month":-14}'.
    pub delta: String,

    /// Wrap each field within its own range instead of carrying.
    #[arg(short, long)]
    pub wrapping: bool,
}

/// Arguments for the `diff` subcommand.
#[derive(clap::Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub calendar: CalendarArgs,

    /// Earlier instant as Unix seconds.
    #[arg(long, allow_hyphen_values = true)]
    pub from: f64,

    /// Later instant as Unix seconds.
    #[arg(long, allow_hyphen_values = true)]
    pub to: f64,

    /// Comma-separated fields to measure in.
    #[arg(short, long, default_value = "year,month,day,hour,minute,second")]
    pub fields: String,
}

/// Arguments for the `next` subcommand.
#[derive(clap::Args)]
pub struct NextArgs {
    #[command(flatten)]
    pub calendar: CalendarArgs,

    /// Instant to search from, as Unix seconds.
    #[arg(long, allow_hyphen_values = true)]
    pub after: f64,

    /// Pattern as JSON, e.g. '{"month":2,"day":29}'.
    pub pattern: String,

    /// Matching policy for missing or skipped times.
    #[arg(short, long)]
    pub policy: Option<String>,

    /// Search direction (forward or backward).
    #[arg(short, long)]
    pub direction: Option<String>,
}
