use clap::{Parser, Subcommand};

/// Service-hours interval and duration tool
#[derive(Parser, Debug)]
#[command(name = "svchours")]
#[command(version, about = "Service-hours interval and duration tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the local midnights an interval crosses
    Boundaries(IntervalArgs),
    /// Split an interval into service-hours segments
    Split(IntervalArgs),
    /// Time an interval spends inside service hours
    Duration(DurationArgs),
    /// Split every interval in a file, one per line
    Batch(BatchArgs),
    /// Per-issue-type incident time for one day
    Daily(DailyArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServiceHoursArgs {
    /// IANA timezone for days and opening time
    #[arg(short, long, default_value = "Asia/Singapore")]
    pub tz: String,

    /// Local opening time of the service window (HH:MM)
    #[arg(long, default_value = "05:30")]
    pub opens_at: String,
}

#[derive(clap::Args, Debug)]
pub struct IntervalArgs {
    #[command(flatten)]
    pub hours: ServiceHoursArgs,

    /// Interval start (RFC3339, local time, or epoch)
    #[arg(long)]
    pub start: String,

    /// Interval end (RFC3339, local time, or epoch)
    #[arg(long)]
    pub end: String,

    /// Input timestamp format: auto, rfc3339, local, epoch_ms, epoch_s
    #[arg(short = 'f', long, default_value = "auto")]
    pub input_format: String,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct DurationArgs {
    #[command(flatten)]
    pub hours: ServiceHoursArgs,

    /// Interval start (RFC3339, local time, or epoch)
    #[arg(long)]
    pub start: String,

    /// Interval end; omit for an ongoing interval
    #[arg(long)]
    pub end: Option<String>,

    /// Evaluation time for ongoing intervals (defaults to the current time)
    #[arg(long)]
    pub now: Option<String>,

    /// Input timestamp format: auto, rfc3339, local, epoch_ms, epoch_s
    #[arg(short = 'f', long, default_value = "auto")]
    pub input_format: String,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub hours: ServiceHoursArgs,

    /// Input timestamp format: auto, rfc3339, local, epoch_ms, epoch_s
    #[arg(short = 'f', long, default_value = "auto")]
    pub input_format: String,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,
}

#[derive(clap::Args, Debug)]
pub struct DailyArgs {
    /// IANA timezone for the calendar day
    #[arg(short, long, default_value = "Asia/Singapore")]
    pub tz: String,

    /// Calendar day (YYYY-MM-DD)
    #[arg(long)]
    pub day: String,

    /// JSON file mapping issue type to "start/end" interval strings
    #[arg(long)]
    pub input: String,

    /// Evaluation time (defaults to the current time)
    #[arg(long)]
    pub now: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}
