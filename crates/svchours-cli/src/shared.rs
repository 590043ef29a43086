use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::Context;
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use svchours_core::{ServiceHours, TimestampFormat, parse_timestamp};

use crate::cli::ServiceHoursArgs;
use crate::error::{CliError, CliResult};

pub fn parse_tz_or_input_error(name: &str) -> CliResult<Tz> {
    svchours_core::tz::parse_tz(name)
        .map_err(|e| CliError::input(format!("Invalid timezone '{}': {}", name, e)))
}

pub fn parse_opens_at(s: &str) -> CliResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| {
            CliError::input(format!(
                "Invalid opens_at '{}'. Expected: HH:MM or HH:MM:SS",
                s
            ))
        })
}

pub fn parse_service_hours(args: &ServiceHoursArgs) -> CliResult<ServiceHours> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let opens_at = parse_opens_at(&args.opens_at)?;
    Ok(ServiceHours::new(tz, opens_at))
}

pub fn parse_input_format(s: &str) -> CliResult<TimestampFormat> {
    s.parse::<TimestampFormat>()
        .map_err(|e| CliError::input(format!("Invalid input_format '{}': {}", s, e)))
}

pub fn parse_instant(
    s: &str,
    format: TimestampFormat,
    tz: Tz,
    what: &str,
) -> CliResult<DateTime<Utc>> {
    parse_timestamp(s, format, tz)
        .map_err(|e| CliError::input(format!("Invalid {} timestamp: {}", what, e)))
}

/// The evaluation time, falling back to the wall clock.
pub fn parse_now(s: Option<&str>, format: TimestampFormat, tz: Tz) -> CliResult<DateTime<Utc>> {
    match s {
        Some(s) => parse_instant(s, format, tz, "now"),
        None => Ok(Utc::now()),
    }
}

/// Open an input path for reading, with `-` meaning stdin.
///
/// Failing to open the input is a runtime error for every command.
pub fn open_input(path: &str) -> CliResult<Box<dyn BufRead>> {
    open_reader(path).map_err(|e| CliError::runtime(format!("{:#}", e)))
}

fn open_reader(path: &str) -> anyhow::Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("Failed to open file '{}'", path))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Render a duration as `XhYYmZZs`, with milliseconds when present.
pub fn format_duration(duration: TimeDelta) -> String {
    let total_ms = duration.num_milliseconds();
    let (hours, rest) = (total_ms / 3_600_000, total_ms % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (seconds, millis) = (rest / 1_000, rest % 1_000);

    if millis == 0 {
        format!("{}h{:02}m{:02}s", hours, minutes, seconds)
    } else {
        format!("{}h{:02}m{:02}.{:03}s", hours, minutes, seconds, millis)
    }
}
