use std::process::ExitCode;

use serde::Serialize;
use svchours_core::tz::format_local;
use svchours_core::{
    Interval, OpenInterval, day_boundaries, duration_within_service_hours_until, split_report,
};
use tracing::debug;

use crate::cli::{DurationArgs, IntervalArgs};
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat, print_json};
use crate::shared::{
    format_duration, parse_input_format, parse_instant, parse_now, parse_service_hours,
};

#[derive(Debug, Serialize)]
struct BoundariesOutput {
    tz: String,
    boundaries: Vec<String>,
}

pub fn run_boundaries(args: IntervalArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let hours = parse_service_hours(&args.hours)?;
    let format = parse_input_format(&args.input_format)?;
    let start = parse_instant(&args.start, format, hours.tz, "start")?;
    let end = parse_instant(&args.end, format, hours.tz, "end")?;
    let interval = Interval::new(start, end)?;

    let boundaries: Vec<String> = day_boundaries(interval.start(), interval.end(), hours.tz)
        .into_iter()
        .map(|boundary| format_local(boundary, hours.tz))
        .collect();
    debug!(count = boundaries.len(), "enumerated day boundaries");

    match output_format {
        OutputFormat::Json => print_json(&BoundariesOutput {
            tz: hours.tz.to_string(),
            boundaries,
        })?,
        OutputFormat::Text => {
            for boundary in boundaries {
                println!("{}", boundary);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

pub fn run_split(args: IntervalArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let hours = parse_service_hours(&args.hours)?;
    let format = parse_input_format(&args.input_format)?;
    let start = parse_instant(&args.start, format, hours.tz, "start")?;
    let end = parse_instant(&args.end, format, hours.tz, "end")?;
    let report = split_report(&Interval::new(start, end)?, &hours);

    match output_format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            for segment in &report.segments {
                println!("{} -> {}", segment.start_local, segment.end_local);
            }
            println!(
                "Total: {}",
                format_duration(chrono::TimeDelta::milliseconds(report.total_ms))
            );
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct DurationOutput {
    start_local: String,
    end_local: String,
    ongoing: bool,
    duration_ms: i64,
}

pub fn run_duration(args: DurationArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let hours = parse_service_hours(&args.hours)?;
    let format = parse_input_format(&args.input_format)?;
    let start = parse_instant(&args.start, format, hours.tz, "start")?;
    let end = args
        .end
        .as_deref()
        .map(|end| parse_instant(end, format, hours.tz, "end"))
        .transpose()?;
    let now = parse_now(args.now.as_deref(), format, hours.tz)?;

    let open = OpenInterval::new(Some(start), end);
    let closed = open.close_at(now)?;
    let duration = duration_within_service_hours_until(&open, now, &hours)?;

    let output = DurationOutput {
        start_local: format_local(closed.start(), hours.tz),
        end_local: format_local(closed.end(), hours.tz),
        ongoing: open.is_ongoing(),
        duration_ms: duration.num_milliseconds(),
    };

    match output_format {
        OutputFormat::Json => print_json(&output)?,
        OutputFormat::Text => {
            let suffix = if output.ongoing { " (ongoing)" } else { "" };
            println!(
                "{} to {}{}: {}",
                output.start_local,
                output.end_local,
                suffix,
                format_duration(duration)
            );
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
