use std::io::BufRead;
use std::process::ExitCode;

use svchours_core::{ServiceHours, SplitReport, TimestampFormat, split_report_from_strings};
use tracing::debug;

use crate::cli::BatchArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{format_duration, open_input, parse_input_format, parse_service_hours};

pub fn run_batch(args: BatchArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let hours = parse_service_hours(&args.hours)?;
    let format = parse_input_format(&args.input_format)?;
    let reader = open_input(&args.input)?;

    let mut processed = 0usize;
    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let report = process_batch_line(trimmed, format, &hours)
            .map_err(|e| CliError::input(format!("Error processing '{}': {}", trimmed, e)))?;
        processed += 1;

        match output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string(&report)
                    .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!(
                    "{} to {}: {} in {} segment(s)",
                    report.start_local,
                    report.end_local,
                    format_duration(chrono::TimeDelta::milliseconds(report.total_ms)),
                    report.segments.len()
                );
            }
        }
    }

    debug!(processed, "batch complete");
    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn process_batch_line(
    line: &str,
    format: TimestampFormat,
    hours: &ServiceHours,
) -> CliResult<SplitReport> {
    let (start, end) = split_endpoints(line).ok_or_else(|| {
        CliError::input("Expected '<start>/<end>', '<start>,<end>' or '<start> <end>'")
    })?;
    Ok(split_report_from_strings(start, end, format, hours)?)
}

/// Separate the two endpoints of a batch line.
///
/// Whitespace only separates when the line has exactly two tokens, since
/// local times may themselves contain a space.
fn split_endpoints(line: &str) -> Option<(&str, &str)> {
    if let Some(pair) = line.split_once('/') {
        return Some(pair);
    }
    if let Some(pair) = line.split_once(',') {
        return Some(pair);
    }

    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(start), Some(end), None) => Some((start, end)),
        _ => None,
    }
}
