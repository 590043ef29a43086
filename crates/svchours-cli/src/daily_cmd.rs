use std::collections::{BTreeMap, HashMap};
use std::process::ExitCode;

use anyhow::Context;
use serde::Serialize;
use svchours_core::{IssueType, TimestampFormat, day_issue_type_durations_on, parse_day};

use crate::cli::DailyArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat, print_json};
use crate::shared::{format_duration, open_input, parse_now, parse_tz_or_input_error};

#[derive(Debug, Serialize)]
struct DailyOutput {
    day: String,
    tz: String,
    durations_ms: BTreeMap<IssueType, i64>,
}

pub fn run_daily(args: DailyArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let day = parse_day(&args.day)?;
    let now = parse_now(args.now.as_deref(), TimestampFormat::Auto, tz)?;
    let intervals = load_intervals(&args.input)?;

    let durations_ms = day_issue_type_durations_on(day, &intervals, now, tz)?;

    match output_format {
        OutputFormat::Json => print_json(&DailyOutput {
            day: day.format("%Y-%m-%d").to_string(),
            tz: tz.to_string(),
            durations_ms,
        })?,
        OutputFormat::Text => {
            for (issue_type, ms) in &durations_ms {
                println!(
                    "{}: {}",
                    issue_type,
                    format_duration(chrono::TimeDelta::milliseconds(*ms))
                );
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

/// Read the `{ "<issue type>": ["<start>/<end>", ...] }` input file.
///
/// An unreadable file is a runtime error; malformed content is an input error.
fn load_intervals(path: &str) -> CliResult<HashMap<IssueType, Vec<String>>> {
    let reader = open_input(path)?;
    parse_intervals(reader, path).map_err(|e| CliError::input(format!("{:#}", e)))
}

fn parse_intervals(
    reader: impl std::io::Read,
    path: &str,
) -> anyhow::Result<HashMap<IssueType, Vec<String>>> {
    serde_json::from_reader(reader).with_context(|| format!("Invalid interval file: {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_file_accepts_ongoing_entries() {
        let json = r#"{"disruption": ["2025-04-01T08:00:00+08:00/"], "infra": []}"#;
        let parsed = parse_intervals(json.as_bytes(), "inline").unwrap();
        assert_eq!(parsed[&IssueType::Disruption], vec!["2025-04-01T08:00:00+08:00/"]);
        assert!(parsed[&IssueType::Infra].is_empty());
    }

    #[test]
    fn unknown_issue_type_is_rejected() {
        let err = parse_intervals(r#"{"outage": []}"#.as_bytes(), "inline").unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid interval file: inline"));
    }
}
