use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod batch_cmd;
mod cli;
mod daily_cmd;
mod error;
mod interval_cmd;
mod shared;

use batch_cmd::run_batch;
use cli::{Cli, Commands};
use daily_cmd::run_daily;
use error::{CliResult, OutputFormat, output_format_hint, parse_output_format, render_error};
use interval_cmd::{run_boundaries, run_duration, run_split};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the output format, then run the command with it.
fn dispatch<A>(
    args: A,
    output_format: &str,
    run: impl FnOnce(A, OutputFormat) -> CliResult<ExitCode>,
) -> ExitCode {
    let fallback = output_format_hint(output_format);
    let output_format = match parse_output_format(output_format) {
        Ok(format) => format,
        Err(err) => return render_error(&err, fallback),
    };

    match run(args, output_format) {
        Ok(code) => code,
        Err(err) => render_error(&err, output_format),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(command = ?cli.command, "parsed CLI args");

    match cli.command {
        Commands::Boundaries(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_boundaries)
        }
        Commands::Split(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_split)
        }
        Commands::Duration(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_duration)
        }
        Commands::Batch(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_batch)
        }
        Commands::Daily(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_daily)
        }
    }
}
