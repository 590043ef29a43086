use std::fmt;
use std::process::ExitCode;

use serde::Serialize;
use svchours_core::ServiceHoursError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_INPUT_ERROR: u8 = 2;
pub const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Whether a failure came from what the user passed in or from the
/// environment the command ran in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Input,
    Runtime,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Input => EXIT_INPUT_ERROR,
            ErrorKind::Runtime => EXIT_RUNTIME_ERROR,
        }
    }
}

/// Core errors are precondition or parse failures on user data.
impl From<&ServiceHoursError> for ErrorKind {
    fn from(err: &ServiceHoursError) -> Self {
        match err {
            ServiceHoursError::InvalidInterval(_)
            | ServiceHoursError::MissingEndpoint(_)
            | ServiceHoursError::InvalidDay(_)
            | ServiceHoursError::InvalidTimezone(_)
            | ServiceHoursError::ParseError(_) => ErrorKind::Input,
        }
    }
}

/// Machine-readable name of the core error, reported in JSON output.
fn reason(err: &ServiceHoursError) -> &'static str {
    match err {
        ServiceHoursError::InvalidInterval(_) => "invalid_interval",
        ServiceHoursError::MissingEndpoint(_) => "missing_endpoint",
        ServiceHoursError::InvalidDay(_) => "invalid_day",
        ServiceHoursError::InvalidTimezone(_) => "invalid_timezone",
        ServiceHoursError::ParseError(_) => "parse_error",
    }
}

#[derive(Debug)]
pub struct CliError {
    kind: ErrorKind,
    reason: Option<&'static str>,
    message: String,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Input,
            reason: None,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            reason: None,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl From<ServiceHoursError> for CliError {
    fn from(err: ServiceHoursError) -> Self {
        Self {
            kind: ErrorKind::from(&err),
            reason: Some(reason(&err)),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a str,
    kind: ErrorKind,
    exit_code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

/// Report `err` on stderr and turn it into the process exit code.
pub fn render_error(err: &CliError, output_format: OutputFormat) -> ExitCode {
    match output_format {
        OutputFormat::Json => {
            let envelope = ErrorEnvelope {
                error: &err.message,
                kind: err.kind,
                exit_code: err.exit_code(),
                reason: err.reason,
            };
            match serde_json::to_string_pretty(&envelope) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("Error: {}", err.message),
            }
        }
        OutputFormat::Text => eprintln!("Error: {}", err.message),
    }

    ExitCode::from(err.exit_code())
}

/// Best-effort format for reporting an invalid `--output-format` itself.
pub fn output_format_hint(s: &str) -> OutputFormat {
    if s.eq_ignore_ascii_case("json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    }
}

pub fn parse_output_format(s: &str) -> CliResult<OutputFormat> {
    match s.to_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "text" => Ok(OutputFormat::Text),
        _ => Err(CliError::input(format!(
            "Invalid output_format '{}'. Expected: json, text",
            s
        ))),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_input_with_reason() {
        let err = CliError::from(ServiceHoursError::MissingEndpoint("end"));
        assert_eq!(err.exit_code(), EXIT_INPUT_ERROR);
        assert_eq!(err.reason, Some("missing_endpoint"));
        assert_eq!(err.to_string(), "Missing endpoint: interval has no end");
    }

    #[test]
    fn runtime_errors_have_no_reason() {
        let err = CliError::runtime("disk on fire");
        assert_eq!(err.exit_code(), EXIT_RUNTIME_ERROR);
        assert_eq!(err.reason, None);
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("yaml").is_err());
        assert_eq!(output_format_hint("yaml"), OutputFormat::Text);
    }
}
