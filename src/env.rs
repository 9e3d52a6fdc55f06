//! Environment variable configuration
//!
//! Each supported variable is a unit type implementing [`EnvVar`], which keeps
//! its name, description and parsing rules in one place. Unset variables
//! yield `None` so callers can fall back to their own defaults.

use std::env;
use std::fmt;

/// Error raised when a variable is set to something unusable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

pub trait EnvVar<T> {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    /// Reads and parses the variable; `Ok(None)` when it is not set.
    fn get() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn error(message: String) -> EnvError {
        EnvError {
            variable: Self::NAME.to_string(),
            message,
        }
    }
}

/// Logging and terminal output
pub mod logging {
    use super::*;

    /// Log level used when `RUST_LOG` is not set
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "SITESNAP_LOG_LEVEL";
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(Self::error(format!(
                    "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                    value
                ))),
            }
        }
    }

    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // Any non-empty value disables color
            Ok(!value.is_empty())
        }
    }
}

/// HTTP client settings
pub mod network {
    use super::*;

    pub const MAX_TIMEOUT: u64 = 3600;

    pub struct Timeout;
    impl EnvVar<u64> for Timeout {
        const NAME: &'static str = "SITESNAP_TIMEOUT";
        const DESCRIPTION: &'static str = "Per-request timeout in seconds (1-3600)";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_seconds(value, Self::NAME)
        }
    }

    pub struct UserAgent;
    impl EnvVar<String> for UserAgent {
        const NAME: &'static str = "SITESNAP_USER_AGENT";
        const DESCRIPTION: &'static str = "User-Agent header sent with every request";

        fn parse(value: &str) -> EnvResult<String> {
            let value = value.trim();
            if value.is_empty() {
                Err(Self::error("User agent cannot be empty".to_string()))
            } else {
                Ok(value.to_string())
            }
        }
    }

    /// Parses a timeout, accepting 1 to [`MAX_TIMEOUT`] seconds.
    pub fn parse_seconds(value: &str, var_name: &str) -> EnvResult<u64> {
        let error = |message: String| EnvError {
            variable: var_name.to_string(),
            message,
        };

        let seconds = value
            .trim()
            .parse::<u64>()
            .map_err(|_| error(format!("Invalid number '{}'", value)))?;

        if seconds == 0 || seconds > MAX_TIMEOUT {
            return Err(error(format!(
                "Value {} out of range (1-{})",
                seconds, MAX_TIMEOUT
            )));
        }

        Ok(seconds)
    }
}

/// Name and description of every supported variable
pub fn describe_env_vars() -> Vec<(&'static str, &'static str)> {
    vec![
        (logging::LogLevel::NAME, logging::LogLevel::DESCRIPTION),
        (logging::NoColor::NAME, logging::NoColor::DESCRIPTION),
        (network::Timeout::NAME, network::Timeout::DESCRIPTION),
        (network::UserAgent::NAME, network::UserAgent::DESCRIPTION),
    ]
}
