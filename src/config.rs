use std::{env, path::PathBuf};

pub const PYTHON_ENV: &str = "SCHLANGE_PYTHON";
pub const LOG_ENV: &str = "SCHLANGE_LOG";

pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings shared by the CLI and embedders.
///
/// Precedence is command-line flag, then environment, then default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Python 3 interpreter used as the host.
    pub interpreter: PathBuf,
    /// `tracing-subscriber` filter directive, e.g. `warn` or `schlange::host=debug`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(interpreter) = env::var_os(PYTHON_ENV).filter(|value| !value.is_empty()) {
            config.interpreter = PathBuf::from(interpreter);
        }
        if let Ok(filter) = env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }
        config
    }

    pub fn with_interpreter(mut self, interpreter: Option<PathBuf>) -> Self {
        if let Some(interpreter) = interpreter {
            self.interpreter = interpreter;
        }
        self
    }

    pub fn with_log_filter(mut self, filter: Option<String>) -> Self {
        if let Some(filter) = filter {
            self.log_filter = filter;
        }
        self
    }
}
