//! Configuration management for the RAX FTP client
//!
//! Settings come from built-in defaults, an optional TOML file and
//! `RAX_FTP_*` environment variables, in increasing order of precedence.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::client::DEFAULT_BUFFER_SIZE;
use crate::target::DEFAULT_USER;

/// File looked up in the working directory when no path is given
const DEFAULT_CONFIG_NAME: &str = "rax-ftp";

const MIN_BUFFER_SIZE: usize = 512;

/// Client configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Echo every control channel line to stdout
    /// Environment: RAX_FTP_VERBOSE
    pub verbose: bool,

    /// User logged in when a URL names none (with an empty password)
    pub default_user: String,

    /// Control reader capacity and data copy buffer size
    pub buffer_size: usize,

    /// Deadline for a whole invocation, 0 disables it
    pub operation_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            default_user: DEFAULT_USER.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            operation_timeout_secs: 0,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `path`, or from `rax-ftp.toml` in the working
    /// directory when present, with environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = ClientConfig::default();
        let mut builder = Config::builder()
            .set_default("verbose", defaults.verbose)?
            .set_default("default_user", defaults.default_user)?
            .set_default("buffer_size", defaults.buffer_size as i64)?
            .set_default("operation_timeout_secs", defaults.operation_timeout_secs as i64)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix("RAX_FTP").try_parsing(true))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(config::ConfigError::Message(format!(
                "buffer_size must be at least {MIN_BUFFER_SIZE}"
            )));
        }

        if self.default_user.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "default_user cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Get the invocation deadline, `None` when disabled
    pub fn operation_timeout(&self) -> Option<Duration> {
        (self.operation_timeout_secs > 0).then(|| Duration::from_secs(self.operation_timeout_secs))
    }
}
