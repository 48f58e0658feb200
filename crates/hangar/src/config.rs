use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;

/// Process configuration, read once at startup.
///
/// Any error here is fatal: the server must not open a socket without a
/// complete upstream configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub owner: String,
    pub repository: String,
    pub token: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{variable} environment variable is not set")]
    MissingVariable { variable: &'static str },
    #[error("PORT environment variable is not a valid port: {value}")]
    InvalidPort { value: String },
}

impl Config {
    /// Load the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error when a required variable is missing or empty, or
    /// when `PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| std::env::var(variable).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            owner: required(&lookup, "GITHUB_OWNER")?,
            repository: required(&lookup, "GITHUB_REPOSITORY")?,
            token: required(&lookup, "GITHUB_PERSONAL_ACCESS_TOKEN")?,
            port: port(&lookup)?,
        })
    }
}

fn required(
    lookup: impl Fn(&str) -> Option<String>,
    variable: &'static str,
) -> Result<String, ConfigError> {
    lookup(variable)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVariable { variable })
}

fn port(lookup: impl Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
    match lookup("PORT").filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidPort { value }),
        None => Ok(DEFAULT_PORT),
    }
}
