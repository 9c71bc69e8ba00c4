use thiserror::Error;

/// Errors raised by the service config registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A service with this name is already registered.
    #[error("service config already registered: {name}")]
    DuplicateService { name: String },

    /// `get` was called with a name no service was registered under.
    #[error("unknown service: {name}")]
    UnknownService { name: String },

    /// A `RuntimeConfig::load_toml` file failed to read or parse.
    #[error("invalid config file {path}: {reason}")]
    InvalidFile { path: String, reason: String },
}

/// Result type for service config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
