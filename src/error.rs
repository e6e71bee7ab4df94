use std::io;
use thiserror::Error;

/// Custom error type for hostvitals
#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Ring buffer capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for hostvitals
pub type Result<T> = std::result::Result<T, VitalsError>;

impl VitalsError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        VitalsError::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        VitalsError::Other(msg.into())
    }
}

/// Failure of a single metric probe.
///
/// The collector recovers every variant locally: the affected snapshot
/// fields keep their zero value and the cycle continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The platform or permissions deny the query.
    #[error("probe unavailable: {0}")]
    Unavailable(String),

    /// The collection deadline passed before the probe answered.
    #[error("probe deadline exceeded")]
    Timeout,

    /// The underlying query returned data that could not be interpreted.
    #[error("malformed probe data: {0}")]
    Parse(String),
}

impl ProbeError {
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        ProbeError::Unavailable(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        ProbeError::Parse(msg.into())
    }
}

/// Result type returned by every probe
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;
