//! Error types for the fantasy price scraper.
//!
//! Each stage of a scrape cycle has its own error enum so the pipeline can
//! decide whether a failure skips the cycle, isolates a single sink, or is
//! fatal at startup.

use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Startup failures returned from `main`.
///
/// Per-cycle stage errors are handled inside the pipeline and never reach
/// this level.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Process setup errors (log file, signal handlers)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Required configuration value is missing
    #[error("missing required configuration: {0}")]
    Missing(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Errors raised while talking to the price endpoint.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS, timeout or body read failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status code: {status}")]
    Status { status: u16 },
}

/// Errors raised while turning a payload into asset records.
///
/// Any of these rejects the whole snapshot.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Payload is not valid JSON or lacks the asset list
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// A required field is absent
    #[error("asset #{index}: missing field '{field}'")]
    MissingField { index: usize, field: String },

    /// A field is present but cannot be coerced to the expected type
    #[error("asset #{index}: field '{field}' is not a valid {expected}")]
    InvalidField {
        index: usize,
        field: String,
        expected: &'static str,
    },

    /// Price change info block is absent or null
    #[error("asset {id}: price change info unavailable")]
    ChangeInfoUnavailable { id: i64 },

    /// No price recorded for the reference period
    #[error("asset {id}: no price for period {period_id}")]
    PeriodPriceMissing { id: i64, period_id: i64 },

    /// Asset is not covered by the selection baseline in use
    #[error("asset {id}: not present in selection baseline '{version}'")]
    BaselineMissing { id: i64, version: String },
}

/// Errors from the single-slot fingerprint store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading the stored fingerprint failed
    #[error("failed to read fingerprint from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Persisting the new fingerprint failed
    #[error("failed to write fingerprint to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a single report sink.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or write failure
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Zip container failure
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Target directory is absent and may not be created
    #[error("archive directory does not exist: {path}")]
    MissingDirectory { path: String },

    /// The blocking write task panicked or was cancelled
    #[error("sink task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new missing configuration error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl FetchError {
    /// Creates a status error from an HTTP status code.
    pub fn status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
        }
    }
}

impl ExtractError {
    /// Creates a missing field error.
    pub fn missing_field(index: usize, field: impl Into<String>) -> Self {
        Self::MissingField {
            index,
            field: field.into(),
        }
    }

    /// Creates an invalid field error.
    pub fn invalid_field(index: usize, field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidField {
            index,
            field: field.into(),
            expected,
        }
    }
}

impl StoreError {
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

impl SinkError {
    /// Creates an I/O error tagged with the path being written.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing directory error.
    pub fn missing_directory(path: impl Into<String>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }
}
