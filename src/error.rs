//! Error taxonomy for the CLT experiment pipeline.

use thiserror::Error;

pub use crate::distributions::DistributionError;

/// Root error type for every fallible operation in the crate.
#[derive(Error, Debug)]
pub enum CltError {
    /// Distribution parameters were rejected.
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// A configuration value is outside its allowed range.
    #[error("config error: {field}: {message}")]
    Config { field: String, message: String },

    /// A configuration file could not be parsed.
    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// An operation needed at least one finite value.
    #[error("no data: {0}")]
    EmptyData(&'static str),

    /// Sampling produced an infinite or NaN value, which happens when the
    /// distribution parameters push draws past the f64 range.
    #[error("non-finite value in {0}: distribution parameters overflow f64")]
    NonFinite(&'static str),

    /// Histogram construction failed.
    #[error("histogram error: {0}")]
    Histogram(String),

    /// The plotting backend reported a failure.
    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CltError {
    pub(crate) fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        CltError::Config {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type CltResult<T> = Result<T, CltError>;
