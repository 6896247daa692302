#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} range has equal bounds ({min}, {max})")]
    DegenerateRange { name: String, min: f64, max: f64 },

    #[error("{name} range has a non-finite bound ({min}, {max})")]
    NonFiniteRange { name: String, min: f64, max: f64 },

    #[error("{name} range must contain zero, got ({min}, {max})")]
    PowerRangeExcludesZero { name: String, min: f64, max: f64 },

    #[error("{name} must be greater than zero")]
    ZeroInterval { name: String },

    #[error("cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("cannot parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn degenerate<S: Into<String>>(name: S, min: f64, max: f64) -> Self {
        ConfigError::DegenerateRange { name: name.into(), min, max }
    }

    pub(crate) fn non_finite<S: Into<String>>(name: S, min: f64, max: f64) -> Self {
        ConfigError::NonFiniteRange { name: name.into(), min, max }
    }

    pub(crate) fn zero_interval<S: Into<String>>(name: S) -> Self {
        ConfigError::ZeroInterval { name: name.into() }
    }

    pub(crate) fn excludes_zero<S: Into<String>>(name: S, min: f64, max: f64) -> Self {
        ConfigError::PowerRangeExcludesZero { name: name.into(), min, max }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("server rejected credentials (401)")]
    Unauthorized,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed telemetry payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
