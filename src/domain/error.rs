//! Domain error types.
//!
//! Parameter errors fail fast, before any computation. Insufficient history
//! is not an error: indicator warm-up regions carry `f64::NAN` and an empty
//! candle sequence backtests to an all-zero summary.

/// Top-level error type for chartlab.
#[derive(Debug, thiserror::Error)]
pub enum ChartlabError {
    #[error("invalid period {period}: must be positive")]
    InvalidPeriod { period: usize },

    #[error("fast period {fast} must be less than slow period {slow}")]
    FastSlowOrder { fast: usize, slow: usize },

    #[error("anchor index {index} out of range for {len} bars")]
    AnchorOutOfRange { index: usize, len: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ChartlabError> for std::process::ExitCode {
    fn from(err: &ChartlabError) -> Self {
        let code: u8 = match err {
            ChartlabError::Io(_) => 1,
            ChartlabError::ConfigParse { .. }
            | ChartlabError::ConfigMissing { .. }
            | ChartlabError::ConfigInvalid { .. } => 2,
            ChartlabError::Data { .. } => 3,
            ChartlabError::InvalidPeriod { .. }
            | ChartlabError::FastSlowOrder { .. }
            | ChartlabError::AnchorOutOfRange { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
