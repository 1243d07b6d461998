//! Domain error types.
//!
//! Numeric edge cases (insufficient history, degenerate normalization) are
//! not errors: they surface as `None` values that propagate through the
//! arithmetic. This enum covers caller contract violations and I/O only.

/// Top-level error type for fundrank.
#[derive(Debug, thiserror::Error)]
pub enum FundrankError {
    #[error("empty price series for fund {fund_id}")]
    EmptySeries { fund_id: String },

    #[error("price series for fund {fund_id} is not strictly ascending by date at row {position}")]
    UnsortedSeries { fund_id: String, position: usize },

    #[error("invalid window: {reason}")]
    InvalidWindow { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error("no pricing data for fund {fund_id}")]
    NoData { fund_id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FundrankError> for std::process::ExitCode {
    fn from(err: &FundrankError) -> Self {
        let code: u8 = match err {
            FundrankError::Io(_) => 1,
            FundrankError::ConfigParse { .. }
            | FundrankError::ConfigMissing { .. }
            | FundrankError::ConfigInvalid { .. } => 2,
            FundrankError::Data { .. } => 3,
            FundrankError::EmptySeries { .. }
            | FundrankError::UnsortedSeries { .. }
            | FundrankError::InvalidWindow { .. } => 4,
            FundrankError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
