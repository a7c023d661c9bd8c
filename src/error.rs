use thiserror::Error;

/// Main error type for region inference.
/// Aggregates errors from the grid provider boundary, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum RegionError {
    #[error("{0}")]
    WithContextError(String),

    /// Failures raised by a host's grid provider (for example formula evaluation)
    #[error("{0}")]
    AnyhowError(#[from] anyhow::Error),

    // Third-party library errors
    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    // Spreadsheet module errors
    #[error("{0}")]
    RangeError(#[from] crate::spreadsheet::range::RangeError),

    // Analysis module errors
    #[error("{0}")]
    OptionsError(#[from] crate::analysis::cluster::OptionsError),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, RegionError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| RegionError::WithContextError(format!("{}: {}", message, e)))
    }
}
