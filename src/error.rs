use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid time scope \"{input}\": {reason}")]
    InvalidScope { input: String, reason: String },

    #[error("{0}")]
    Classify(#[from] ClassifyError),
}

impl AppError {
    pub(crate) fn invalid_scope(input: &str, reason: impl Into<String>) -> Self {
        AppError::InvalidScope {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ClassifyError {
    /// The collaborator could not be prepared; fatal for the whole run.
    #[error("Classifier setup failed: {0}")]
    Setup(String),

    /// A single request failed; recovered by fallback labels.
    #[error("Classification request failed: {0}")]
    Request(String),

    #[error("Classification cancelled")]
    Cancelled,
}
