use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnatomyxError {
    /// Malformed dataset shape. Recoverable; shown to the user as-is.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unrecognised file extension or unparsable tabular headers.
    #[error("Format error: {0}")]
    Format(String),

    /// A gene was requested that the loaded dataset does not contain.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// The rendering surface could not load or draw the graphic.
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnatomyxError {
    /// True for the three user-facing kinds (validation, format, lookup).
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AnatomyxError::Validation(_) | AnatomyxError::Format(_) | AnatomyxError::Lookup(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnatomyxError>;
