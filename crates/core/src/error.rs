/// Result alias that carries the custom [`SortVizError`] type.
pub type Result<T> = std::result::Result<T, SortVizError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SortVizError {
    /// The operation is not allowed in the current run status, e.g.
    /// reconfiguring or shuffling while a sort is running.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A value that cannot take part in a comparison reached the engine.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Configuration could not be interpreted.
    #[error("{0}")]
    Config(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl SortVizError {
    pub fn invalid_state<T: Into<String>>(msg: T) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a new configuration error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// Returns `true` when the error stems from a run-status violation.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

impl From<&str> for SortVizError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SortVizError {
    fn from(value: String) -> Self {
        Self::Config(value)
    }
}
