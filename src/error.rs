use thiserror::Error;

/// Result type for deepq operations
pub type Result<T> = std::result::Result<T, DqnError>;

/// Main error type for the DQN engine
#[derive(Debug, Error)]
pub enum DqnError {
    /// A setup-time invariant was violated (never raised mid-run)
    #[error("Invalid configuration '{name}': {reason}")]
    Configuration {
        name: String,
        reason: String,
    },

    /// More transitions were requested than the replay buffer holds
    #[error("Insufficient data: requested {requested} transitions, only {available} stored")]
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid action
    #[error("Invalid action {action}: must be less than {num_actions}")]
    InvalidAction {
        action: usize,
        num_actions: usize,
    },

    /// Failure raised by an environment
    #[error("Environment error: {0}")]
    Environment(String),

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for DqnError {
    fn from(err: bincode::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DqnError {
    fn from(err: serde_json::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for DqnError {
    fn from(err: serde_yaml::Error) -> Self {
        DqnError::Serialization(err.to_string())
    }
}

// Helper functions for common error patterns
impl DqnError {
    pub fn configuration<S: Into<String>>(name: S, reason: S) -> Self {
        DqnError::Configuration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DqnError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// True for errors that must surface before training starts
    pub fn is_configuration(&self) -> bool {
        matches!(self, DqnError::Configuration { .. })
    }
}
