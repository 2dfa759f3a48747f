//! Error taxonomy visible to callers.

use thiserror::Error;

/// Errors surfaced by the orchestration core.
///
/// Cache-internal problems (size accounting, serialization) are never
/// represented here; they are absorbed where they happen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KuvendError {
    /// Empty or malformed prompt, unknown persona, or an empty persona set
    /// where one is required.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The external generation collaborator is unconfigured or unreachable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl KuvendError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Short machine-readable kind, used by the CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

pub type Result<T> = std::result::Result<T, KuvendError>;
