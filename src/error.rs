use thiserror::Error;

/// Errors returned by registration and configuration.
///
/// Dispatch itself never fails: handler and middleware bodies own their
/// errors, and over-advancing a chain is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    /// A required argument was absent (e.g. a `None` callback).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The process-wide notifier was already set up.
    #[error("global notifier already initialized")]
    AlreadyInitialized,
    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        NotifierError::Config(err.to_string())
    }
}
