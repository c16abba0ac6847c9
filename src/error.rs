//! Error types for the container.

use thiserror::Error;

/// Container errors
///
/// Registration, lookup and configuration errors are detected before any
/// state is touched, so those calls leave the container as it was. The
/// exception is `env`: once an environment is committed it stays active even
/// if its callback then returns an error.
///
/// # Examples
///
/// ```rust
/// use bowl::{Container, DiError};
///
/// let container = Container::new();
/// match container.get_any("mailer") {
///     Err(DiError::UnknownService(name)) => assert_eq!(name, "mailer"),
///     _ => unreachable!(),
/// }
///
/// let invalid = DiError::InvalidName("foo.bar".to_string());
/// assert_eq!(invalid.to_string(), "Invalid service name: foo.bar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// Service name contains the reserved separator
    #[error("Invalid service name: {0}")]
    InvalidName(String),
    /// Tag contains the reserved separator
    #[error("Invalid tag: {0}")]
    InvalidTag(String),
    /// Environment name contains the reserved separator
    #[error("Invalid environment name: {0}")]
    InvalidEnvironment(String),
    /// Service not registered
    #[error("Service not found: {0}")]
    UnknownService(String),
    /// Neither a service nor a parameter is stored under the key
    #[error("Key not found: {0}")]
    UnknownKey(String),
    /// Environment was never configured
    #[error("Environment not configured: {0}")]
    UnknownEnvironment(String),
    /// A different environment is already active
    #[error("Environment {active} is already active, cannot switch to {requested}")]
    EnvironmentConflict { active: String, requested: String },
    /// Tagged view cursor moved past its last member
    #[error("Tagged view exhausted: position {position} of {count} members")]
    ViewExhausted { position: usize, count: usize },
    /// Instance downcast failed
    #[error("Type mismatch for {name}: expected {expected}")]
    TypeMismatch { name: String, expected: &'static str },
    /// Configuration document could not be read
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for container operations
///
/// ```rust
/// use bowl::{DiResult, DiError};
///
/// fn lookup() -> DiResult<()> {
///     Err(DiError::UnknownService("cache".to_string()))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;

impl From<serde_json::Error> for DiError {
    fn from(err: serde_json::Error) -> Self {
        DiError::Config(err.to_string())
    }
}
