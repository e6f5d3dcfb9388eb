use thiserror::Error;

/// Failure kinds raised by statements.
///
/// They travel inside [`crate::Error`] (possibly wrapped with extra context),
/// use `downcast_ref::<StatementError>()` to tell them apart:
/// ```rust
/// use slate_core::{Error, StatementError};
/// let error =
///     Error::new(StatementError::QueryExecution("boom".into())).context("While executing");
/// assert!(matches!(
///     error.downcast_ref::<StatementError>(),
///     Some(StatementError::QueryExecution(..))
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    /// Missing, closed or otherwise unusable connection.
    #[error("Invalid or missing connection: {0}")]
    Configuration(String),
    /// The backend refused to prepare the statement.
    #[error("Could not prepare the statement: {0}")]
    QueryPreparation(String),
    /// The backend reported a failure while executing, the message is the backend's own.
    #[error("{0}")]
    QueryExecution(String),
}

impl StatementError {
    pub fn message(&self) -> &str {
        match self {
            StatementError::Configuration(v)
            | StatementError::QueryPreparation(v)
            | StatementError::QueryExecution(v) => v,
        }
    }
}
