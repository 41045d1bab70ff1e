//! Errors raised by the result log.

/// Errors from building or reloading a result log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A result with this name was already recorded in the run.
    #[error("duplicate check name: {0}")]
    DuplicateCheck(String),

    /// A check name was empty.
    #[error("check name must not be empty")]
    EmptyName,
}
