//! Error types for the locator.

use thiserror::Error;

/// Errors returned by the locator.
///
/// A frame without a qualifying blob is not an error: `locate` returns `Ok(false)`.
/// Only caller mistakes and backend failures land here.
#[derive(Error, Debug)]
pub enum LocatorError {
    /// The caller broke a documented precondition (no search area, empty or
    /// mismatched frames, degenerate search area).
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// The vision kernel failed or reported that it is not ready.
    #[error(transparent)]
    Kernel(#[from] anyhow::Error),

    /// The configuration does not describe a usable locator.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LocatorError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        LocatorError::PreconditionViolation(message.into())
    }

    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, LocatorError::PreconditionViolation(_))
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_display_names_the_violation() {
        let err = LocatorError::precondition("search area is not set");
        assert!(err.is_precondition_violation());
        assert_eq!(
            err.to_string(),
            "precondition violated: search area is not set"
        );
    }

    #[test]
    fn kernel_errors_are_transparent() {
        let err: LocatorError = anyhow::anyhow!("kernel offline").into();
        assert!(!err.is_precondition_violation());
        assert_eq!(err.to_string(), "kernel offline");
    }
}
