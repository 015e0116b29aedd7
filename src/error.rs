use thiserror::Error;

/// Input rejected before any network activity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty input")]
    Empty,

    #[error("too long: {length} characters (maximum {max})")]
    TooLong { length: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard command available on this system")]
    Unsupported,

    #[error("clipboard copy denied: {0}")]
    Denied(String),

    #[error("clipboard I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("spell-check service answered with HTTP {0}")]
    Http(u16),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("response contained no result")]
    ResultMissing,

    #[error("spell check cancelled")]
    Cancelled,

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

impl CheckError {
    /// Errors a single chunk submission may recover from by trying again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckError::Network(_)
                | CheckError::Http(_)
                | CheckError::Parse(_)
                | CheckError::ResultMissing
        )
    }

    /// Remote failures are shown together with the alternative checkers
    pub fn offers_alternatives(&self) -> bool {
        self.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::Empty.to_string(), "empty input");
        let err = ValidationError::TooLong {
            length: 9000,
            max: 8000,
        };
        assert!(err.to_string().starts_with("too long"));
    }

    #[test]
    fn test_retry_classification() {
        assert!(CheckError::Parse("no wrapper".to_string()).is_retryable());
        assert!(CheckError::ResultMissing.is_retryable());
        assert!(CheckError::Http(503).is_retryable());
        assert!(!CheckError::Validation(ValidationError::Empty).is_retryable());
        assert!(!CheckError::Cancelled.is_retryable());
        assert!(!CheckError::Clipboard(ClipboardError::Unsupported).offers_alternatives());
    }
}
