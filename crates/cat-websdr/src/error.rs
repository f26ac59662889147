//! Error types for the remote endpoint gateway

use thiserror::Error;

/// Errors that can occur while driving the WebSDR page
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RemoteError {
    /// The page or browser session is gone (window closed, navigated
    /// away, WebDriver server unreachable)
    #[error("remote page unreachable: {0}")]
    Bridge(String),

    /// A script ran but failed inside the page
    #[error("script failed: {0}")]
    Script(String),

    /// The named input field does not exist on the page
    #[error("field {0:?} not found on page")]
    FieldMissing(String),

    /// The field holds something that is not a number
    #[error("field {field:?} holds non-numeric value {value:?}")]
    InvalidField { field: String, value: String },
}

impl RemoteError {
    /// Returns true if the page can no longer be driven
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Bridge(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_bridge_is_fatal() {
        assert!(RemoteError::Bridge("no such window".into()).is_fatal());
        assert!(!RemoteError::Script("javascript error".into()).is_fatal());
        assert!(!RemoteError::FieldMissing("frequency".into()).is_fatal());
        assert!(!RemoteError::InvalidField {
            field: "frequency".into(),
            value: "abc".into()
        }
        .is_fatal());
    }
}
