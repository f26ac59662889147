//! Error types for the sync loop

use cat_rigctl::RigError;
use cat_websdr::RemoteError;
use thiserror::Error;

/// Errors surfaced by a sync cycle, tagged with the endpoint that failed
#[derive(Debug, Error)]
pub enum SyncError {
    /// The radio gateway failed
    #[error("radio: {0}")]
    Radio(#[from] RigError),

    /// The WebSDR gateway failed
    #[error("WebSDR: {0}")]
    Remote(#[from] RemoteError),
}

impl SyncError {
    /// Returns true if the loop cannot meaningfully continue
    ///
    /// A vanished page and a missing control program are fatal. Timeouts
    /// and unparseable replies are retried on the next cycle.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Radio(e) => !e.is_transient(),
            Self::Remote(e) => e.is_fatal(),
        }
    }

    /// Which endpoint failed
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Radio(_) => "radio",
            Self::Remote(_) => "WebSDR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cat_rigctl::ParseError;

    #[test]
    fn test_classification() {
        assert!(SyncError::from(RemoteError::Bridge("no such window".into())).is_fatal());
        assert!(!SyncError::from(RemoteError::FieldMissing("frequency".into())).is_fatal());
        assert!(!SyncError::from(RigError::from(ParseError::Empty)).is_fatal());
        assert!(SyncError::from(RigError::Spawn {
            program: "rigctl".into(),
            reason: "not found".into()
        })
        .is_fatal());
    }

    #[test]
    fn test_endpoint_names() {
        let err = SyncError::from(RemoteError::Bridge("gone".into()));
        assert_eq!(err.endpoint(), "WebSDR");
        assert_eq!(err.to_string(), "WebSDR: remote page unreachable: gone");
    }
}
