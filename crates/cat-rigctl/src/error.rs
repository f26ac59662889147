//! Error types for the radio control gateway

use thiserror::Error;

/// Errors that can occur while parsing control program replies
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The reply carried no data at all
    #[error("empty reply")]
    Empty,

    /// A value that should be numeric was not
    #[error("invalid frequency: {0:?}")]
    InvalidFrequency(String),

    /// The reply had fewer lines than the command produces
    #[error("expected {expected} reply lines, got {actual}")]
    MissingLines { expected: usize, actual: usize },

    /// Status line that is not of the form `RPRT <n>`
    #[error("invalid status line: {0:?}")]
    InvalidReport(String),
}

/// Errors that can occur while talking to the radio
#[derive(Debug, Error)]
pub enum RigError {
    /// Malformed reply
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The control program did not answer in time
    #[error("no response to {command:?} within {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    /// The control program could not be started
    #[error("failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// The control program ran but reported failure
    #[error("{program} exited with status {status}: {stderr}")]
    Exit {
        program: String,
        status: i32,
        stderr: String,
    },

    /// The daemon answered with a negative `RPRT` code
    #[error("daemon reported error code {0}")]
    Daemon(i32),

    /// I/O error on the daemon connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RigError {
    /// Returns true if the failure may clear up on a later attempt
    ///
    /// A missing control program never recovers; everything else is
    /// either a busy device or a garbled reply.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Spawn { .. })
    }
}
