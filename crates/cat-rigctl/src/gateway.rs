//! The radio gateway seam
//!
//! The sync loop only sees [`RadioGateway`]. Whether the radio is reached
//! by spawning `rigctl` per call ([`crate::Rigctl`]), through a connection to
//! `rigctld` ([`crate::RigctldClient`]) or through a simulator is invisible
//! to it.

use std::future::Future;

use crate::error::RigError;

/// Snapshot of the radio as reported by one poll
#[derive(Debug, Clone, PartialEq)]
pub struct RadioState {
    /// Tuned frequency in Hz
    pub frequency_hz: f64,
    /// Hamlib mode name (e.g. "USB", "PKTLSB")
    pub mode: String,
    /// Passband as reported by the radio
    pub bandwidth: String,
}

/// Read/write access to a radio's frequency and mode
pub trait RadioGateway: Send {
    /// Query the tuned frequency in Hz
    fn read_frequency(&mut self) -> impl Future<Output = Result<f64, RigError>> + Send;

    /// Query the mode name and passband
    fn read_mode(&mut self) -> impl Future<Output = Result<(String, String), RigError>> + Send;

    /// Tune the radio
    ///
    /// The radio does not echo the change; it shows up on the next
    /// [`read_frequency`](Self::read_frequency).
    fn write_frequency(&mut self, hz: f64) -> impl Future<Output = Result<(), RigError>> + Send;

    /// Poll frequency then mode
    fn read_state(&mut self) -> impl Future<Output = Result<RadioState, RigError>> + Send {
        async move {
            let frequency_hz = self.read_frequency().await?;
            let (mode, bandwidth) = self.read_mode().await?;
            Ok(RadioState {
                frequency_hz,
                mode,
                bandwidth,
            })
        }
    }
}
