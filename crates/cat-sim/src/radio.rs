//! Virtual radio simulation
//!
//! Provides a simulated radio that answers the same frequency and mode
//! queries as a rig behind rigctl. The radio is a cheap handle around shared
//! state: hand one clone to the sync loop and keep another to turn the dial
//! or inject faults from the test.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cat_rigctl::{ParseError, RadioGateway, RigError};
use tracing::debug;

/// A failure the virtual radio should produce on its next operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigFault {
    /// The control program does not answer in time
    Timeout,
    /// The reply is not a number
    GarbledFrequency(String),
    /// The mode reply is missing its passband line
    ShortModeReply,
    /// The control program is not installed
    MissingProgram,
}

impl RigFault {
    fn into_error(self, command: &str) -> RigError {
        match self {
            Self::Timeout => RigError::Timeout {
                command: command.to_string(),
                timeout_ms: 1000,
            },
            Self::GarbledFrequency(reply) => ParseError::InvalidFrequency(reply).into(),
            Self::ShortModeReply => ParseError::MissingLines {
                expected: 2,
                actual: 1,
            }
            .into(),
            Self::MissingProgram => RigError::Spawn {
                program: "rigctl".to_string(),
                reason: "No such file or directory".to_string(),
            },
        }
    }
}

/// Configuration for creating a virtual radio
#[derive(Debug, Clone)]
pub struct VirtualRadioConfig {
    /// Display name/identifier
    pub id: String,
    /// Initial frequency in Hz
    pub initial_frequency_hz: f64,
    /// Initial hamlib mode name
    pub initial_mode: String,
    /// Initial passband
    pub initial_bandwidth: String,
}

impl Default for VirtualRadioConfig {
    fn default() -> Self {
        Self {
            id: "Virtual Radio".to_string(),
            initial_frequency_hz: 14_250_000.0, // 20m
            initial_mode: "USB".to_string(),
            initial_bandwidth: "2400".to_string(),
        }
    }
}

#[derive(Debug)]
struct RadioInner {
    id: String,
    frequency_hz: f64,
    mode: String,
    bandwidth: String,
    /// Frequencies written through the gateway, oldest first
    writes: Vec<f64>,
    /// Number of frequency queries answered
    frequency_reads: usize,
    faults: VecDeque<RigFault>,
}

/// A simulated radio reachable through [`RadioGateway`]
#[derive(Debug, Clone)]
pub struct VirtualRadio {
    inner: Arc<Mutex<RadioInner>>,
}

impl VirtualRadio {
    /// Create a new virtual radio with default settings
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_config(VirtualRadioConfig {
            id: id.into(),
            ..Default::default()
        })
    }

    /// Create a virtual radio from configuration
    pub fn from_config(config: VirtualRadioConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RadioInner {
                id: config.id,
                frequency_hz: config.initial_frequency_hz,
                mode: config.initial_mode,
                bandwidth: config.initial_bandwidth,
                writes: Vec::new(),
                frequency_reads: 0,
                faults: VecDeque::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, RadioInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the radio's identifier
    pub fn id(&self) -> String {
        self.state().id.clone()
    }

    /// Get the current frequency in Hz
    pub fn frequency_hz(&self) -> f64 {
        self.state().frequency_hz
    }

    /// Turn the dial
    pub fn set_frequency(&self, hz: f64) {
        self.state().frequency_hz = hz;
    }

    /// Get the current mode name
    pub fn mode(&self) -> String {
        self.state().mode.clone()
    }

    /// Change mode and passband
    pub fn set_mode(&self, mode: impl Into<String>, bandwidth: impl Into<String>) {
        let mut state = self.state();
        state.mode = mode.into();
        state.bandwidth = bandwidth.into();
    }

    /// Frequencies written through the gateway, oldest first
    pub fn writes(&self) -> Vec<f64> {
        self.state().writes.clone()
    }

    /// Number of frequency queries answered so far
    pub fn frequency_reads(&self) -> usize {
        self.state().frequency_reads
    }

    /// Make the next gateway operation fail
    pub fn inject_fault(&self, fault: RigFault) {
        self.state().faults.push_back(fault);
    }

    fn take_fault(&self, command: &str) -> Result<(), RigError> {
        let mut state = self.state();
        match state.faults.pop_front() {
            Some(fault) => {
                debug!("{} failing {:?} with {:?}", state.id, command, fault);
                Err(fault.into_error(command))
            }
            None => Ok(()),
        }
    }
}

impl RadioGateway for VirtualRadio {
    async fn read_frequency(&mut self) -> Result<f64, RigError> {
        self.take_fault("f")?;
        let mut state = self.state();
        state.frequency_reads += 1;
        Ok(state.frequency_hz)
    }

    async fn read_mode(&mut self) -> Result<(String, String), RigError> {
        self.take_fault("m")?;
        let state = self.state();
        Ok((state.mode.clone(), state.bandwidth.clone()))
    }

    async fn write_frequency(&mut self, hz: f64) -> Result<(), RigError> {
        self.take_fault("F")?;
        let mut state = self.state();
        state.writes.push(hz);
        state.frequency_hz = hz;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_virtual_radio() {
        let radio = VirtualRadio::new("Test Radio");
        assert_eq!(radio.id(), "Test Radio");
        assert_eq!(radio.frequency_hz(), 14_250_000.0);
        assert_eq!(radio.mode(), "USB");
        assert!(radio.writes().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_reads_dial() {
        let radio = VirtualRadio::new("Test");
        let mut gateway = radio.clone();

        radio.set_frequency(7_074_000.0);
        radio.set_mode("PKTUSB", "3000");

        let state = gateway.read_state().await.unwrap();
        assert_eq!(state.frequency_hz, 7_074_000.0);
        assert_eq!(state.mode, "PKTUSB");
        assert_eq!(state.bandwidth, "3000");
        assert_eq!(radio.frequency_reads(), 1);
    }

    #[tokio::test]
    async fn test_write_frequency_tunes_and_records() {
        let radio = VirtualRadio::new("Test");
        let mut gateway = radio.clone();

        gateway.write_frequency(3_573_000.0).await.unwrap();

        assert_eq!(radio.frequency_hz(), 3_573_000.0);
        assert_eq!(radio.writes(), vec![3_573_000.0]);
    }

    #[tokio::test]
    async fn test_fault_applies_once() {
        let radio = VirtualRadio::new("Test");
        let mut gateway = radio.clone();

        radio.inject_fault(RigFault::Timeout);
        assert!(matches!(
            gateway.read_frequency().await,
            Err(RigError::Timeout { .. })
        ));
        assert_eq!(gateway.read_frequency().await.unwrap(), 14_250_000.0);
    }

    #[tokio::test]
    async fn test_short_mode_reply_is_parse_error() {
        let radio = VirtualRadio::new("Test");
        let mut gateway = radio.clone();

        radio.inject_fault(RigFault::ShortModeReply);
        assert!(matches!(
            gateway.read_mode().await,
            Err(RigError::Parse(ParseError::MissingLines { .. }))
        ));
    }
}
