//! Sync loop state tracking

use cat_rigctl::RadioState;

/// What the loop last pushed to, or confirmed from, the radio side
///
/// Starts at a zero sentinel so the first poll always differs and the page
/// gets an initial push.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncCache {
    /// Last radio frequency pushed to the page (Hz)
    pub last_radio_freq_hz: f64,
    /// Last radio mode (raw hamlib name) that triggered a mode push
    pub last_radio_mode: String,
    /// Last WebSDR mode name pushed to the page
    pub last_remote_mode: String,
    /// Last passband reported by the radio
    pub last_radio_bandwidth: String,
}

impl SyncCache {
    /// Cache in its initial sentinel state
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing has been pushed yet
    pub fn is_sentinel(&self) -> bool {
        self.last_radio_freq_hz == 0.0 && self.last_radio_mode.is_empty()
    }

    /// Distance between a radio reading and the cached frequency
    pub fn frequency_delta(&self, radio: &RadioState) -> f64 {
        (radio.frequency_hz - self.last_radio_freq_hz).abs()
    }
}
