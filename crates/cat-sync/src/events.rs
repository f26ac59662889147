//! Events emitted by the sync loop
//!
//! Every action a cycle takes is recorded as a [`SyncEvent`]. Observers
//! (logging, tests) drain them after each cycle.

use cat_websdr::WaterfallZoom;

/// Something the sync loop did or skipped
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The waterfall was zoomed ahead of a large jump
    ZoomForced {
        /// Preset applied
        zoom: WaterfallZoom,
        /// Size of the jump that triggered it (Hz)
        jump_hz: f64,
    },

    /// The page was tuned to the radio's frequency
    RemoteFrequencySet {
        /// Frequency pushed (Hz)
        hz: f64,
    },

    /// The page mode was set from the radio's mode
    RemoteModeSet {
        /// Hamlib mode that triggered the push
        radio_mode: String,
        /// WebSDR mode pushed
        remote_mode: String,
    },

    /// The radio's passband changed (not propagated)
    BandwidthChanged {
        /// New passband
        bandwidth: String,
    },

    /// The radio was tuned to the page's frequency
    RadioFrequencySet {
        /// Frequency pushed (Hz)
        hz: f64,
        /// Radio frequency it replaced (Hz)
        previous_hz: f64,
    },

    /// A cycle step failed with a transient error and was skipped
    CycleSkipped {
        /// Endpoint that failed
        endpoint: &'static str,
        /// Error description
        reason: String,
    },
}
