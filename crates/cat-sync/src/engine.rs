//! Sync loop engine
//!
//! The core loop that mirrors the radio's frequency and mode onto the
//! WebSDR page and the page's frequency back onto the radio.
//!
//! Each cycle runs radio → page first, then page → radio. When both sides
//! moved since the last cycle the radio wins; the page's value is looked at
//! again next cycle and wins then if it is still different.

use std::collections::VecDeque;
use std::time::Duration;

use cat_rigctl::{RadioGateway, RadioState};
use cat_websdr::{RemoteGateway, WaterfallZoom};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::SyncError;
use crate::events::SyncEvent;
use crate::mode_map::translate;
use crate::state::SyncCache;

/// Oldest events are dropped beyond this many undrained entries
const MAX_BUFFERED_EVENTS: usize = 1024;

/// When a radio mode change counts as a change worth pushing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeDedupe {
    /// Push whenever the raw hamlib mode string changes, even if the page
    /// mode it maps to is the same (PKTUSB → USB pushes "USB" again)
    #[default]
    RawRadioMode,
    /// Push only when the translated page mode changes
    TranslatedMode,
}

/// Sync loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Pause after polling the radio (ms)
    pub poll_interval_ms: u64,
    /// Radio jumps larger than this zoom the waterfall out first (Hz)
    pub zoom_threshold_hz: f64,
    /// Page/radio differences up to this are treated as equal (Hz)
    pub remote_tolerance_hz: f64,
    /// Mode change detection policy
    pub mode_dedupe: ModeDedupe,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 20,
            zoom_threshold_hz: 1_000_000.0,
            remote_tolerance_hz: 1_000.0,
            mode_dedupe: ModeDedupe::RawRadioMode,
        }
    }
}

impl SyncConfig {
    /// Poll interval as a duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Commands accepted by a running sync loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    /// Stop after the current step
    Shutdown,
}

/// The sync loop
pub struct SyncLoop<R, W> {
    config: SyncConfig,
    radio: R,
    remote: W,
    cache: SyncCache,
    cycles: u64,
    event_buffer: VecDeque<SyncEvent>,
}

impl<R, W> SyncLoop<R, W>
where
    R: RadioGateway,
    W: RemoteGateway,
{
    /// Create a loop with default configuration
    pub fn new(radio: R, remote: W) -> Self {
        Self::with_config(SyncConfig::default(), radio, remote)
    }

    /// Create with custom configuration
    pub fn with_config(config: SyncConfig, radio: R, remote: W) -> Self {
        Self {
            config,
            radio,
            remote,
            cache: SyncCache::new(),
            cycles: 0,
            event_buffer: VecDeque::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Get the cached radio-side state
    pub fn cache(&self) -> &SyncCache {
        &self.cache
    }

    /// Number of cycles started so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Give back both gateways
    pub fn into_parts(self) -> (R, W) {
        (self.radio, self.remote)
    }

    /// Drain pending events
    pub fn drain_events(&mut self) -> Vec<SyncEvent> {
        self.event_buffer.drain(..).collect()
    }

    fn emit(&mut self, event: SyncEvent) {
        if self.event_buffer.len() >= MAX_BUFFERED_EVENTS {
            self.event_buffer.pop_front();
        }
        self.event_buffer.push_back(event);
    }

    /// Run one poll-compare-push cycle
    ///
    /// A failed step ends the cycle early. Cache fields are only updated
    /// after the push they describe succeeded.
    pub async fn run_cycle(&mut self) -> Result<(), SyncError> {
        self.cycles += 1;

        let radio = self.radio.read_state().await?;

        let pause = self.config.poll_interval();
        if pause.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(pause).await;
        }

        self.push_to_remote(&radio).await?;
        self.pull_from_remote(&radio).await?;
        Ok(())
    }

    /// Radio → page: zoom, frequency, mode
    async fn push_to_remote(&mut self, radio: &RadioState) -> Result<(), SyncError> {
        let jump_hz = self.cache.frequency_delta(radio);
        if jump_hz > self.config.zoom_threshold_hz {
            debug!("Jump of {:.0} Hz, zooming waterfall out", jump_hz);
            self.remote.set_zoom(WaterfallZoom::Max).await?;
            self.emit(SyncEvent::ZoomForced {
                zoom: WaterfallZoom::Max,
                jump_hz,
            });
        }

        if radio.frequency_hz != self.cache.last_radio_freq_hz {
            self.remote.set_frequency(radio.frequency_hz).await?;
            self.cache.last_radio_freq_hz = radio.frequency_hz;
            info!("Radio → WebSDR: {:.2} kHz", radio.frequency_hz / 1000.0);
            self.emit(SyncEvent::RemoteFrequencySet {
                hz: radio.frequency_hz,
            });
        }

        let remote_mode = translate(&radio.mode);
        if self.mode_changed(&radio.mode, remote_mode) {
            self.remote.set_mode(remote_mode).await?;
            self.cache.last_radio_mode = radio.mode.clone();
            self.cache.last_remote_mode = remote_mode.to_string();
            info!("Radio → WebSDR: mode {} ({})", remote_mode, radio.mode);
            self.emit(SyncEvent::RemoteModeSet {
                radio_mode: radio.mode.clone(),
                remote_mode: remote_mode.to_string(),
            });
        }

        // The page has no passband control; track it only
        if radio.bandwidth != self.cache.last_radio_bandwidth {
            debug!("Radio passband now {}", radio.bandwidth);
            self.cache.last_radio_bandwidth = radio.bandwidth.clone();
            self.emit(SyncEvent::BandwidthChanged {
                bandwidth: radio.bandwidth.clone(),
            });
        }

        Ok(())
    }

    fn mode_changed(&self, radio_mode: &str, remote_mode: &str) -> bool {
        match self.config.mode_dedupe {
            ModeDedupe::RawRadioMode => radio_mode != self.cache.last_radio_mode,
            ModeDedupe::TranslatedMode => remote_mode != self.cache.last_remote_mode,
        }
    }

    /// Page → radio: frequency only
    ///
    /// Compared against the radio reading of this cycle, so a change made
    /// on the radio is never mistaken for one made on the page.
    async fn pull_from_remote(&mut self, radio: &RadioState) -> Result<(), SyncError> {
        let remote = self.remote.read_state().await?;

        let drift_hz = (radio.frequency_hz - remote.frequency_hz).abs();
        if drift_hz > self.config.remote_tolerance_hz {
            self.radio.write_frequency(remote.frequency_hz).await?;
            info!("WebSDR → radio: {:.0} Hz", remote.frequency_hz);
            self.emit(SyncEvent::RadioFrequencySet {
                hz: remote.frequency_hz,
                previous_hz: radio.frequency_hz,
            });
        }

        Ok(())
    }

    /// Run cycles until shutdown or a fatal error
    ///
    /// Transient failures are logged and the cycle is retried after one poll
    /// interval. Returns `Ok` when a [`SyncCommand::Shutdown`] arrives or the
    /// command channel closes.
    pub async fn run(&mut self, mut cmd_rx: mpsc::Receiver<SyncCommand>) -> Result<(), SyncError> {
        info!("Sync loop started");

        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(SyncCommand::Shutdown) | None => {
                            info!("Sync loop stopping after {} cycles", self.cycles);
                            return Ok(());
                        }
                    }
                }

                result = self.run_cycle() => {
                    if let Err(e) = result {
                        if e.is_fatal() {
                            error!("Sync loop stopped: {}", e);
                            return Err(e);
                        }

                        warn!("Cycle {} skipped: {}", self.cycles, e);
                        self.emit(SyncEvent::CycleSkipped {
                            endpoint: e.endpoint(),
                            reason: e.to_string(),
                        });
                        tokio::time::sleep(self.config.poll_interval()).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cat_sim::{VirtualRadio, VirtualWebSdr};
    use cat_websdr::{SdrScript, WebSdr};

    fn fast_config() -> SyncConfig {
        SyncConfig {
            poll_interval_ms: 0,
            ..Default::default()
        }
    }

    fn setup() -> (
        VirtualRadio,
        VirtualWebSdr,
        SyncLoop<VirtualRadio, WebSdr<VirtualWebSdr>>,
    ) {
        let radio = VirtualRadio::new("Radio");
        let page = VirtualWebSdr::default();
        let sync = SyncLoop::with_config(fast_config(), radio.clone(), WebSdr::new(page.clone()));
        (radio, page, sync)
    }

    #[tokio::test]
    async fn test_first_cycle_pushes_everything() {
        let (radio, page, mut sync) = setup();
        radio.set_frequency(7_100_000.0);
        radio.set_mode("LSB", "2400");

        sync.run_cycle().await.unwrap();

        assert_eq!(
            page.calls(),
            vec![
                SdrScript::SetZoom(WaterfallZoom::Max),
                SdrScript::SetFrequency { khz: 7100.0 },
                SdrScript::SetMode("LSB".into()),
            ]
        );
        assert_eq!(sync.cache().last_radio_freq_hz, 7_100_000.0);
        assert_eq!(sync.cache().last_radio_mode, "LSB");
        assert_eq!(sync.cache().last_radio_bandwidth, "2400");
        assert!(radio.writes().is_empty());
    }

    #[tokio::test]
    async fn test_steady_state_is_quiet() {
        let (_radio, page, mut sync) = setup();

        sync.run_cycle().await.unwrap();
        page.take_calls();
        sync.drain_events();

        sync.run_cycle().await.unwrap();
        sync.run_cycle().await.unwrap();

        assert!(page.calls().is_empty());
        assert!(sync.drain_events().is_empty());
        assert_eq!(sync.cycles(), 3);
    }

    #[tokio::test]
    async fn test_failed_push_leaves_cache() {
        let (_radio, page, mut sync) = setup();
        page.close();

        let err = sync.run_cycle().await.unwrap_err();
        assert!(err.is_fatal());
        assert!(sync.cache().is_sentinel());
    }

    #[test]
    fn test_event_buffer_is_bounded() {
        let (_radio, _page, mut sync) = setup();
        for i in 0..(MAX_BUFFERED_EVENTS + 10) {
            sync.emit(SyncEvent::RemoteFrequencySet { hz: i as f64 });
        }

        let events = sync.drain_events();
        assert_eq!(events.len(), MAX_BUFFERED_EVENTS);
        assert_eq!(events[0], SyncEvent::RemoteFrequencySet { hz: 10.0 });
    }
}
