//! Virtual WebSDR page
//!
//! Stands in for a browser tab with a WebSDR loaded. Scripts are parsed
//! back into [`SdrScript`] calls and applied to a small page model; the
//! `frequency` input reflects the last tuned value the way the real page
//! does. Wrap it in [`cat_websdr::WebSdr`] to get a remote gateway.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cat_websdr::{
    hz_to_khz, khz_to_hz, RemoteError, ScriptBridge, SdrScript, WaterfallZoom, FREQUENCY_FIELD,
};
use tracing::debug;

#[derive(Debug)]
struct PageInner {
    /// Text of the frequency input, `None` when the element is absent
    frequency_field: Option<String>,
    mode: Option<String>,
    zoom: Option<WaterfallZoom>,
    display: Option<(u32, u32)>,
    /// Every recognized call, oldest first
    calls: Vec<SdrScript>,
    closed: bool,
}

/// A simulated WebSDR page reachable through [`ScriptBridge`]
#[derive(Debug, Clone)]
pub struct VirtualWebSdr {
    inner: Arc<Mutex<PageInner>>,
}

impl VirtualWebSdr {
    /// A freshly loaded page showing `initial_khz`
    pub fn new(initial_khz: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PageInner {
                frequency_field: Some(format_khz(initial_khz)),
                mode: None,
                zoom: None,
                display: None,
                calls: Vec::new(),
                closed: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate the user clicking the waterfall at `hz`
    pub fn user_tune(&self, hz: f64) {
        self.state().frequency_field = Some(format_khz(hz_to_khz(hz)));
    }

    /// Overwrite the frequency input text (or remove the element)
    pub fn set_field_text(&self, text: Option<&str>) {
        self.state().frequency_field = text.map(str::to_string);
    }

    /// Frequency the page currently shows, in Hz
    pub fn frequency_hz(&self) -> Option<f64> {
        self.state()
            .frequency_field
            .as_deref()
            .and_then(|t| t.trim().parse::<f64>().ok())
            .map(khz_to_hz)
    }

    /// Last mode selected through the page
    pub fn mode(&self) -> Option<String> {
        self.state().mode.clone()
    }

    /// Last waterfall zoom preset selected
    pub fn zoom(&self) -> Option<WaterfallZoom> {
        self.state().zoom
    }

    /// Waterfall `(height, speed)` if display settings were applied
    pub fn display(&self) -> Option<(u32, u32)> {
        self.state().display
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<SdrScript> {
        self.state().calls.clone()
    }

    /// Drain the call log
    pub fn take_calls(&self) -> Vec<SdrScript> {
        std::mem::take(&mut self.state().calls)
    }

    /// Simulate the tab being closed
    pub fn close(&self) {
        self.state().closed = true;
    }

    fn check_open(&self) -> Result<(), RemoteError> {
        if self.state().closed {
            Err(RemoteError::Bridge(
                "no such window: target window already closed".into(),
            ))
        } else {
            Ok(())
        }
    }

    fn apply(&self, script: &str) -> Result<(), RemoteError> {
        self.check_open()?;

        let call = SdrScript::parse(script).ok_or_else(|| {
            RemoteError::Script(format!("javascript error: cannot run {:?}", script))
        })?;
        debug!("Virtual page running {}", script);

        let mut state = self.state();
        match &call {
            SdrScript::SetFrequency { khz } => {
                state.frequency_field = Some(format_khz(*khz));
            }
            SdrScript::SetMode(mode) => state.mode = Some(mode.clone()),
            SdrScript::SetZoom(zoom) => state.zoom = Some(*zoom),
            SdrScript::DisplaySettings { height, speed } => {
                state.display = Some((*height, *speed));
            }
        }
        state.calls.push(call);
        Ok(())
    }
}

impl Default for VirtualWebSdr {
    fn default() -> Self {
        Self::new(7000.0)
    }
}

impl ScriptBridge for VirtualWebSdr {
    async fn execute(&mut self, script: &str) -> Result<(), RemoteError> {
        self.apply(script)
    }

    async fn read_field(&mut self, name: &str) -> Result<Option<String>, RemoteError> {
        self.check_open()?;
        if name != FREQUENCY_FIELD {
            return Ok(None);
        }
        Ok(self.state().frequency_field.clone())
    }
}

/// The page shows kHz with two decimals
fn format_khz(khz: f64) -> String {
    format!("{:.2}", khz)
}
