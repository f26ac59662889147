//! The remote endpoint seam
//!
//! [`RemoteGateway`] is what the sync loop drives. [`WebSdr`] implements it
//! for any [`ScriptBridge`] by rendering page calls and converting units.

use std::future::Future;

use tracing::debug;

use crate::bridge::ScriptBridge;
use crate::error::RemoteError;
use crate::script::{khz_to_hz, SdrScript, WaterfallZoom};

/// Name of the page's frequency input
pub const FREQUENCY_FIELD: &str = "frequency";

/// What can be read back from the remote page
///
/// Mode is write-only: the page's mode buttons cannot be queried reliably.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteState {
    /// Frequency shown in the page's input field, in Hz
    pub frequency_hz: f64,
}

/// Read/write access to the remote receiver page
///
/// Setters are fire-and-forget: they return once the script ran, not once
/// the page has caught up.
pub trait RemoteGateway: Send {
    /// Read the page's frequency field in Hz
    fn read_displayed_frequency(
        &mut self,
    ) -> impl Future<Output = Result<f64, RemoteError>> + Send;

    /// Tune the page
    fn set_frequency(&mut self, hz: f64) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Select a demodulation mode by its page name
    fn set_mode(&mut self, mode: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Change the waterfall span
    fn set_zoom(
        &mut self,
        zoom: WaterfallZoom,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// One-time waterfall setup after the page has loaded
    fn apply_display_settings(
        &mut self,
        height: u32,
        speed: u32,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Read everything the page exposes
    fn read_state(&mut self) -> impl Future<Output = Result<RemoteState, RemoteError>> + Send {
        async move {
            let frequency_hz = self.read_displayed_frequency().await?;
            Ok(RemoteState { frequency_hz })
        }
    }
}

/// WebSDR page driven through a script bridge
pub struct WebSdr<B> {
    bridge: B,
}

impl<B: ScriptBridge> WebSdr<B> {
    /// Wrap a bridge to a loaded WebSDR page
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    /// Unwrap the underlying bridge
    pub fn into_inner(self) -> B {
        self.bridge
    }

    async fn run(&mut self, script: SdrScript) -> Result<(), RemoteError> {
        let source = script.render();
        debug!("WebSDR <- {}", source);
        self.bridge.execute(&source).await
    }
}

impl<B: ScriptBridge> RemoteGateway for WebSdr<B> {
    async fn read_displayed_frequency(&mut self) -> Result<f64, RemoteError> {
        let raw = self
            .bridge
            .read_field(FREQUENCY_FIELD)
            .await?
            .ok_or_else(|| RemoteError::FieldMissing(FREQUENCY_FIELD.to_string()))?;

        parse_khz(&raw)
            .map(khz_to_hz)
            .ok_or(RemoteError::InvalidField {
                field: FREQUENCY_FIELD.to_string(),
                value: raw,
            })
    }

    async fn set_frequency(&mut self, hz: f64) -> Result<(), RemoteError> {
        self.run(SdrScript::set_frequency_hz(hz)).await
    }

    async fn set_mode(&mut self, mode: &str) -> Result<(), RemoteError> {
        self.run(SdrScript::SetMode(mode.to_string())).await
    }

    async fn set_zoom(&mut self, zoom: WaterfallZoom) -> Result<(), RemoteError> {
        self.run(SdrScript::SetZoom(zoom)).await
    }

    async fn apply_display_settings(&mut self, height: u32, speed: u32) -> Result<(), RemoteError> {
        self.run(SdrScript::DisplaySettings { height, speed }).await
    }
}

/// Parse the field text as a finite kHz value
fn parse_khz(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|khz| khz.is_finite() && *khz >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_khz() {
        assert_eq!(parse_khz("14313.00"), Some(14313.0));
        assert_eq!(parse_khz(" 7100 "), Some(7100.0));
        assert_eq!(parse_khz(""), None);
        assert_eq!(parse_khz("abc"), None);
        assert_eq!(parse_khz("inf"), None);
        assert_eq!(parse_khz("-5"), None);
    }
}
