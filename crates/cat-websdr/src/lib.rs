//! Remote Endpoint Gateway
//!
//! This crate drives a WebSDR receiver page in a browser. The page exposes
//! JavaScript entry points (`setfreqb`, `set_mode`, `wfset`, waterfall
//! settings) and a `frequency` input field showing the tuned frequency in
//! kHz.
//!
//! # Layers
//!
//! - [`RemoteGateway`]: frequency/mode/zoom operations in Hz, used by the
//!   sync loop
//! - [`WebSdr`]: implements the gateway by rendering [`SdrScript`] calls
//! - [`ScriptBridge`]: executes scripts and reads fields in a page
//! - [`WebDriverSession`]: a bridge over the W3C WebDriver protocol
//!
//! # Example
//!
//! ```rust,no_run
//! use cat_websdr::{RemoteGateway, WebDriverConfig, WebDriverSession, WebSdr};
//!
//! # async fn example() -> Result<(), cat_websdr::RemoteError> {
//! let mut session = WebDriverSession::start(&WebDriverConfig::default()).await?;
//! session.navigate("http://websdr.ewi.utwente.nl:8901/").await?;
//!
//! let mut sdr = WebSdr::new(session);
//! sdr.set_frequency(7_100_000.0).await?; // runs setfreqb(7100.00)
//! sdr.set_mode("LSB").await?;
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod error;
pub mod gateway;
pub mod script;
pub mod webdriver;

pub use bridge::ScriptBridge;
pub use error::RemoteError;
pub use gateway::{RemoteGateway, RemoteState, WebSdr, FREQUENCY_FIELD};
pub use script::{hz_to_khz, khz_to_hz, SdrScript, WaterfallZoom};
pub use webdriver::{WebDriverConfig, WebDriverSession};
