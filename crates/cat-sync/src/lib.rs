//! Radio ⇄ WebSDR Sync Engine
//!
//! This crate keeps a CAT-controlled radio and a WebSDR page tuned to the
//! same frequency and mode.
//!
//! # Architecture
//!
//! The loop owns one [`RadioGateway`](cat_rigctl::RadioGateway) and one
//! [`RemoteGateway`](cat_websdr::RemoteGateway) and polls them in turn:
//!
//! - **Radio → page**: frequency, mode (translated) and a waterfall zoom-out
//!   ahead of large jumps
//! - **Page → radio**: frequency only, once it differs by more than 1 kHz
//!
//! A [`SyncCache`] holds what was last pushed so unchanged values are never
//! re-sent. Everything the loop does is recorded as a [`SyncEvent`].
//!
//! # Example
//!
//! ```rust,no_run
//! use cat_rigctl::{RigConfig, Rigctl};
//! use cat_sync::{SyncCommand, SyncLoop};
//! use cat_websdr::{WebDriverConfig, WebDriverSession, WebSdr};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let radio = Rigctl::new(RigConfig::default());
//! let session = WebDriverSession::start(&WebDriverConfig::default()).await?;
//! let mut sync = SyncLoop::new(radio, WebSdr::new(session));
//!
//! let (cmd_tx, cmd_rx) = mpsc::channel(1);
//! tokio::spawn(async move {
//!     let _ = tokio::signal::ctrl_c().await;
//!     let _ = cmd_tx.send(SyncCommand::Shutdown).await;
//! });
//! sync.run(cmd_rx).await?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod mode_map;
pub mod state;

pub use engine::{ModeDedupe, SyncCommand, SyncConfig, SyncLoop};
pub use error::SyncError;
pub use events::SyncEvent;
pub use mode_map::{translate, DEFAULT_REMOTE_MODE, MODE_TABLE};
pub use state::SyncCache;
