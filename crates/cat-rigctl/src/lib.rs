//! Radio Control Gateway
//!
//! This crate reads and tunes a physical radio through the hamlib control
//! programs. Two transports are provided behind the [`RadioGateway`] trait:
//!
//! - **[`Rigctl`]**: spawns a short-lived `rigctl` client per operation
//! - **[`RigctldClient`]**: keeps a line-protocol connection to `rigctld`
//!
//! Replies are parsed into typed values: frequency in Hz, mode name and
//! passband. The [`daemon`] module handles the rigctld singleton check and
//! background launch.
//!
//! # Example
//!
//! ```rust,no_run
//! use cat_rigctl::{RadioGateway, RigConfig, Rigctl};
//!
//! # async fn example() -> Result<(), cat_rigctl::RigError> {
//! let mut rig = Rigctl::new(RigConfig::default());
//! let state = rig.read_state().await?;
//! println!("{} Hz {} ({})", state.frequency_hz, state.mode, state.bandwidth);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod daemon;
pub mod error;
pub mod gateway;
pub mod launcher;
pub mod reply;
pub mod rigctl;
pub mod rigctld;

pub use command::RigCommand;
pub use config::{RigConfig, RigTransport};
pub use daemon::{ensure_daemon, DaemonStatus};
pub use error::{ParseError, RigError};
pub use gateway::{RadioGateway, RadioState};
pub use rigctl::Rigctl;
pub use rigctld::RigctldClient;
