//! Sync Endpoint Simulation Library
//!
//! This crate provides virtual endpoints for testing the sync loop without
//! a radio or a browser. It includes:
//!
//! - **VirtualRadio**: answers frequency/mode queries like a rig behind rigctl
//! - **VirtualWebSdr**: runs WebSDR page scripts against a small page model
//!
//! Both are handles around shared state, so a test can keep one clone to
//! drive the endpoint while the loop owns another.
//!
//! # Example
//!
//! ```rust
//! use cat_sim::{VirtualRadio, VirtualWebSdr};
//! use cat_websdr::WebSdr;
//!
//! let radio = VirtualRadio::new("TS-590SG");
//! let page = VirtualWebSdr::default();
//! let _remote = WebSdr::new(page.clone());
//!
//! // Turn the dial and click the waterfall
//! radio.set_frequency(7_100_000.0);
//! radio.set_mode("LSB", "2400");
//! page.user_tune(7_150_000.0);
//! ```

pub mod page;
pub mod radio;

pub use page::VirtualWebSdr;
pub use radio::{RigFault, VirtualRadio, VirtualRadioConfig};
