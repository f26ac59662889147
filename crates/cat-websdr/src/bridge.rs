//! Script bridge into the page
//!
//! The only two capabilities the gateway needs from a browser: run a piece
//! of JavaScript, and read the value of a named input field.

use std::future::Future;

use crate::error::RemoteError;

/// Scripting access to a loaded page
pub trait ScriptBridge: Send {
    /// Execute JavaScript in the page without waiting for any effect
    fn execute(&mut self, script: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Read the `value` of the first input named `name`
    ///
    /// Returns `None` when no such element exists.
    fn read_field(
        &mut self,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, RemoteError>> + Send;
}
