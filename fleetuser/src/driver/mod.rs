//! High-level driver for device interaction.
//!
//! The driver layer provides the main API for sending commands
//! to a device over an interactive shell.

mod builder;
mod generic;
pub(crate) mod response;

pub use builder::DriverBuilder;
pub use generic::GenericDriver;
pub use response::Response;

use std::future::Future;

use crate::error::Result;

/// Trait for device drivers.
pub trait Driver: Send + Sync {
    /// Open the connection to the device.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send a command and wait for the prompt.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Check if the driver is connected.
    fn is_open(&self) -> bool;

    /// Check if the underlying SSH session is still alive.
    ///
    /// Returns `false` if the driver is not connected, the peer stopped
    /// responding, or the server sent a disconnect.
    fn is_alive(&self) -> bool;
}
