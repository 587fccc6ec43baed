//! Device session contracts and their SSH implementation.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use super::command;
use super::model::{Credentials, DeviceTarget};
use crate::driver::{Driver, DriverBuilder, GenericDriver};
use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::platform::vendors::mikrotik;
use crate::transport::HostKeyVerification;

/// An open command session on one device.
pub trait Session: Send {
    /// Send a command and return the device's textual response.
    ///
    /// Fails if the transport fails or the device rejects the command.
    fn send(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// End the session.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens sessions on devices.
pub trait Connector: Send + Sync {
    type Session: Session;

    /// Open an authenticated session on `target`.
    fn open(
        &self,
        target: &DeviceTarget,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// Opens SSH sessions to RouterOS devices.
#[derive(Debug, Clone)]
pub struct SshConnector {
    port: u16,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    platform: PlatformDefinition,
}

impl SshConnector {
    pub fn new() -> Self {
        Self {
            port: 22,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            platform: mikrotik::platform(),
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connection and command timeout (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Use a custom platform definition (prompt, login quirks).
    pub fn platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = platform;
        self
    }
}

impl Default for SshConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for SshConnector {
    type Session = GenericDriver;

    async fn open(&self, target: &DeviceTarget, credentials: &Credentials) -> Result<GenericDriver> {
        let mut builder = DriverBuilder::new(target.address())
            .port(self.port)
            .username(&credentials.username)
            .secret_password(credentials.password.clone())
            .platform(self.platform.clone())
            .timeout(self.timeout)
            .host_key_verification(self.host_key_verification);
        if let Some(path) = &self.known_hosts_path {
            builder = builder.known_hosts_path(path.clone());
        }

        let mut driver = builder.build()?;
        driver.open().await?;
        debug!(
            "{}: {} session open as {}",
            driver.host(),
            driver.platform().name,
            credentials.username
        );
        Ok(driver)
    }
}

impl Session for GenericDriver {
    async fn send(&mut self, command: &str) -> Result<String> {
        let response = Driver::send_command(self, command).await?;
        match response.failure_message {
            Some(message) => Err(DriverError::CommandFailed {
                command: command::redact(command),
                message,
            }
            .into()),
            None => Ok(response.result),
        }
    }

    async fn close(&mut self) -> Result<()> {
        Driver::close(self).await
    }
}
