//! Builder for creating device drivers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::generic::GenericDriver;
use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::platform::vendors::mikrotik;
use crate::transport::config::{HostKeyVerification, SshConfig};

/// PTY terminal type; RouterOS ignores it once `+t` selects dumb mode.
const TERMINAL_TYPE: &str = "xterm";

/// Builder for constructing device drivers.
///
/// Defaults to the MikroTik RouterOS platform.
///
/// # Example
///
/// ```rust,no_run
/// use fleetuser::driver::{Driver, DriverBuilder};
///
/// # async fn example() -> Result<(), fleetuser::Error> {
/// let mut driver = DriverBuilder::new("192.168.88.1")
///     .username("admin")
///     .password("secret")
///     .build()?;
/// driver.open().await?;
/// let response = driver.send_command("/system identity print").await?;
/// println!("{}", response.result);
/// driver.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<SecretString>,
    platform: Option<PlatformDefinition>,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            password: None,
            platform: None,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set password authentication from an existing secret.
    pub fn secret_password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    /// Use a platform other than RouterOS.
    pub fn platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the connection and command timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Build the driver.
    ///
    /// This creates the driver but does not connect. Call `open()` on the
    /// returned driver to establish the connection.
    pub fn build(self) -> Result<GenericDriver> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;

        let password = self.password.ok_or_else(|| DriverError::InvalidConfig {
            message: "Password is required".to_string(),
        })?;

        let platform = self.platform.unwrap_or_else(mikrotik::platform);

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username: platform.login_username(&username),
            password,
            timeout: self.timeout,
            terminal_type: TERMINAL_TYPE.to_string(),
            terminal_width: platform.terminal_width,
            terminal_height: platform.terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(GenericDriver::new(ssh_config, platform))
    }
}
