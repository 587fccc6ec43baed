//! Generic driver implementation that works with any platform.

use std::time::{Duration, Instant};

use log::{debug, warn};
use regex::bytes::Regex;

use super::Driver;
use super::response::Response;
use crate::channel::{PtyChannel, PtyConfig};
use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::SshTransport;
use crate::transport::config::SshConfig;

/// An open SSH connection and its interactive shell.
struct Connection {
    transport: SshTransport,
    channel: PtyChannel,
}

/// Generic driver that works with any platform definition.
///
/// This is the main driver implementation that handles:
/// - SSH transport management
/// - Login challenges shown before the first prompt
/// - Command execution with prompt detection
/// - Vendor-specific output normalization
pub struct GenericDriver {
    /// SSH configuration.
    ssh_config: SshConfig,

    /// Platform definition.
    platform: PlatformDefinition,

    /// Connection (None when disconnected).
    connection: Option<Connection>,

    /// Default timeout for operations.
    timeout: Duration,

    /// Prompt pattern combined with every login challenge pattern.
    login_pattern: Regex,
}

impl GenericDriver {
    /// Create a new generic driver.
    pub fn new(ssh_config: SshConfig, platform: PlatformDefinition) -> Self {
        let timeout = ssh_config.timeout;

        let login_pattern = Self::build_login_pattern(&platform);

        Self {
            ssh_config,
            platform,
            connection: None,
            timeout,
            login_pattern,
        }
    }

    /// Build a regex that matches either the prompt or any login challenge.
    fn build_login_pattern(platform: &PlatformDefinition) -> Regex {
        let patterns: Vec<String> = std::iter::once(&platform.prompt_pattern)
            .chain(platform.login_challenges.iter().map(|c| &c.pattern))
            .map(|pattern| format!("(?:{})", pattern.as_str()))
            .collect();

        Regex::new(&patterns.join("|")).unwrap_or_else(|_| platform.prompt_pattern.clone())
    }

    /// Get the host this driver connects to.
    pub fn host(&self) -> &str {
        &self.ssh_config.host
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Wait for the first prompt, answering login challenges on the way.
    async fn await_initial_prompt(&mut self) -> Result<()> {
        let connection = self.connection.as_mut().ok_or(DriverError::NotConnected)?;

        // Each challenge is expected at most once before the prompt
        for _ in 0..=self.platform.login_challenges.len() {
            let data = connection
                .channel
                .read_until_pattern(&self.login_pattern, self.timeout)
                .await?;

            if self.platform.prompt_pattern.is_match(&data) {
                return Ok(());
            }

            match self
                .platform
                .login_challenges
                .iter()
                .find(|challenge| challenge.pattern.is_match(&data))
            {
                Some(challenge) => {
                    debug!("{}: answering login challenge", self.ssh_config.host);
                    connection.channel.send(&challenge.response).await?;
                }
                None => break,
            }
        }

        connection
            .channel
            .read_until_pattern(&self.platform.prompt_pattern, self.timeout)
            .await?;
        Ok(())
    }
}

impl Driver for GenericDriver {
    async fn open(&mut self) -> Result<()> {
        if self.connection.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        let transport = SshTransport::connect(self.ssh_config.clone()).await?;
        let channel = transport.open_channel().await?;
        let channel = PtyChannel::new(
            channel,
            PtyConfig {
                return_sequence: self.platform.return_sequence.clone(),
                ..PtyConfig::default()
            },
        );
        self.connection = Some(Connection { transport, channel });

        self.await_initial_prompt().await?;
        debug!("{}: session ready", self.ssh_config.host);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut connection) = self.connection.take() else {
            return Ok(());
        };

        for cmd in &self.platform.on_close_commands {
            if let Err(e) = connection.channel.send(cmd).await {
                debug!("{}: '{}' not delivered: {}", self.ssh_config.host, cmd, e);
            }
        }

        // The device may already have dropped the session after /quit
        if connection.transport.is_alive() {
            if let Err(e) = connection.transport.close().await {
                warn!("{}: disconnect failed: {}", self.ssh_config.host, e);
            }
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<Response> {
        let connection = self.connection.as_mut().ok_or(DriverError::NotConnected)?;

        let start = Instant::now();

        connection.channel.clear_buffer();
        connection.channel.send(command).await?;

        let data = connection
            .channel
            .read_until_pattern(&self.platform.prompt_pattern, self.timeout)
            .await?;

        let elapsed = start.elapsed();
        let raw_result = String::from_utf8_lossy(&data).to_string();

        let prompt = self
            .platform
            .prompt_pattern
            .find(data.as_slice())
            .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
            .unwrap_or_default();

        let result = self.platform.behavior.normalize_output(&raw_result, command);
        debug!(
            "{}: {} bytes of output in {:?}",
            self.ssh_config.host,
            result.len(),
            elapsed
        );

        let response = Response::new(command, result, raw_result, prompt, elapsed);
        match self.platform.find_failure(&response.result) {
            Some(failure) => Ok(response.with_failure(failure)),
            None => Ok(response),
        }
    }

    fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    fn is_alive(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|connection| connection.transport.is_alive())
    }
}
