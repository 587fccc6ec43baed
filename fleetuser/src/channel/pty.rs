//! PTY channel abstraction for interactive sessions.

use std::time::Duration;

use log::trace;
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// Configuration for PTY channel behavior.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    /// Search depth for pattern matching.
    pub search_depth: usize,

    /// Line terminator appended to every input.
    pub return_sequence: String,
}

impl Default for PtyConfig {
    fn default() -> Self {
        Self {
            search_depth: 1000,
            return_sequence: "\n".to_string(),
        }
    }
}

/// High-level PTY channel for interactive device sessions.
///
/// This wraps the SSH shell channel and provides pattern-based
/// read operations with timeout handling.
pub struct PtyChannel {
    channel: Channel<Msg>,

    config: PtyConfig,

    /// Pattern buffer for accumulating output.
    buffer: PatternBuffer,
}

impl PtyChannel {
    /// Wrap an open shell channel.
    pub fn new(channel: Channel<Msg>, config: PtyConfig) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::new(config.search_depth),
            config,
        }
    }

    /// Send one line of input.
    pub async fn send(&mut self, input: &str) -> Result<()> {
        let line = format!("{}{}", input, self.config.return_sequence);
        self.channel
            .data(line.as_bytes())
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Read until `pattern` matches the tail of the buffered output.
    ///
    /// Returns everything read up to and including the match and leaves
    /// the buffer empty.
    pub async fn read_until_pattern(&mut self, pattern: &Regex, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = tokio::time::Instant::now() + timeout;

        while !self.buffer.tail_contains(pattern) {
            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?;

            match msg {
                Some(ChannelMsg::Data { data }) => {
                    trace!("received {} bytes", data.len());
                    self.buffer.extend(&data[..]);
                }
                Some(ChannelMsg::ExtendedData { data, .. }) => {
                    self.buffer.extend(&data[..]);
                }
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(_) => {}
            }
        }

        Ok(self.buffer.take())
    }

    /// Clear any output that has not been consumed yet.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }
}
