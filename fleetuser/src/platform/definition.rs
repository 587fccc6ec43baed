//! Platform definition for vendor-specific configurations.

use std::fmt;
use std::sync::Arc;

use regex::bytes::Regex;

use super::VendorBehavior;

/// A prompt the device may show during login, before the first CLI prompt,
/// together with the answer to send.
#[derive(Debug, Clone)]
pub struct LoginChallenge {
    /// Pattern identifying the challenge.
    pub pattern: Regex,

    /// Input sent when the pattern is seen.
    pub response: String,
}

impl LoginChallenge {
    /// Create a new login challenge.
    pub fn new(pattern: &str, response: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            response: response.into(),
        })
    }
}

/// Platform definition containing all vendor-specific configuration.
#[derive(Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "mikrotik_routeros").
    pub name: String,

    /// Pattern matching the CLI prompt at the end of the output.
    pub prompt_pattern: Regex,

    /// Patterns that indicate command failure.
    pub failed_when_contains: Vec<String>,

    /// Commands to run before connection is closed.
    pub on_close_commands: Vec<String>,

    /// Prompts answered during login.
    pub login_challenges: Vec<LoginChallenge>,

    /// Appended to the login username (RouterOS console options).
    pub username_suffix: String,

    /// Line terminator sent after every command.
    pub return_sequence: String,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Vendor-specific output handling.
    pub behavior: Arc<dyn VendorBehavior>,
}

impl PlatformDefinition {
    /// Create a new platform definition with minimal required fields.
    pub fn new(
        name: impl Into<String>,
        prompt_pattern: &str,
        behavior: Arc<dyn VendorBehavior>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            prompt_pattern: Regex::new(prompt_pattern)?,
            failed_when_contains: vec![],
            on_close_commands: vec![],
            login_challenges: vec![],
            username_suffix: String::new(),
            return_sequence: "\n".to_string(),
            terminal_width: 511,
            terminal_height: 24,
            behavior,
        })
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Add an on_close command.
    pub fn with_on_close_command(mut self, command: impl Into<String>) -> Self {
        self.on_close_commands.push(command.into());
        self
    }

    /// Add a login challenge.
    pub fn with_login_challenge(mut self, challenge: LoginChallenge) -> Self {
        self.login_challenges.push(challenge);
        self
    }

    /// Set the login username suffix.
    pub fn with_username_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.username_suffix = suffix.into();
        self
    }

    /// Set the line terminator.
    pub fn with_return_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.return_sequence = sequence.into();
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Return the first output line containing a failure pattern.
    pub fn find_failure(&self, output: &str) -> Option<String> {
        output
            .lines()
            .find(|line| self.failed_when_contains.iter().any(|p| line.contains(p.as_str())))
            .map(|line| line.trim().to_string())
    }

    /// Login username with the platform suffix applied.
    pub fn login_username(&self, username: &str) -> String {
        if self.username_suffix.is_empty() || username.ends_with(&self.username_suffix) {
            username.to_string()
        } else {
            format!("{}{}", username, self.username_suffix)
        }
    }
}

impl fmt::Debug for PlatformDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformDefinition")
            .field("name", &self.name)
            .field("prompt_pattern", &self.prompt_pattern)
            .field("failed_when_contains", &self.failed_when_contains)
            .field("on_close_commands", &self.on_close_commands)
            .field("login_challenges", &self.login_challenges)
            .field("username_suffix", &self.username_suffix)
            .field("terminal_width", &self.terminal_width)
            .field("terminal_height", &self.terminal_height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passthrough;

    impl VendorBehavior for Passthrough {
        fn normalize_output(&self, raw: &str, _command: &str) -> String {
            raw.to_string()
        }
    }

    fn platform() -> PlatformDefinition {
        PlatformDefinition::new("test", r">\s*$", Arc::new(Passthrough)).unwrap()
    }

    #[test]
    fn test_find_failure_returns_offending_line() {
        let platform = platform().with_failure_pattern("failure:");

        let output = "some header\nfailure: user with the same name already exists\n";
        assert_eq!(
            platform.find_failure(output).as_deref(),
            Some("failure: user with the same name already exists")
        );
        assert!(platform.find_failure("all good").is_none());
    }

    #[test]
    fn test_login_username_suffix_applied_once() {
        let platform = platform().with_username_suffix("+ct");

        assert_eq!(platform.login_username("admin"), "admin+ct");
        assert_eq!(platform.login_username("admin+ct"), "admin+ct");
    }
}
