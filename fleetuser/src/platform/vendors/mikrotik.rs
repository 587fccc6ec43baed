//! MikroTik RouterOS platform definition.
//!
//! RouterOS has a single CLI level; the prompt shows the user, the
//! device identity, and the current menu path:
//!
//! ```text
//! [admin@MikroTik] >
//! [admin@core-r1] /user>
//! [admin@core-r1] <SAFE>
//! ```
//!
//! Console behaviour is controlled by options appended to the login name.
//! `+ctw511h4098` disables colours and terminal auto-detection, switches to
//! dumb terminal mode, and sets a 511x4098 terminal.

use std::sync::Arc;

use crate::platform::{LoginChallenge, PlatformDefinition, VendorBehavior};

/// Platform name for MikroTik RouterOS.
pub const PLATFORM_NAME: &str = "mikrotik_routeros";

/// Console options appended to the login username.
pub const LOGIN_OPTIONS: &str = "+ctw511h4098";

const PROMPT_PATTERN: &str = r"\[[^\[\]\r\n]+@[^\[\]\r\n]+\][^\r\n]*>\s*$";

const LICENSE_CHALLENGE: &str = r"(?i)software license\?\s*\[Y/n\]:?\s*$";

/// Create the MikroTik RouterOS platform definition.
pub fn platform() -> PlatformDefinition {
    let license = LoginChallenge::new(LICENSE_CHALLENGE, "n").unwrap();

    PlatformDefinition::new(PLATFORM_NAME, PROMPT_PATTERN, Arc::new(RouterOsBehavior))
        .unwrap()
        .with_username_suffix(LOGIN_OPTIONS)
        .with_return_sequence("\r\n")
        .with_login_challenge(license)
        .with_failure_pattern("bad command name")
        .with_failure_pattern("expected end of command")
        .with_failure_pattern("syntax error")
        .with_failure_pattern("failure:")
        .with_failure_pattern("no such item")
        .with_failure_pattern("invalid value")
        .with_failure_pattern("input does not match any value")
        .with_on_close_command("/quit")
        .with_terminal_size(511, 4098)
}

/// RouterOS-specific output handling.
pub struct RouterOsBehavior;

impl RouterOsBehavior {
    fn is_prompt_line(line: &str) -> bool {
        let line = line.trim();
        line.starts_with('[') && line.ends_with('>')
    }
}

impl VendorBehavior for RouterOsBehavior {
    fn normalize_output(&self, raw: &str, command: &str) -> String {
        let text = raw.replace('\r', "");
        let mut lines: Vec<&str> = text.lines().collect();

        // The echoed command line, possibly preceded by the previous prompt
        if let Some(pos) = lines
            .iter()
            .position(|line| line.trim_end().ends_with(command.trim()))
        {
            lines.drain(..=pos);
        }

        if lines.last().is_some_and(|line| Self::is_prompt_line(line)) {
            lines.pop();
        }
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        while lines.first().is_some_and(|line| line.trim().is_empty()) {
            lines.remove(0);
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mikrotik_platform() {
        let platform = platform();
        assert_eq!(platform.name, "mikrotik_routeros");
        assert_eq!(platform.return_sequence, "\r\n");
        assert_eq!(platform.login_username("admin"), "admin+ctw511h4098");
        assert_eq!(platform.on_close_commands, vec!["/quit".to_string()]);
    }

    #[test]
    fn test_prompt_match() {
        let platform = platform();
        let prompt = &platform.prompt_pattern;

        assert!(prompt.is_match(b"[admin@MikroTik] > "));
        assert!(prompt.is_match(b"output line\r\n[admin@core-r1] /user> "));
        assert!(prompt.is_match(b"[admin@core-r1] <SAFE> "));
        assert!(!prompt.is_match(b"Flags: X - disabled\r\n"));
        assert!(!prompt.is_match(b"[admin@MikroTik] > /user print\r\n"));
    }

    #[test]
    fn test_license_challenge_match() {
        let platform = platform();
        let challenge = &platform.login_challenges[0];
        assert!(
            challenge
                .pattern
                .is_match(b"\r\nDo you want to see the software license? [Y/n]: ")
        );
        assert_eq!(challenge.response, "n");
    }

    #[test]
    fn test_failure_detection() {
        let platform = platform();
        assert_eq!(
            platform
                .find_failure("failure: user with the same name already exists")
                .as_deref(),
            Some("failure: user with the same name already exists")
        );
        assert!(platform.find_failure("bad command name remove (line 1 column 7)").is_some());
        assert!(platform.find_failure("Flags: X - DISABLED").is_none());
    }

    #[test]
    fn test_normalize_strips_echo_and_prompt() {
        let command = "/user print where name=svc";
        let raw = "/user print where name=svc\r\n\
                   Flags: X - DISABLED\r\n\
                   Columns: NAME, GROUP, LAST-LOGGED-IN\r\n\
                   #   NAME  GROUP\r\n\
                   0   svc   full\r\n\
                   \r\n\
                   [admin@r1] > ";

        let output = RouterOsBehavior.normalize_output(raw, command);
        assert!(output.starts_with("Flags: X - DISABLED"));
        assert!(output.ends_with("0   svc   full"));
        assert!(!output.contains("[admin@r1]"));
    }

    #[test]
    fn test_normalize_empty_listing_has_no_echo() {
        let command = "/user print where name=svc";
        let raw = "[admin@r1] > /user print where name=svc\r\n\r\n[admin@r1] > ";

        let output = RouterOsBehavior.normalize_output(raw, command);
        assert_eq!(output, "");
        assert!(!output.contains("svc"));
    }
}
