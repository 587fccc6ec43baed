//! Inputs and outputs of a reconciliation run.

use std::fmt;

use secrecy::SecretString;
use serde::Serialize;

use crate::error::{DriverError, Result};

/// A device to reconcile, identified by its management address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceTarget {
    address: String,
}

impl DeviceTarget {
    /// Create a target from an address (surrounding whitespace is dropped).
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            address: address.trim().to_string(),
        }
    }

    /// The management address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Login used to open a session on every device of a run.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Whether a run creates or deletes the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Create,
    Delete,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Create => "create",
            Mode::Delete => "delete",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The account state a run brings every device to.
#[derive(Debug, Clone)]
pub enum DesiredState {
    /// The account exists. Only existence is checked; an existing
    /// account's group, addresses, and password are left untouched.
    Present {
        username: String,
        password: SecretString,
        group: String,
        /// Normalized address restriction; empty means unrestricted.
        allowed_addresses: Vec<String>,
    },

    /// The account does not exist.
    Absent { username: String },
}

impl DesiredState {
    /// Desired presence of `username` in `group`, without address restriction.
    ///
    /// A blank name is accepted here and rejected by [`DesiredState::validate`]
    /// before any device is contacted.
    pub fn present(
        username: impl Into<String>,
        password: SecretString,
        group: impl Into<String>,
    ) -> Self {
        DesiredState::Present {
            username: username.into(),
            password,
            group: group.into(),
            allowed_addresses: Vec::new(),
        }
    }

    /// Desired absence of `username`.
    pub fn absent(username: impl Into<String>) -> Self {
        DesiredState::Absent {
            username: username.into(),
        }
    }

    /// Restrict a created account to the comma-separated addresses in `raw`.
    ///
    /// Has no effect on [`DesiredState::Absent`].
    pub fn with_allowed_addresses(self, raw: &str) -> Self {
        match self {
            DesiredState::Present {
                username,
                password,
                group,
                ..
            } => DesiredState::Present {
                username,
                password,
                group,
                allowed_addresses: normalize_address_list(raw),
            },
            absent => absent,
        }
    }

    /// The account name this state is about.
    pub fn username(&self) -> &str {
        match self {
            DesiredState::Present { username, .. } | DesiredState::Absent { username } => username,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            DesiredState::Present { .. } => Mode::Create,
            DesiredState::Absent { .. } => Mode::Delete,
        }
    }

    /// Whether the account should exist.
    pub fn expects_presence(&self) -> bool {
        matches!(self, DesiredState::Present { .. })
    }

    /// Reject states that cannot be applied to a device.
    ///
    /// A blank account name would match every listing and turn a removal
    /// into `/user remove ` with no target.
    pub fn validate(&self) -> Result<()> {
        if self.username().trim().is_empty() {
            return Err(DriverError::InvalidConfig {
                message: "account name must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Split a comma-separated address list, trimming entries and dropping
/// empty ones. Order and repeats are kept as given.
pub fn normalize_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// How loudly an outcome should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Notice,
    Warning,
    Error,
}

/// Terminal result for one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The desired state held before any action.
    AlreadySatisfied,

    /// A change was issued and confirmed.
    Applied,

    /// A change was issued but not observed within the confirmation budget.
    ApplyUnconfirmed,

    /// The session could not be opened or a command failed.
    ConnectionFailed(String),
}

impl OutcomeKind {
    /// Short machine-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeKind::AlreadySatisfied => "already_satisfied",
            OutcomeKind::Applied => "applied",
            OutcomeKind::ApplyUnconfirmed => "apply_unconfirmed",
            OutcomeKind::ConnectionFailed(_) => "connection_failed",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            OutcomeKind::AlreadySatisfied => Severity::Notice,
            OutcomeKind::Applied => Severity::Success,
            OutcomeKind::ApplyUnconfirmed => Severity::Warning,
            OutcomeKind::ConnectionFailed(_) => Severity::Error,
        }
    }
}

/// The result record for one device in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    address: String,
    mode: Mode,
    username: String,
    #[serde(flatten)]
    kind: OutcomeKind,
    message: String,
}

impl Outcome {
    /// Build the outcome record for `target`, deriving the operator message.
    pub fn new(target: &DeviceTarget, desired: &DesiredState, kind: OutcomeKind) -> Self {
        let user = desired.username();
        let ip = target.address();
        let mode = desired.mode();

        let message = match (&kind, mode) {
            (OutcomeKind::AlreadySatisfied, Mode::Create) => {
                format!("[-] User {user} already exists on {ip}")
            }
            (OutcomeKind::AlreadySatisfied, Mode::Delete) => {
                format!("[~] User {user} not found on {ip}")
            }
            (OutcomeKind::Applied, Mode::Create) => format!("[+] User {user} created on {ip}"),
            (OutcomeKind::Applied, Mode::Delete) => format!("[+] User {user} removed from {ip}"),
            (OutcomeKind::ApplyUnconfirmed, Mode::Create) => {
                format!("[!] Could not confirm creation of {user} on {ip}")
            }
            (OutcomeKind::ApplyUnconfirmed, Mode::Delete) => {
                format!("[!] Could not confirm removal of {user} on {ip}")
            }
            (OutcomeKind::ConnectionFailed(detail), _) => {
                format!("[X] Connection error on {ip}: {detail}")
            }
        };

        Self {
            address: ip.to_string(),
            mode,
            username: user.to_string(),
            kind,
            message,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn kind(&self) -> &OutcomeKind {
        &self.kind
    }

    /// Human-readable description of the outcome.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Per-kind outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub already_satisfied: usize,
    pub applied: usize,
    pub unconfirmed: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Whether any device needs an operator's attention.
    pub fn has_problems(&self) -> bool {
        self.unconfirmed > 0 || self.failed > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} device(s): {} applied, {} already satisfied, {} unconfirmed, {} failed",
            self.total, self.applied, self.already_satisfied, self.unconfirmed, self.failed
        )
    }
}

/// Outcomes of a run, one per device, in device-list order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    outcomes: Vec<Outcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn summary(&self) -> RunSummary {
        self.outcomes
            .iter()
            .fold(RunSummary::default(), |mut summary, outcome| {
                summary.total += 1;
                match outcome.kind() {
                    OutcomeKind::AlreadySatisfied => summary.already_satisfied += 1,
                    OutcomeKind::Applied => summary.applied += 1,
                    OutcomeKind::ApplyUnconfirmed => summary.unconfirmed += 1,
                    OutcomeKind::ConnectionFailed(_) => summary.failed += 1,
                }
                summary
            })
    }
}
