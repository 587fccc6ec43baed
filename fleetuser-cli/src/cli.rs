use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use fleetuser::HostKeyVerification;

#[derive(Parser, Debug)]
#[command(name = "fleetuser", version)]
#[command(about = "Create or remove a user account across MikroTik RouterOS devices", long_about = None)]
pub struct Cli {
    /// Whether the account should exist (create) or not (delete)
    #[arg(long, value_enum)]
    pub mode: ModeArg,

    /// File with one device address per line (prompts for addresses when omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Group for the created account
    #[arg(long, default_value = "full")]
    pub group: String,

    /// Restrict the created account to these addresses (comma-separated)
    #[arg(long)]
    pub address: Option<String>,

    /// Login used to connect to the devices (prompted when omitted)
    #[arg(long)]
    pub login: Option<String>,

    /// Account to create or delete (prompted when omitted)
    #[arg(long)]
    pub target: Option<String>,

    /// SSH port
    #[arg(long, default_value_t = 22)]
    pub port: u16,

    /// Connection and command timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Probes allowed when confirming a change
    #[arg(long, default_value_t = 3)]
    pub attempts: u32,

    /// Pause between confirmation probes in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,

    /// Devices processed at the same time
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Directory for the run log
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,

    /// Host key checking against known_hosts
    #[arg(long, value_enum, default_value_t = HostKeyArg::AcceptNew)]
    pub host_key_checking: HostKeyArg,

    /// known_hosts file (defaults to ~/.ssh/known_hosts)
    #[arg(long)]
    pub known_hosts: Option<PathBuf>,

    /// Print the run report as JSON at the end
    #[arg(long)]
    pub json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Create,
    Delete,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKeyArg {
    Strict,
    AcceptNew,
    Disabled,
}

impl From<HostKeyArg> for HostKeyVerification {
    fn from(arg: HostKeyArg) -> Self {
        match arg {
            HostKeyArg::Strict => HostKeyVerification::Strict,
            HostKeyArg::AcceptNew => HostKeyVerification::AcceptNew,
            HostKeyArg::Disabled => HostKeyVerification::Disabled,
        }
    }
}
