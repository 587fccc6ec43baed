mod cli;
mod input;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::{Term, style};
use fleetuser::reconcile::{
    ConsoleReporter, Credentials, DesiredState, FleetOrchestrator, LogFileReporter, Mode,
    MultiReporter, ReconcileConfig, SshConnector,
};
use log::warn;

use cli::{Cli, ModeArg};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let term = Term::stdout();

    let devices = match &cli.file {
        Some(path) => input::read_device_file(path)?,
        None => input::read_devices_interactive(&term)?,
    };
    if devices.is_empty() {
        warn!("device list is empty");
    }

    let login = match &cli.login {
        Some(login) => login.clone(),
        None => input::prompt(&term, "Login for MikroTik:")?,
    };
    let password = input::prompt_secret(&term, "Password:")?;
    let target = match &cli.target {
        Some(target) => target.trim().to_string(),
        None => input::prompt(&term, "Account to create or delete:")?,
    };
    if target.is_empty() {
        bail!("account name must not be empty");
    }

    let desired = match cli.mode {
        ModeArg::Create => {
            let new_password = input::prompt_secret(&term, "Password for the new account:")?;
            DesiredState::present(&target, new_password, &cli.group)
                .with_allowed_addresses(cli.address.as_deref().unwrap_or_default())
        }
        ModeArg::Delete => DesiredState::absent(&target),
    };

    let log_path = log_path(&cli.log_dir, desired.mode(), desired.username());
    let log = LogFileReporter::open(&log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;
    let mut reporter = MultiReporter::new()
        .with(log)
        .with(ConsoleReporter::with_term(term.clone()));

    let mut connector = SshConnector::new()
        .port(cli.port)
        .timeout(Duration::from_secs(cli.timeout))
        .host_key_verification(cli.host_key_checking.into());
    if let Some(path) = &cli.known_hosts {
        connector = connector.known_hosts_path(path.clone());
    }

    let config = ReconcileConfig::default()
        .with_max_attempts(cli.attempts)
        .with_retry_delay(Duration::from_millis(cli.delay_ms))
        .with_concurrency(cli.concurrency);

    let orchestrator = FleetOrchestrator::new(connector, config);
    let credentials = Credentials::new(login, password);
    let report = orchestrator
        .run(&devices, &credentials, &desired, &mut reporter)
        .await;

    if cli.json {
        term.write_line(&serde_json::to_string_pretty(&report)?)?;
    }

    term.write_line("")?;
    term.write_line(
        &style(format!("[✓] Done. Log saved to {}", log_path.display()))
            .bold()
            .to_string(),
    )?;
    Ok(())
}

/// Initialize logging (RUST_LOG overrides the verbosity flags).
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// `<dir>/<mode>_<account>.log`, with characters unsafe in file names replaced.
fn log_path(dir: &Path, mode: Mode, username: &str) -> PathBuf {
    let account: String = username
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("{}_{}.log", mode, account))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path() {
        assert_eq!(
            log_path(Path::new("logs"), Mode::Create, "svc"),
            PathBuf::from("logs/create_svc.log")
        );
        assert_eq!(
            log_path(Path::new("logs"), Mode::Delete, "../etc/x"),
            PathBuf::from("logs/delete_.._etc_x.log")
        );
    }
}
