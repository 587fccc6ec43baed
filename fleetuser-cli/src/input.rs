//! Device list and credential input.

use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use anyhow::{Context, Result, bail};
use console::{Term, style};
use fleetuser::DeviceTarget;
use secrecy::SecretString;

/// Word that ends interactive device entry.
const END_OF_LIST: &str = "end";

/// One device per non-blank line.
pub fn parse_device_list(text: &str) -> Vec<DeviceTarget> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(DeviceTarget::new)
        .collect()
}

pub fn read_device_file(path: &Path) -> Result<Vec<DeviceTarget>> {
    if !path.exists() {
        bail!("device file {} not found", path.display());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read device file {}", path.display()))?;
    Ok(parse_device_list(&text))
}

/// Collect device addresses until a line reading `end` (any case) or end of input.
pub fn collect_until_end<I>(lines: I) -> io::Result<Vec<DeviceTarget>>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut devices = Vec::new();
    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.eq_ignore_ascii_case(END_OF_LIST) {
            break;
        }
        if !line.is_empty() {
            devices.push(DeviceTarget::new(line));
        }
    }
    Ok(devices)
}

/// Ask for device addresses on standard input.
pub fn read_devices_interactive(term: &Term) -> Result<Vec<DeviceTarget>> {
    term.write_line(
        &style("Enter device addresses, one per line. Type 'end' to finish:")
            .yellow()
            .to_string(),
    )?;
    let stdin = io::stdin();
    collect_until_end(stdin.lock().lines()).context("cannot read device addresses")
}

/// Prompt for a non-empty line of text.
pub fn prompt(term: &Term, label: &str) -> Result<String> {
    term.write_str(&format!("{} ", label))?;
    let value = term.read_line()?.trim().to_string();
    if value.is_empty() {
        bail!("{} must not be empty", label.trim_end_matches(':'));
    }
    Ok(value)
}

/// Prompt for a password without echo.
pub fn prompt_secret(term: &Term, label: &str) -> Result<SecretString> {
    term.write_str(&format!("{} ", label))?;
    let value = term.read_secure_line()?;
    Ok(SecretString::from(value))
}
