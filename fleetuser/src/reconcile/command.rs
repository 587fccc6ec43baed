//! RouterOS `/user` command formats.

use secrecy::{ExposeSecret, SecretString};

/// List the account named `username`.
pub fn print_user(username: &str) -> String {
    format!("/user print where name={}", username)
}

/// Create an account. `addresses` is omitted from the command when empty.
pub fn add_user(
    username: &str,
    password: &SecretString,
    group: &str,
    addresses: &[String],
) -> String {
    let mut cmd = format!(
        "/user add name={} password={} group={}",
        username,
        password.expose_secret(),
        group
    );
    if !addresses.is_empty() {
        cmd.push_str(" address=");
        cmd.push_str(&addresses.join(","));
    }
    cmd
}

/// Remove the account named `username`.
pub fn remove_user(username: &str) -> String {
    format!("/user remove {}", username)
}

/// Mask the value of any `password=` argument.
pub fn redact(command: &str) -> String {
    command
        .split(' ')
        .map(|token| match token.split_once('=') {
            Some(("password", _)) => "password=******",
            _ => token,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
