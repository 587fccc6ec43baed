//! Account existence check.

use log::debug;

use super::command;
use super::session::Session;
use crate::error::Result;

/// Query whether the account `username` exists on the device.
///
/// True iff `username` occurs anywhere in the listing output. Transport
/// and command errors are returned to the caller.
pub async fn probe<S: Session>(session: &mut S, username: &str) -> Result<bool> {
    let output = session.send(&command::print_user(username)).await?;
    let present = memchr::memmem::find(output.as_bytes(), username.as_bytes()).is_some();
    debug!("probe '{}': present={}", username, present);
    Ok(present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::testing::FakeDevice;

    #[tokio::test]
    async fn test_probe_finds_existing_account() {
        let device = FakeDevice::with_users(&["admin", "svc"]);
        let mut session = device.session();

        assert!(probe(&mut session, "svc").await.unwrap());
        assert_eq!(device.commands(), vec!["/user print where name=svc"]);
    }

    #[tokio::test]
    async fn test_probe_missing_account() {
        let device = FakeDevice::with_users(&["admin"]);
        let mut session = device.session();

        assert!(!probe(&mut session, "svc").await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_propagates_command_error() {
        let device = FakeDevice::with_users(&["admin"]).fail_commands_containing("print");
        let mut session = device.session();

        assert!(probe(&mut session, "svc").await.is_err());
    }
}
