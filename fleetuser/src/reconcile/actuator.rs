//! Decide and issue the single corrective command.

use log::info;

use super::command;
use super::model::DesiredState;
use super::session::Session;
use crate::error::Result;

/// What [`reconcile`] sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTaken {
    NoOp,
    CreateIssued,
    DeleteIssued,
}

impl ActionTaken {
    /// Presence the account should show once the action took effect.
    /// `None` when nothing was sent.
    pub fn expected_presence(&self) -> Option<bool> {
        match self {
            ActionTaken::NoOp => None,
            ActionTaken::CreateIssued => Some(true),
            ActionTaken::DeleteIssued => Some(false),
        }
    }
}

/// Issue the minimal command moving the account from `current` presence
/// to `desired`.
///
/// Check-then-act is not atomic; a concurrent change on the device between
/// the probe and this call is not detected.
pub async fn reconcile<S: Session>(
    session: &mut S,
    current: bool,
    desired: &DesiredState,
) -> Result<ActionTaken> {
    match (desired, current) {
        (DesiredState::Present { .. }, true) | (DesiredState::Absent { .. }, false) => {
            Ok(ActionTaken::NoOp)
        }
        (
            DesiredState::Present {
                username,
                password,
                group,
                allowed_addresses,
            },
            false,
        ) => {
            info!("creating user '{}' in group '{}'", username, group);
            session
                .send(&command::add_user(username, password, group, allowed_addresses))
                .await?;
            Ok(ActionTaken::CreateIssued)
        }
        (DesiredState::Absent { username }, true) => {
            info!("removing user '{}'", username);
            session.send(&command::remove_user(username)).await?;
            Ok(ActionTaken::DeleteIssued)
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::reconcile::testing::FakeDevice;

    fn present() -> DesiredState {
        DesiredState::present("svc", SecretString::from("x".to_string()), "full")
    }

    #[tokio::test]
    async fn test_present_and_existing_is_noop() {
        let device = FakeDevice::with_users(&["svc"]);
        let mut session = device.session();

        let action = reconcile(&mut session, true, &present()).await.unwrap();
        assert_eq!(action, ActionTaken::NoOp);
        assert_eq!(action.expected_presence(), None);
        assert!(device.commands().is_empty());
    }

    #[tokio::test]
    async fn test_absent_and_missing_is_noop() {
        let device = FakeDevice::default();
        let mut session = device.session();

        let action = reconcile(&mut session, false, &DesiredState::absent("svc"))
            .await
            .unwrap();
        assert_eq!(action, ActionTaken::NoOp);
        assert!(device.commands().is_empty());
    }

    #[tokio::test]
    async fn test_create_embeds_address_restriction() {
        let device = FakeDevice::default();
        let mut session = device.session();
        let desired = present().with_allowed_addresses("1.2.3.4, ,5.6.7.8");

        let action = reconcile(&mut session, false, &desired).await.unwrap();
        assert_eq!(action, ActionTaken::CreateIssued);
        assert_eq!(action.expected_presence(), Some(true));
        assert_eq!(
            device.commands(),
            vec!["/user add name=svc password=x group=full address=1.2.3.4,5.6.7.8"]
        );
        assert!(device.has_user("svc"));
    }

    #[tokio::test]
    async fn test_delete_issued_when_present() {
        let device = FakeDevice::with_users(&["svc"]);
        let mut session = device.session();

        let action = reconcile(&mut session, true, &DesiredState::absent("svc"))
            .await
            .unwrap();
        assert_eq!(action, ActionTaken::DeleteIssued);
        assert_eq!(action.expected_presence(), Some(false));
        assert_eq!(device.commands(), vec!["/user remove svc"]);
        assert!(!device.has_user("svc"));
    }
}
