//! Account reconciliation engine.
//!
//! For each device: open a session, probe whether the account exists,
//! issue at most one create or remove command, and re-probe until the
//! change is observed or the confirmation budget runs out. Every device
//! ends with exactly one [`Outcome`].
//!
//! ```rust,no_run
//! use fleetuser::reconcile::{
//!     ConsoleReporter, Credentials, DesiredState, DeviceTarget, FleetOrchestrator,
//!     ReconcileConfig, SshConnector,
//! };
//! use secrecy::SecretString;
//!
//! # async fn example() {
//! let orchestrator = FleetOrchestrator::new(SshConnector::new(), ReconcileConfig::default());
//! let devices = vec![DeviceTarget::new("10.0.0.1"), DeviceTarget::new("10.0.0.2")];
//! let credentials = Credentials::new("admin", SecretString::from("secret".to_string()));
//! let desired = DesiredState::absent("svc");
//!
//! let report = orchestrator
//!     .run(&devices, &credentials, &desired, &mut ConsoleReporter::new())
//!     .await;
//! println!("{}", report.summary());
//! # }
//! ```

mod actuator;
pub mod command;
mod confirm;
mod model;
mod orchestrator;
mod probe;
mod report;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use actuator::{ActionTaken, reconcile};
pub use confirm::confirm;
pub use model::{
    Credentials, DesiredState, DeviceTarget, Mode, Outcome, OutcomeKind, RunReport, RunSummary,
    Severity, normalize_address_list,
};
pub use orchestrator::{FleetOrchestrator, ReconcileConfig};
pub use probe::probe;
pub use report::{ConsoleReporter, LogFileReporter, MultiReporter, RunReporter};
pub use session::{Connector, Session, SshConnector};
