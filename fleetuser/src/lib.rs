//! # fleetuser
//!
//! Fleet-wide reconciliation of a single user account on MikroTik RouterOS
//! devices over SSH.
//!
//! For every device in a list, fleetuser makes sure an account either
//! exists (with a password, group and optional address restriction) or is
//! absent, confirms the change, and records one outcome per device.
//!
//! ## Layers
//!
//! - [`transport`]: SSH connection, authentication and host key checks via russh
//! - [`channel`]: interactive shell I/O with prompt detection and ANSI stripping
//! - [`platform`]: RouterOS prompt, login quirks and output normalization
//! - [`driver`]: command execution against a platform
//! - [`reconcile`]: probe / apply / confirm per device, fleet orchestration
//!   and run reporting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fleetuser::reconcile::{
//!     Credentials, DesiredState, DeviceTarget, FleetOrchestrator, LogFileReporter,
//!     ReconcileConfig, SshConnector,
//! };
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fleetuser::Error> {
//!     let orchestrator = FleetOrchestrator::new(SshConnector::new(), ReconcileConfig::default());
//!     let credentials = Credentials::new("admin", SecretString::from("secret".to_string()));
//!     let desired = DesiredState::present("svc", SecretString::from("pw".to_string()), "read")
//!         .with_allowed_addresses("10.0.0.0/8");
//!
//!     let mut log = LogFileReporter::open("logs/create_svc.log")?;
//!     let report = orchestrator
//!         .run(&[DeviceTarget::new("192.168.88.1")], &credentials, &desired, &mut log)
//!         .await;
//!
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod platform;
pub mod reconcile;
pub mod transport;

// Re-export main types for convenience
pub use driver::{Driver, DriverBuilder, GenericDriver, Response};
pub use error::Error;
pub use platform::PlatformDefinition;
pub use reconcile::{
    Credentials, DesiredState, DeviceTarget, FleetOrchestrator, Outcome, OutcomeKind,
    ReconcileConfig, RunReport, SshConnector,
};
pub use transport::{HostKeyVerification, SshConfig};
