//! Fleet-wide reconciliation run.

use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use log::{info, warn};

use super::actuator::reconcile;
use super::confirm::confirm;
use super::model::{Credentials, DesiredState, DeviceTarget, Outcome, OutcomeKind, RunReport};
use super::probe::probe;
use super::report::RunReporter;
use super::session::{Connector, Session};
use crate::error::Result;

/// Tuning of a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Probes allowed when confirming a change (default: 3).
    pub max_attempts: u32,

    /// Pause between confirmation probes (default: 1s).
    pub retry_delay: Duration,

    /// Devices processed at the same time (default: 1, sequential).
    pub concurrency: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            concurrency: 1,
        }
    }
}

impl ReconcileConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Values below 1 are treated as 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Reconciles one account across a list of devices.
///
/// Every device gets exactly one [`Outcome`]. Failures are contained per
/// device: an error opening a session or sending a command becomes a
/// `ConnectionFailed` outcome and the run moves on.
pub struct FleetOrchestrator<C> {
    connector: C,
    config: ReconcileConfig,
}

impl<C: Connector> FleetOrchestrator<C> {
    pub fn new(connector: C, config: ReconcileConfig) -> Self {
        Self { connector, config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile every device and return their outcomes in input order.
    ///
    /// Outcomes are handed to `reporter` in input order as soon as they and
    /// all earlier ones are available. Reporter errors are logged and do not
    /// stop the run.
    pub async fn run<R: RunReporter + ?Sized>(
        &self,
        devices: &[DeviceTarget],
        credentials: &Credentials,
        desired: &DesiredState,
        reporter: &mut R,
    ) -> RunReport {
        info!(
            "reconciling {} device(s): mode={} user={} concurrency={}",
            devices.len(),
            desired.mode(),
            desired.username(),
            self.config.concurrency
        );

        let mut report = RunReport::new();

        // `buffered` yields in input order regardless of completion order
        let mut outcomes = stream::iter(devices)
            .map(|device| self.reconcile_device(device, credentials, desired))
            .buffered(self.config.concurrency.max(1));

        while let Some(outcome) = outcomes.next().await {
            if let Err(e) = reporter.record(&outcome) {
                warn!("failed to report outcome for {}: {}", outcome.address(), e);
            }
            report.push(outcome);
        }

        if let Err(e) = reporter.finish(&report) {
            warn!("failed to finalize run report: {}", e);
        }

        info!("{}", report.summary());
        report
    }

    /// Reconcile a single device, converting any error into an outcome.
    pub async fn reconcile_device(
        &self,
        device: &DeviceTarget,
        credentials: &Credentials,
        desired: &DesiredState,
    ) -> Outcome {
        let kind = match self.try_reconcile(device, credentials, desired).await {
            Ok(kind) => kind,
            Err(e) => {
                warn!("{}: {}", device, e);
                OutcomeKind::ConnectionFailed(e.to_string())
            }
        };
        Outcome::new(device, desired, kind)
    }

    async fn try_reconcile(
        &self,
        device: &DeviceTarget,
        credentials: &Credentials,
        desired: &DesiredState,
    ) -> Result<OutcomeKind> {
        desired.validate()?;

        info!("connecting to {}", device);
        let mut session = self.connector.open(device, credentials).await?;

        let result = self.apply(&mut session, desired).await;

        if let Err(e) = session.close().await {
            warn!("{}: failed to close session: {}", device, e);
        }
        result
    }

    async fn apply<S: Session>(&self, session: &mut S, desired: &DesiredState) -> Result<OutcomeKind> {
        let username = desired.username();

        let current = probe(session, username).await?;
        let action = reconcile(session, current, desired).await?;

        let Some(expected) = action.expected_presence() else {
            return Ok(OutcomeKind::AlreadySatisfied);
        };

        let confirmed = confirm(
            session,
            username,
            expected,
            self.config.max_attempts,
            self.config.retry_delay,
        )
        .await?;

        Ok(if confirmed {
            OutcomeKind::Applied
        } else {
            OutcomeKind::ApplyUnconfirmed
        })
    }
}
