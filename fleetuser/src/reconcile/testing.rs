//! Scripted in-memory devices for engine tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::model::{Credentials, DeviceTarget};
use super::session::{Connector, Session};
use crate::error::{DriverError, Result, TransportError};

#[derive(Default)]
struct DeviceState {
    users: BTreeSet<String>,
    commands: Vec<String>,
    /// Probes after a mutation that still report the previous user set.
    visibility_lag: u32,
    stale_probes: u32,
    stale_view: BTreeSet<String>,
    ignore_mutations: bool,
    fail_containing: Option<String>,
    refuse_connection: bool,
    open_delay: Duration,
    opened: u32,
    closed: u32,
}

/// A RouterOS device simulated well enough for `/user` commands.
#[derive(Clone, Default)]
pub struct FakeDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl FakeDevice {
    pub fn with_users(users: &[&str]) -> Self {
        let device = Self::default();
        device.lock().users = users.iter().map(|u| u.to_string()).collect();
        device
    }

    pub fn with_visibility_lag(self, probes: u32) -> Self {
        self.lock().visibility_lag = probes;
        self
    }

    /// Accept mutating commands without changing any state.
    pub fn ignoring_mutations(self) -> Self {
        self.lock().ignore_mutations = true;
        self
    }

    pub fn fail_commands_containing(self, needle: &str) -> Self {
        self.lock().fail_containing = Some(needle.to_string());
        self
    }

    pub fn refusing_connections(self) -> Self {
        self.lock().refuse_connection = true;
        self
    }

    pub fn with_open_delay(self, delay: Duration) -> Self {
        self.lock().open_delay = delay;
        self
    }

    pub fn session(&self) -> FakeSession {
        FakeSession {
            device: self.clone(),
            gauge: SessionGauge::default(),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.lock().commands.clone()
    }

    pub fn has_user(&self, user: &str) -> bool {
        self.lock().users.contains(user)
    }

    pub fn sessions_opened(&self) -> u32 {
        self.lock().opened
    }

    pub fn sessions_closed(&self) -> u32 {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap()
    }

    fn execute(&self, command: &str) -> Result<String> {
        let mut state = self.lock();
        state.commands.push(command.to_string());

        if let Some(needle) = &state.fail_containing {
            if command.contains(needle.as_str()) {
                return Err(DriverError::CommandFailed {
                    command: command.to_string(),
                    message: "bad command name".to_string(),
                }
                .into());
            }
        }

        if let Some(name) = command.strip_prefix("/user print where name=") {
            let visible = if state.stale_probes > 0 {
                state.stale_probes -= 1;
                state.stale_view.contains(name)
            } else {
                state.users.contains(name)
            };
            return Ok(if visible {
                format!("Columns: NAME, GROUP\n#  NAME  GROUP\n0  {name}  full")
            } else {
                String::new()
            });
        }

        let mutation = if let Some(args) = command.strip_prefix("/user add ") {
            args.split(' ')
                .find_map(|arg| arg.strip_prefix("name="))
                .map(|name| (name.to_string(), true))
        } else {
            command
                .strip_prefix("/user remove ")
                .map(|name| (name.to_string(), false))
        };

        match mutation {
            Some((name, add)) if !state.ignore_mutations => {
                state.stale_view = state.users.clone();
                state.stale_probes = state.visibility_lag;
                if add {
                    state.users.insert(name);
                } else {
                    state.users.remove(&name);
                }
                Ok(String::new())
            }
            Some(_) => Ok(String::new()),
            None => Err(DriverError::CommandFailed {
                command: command.to_string(),
                message: "bad command name".to_string(),
            }
            .into()),
        }
    }
}

/// Counts sessions from the start of `open` until `close`, keeping the peak.
#[derive(Clone, Default)]
pub struct SessionGauge {
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl SessionGauge {
    fn enter(&self) {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct FakeSession {
    device: FakeDevice,
    gauge: SessionGauge,
}

impl Session for FakeSession {
    async fn send(&mut self, command: &str) -> Result<String> {
        self.device.execute(command)
    }

    async fn close(&mut self) -> Result<()> {
        self.device.lock().closed += 1;
        self.gauge.leave();
        Ok(())
    }
}

/// Connector over a set of fake devices keyed by address. Unknown
/// addresses time out.
#[derive(Clone, Default)]
pub struct FakeConnector {
    devices: HashMap<String, FakeDevice>,
    gauge: SessionGauge,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, address: &str, device: FakeDevice) -> Self {
        self.devices.insert(address.to_string(), device);
        self
    }

    /// Sessions opened through this connector.
    pub fn gauge(&self) -> SessionGauge {
        self.gauge.clone()
    }
}

impl Connector for FakeConnector {
    type Session = FakeSession;

    async fn open(&self, target: &DeviceTarget, credentials: &Credentials) -> Result<FakeSession> {
        let Some(device) = self.devices.get(target.address()) else {
            return Err(TransportError::Timeout(Duration::from_secs(30)).into());
        };

        self.gauge.enter();
        let delay = device.lock().open_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = device.lock();
        if state.refuse_connection {
            self.gauge.leave();
            return Err(TransportError::AuthenticationFailed {
                user: credentials.username.clone(),
            }
            .into());
        }
        state.opened += 1;
        drop(state);

        Ok(FakeSession {
            device: device.clone(),
            gauge: self.gauge.clone(),
        })
    }
}
