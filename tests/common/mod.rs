// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use homepilot_lib::manager::{ManagerConfig, StateManager};
use homepilot_lib::state::{Clock, StateSnapshot, Timestamp};
use homepilot_lib::{
    Capabilities, DeviceAttributes, DeviceCommand, DeviceDescriptor, DeviceDirectory, DeviceError,
    DeviceId, DeviceKind, Error, FetchError, FleetState, HubApi, HubDevice, Result,
};

// ============================================================================
// Snapshots
// ============================================================================

/// Builds a snapshot whose status map is `statuses`.
pub fn snapshot(statuses: Value) -> StateSnapshot {
    StateSnapshot::from_value(json!({ "statusesMap": statuses })).unwrap()
}

pub fn position(pos: u64) -> StateSnapshot {
    snapshot(json!({ "Position": pos }))
}

// ============================================================================
// MockApi
// ============================================================================

/// Failure a mock call reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Auth,
    Connection,
    Malformed,
}

impl Failure {
    fn to_error(self) -> Error {
        match self {
            Self::Auth => Error::AuthenticationFailed,
            Self::Connection => FetchError::ConnectionFailed("hub unreachable".into()).into(),
            Self::Malformed => serde_json::from_str::<Value>("{\"devices\":")
                .unwrap_err()
                .into(),
        }
    }
}

/// Scriptable in-memory hub.
///
/// Per-device responses are queued: each call takes the next one, and the
/// last one is repeated once the queue is drained.
#[derive(Debug, Default)]
pub struct MockApi {
    fleet: Mutex<FleetState>,
    fleet_failure: Mutex<Option<Failure>>,
    fleet_delay: Mutex<Duration>,
    hub_state: Mutex<StateSnapshot>,
    device_states: Mutex<HashMap<DeviceId, VecDeque<StateSnapshot>>>,
    device_failure: Mutex<Option<Failure>>,
    scripted_failures: Mutex<VecDeque<Option<Failure>>>,
    device_delays: Mutex<VecDeque<Duration>>,
    pub fleet_calls: AtomicUsize,
    pub device_calls: AtomicUsize,
    pub hub_calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fleet_state(&self, id: &str, state: StateSnapshot) {
        self.fleet.lock().insert(DeviceId::new(id), state);
    }

    pub fn remove_from_fleet(&self, id: &str) {
        self.fleet.lock().remove(id);
    }

    pub fn fail_fleet(&self, failure: Option<Failure>) {
        *self.fleet_failure.lock() = failure;
    }

    pub fn delay_fleet(&self, delay: Duration) {
        *self.fleet_delay.lock() = delay;
    }

    pub fn set_hub_state(&self, state: StateSnapshot) {
        *self.hub_state.lock() = state;
    }

    /// Replaces the queued responses of a device.
    pub fn set_device_states(&self, id: &str, states: impl IntoIterator<Item = StateSnapshot>) {
        self.device_states
            .lock()
            .insert(DeviceId::new(id), states.into_iter().collect());
    }

    pub fn fail_devices(&self, failure: Option<Failure>) {
        *self.device_failure.lock() = failure;
    }

    /// Queues outcomes for the next device fetches, in call order; `None`
    /// succeeds.
    pub fn script_device_failures(&self, failures: impl IntoIterator<Item = Option<Failure>>) {
        self.scripted_failures.lock().extend(failures);
    }

    /// Queues delays for the next device fetches, in call order.
    pub fn delay_device_fetches(&self, delays: impl IntoIterator<Item = Duration>) {
        self.device_delays.lock().extend(delays);
    }

    pub fn fleet_calls(&self) -> usize {
        self.fleet_calls.load(Ordering::SeqCst)
    }

    pub fn device_calls(&self) -> usize {
        self.device_calls.load(Ordering::SeqCst)
    }

    pub fn hub_calls(&self) -> usize {
        self.hub_calls.load(Ordering::SeqCst)
    }

    fn next_device_state(&self, device_id: &DeviceId) -> Result<StateSnapshot> {
        let mut states = self.device_states.lock();
        let queue = states
            .get_mut(device_id)
            .ok_or_else(|| Error::DeviceNotFound(device_id.clone()))?;
        if queue.len() > 1 {
            return queue
                .pop_front()
                .ok_or_else(|| Error::DeviceNotFound(device_id.clone()));
        }
        queue
            .front()
            .cloned()
            .ok_or_else(|| Error::DeviceNotFound(device_id.clone()))
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl HubApi for MockApi {
    async fn get_all_device_states(&self) -> Result<FleetState> {
        self.fleet_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fleet_delay.lock();
        pause(delay).await;

        if let Some(failure) = *self.fleet_failure.lock() {
            return Err(failure.to_error());
        }
        Ok(self.fleet.lock().clone())
    }

    async fn get_device_state(&self, device_id: &DeviceId) -> Result<StateSnapshot> {
        self.device_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .scripted_failures
            .lock()
            .pop_front()
            .unwrap_or(*self.device_failure.lock());
        let delay = self.device_delays.lock().pop_front().unwrap_or_default();
        let state = self.next_device_state(device_id);
        pause(delay).await;

        match failure {
            Some(failure) => Err(failure.to_error()),
            None => state,
        }
    }

    async fn get_hub_state(&self) -> Result<StateSnapshot> {
        self.hub_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = *self.fleet_failure.lock() {
            return Err(failure.to_error());
        }
        Ok(self.hub_state.lock().clone())
    }
}

// ============================================================================
// MockDevice
// ============================================================================

/// Device that maps a handful of status keys onto its attributes.
#[derive(Debug)]
pub struct MockDevice {
    id: DeviceId,
    kind: DeviceKind,
    descriptor: DeviceDescriptor,
    capabilities: Capabilities,
    attributes: Mutex<DeviceAttributes>,
    available: AtomicBool,
    fail_updates: AtomicBool,
    update_delays: Mutex<VecDeque<Duration>>,
    reject_commands: AtomicBool,
    commands: Mutex<Vec<DeviceCommand>>,
    pub update_calls: AtomicUsize,
}

impl MockDevice {
    pub fn new(id: &str, kind: DeviceKind) -> Self {
        Self {
            id: DeviceId::new(id),
            kind,
            descriptor: DeviceDescriptor::new(format!("uid{id}"), format!("Device {id}"), "Mock"),
            capabilities: Capabilities::none(),
            attributes: Mutex::new(DeviceAttributes::default()),
            available: AtomicBool::new(true),
            fail_updates: AtomicBool::new(false),
            update_delays: Mutex::new(VecDeque::new()),
            reject_commands: AtomicBool::new(false),
            commands: Mutex::new(Vec::new()),
            update_calls: AtomicUsize::new(0),
        }
    }

    pub fn hub() -> Self {
        Self::new(DeviceId::HUB, DeviceKind::Hub)
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_descriptor(mut self, descriptor: DeviceDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn with_attributes(self, attributes: DeviceAttributes) -> Self {
        *self.attributes.lock() = attributes;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Queues delays for the next state updates, in call order.
    pub fn delay_updates(&self, delays: impl IntoIterator<Item = Duration>) {
        self.update_delays.lock().extend(delays);
    }

    pub fn reject_commands(&self, reject: bool) {
        self.reject_commands.store(reject, Ordering::SeqCst);
    }

    pub fn commands(&self) -> Vec<DeviceCommand> {
        self.commands.lock().clone()
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HubDevice for MockDevice {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn attributes(&self) -> DeviceAttributes {
        self.attributes.lock().clone()
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    async fn update_state(&self, snapshot: &StateSnapshot, _api: &dyn HubApi) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.update_delays.lock().pop_front().unwrap_or_default();
        pause(delay).await;

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(FetchError::UnexpectedFormat("missing statusesMap".into()).into());
        }

        let statuses = snapshot.statuses_map().cloned().unwrap_or(Value::Null);
        let as_u8 = |key: &str| {
            statuses
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|v| u8::try_from(v).ok())
        };

        let mut attributes = self.attributes.lock();
        if let Some(pos) = as_u8("Position") {
            attributes.cover_position = Some(pos);
            attributes.is_closed = Some(pos == 0);
        }
        if let Some(on) = statuses.get("On").and_then(Value::as_bool) {
            attributes.is_on = Some(on);
        }
        if let Some(brightness) = as_u8("Brightness") {
            attributes.brightness = Some(brightness);
        }
        if let Some(temp) = statuses.get("Temperature").and_then(Value::as_f64) {
            attributes.temperature_value = Some(temp);
        }
        if let Some(led) = statuses.get("Led").and_then(Value::as_bool) {
            attributes.led_status = Some(led);
        }
        if let Some(fw) = snapshot.get("fw").and_then(Value::as_str) {
            attributes.fw_version = Some(fw.to_string());
        }
        Ok(())
    }

    async fn execute(&self, command: DeviceCommand) -> Result<()> {
        if self.reject_commands.load(Ordering::SeqCst) {
            return Err(DeviceError::CommandRejected(command.to_string()).into());
        }
        self.commands.lock().push(command);
        Ok(())
    }
}

// ============================================================================
// ManualClock
// ============================================================================

/// Clock returning scripted timestamps, in milliseconds.
///
/// Every read advances the clock by `step`.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
    step: i64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Arc<Self> {
        Self::ticking(start_millis, 0)
    }

    pub fn ticking(start_millis: i64, step: i64) -> Arc<Self> {
        Arc::new(Self {
            millis: AtomicI64::new(start_millis),
            step,
        })
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.fetch_add(self.step, Ordering::SeqCst))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Builds a manager over `devices` with a ticking clock.
pub fn manager_with(
    api: &Arc<MockApi>,
    devices: &[Arc<MockDevice>],
    config: ManagerConfig,
) -> Arc<StateManager> {
    let directory: DeviceDirectory = devices
        .iter()
        .map(|d| Arc::clone(d) as Arc<dyn HubDevice>)
        .collect();
    Arc::new(
        StateManager::new(Arc::clone(api) as Arc<dyn HubApi>, directory)
            .with_config(config)
            .with_clock(ManualClock::ticking(1_000, 1)),
    )
}

/// Collects every event currently queued on `rx`.
pub fn drain<T: Clone>(rx: &mut tokio::sync::broadcast::Receiver<T>) -> Vec<T> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
