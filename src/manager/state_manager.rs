// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fetching, merging and exposing device state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::api::{FleetState, HubApi};
use crate::device::DeviceId;
use crate::directory::{DeviceDirectory, SharedDevice};
use crate::error::{Error, Result};
use crate::event::{EventBus, StateEvent};
use crate::state::{
    CachedState, Clock, MergeOutcome, StateCache, StateSnapshot, SystemClock, Timestamp,
};

use super::config::ManagerConfig;

/// Result of a call to [`StateManager::refresh_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fleet was fetched and merged.
    Completed,
    /// Another fleet refresh was already running; nothing was fetched.
    Skipped,
}

/// Owner of the device state cache.
///
/// The state manager is the only component that fetches device state from
/// the hub and the only one that changes the cache or a device's
/// attributes. Entity adapters read through [`last_known`](Self::last_known)
/// and the devices' getters.
///
/// # Ordering
///
/// Every fetch is stamped with the time it was *issued*. A snapshot is
/// applied only if its timestamp is strictly greater than the cached one,
/// so a slow response to an older request is dropped when a newer request
/// already completed.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use homepilot_lib::{DeviceDirectory, HubApi};
/// use homepilot_lib::manager::StateManager;
///
/// # async fn example(api: Arc<dyn HubApi>, directory: DeviceDirectory) -> homepilot_lib::Result<()> {
/// let manager = Arc::new(StateManager::new(api, directory));
/// manager.first_refresh().await?;
///
/// let mut events = manager.subscribe();
/// tokio::spawn(async move {
///     while let Ok(event) = events.recv().await {
///         println!("{event:?}");
///     }
/// });
/// # Ok(())
/// # }
/// ```
pub struct StateManager {
    api: Arc<dyn HubApi>,
    directory: DeviceDirectory,
    cache: RwLock<StateCache>,
    update_in_progress: AtomicBool,
    event_bus: EventBus,
    clock: Arc<dyn Clock>,
    config: ManagerConfig,
}

impl std::fmt::Debug for StateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateManager")
            .field("devices", &self.directory.len())
            .field("cached", &self.cache.read().len())
            .field("update_in_progress", &self.is_refresh_in_progress())
            .field("subscribers", &self.event_bus.subscriber_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StateManager {
    /// Creates a state manager with default configuration.
    #[must_use]
    pub fn new(api: Arc<dyn HubApi>, directory: DeviceDirectory) -> Self {
        Self {
            api,
            directory,
            cache: RwLock::new(StateCache::new()),
            update_in_progress: AtomicBool::new(false),
            event_bus: EventBus::new(),
            clock: Arc::new(SystemClock),
            config: ManagerConfig::default(),
        }
    }

    /// Sets the timing configuration.
    #[must_use]
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the source of fetch timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the capacity of the event channel.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_bus = EventBus::with_capacity(capacity);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the timing configuration.
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Returns the device directory.
    #[must_use]
    pub fn directory(&self) -> &DeviceDirectory {
        &self.directory
    }

    /// Returns the hub API.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn HubApi> {
        &self.api
    }

    /// Returns the device with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for unknown ids.
    pub fn device(&self, device_id: &DeviceId) -> Result<&SharedDevice> {
        self.directory
            .get(device_id)
            .ok_or_else(|| Error::DeviceNotFound(device_id.clone()))
    }

    /// Returns `true` while a fleet refresh is running.
    #[must_use]
    pub fn is_refresh_in_progress(&self) -> bool {
        self.update_in_progress.load(Ordering::Acquire)
    }

    /// Subscribes to state events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.event_bus.subscribe()
    }

    /// Asks the host to re-render the entities of one device.
    pub fn notify_device_changed(&self, device_id: &DeviceId) {
        self.event_bus
            .publish(StateEvent::device_changed(device_id.clone()));
    }

    pub(crate) fn publish(&self, event: StateEvent) {
        self.event_bus.publish(event);
    }

    /// Returns the most recently applied snapshot of a device.
    #[must_use]
    pub fn last_known(&self, device_id: &DeviceId) -> Option<CachedState> {
        self.cache.read().get(device_id).cloned()
    }

    /// Returns the most recently applied snapshot of a device, or `default`
    /// if none was applied yet.
    #[must_use]
    pub fn last_known_or(&self, device_id: &DeviceId, default: StateSnapshot) -> StateSnapshot {
        self.cache
            .read()
            .get(device_id)
            .map_or(default, |entry| entry.snapshot.clone())
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Fetches and merges the state of every device.
    ///
    /// Returns [`RefreshOutcome::Skipped`] without fetching when another
    /// fleet refresh is running.
    ///
    /// Devices missing from the hub's answer are marked unavailable. The
    /// fetch and the merges together are bounded by the fleet timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthenticationFailed`] is returned as is; no availability
    ///   flag is touched.
    /// - Any other fetch failure marks every device unavailable and is
    ///   returned.
    /// - [`Error::Timeout`] if fetching and merging exceed the fleet
    ///   timeout; every device is marked unavailable.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome> {
        let Some(_guard) = InProgressGuard::acquire(&self.update_in_progress) else {
            tracing::debug!("Fleet refresh already in progress, skipping");
            return Ok(RefreshOutcome::Skipped);
        };

        let fleet_timeout = self.config.fleet_timeout;
        let timestamp = self.clock.now();
        let refresh = async {
            let states = self.fetch_fleet().await?;
            self.merge_fleet(states, timestamp).await;
            Ok::<_, Error>(RefreshOutcome::Completed)
        };

        if let Ok(result) = tokio::time::timeout(fleet_timeout, refresh).await {
            result
        } else {
            tracing::warn!(
                ?fleet_timeout,
                "Fleet refresh timed out, marking all devices unavailable"
            );
            self.mark_all_unavailable();
            Err(Error::Timeout(fleet_timeout))
        }
    }

    /// Fetches the fleet and the hub status.
    async fn fetch_fleet(&self) -> Result<FleetState> {
        let fetch = async {
            let mut states = self.api.get_all_device_states().await?;
            let hub_state = self.api.get_hub_state().await?;
            states.insert(DeviceId::hub(), hub_state);
            Ok::<_, Error>(states)
        };

        match fetch.await {
            Ok(states) => Ok(states),
            Err(e) if e.is_auth_failure() => {
                tracing::warn!("Hub rejected credentials during fleet refresh");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fleet refresh failed, marking all devices unavailable");
                self.mark_all_unavailable();
                Err(e)
            }
        }
    }

    async fn merge_fleet(&self, mut states: FleetState, timestamp: Timestamp) {
        for device in self.directory.devices() {
            let device_id = device.id();
            match states.remove(device_id) {
                Some(snapshot) => {
                    if let Err(e) = self.apply(device_id, snapshot, timestamp).await {
                        // Already marked unavailable by apply
                        tracing::warn!(%device_id, error = %e, "Failed to apply device state");
                    }
                }
                None => {
                    tracing::debug!(%device_id, "Device missing from fleet state");
                    device.set_available(false);
                }
            }
        }
    }

    /// Fetches and merges the state of a single device.
    ///
    /// Unlike [`refresh_all`](Self::refresh_all) there is no single-flight
    /// guard: concurrent calls are ordered by their issue timestamps.
    ///
    /// # Errors
    ///
    /// - [`Error::DeviceNotFound`] for unknown ids.
    /// - [`Error::AuthenticationFailed`] is returned as is.
    /// - Any other fetch failure marks only this device unavailable and is
    ///   returned.
    ///
    /// A failed request that was issued before the cached snapshot was
    /// requested leaves the availability flag alone: the newer merge already
    /// describes the device, and only merges decide availability when
    /// requests overlap.
    pub async fn refresh_one(&self, device_id: &DeviceId) -> Result<MergeOutcome> {
        let device = self.device(device_id)?;
        let timestamp = self.clock.now();

        let fetched = if device_id.is_hub() {
            self.api.get_hub_state().await
        } else {
            self.api.get_device_state(device_id).await
        };

        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_auth_failure() => return Err(e),
            Err(e) => {
                tracing::warn!(%device_id, error = %e, "Device refresh failed");
                // A newer merge already reflects the device's state
                let superseded = self
                    .cache
                    .read()
                    .timestamp(device_id)
                    .is_some_and(|current| current > timestamp);
                if !superseded {
                    device.set_available(false);
                }
                return Err(e);
            }
        };

        self.apply(device_id, snapshot, timestamp).await
    }

    /// Merges a snapshot into the cache and pushes it into the device.
    ///
    /// A snapshot whose timestamp is not strictly greater than the cached
    /// one is dropped and [`MergeOutcome::Stale`] is returned. An applied
    /// snapshot marks the device available again.
    ///
    /// No lock is held while the device processes the snapshot, so a slow
    /// device never delays merges for other devices. If a newer snapshot is
    /// committed while this one is being pushed, the newer one is pushed
    /// again afterwards so the device ends up holding the cached state.
    ///
    /// # Errors
    ///
    /// - [`Error::DeviceNotFound`] for unknown ids.
    /// - Any error of [`HubDevice::update_state`](crate::HubDevice::update_state);
    ///   the device is marked unavailable. The snapshot stays cached.
    pub async fn apply(
        &self,
        device_id: &DeviceId,
        snapshot: StateSnapshot,
        timestamp: Timestamp,
    ) -> Result<MergeOutcome> {
        let device = self.device(device_id)?;

        let outcome = self
            .cache
            .write()
            .merge(device_id, snapshot.clone(), timestamp);
        if !outcome.is_applied() {
            tracing::trace!(%device_id, %timestamp, "Superseded by a more recent state");
            return Ok(MergeOutcome::Stale);
        }

        let mut pushed = CachedState {
            snapshot,
            timestamp,
        };
        loop {
            if let Err(e) = device.update_state(&pushed.snapshot, self.api.as_ref()).await {
                device.set_available(false);
                return Err(e);
            }

            match self.last_known(device_id) {
                Some(latest) if latest.timestamp != pushed.timestamp => {
                    tracing::trace!(
                        %device_id,
                        timestamp = %latest.timestamp,
                        "Re-pushing newer state"
                    );
                    pushed = latest;
                }
                _ => break,
            }
        }

        device.set_available(true);
        tracing::trace!(%device_id, %timestamp, "Applied device state");
        Ok(outcome)
    }

    fn mark_all_unavailable(&self) {
        for device in self.directory.devices() {
            device.set_available(false);
        }
    }
}

/// Holds the single-flight flag for the duration of a fleet refresh.
///
/// The flag is released on drop, so errors and cancellation release it too.
struct InProgressGuard<'a>(&'a AtomicBool);

impl<'a> InProgressGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);

        let guard = InProgressGuard::acquire(&flag).unwrap();
        assert!(InProgressGuard::acquire(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(InProgressGuard::acquire(&flag).is_some());
    }
}
