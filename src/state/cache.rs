// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timestamp-gated cache of the last applied snapshot per device.

use std::collections::HashMap;

use crate::device::DeviceId;

use super::{StateSnapshot, Timestamp};

/// A snapshot together with the time it was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedState {
    /// The applied snapshot.
    pub snapshot: StateSnapshot,
    /// When the snapshot was requested from the hub.
    pub timestamp: Timestamp,
}

/// Result of offering a snapshot to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The snapshot replaced the cache entry.
    Applied,
    /// The cache already held a snapshot at least as recent; nothing changed.
    Stale,
}

impl MergeOutcome {
    /// Returns `true` if the snapshot was applied.
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Last applied snapshot per device.
///
/// An entry is only replaced by a snapshot with a strictly greater
/// timestamp, so a slow response to an older request can never overwrite
/// a newer one. Entries are never removed.
///
/// # Examples
///
/// ```
/// use homepilot_lib::DeviceId;
/// use homepilot_lib::state::{MergeOutcome, StateCache, StateSnapshot, Timestamp};
///
/// let mut cache = StateCache::new();
/// let id = DeviceId::new("A");
///
/// let outcome = cache.merge(&id, StateSnapshot::default(), Timestamp::from_secs(100));
/// assert_eq!(outcome, MergeOutcome::Applied);
///
/// let outcome = cache.merge(&id, StateSnapshot::default(), Timestamp::from_secs(90));
/// assert_eq!(outcome, MergeOutcome::Stale);
/// ```
#[derive(Debug, Default)]
pub struct StateCache {
    entries: HashMap<DeviceId, CachedState>,
}

impl StateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `snapshot` for `device_id` unless the cached entry is as new
    /// or newer.
    pub fn merge(
        &mut self,
        device_id: &DeviceId,
        snapshot: StateSnapshot,
        timestamp: Timestamp,
    ) -> MergeOutcome {
        if let Some(current) = self.entries.get(device_id)
            && timestamp <= current.timestamp
        {
            return MergeOutcome::Stale;
        }

        self.entries.insert(
            device_id.clone(),
            CachedState {
                snapshot,
                timestamp,
            },
        );
        MergeOutcome::Applied
    }

    /// Returns the cached entry for a device.
    #[must_use]
    pub fn get(&self, device_id: &DeviceId) -> Option<&CachedState> {
        self.entries.get(device_id)
    }

    /// Returns the timestamp of the cached entry for a device.
    #[must_use]
    pub fn timestamp(&self, device_id: &DeviceId) -> Option<Timestamp> {
        self.entries.get(device_id).map(|entry| entry.timestamp)
    }

    /// Returns the number of cached devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
