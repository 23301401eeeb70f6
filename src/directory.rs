// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Directory of the devices known to the hub.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::device::{DeviceId, HubDevice};

/// Shared handle to a device.
pub type SharedDevice = Arc<dyn HubDevice>;

/// Mapping from device id to device, built once at setup.
///
/// Iteration follows id order so entity setup is deterministic.
#[derive(Debug, Clone, Default)]
pub struct DeviceDirectory {
    devices: BTreeMap<DeviceId, SharedDevice>,
}

impl DeviceDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device, replacing any device with the same id.
    pub fn insert(&mut self, device: SharedDevice) -> Option<SharedDevice> {
        self.devices.insert(device.id().clone(), device)
    }

    /// Adds a device and returns the directory.
    #[must_use]
    pub fn with_device(mut self, device: SharedDevice) -> Self {
        self.insert(device);
        self
    }

    /// Returns the device with the given id.
    #[must_use]
    pub fn get(&self, device_id: &DeviceId) -> Option<&SharedDevice> {
        self.devices.get(device_id)
    }

    /// Returns `true` if a device with this id exists.
    #[must_use]
    pub fn contains(&self, device_id: &DeviceId) -> bool {
        self.devices.contains_key(device_id)
    }

    /// Returns all device ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices.keys()
    }

    /// Returns all devices in id order.
    pub fn devices(&self) -> impl Iterator<Item = &SharedDevice> {
        self.devices.values()
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl FromIterator<SharedDevice> for DeviceDirectory {
    fn from_iter<I: IntoIterator<Item = SharedDevice>>(iter: I) -> Self {
        let mut directory = Self::new();
        for device in iter {
            directory.insert(device);
        }
        directory
    }
}
