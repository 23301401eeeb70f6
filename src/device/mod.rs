// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Devices managed by the hub.
//!
//! A device is provided by the integration's host through the [`HubDevice`]
//! trait. The library never changes a device directly: attribute values are
//! only updated by handing a [`StateSnapshot`] to
//! [`HubDevice::update_state`], which the
//! [`StateManager`](crate::manager::StateManager) does when a merge is
//! accepted.

mod attributes;
mod command;
mod device_id;

use std::fmt;

use async_trait::async_trait;

pub use attributes::{ContactState, CoverType, DeviceAttributes, DeviceDescriptor};
pub use command::DeviceCommand;
pub use device_id::DeviceId;

use crate::Capabilities;
use crate::api::HubApi;
use crate::error::Result;
use crate::state::StateSnapshot;

/// Device family, used to pick the entity adapters for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// The hub itself.
    Hub,
    /// Shutter, blind or garage drive.
    Cover,
    /// Plain on/off switch.
    Switch,
    /// Dimming actuator driving a light.
    Actuator,
    /// Smart bulb with optional color support.
    Light,
    /// Environment or contact sensor.
    Sensor,
    /// Radiator thermostat.
    Thermostat,
}

/// A device known to the hub.
///
/// Implementations use interior mutability: the state manager holds devices
/// behind `Arc` and calls [`update_state`](Self::update_state) and
/// [`set_available`](Self::set_available) through shared references.
#[async_trait]
pub trait HubDevice: Send + Sync + fmt::Debug {
    /// Returns the hub id of the device.
    fn id(&self) -> &DeviceId;

    /// Returns the device family.
    fn kind(&self) -> DeviceKind;

    /// Returns the static description (name, model, bounds).
    fn descriptor(&self) -> &DeviceDescriptor;

    /// Returns the capability flags.
    fn capabilities(&self) -> &Capabilities;

    /// Returns the current attribute values.
    fn attributes(&self) -> DeviceAttributes;

    /// Returns whether the last fetch for this device succeeded.
    fn is_available(&self) -> bool;

    /// Sets the availability flag.
    fn set_available(&self, available: bool);

    /// Replaces the device's attribute values with those of `snapshot`.
    ///
    /// `api` is passed for devices that need a follow-up request to complete
    /// their state.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be interpreted.
    async fn update_state(&self, snapshot: &StateSnapshot, api: &dyn HubApi) -> Result<()>;

    /// Sends a command to the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the hub rejects the command or the command does
    /// not apply to this device.
    async fn execute(&self, command: DeviceCommand) -> Result<()>;
}
