// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off switches, including hub and cover settings.

use std::sync::Arc;

use crate::device::{DeviceAttributes, DeviceCommand};
use crate::directory::SharedDevice;
use crate::error::Result;
use crate::manager::StateManager;

use super::{EntityBase, EntityCategory};

/// What a switch entity controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchKind {
    /// The relay of a switch device.
    Device,
    /// The status LEDs of the hub.
    HubLed,
    /// Automatic firmware updates of the hub.
    HubAutoUpdate,
    /// Ventilation position mode of a cover.
    VentilationPositionMode,
}

impl SwitchKind {
    fn id_suffix(self) -> Option<&'static str> {
        match self {
            Self::Device => None,
            Self::HubLed => Some("led_status"),
            Self::HubAutoUpdate => Some("auto_update"),
            Self::VentilationPositionMode => Some("ventilation_position_mode"),
        }
    }

    fn name_suffix(self) -> Option<&'static str> {
        match self {
            Self::Device => None,
            Self::HubLed => Some("LED Status"),
            Self::HubAutoUpdate => Some("Auto Update"),
            Self::VentilationPositionMode => Some("Ventilation Position Mode"),
        }
    }

    fn read(self, attributes: &DeviceAttributes) -> Option<bool> {
        match self {
            Self::Device => attributes.is_on,
            Self::HubLed => attributes.led_status,
            Self::HubAutoUpdate => attributes.auto_update,
            Self::VentilationPositionMode => attributes.ventilation_position_mode,
        }
    }

    fn command(self, on: bool) -> DeviceCommand {
        match (self, on) {
            (Self::Device, true) => DeviceCommand::TurnOn,
            (Self::Device, false) => DeviceCommand::TurnOff,
            (Self::HubLed, true) => DeviceCommand::TurnLedOn,
            (Self::HubLed, false) => DeviceCommand::TurnLedOff,
            (Self::HubAutoUpdate, on) => DeviceCommand::SetAutoUpdate(on),
            (Self::VentilationPositionMode, on) => DeviceCommand::SetVentilationPositionMode(on),
        }
    }
}

/// A switch entity.
///
/// Every command is followed by a refresh of the device.
#[derive(Debug, Clone)]
pub struct SwitchEntity {
    base: EntityBase,
    kind: SwitchKind,
}

impl SwitchEntity {
    #[must_use]
    pub fn new(manager: Arc<StateManager>, device: SharedDevice, kind: SwitchKind) -> Self {
        let descriptor = device.descriptor();
        let (unique_id, name) = match (kind.id_suffix(), kind.name_suffix()) {
            (Some(id), Some(name)) => (
                format!("{}_{id}", descriptor.uid),
                format!("{} {name}", descriptor.name),
            ),
            _ => (descriptor.uid.clone(), descriptor.name.clone()),
        };

        let mut base = EntityBase::new(manager, Arc::clone(&device), unique_id, name)
            .with_device_class("switch");
        if kind != SwitchKind::Device {
            base = base.with_entity_category(EntityCategory::Config);
        }

        Self { base, kind }
    }

    #[must_use]
    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    #[must_use]
    pub fn kind(&self) -> SwitchKind {
        self.kind
    }

    /// Returns the switch state, `None` until known.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.kind.read(&self.base.attributes())
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn turn_on(&self) -> Result<()> {
        self.base.execute_and_update(self.kind.command(true)).await
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn turn_off(&self) -> Result<()> {
        self.base.execute_and_update(self.kind.command(false)).await
    }

    /// Turns the switch off if it is on, on otherwise.
    ///
    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn toggle(&self) -> Result<()> {
        if self.is_on().unwrap_or(false) {
            self.turn_off().await
        } else {
            self.turn_on().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_per_kind() {
        assert_eq!(SwitchKind::Device.command(true), DeviceCommand::TurnOn);
        assert_eq!(SwitchKind::HubLed.command(false), DeviceCommand::TurnLedOff);
        assert_eq!(
            SwitchKind::HubAutoUpdate.command(true),
            DeviceCommand::SetAutoUpdate(true)
        );
        assert_eq!(
            SwitchKind::VentilationPositionMode.command(false),
            DeviceCommand::SetVentilationPositionMode(false)
        );
    }

    #[test]
    fn reads_matching_attribute() {
        let attributes = DeviceAttributes {
            is_on: Some(true),
            led_status: Some(false),
            ..DeviceAttributes::default()
        };
        assert_eq!(SwitchKind::Device.read(&attributes), Some(true));
        assert_eq!(SwitchKind::HubLed.read(&attributes), Some(false));
        assert_eq!(SwitchKind::HubAutoUpdate.read(&attributes), None);
    }
}
