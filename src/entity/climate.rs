// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Radiator thermostats.

use std::sync::Arc;

use crate::device::DeviceCommand;
use crate::directory::SharedDevice;
use crate::error::{Error, Result};
use crate::manager::StateManager;

use super::EntityBase;

/// Unit of every temperature reported by the hub.
pub const TEMPERATURE_UNIT: &str = "°C";

/// Operating mode of a thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// Follows the schedule programmed on the hub.
    Auto,
    /// Holds the target temperature.
    HeatCool,
}

const MODES_WITH_AUTO: &[HvacMode] = &[HvacMode::Auto, HvacMode::HeatCool];
const MODES_MANUAL: &[HvacMode] = &[HvacMode::HeatCool];

/// A thermostat entity.
#[derive(Debug, Clone)]
pub struct ClimateEntity {
    base: EntityBase,
}

impl ClimateEntity {
    #[must_use]
    pub fn new(manager: Arc<StateManager>, device: SharedDevice) -> Self {
        let descriptor = device.descriptor();
        let (uid, name) = (descriptor.uid.clone(), descriptor.name.clone());
        Self {
            base: EntityBase::new(manager, device, uid, name),
        }
    }

    #[must_use]
    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    #[must_use]
    pub fn temperature_unit(&self) -> &'static str {
        TEMPERATURE_UNIT
    }

    #[must_use]
    pub fn min_temp(&self) -> f64 {
        self.base.device().descriptor().min_target_temperature
    }

    #[must_use]
    pub fn max_temp(&self) -> f64 {
        self.base.device().descriptor().max_target_temperature
    }

    #[must_use]
    pub fn target_temperature_step(&self) -> f64 {
        self.base.device().descriptor().step_target_temperature
    }

    #[must_use]
    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        if self.base.device().capabilities().has_auto_mode {
            MODES_WITH_AUTO
        } else {
            MODES_MANUAL
        }
    }

    /// Returns [`HvacMode::Auto`] only when the device supports and reports
    /// auto mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        let auto = self.base.device().capabilities().has_auto_mode
            && self.base.attributes().auto_mode_value.unwrap_or(false);
        if auto { HvacMode::Auto } else { HvacMode::HeatCool }
    }

    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        if !self.base.device().capabilities().has_temperature {
            return None;
        }
        self.base.attributes().temperature_value
    }

    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        if !self.base.device().capabilities().has_target_temperature {
            return None;
        }
        self.base.attributes().target_temperature_value
    }

    /// Returns `true` if the target temperature can be changed.
    #[must_use]
    pub fn supports_target_temperature(&self) -> bool {
        self.base.device().capabilities().can_set_target_temperature
    }

    /// Switches between schedule and manual operation.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityNotSupported`] if the device has no auto mode.
    /// - The command or refresh error.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<()> {
        if !self.base.device().capabilities().has_auto_mode {
            return Err(Error::CapabilityNotSupported("auto mode"));
        }
        self.base
            .execute_and_refresh(DeviceCommand::SetAutoMode(mode == HvacMode::Auto))
            .await
    }

    /// Sets the target temperature.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityNotSupported`] if the target temperature is
    ///   read-only.
    /// - The command or refresh error.
    pub async fn set_temperature(&self, temperature: f64) -> Result<()> {
        if !self.supports_target_temperature() {
            return Err(Error::CapabilityNotSupported("target temperature"));
        }
        self.base
            .execute_and_refresh(DeviceCommand::SetTargetTemperature(temperature))
            .await
    }
}
