// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity adapters.
//!
//! An entity is the host-facing view of one aspect of a device: a cover, a
//! switch, a sensor reading. Entities never fetch or cache state themselves.
//! They read the device's attributes, send commands to the device, and ask
//! the [`StateManager`] to refresh afterwards.
//!
//! Use [`setup_entities`] to build every applicable entity for a directory.

mod button;
mod climate;
mod cover;
mod light;
mod platform;
mod sensor;
mod switch;
mod update;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub use button::PingButton;
pub use climate::{ClimateEntity, HvacMode, TEMPERATURE_UNIT};
pub use cover::{CoverEntity, CoverFeatures};
pub use light::{ColorMode, LightEntity, LightTurnOn};
pub use platform::setup_entities;
pub use sensor::{SensorEntity, SensorKind, SensorValue};
pub use switch::{SwitchEntity, SwitchKind};
pub use update::{FirmwareUpdate, UpdateFeatures};

use crate::device::{DeviceAttributes, DeviceCommand, DeviceId};
use crate::directory::SharedDevice;
use crate::error::Result;
use crate::manager::StateManager;

/// Integration domain used in device identifiers.
pub const DOMAIN: &str = "rademacher";

/// Manufacturer reported for every device.
pub const MANUFACTURER: &str = "Rademacher";

/// Secondary role of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    /// Changes how the device behaves.
    Config,
    /// Exposes health or maintenance information.
    Diagnostic,
}

/// Device registry information for an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// `(DOMAIN, device id)`.
    pub identifiers: (&'static str, DeviceId),
    /// Device name.
    pub name: String,
    /// Firmware version, if reported.
    pub sw_version: Option<String>,
    /// Device model.
    pub model: String,
    /// Always [`MANUFACTURER`].
    pub manufacturer: &'static str,
}

/// Host platform an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Covers.
    Cover,
    /// Switches.
    Switch,
    /// Lights.
    Light,
    /// Thermostats.
    Climate,
    /// Sensors.
    Sensor,
    /// Buttons.
    Button,
    /// Firmware updates.
    Update,
}

impl Platform {
    /// Returns the platform name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Switch => "switch",
            Self::Light => "light",
            Self::Climate => "climate",
            Self::Sensor => "sensor",
            Self::Button => "button",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and shared behavior of every entity.
#[derive(Clone)]
pub struct EntityBase {
    manager: Arc<StateManager>,
    device: SharedDevice,
    unique_id: String,
    name: String,
    device_class: Option<&'static str>,
    entity_category: Option<EntityCategory>,
    icon: Option<&'static str>,
}

impl fmt::Debug for EntityBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBase")
            .field("unique_id", &self.unique_id)
            .field("name", &self.name)
            .field("device_id", self.device.id())
            .field("device_class", &self.device_class)
            .field("entity_category", &self.entity_category)
            .finish_non_exhaustive()
    }
}

impl EntityBase {
    /// Creates an entity base for `device`.
    #[must_use]
    pub fn new(
        manager: Arc<StateManager>,
        device: SharedDevice,
        unique_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            manager,
            device,
            unique_id: unique_id.into(),
            name: name.into(),
            device_class: None,
            entity_category: None,
            icon: None,
        }
    }

    /// Sets the device class.
    #[must_use]
    pub fn with_device_class(mut self, device_class: &'static str) -> Self {
        self.device_class = Some(device_class);
        self
    }

    /// Sets the entity category.
    #[must_use]
    pub fn with_entity_category(mut self, category: EntityCategory) -> Self {
        self.entity_category = Some(category);
        self
    }

    /// Sets the static icon.
    #[must_use]
    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn device_class(&self) -> Option<&'static str> {
        self.device_class
    }

    #[must_use]
    pub fn entity_category(&self) -> Option<EntityCategory> {
        self.entity_category
    }

    #[must_use]
    pub fn icon(&self) -> Option<&'static str> {
        self.icon
    }

    /// Returns the id of the underlying device.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        self.device.id()
    }

    /// Returns the name of the underlying device.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device.descriptor().name
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.device.descriptor().model
    }

    #[must_use]
    pub fn device(&self) -> &SharedDevice {
        &self.device
    }

    #[must_use]
    pub fn manager(&self) -> &Arc<StateManager> {
        &self.manager
    }

    /// Returns the device's current attribute values.
    #[must_use]
    pub fn attributes(&self) -> DeviceAttributes {
        self.device.attributes()
    }

    #[must_use]
    pub fn sw_version(&self) -> Option<String> {
        self.device.attributes().fw_version
    }

    /// Returns the device registry information.
    #[must_use]
    pub fn device_info(&self) -> DeviceInfo {
        let descriptor = self.device.descriptor();
        DeviceInfo {
            identifiers: (DOMAIN, self.device.id().clone()),
            name: descriptor.name.clone(),
            sw_version: self.sw_version(),
            model: descriptor.model.clone(),
            manufacturer: MANUFACTURER,
        }
    }

    /// Returns `true` if the last fetch for the device succeeded.
    #[must_use]
    pub fn available(&self) -> bool {
        self.device.is_available()
    }

    /// Returns additional attributes reported by the device.
    #[must_use]
    pub fn extra_state_attributes(&self) -> serde_json::Map<String, serde_json::Value> {
        self.device.attributes().extra_attributes
    }

    /// Sends a command to the device.
    ///
    /// # Errors
    ///
    /// Returns the device's error.
    pub async fn execute(&self, command: DeviceCommand) -> Result<()> {
        tracing::debug!(device_id = %self.device_id(), %command, "Sending command");
        self.device.execute(command).await
    }

    /// Refreshes the device and asks the host to re-render it.
    ///
    /// # Errors
    ///
    /// Returns the refresh error.
    pub async fn update_device_state(&self) -> Result<()> {
        self.manager.refresh_one(self.device_id()).await?;
        self.manager.notify_device_changed(self.device_id());
        Ok(())
    }

    /// Runs `action` and waits for the device state to reflect it.
    ///
    /// # Errors
    ///
    /// Returns the error of `action`, or of a device refresh while waiting.
    pub async fn state_change_context<F, Fut, T>(&self, action: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.manager.confirm_change(self.device_id(), action).await
    }

    /// Requests a bounded fleet refresh.
    ///
    /// # Errors
    ///
    /// See [`StateManager::request_refresh`].
    pub async fn request_refresh(&self) -> Result<()> {
        self.manager.request_refresh().await
    }

    /// Sends a command, then requests a fleet refresh.
    pub(crate) async fn execute_and_refresh(&self, command: DeviceCommand) -> Result<()> {
        self.execute(command).await?;
        self.request_refresh().await
    }

    /// Sends a command, then refreshes the device.
    pub(crate) async fn execute_and_update(&self, command: DeviceCommand) -> Result<()> {
        self.execute(command).await?;
        self.update_device_state().await
    }
}

/// Any entity built by [`setup_entities`].
#[derive(Debug, Clone)]
pub enum Entity {
    Cover(CoverEntity),
    Switch(SwitchEntity),
    Light(LightEntity),
    Climate(ClimateEntity),
    Sensor(SensorEntity),
    Button(PingButton),
    Update(FirmwareUpdate),
}

impl Entity {
    /// Returns the shared entity base.
    #[must_use]
    pub fn base(&self) -> &EntityBase {
        match self {
            Self::Cover(e) => e.base(),
            Self::Switch(e) => e.base(),
            Self::Light(e) => e.base(),
            Self::Climate(e) => e.base(),
            Self::Sensor(e) => e.base(),
            Self::Button(e) => e.base(),
            Self::Update(e) => e.base(),
        }
    }

    /// Returns the host platform of this entity.
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Self::Cover(_) => Platform::Cover,
            Self::Switch(_) => Platform::Switch,
            Self::Light(_) => Platform::Light,
            Self::Climate(_) => Platform::Climate,
            Self::Sensor(_) => Platform::Sensor,
            Self::Button(_) => Platform::Button,
            Self::Update(_) => Platform::Update,
        }
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        self.base().unique_id()
    }

    /// Returns whether the entity can currently be used.
    #[must_use]
    pub fn available(&self) -> bool {
        match self {
            Self::Button(e) => e.available(),
            other => other.base().available(),
        }
    }
}
