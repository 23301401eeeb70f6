// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity discovery.

use std::sync::Arc;

use crate::device::DeviceKind;
use crate::directory::SharedDevice;
use crate::manager::{EntryOptions, StateManager};

use super::{
    ClimateEntity, CoverEntity, Entity, FirmwareUpdate, LightEntity, PingButton, SensorEntity,
    SensorKind, SwitchEntity, SwitchKind,
};

/// Sensor readings in discovery order, with the flag that enables each.
const ENVIRONMENT_SENSORS: [(SensorKind, fn(&crate::Capabilities) -> bool); 6] = [
    (SensorKind::Temperature, |c| c.has_temperature),
    (SensorKind::TargetTemperature, |c| c.has_target_temperature),
    (SensorKind::WindSpeed, |c| c.has_wind_speed),
    (SensorKind::Brightness, |c| c.has_brightness),
    (SensorKind::SunHeight, |c| c.has_sun_height),
    (SensorKind::SunDirection, |c| c.has_sun_direction),
];

/// Builds every entity that applies to the devices of `manager`.
///
/// Devices are visited in id order. Devices listed in
/// [`EntryOptions::exclude`] get no entities at all.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use homepilot_lib::entity::setup_entities;
/// use homepilot_lib::manager::{EntryOptions, StateManager};
///
/// # fn example(manager: Arc<StateManager>) {
/// let options = EntryOptions::new().exclude("1010");
/// for entity in setup_entities(&manager, &options) {
///     println!("{} {}", entity.platform(), entity.unique_id());
/// }
/// # }
/// ```
#[must_use]
pub fn setup_entities(manager: &Arc<StateManager>, options: &EntryOptions) -> Vec<Entity> {
    let mut entities = Vec::new();

    for device in manager.directory().devices() {
        if options.is_excluded(device.id()) {
            tracing::debug!(device_id = %device.id(), "Skipping excluded device");
            continue;
        }
        entities.extend(entities_for(manager, device, options));
    }

    entities
}

fn entities_for(
    manager: &Arc<StateManager>,
    device: &SharedDevice,
    options: &EntryOptions,
) -> Vec<Entity> {
    let device_id = device.id();
    let caps = device.capabilities();
    let mut entities = Vec::new();
    let new = || (Arc::clone(manager), Arc::clone(device));

    match device.kind() {
        DeviceKind::Hub => {
            tracing::info!(%device_id, "Found LED switch");
            let (m, d) = new();
            entities.push(Entity::Switch(SwitchEntity::new(m, d, SwitchKind::HubLed)));
            let (m, d) = new();
            entities.push(Entity::Switch(SwitchEntity::new(
                m,
                d,
                SwitchKind::HubAutoUpdate,
            )));
            tracing::info!(%device_id, "Found firmware update");
            let (m, d) = new();
            entities.push(Entity::Update(FirmwareUpdate::new(m, d)));
        }
        DeviceKind::Cover => {
            tracing::info!(%device_id, "Found cover");
            let (m, d) = new();
            entities.push(Entity::Cover(CoverEntity::new(m, d)));
            if caps.has_ventilation_position_config {
                tracing::info!(%device_id, "Found ventilation position mode switch");
                let (m, d) = new();
                entities.push(Entity::Switch(SwitchEntity::new(
                    m,
                    d,
                    SwitchKind::VentilationPositionMode,
                )));
            }
        }
        DeviceKind::Switch => {
            tracing::info!(%device_id, "Found switch");
            let (m, d) = new();
            entities.push(Entity::Switch(SwitchEntity::new(m, d, SwitchKind::Device)));
        }
        DeviceKind::Actuator => {
            tracing::info!(%device_id, "Found actuator light");
            let (m, d) = new();
            entities.push(Entity::Light(LightEntity::actuator(m, d)));
        }
        DeviceKind::Light => {
            tracing::info!(%device_id, "Found light");
            let (m, d) = new();
            entities.push(Entity::Light(LightEntity::color(m, d)));
        }
        DeviceKind::Thermostat => {
            tracing::info!(%device_id, "Found thermostat");
            let (m, d) = new();
            entities.push(Entity::Climate(ClimateEntity::new(m, d)));
        }
        DeviceKind::Sensor => {
            for (kind, enabled) in ENVIRONMENT_SENSORS {
                if enabled(caps) {
                    tracing::info!(%device_id, sensor = kind.name_suffix(), "Found sensor");
                    let (m, d) = new();
                    entities.push(Entity::Sensor(SensorEntity::new(m, d, kind)));
                }
            }
            if caps.has_contact_state && options.is_ternary_contact_sensor(device_id) {
                tracing::info!(%device_id, "Found contact sensor");
                let (m, d) = new();
                entities.push(Entity::Sensor(SensorEntity::new(
                    m,
                    d,
                    SensorKind::ContactState,
                )));
            }
        }
    }

    if matches!(device.kind(), DeviceKind::Sensor | DeviceKind::Thermostat)
        && caps.has_battery_level
    {
        tracing::info!(%device_id, "Found battery level sensor");
        let (m, d) = new();
        entities.push(Entity::Sensor(SensorEntity::new(
            m,
            d,
            SensorKind::BatteryLevel,
        )));
    }

    if caps.has_ping_cmd {
        tracing::info!(%device_id, "Found ping button");
        let (m, d) = new();
        entities.push(Entity::Button(PingButton::new(m, d)));
    }

    entities
}
