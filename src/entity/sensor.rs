// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only sensor readings.

use std::fmt;
use std::sync::Arc;

use crate::device::{ContactState, DeviceAttributes};
use crate::directory::SharedDevice;
use crate::manager::StateManager;

use super::{EntityBase, EntityCategory, TEMPERATURE_UNIT};

/// Options of the contact state sensor.
pub const CONTACT_STATE_OPTIONS: [&str; 3] = [
    ContactState::Open.as_str(),
    ContactState::Tilted.as_str(),
    ContactState::Closed.as_str(),
];

/// Which reading a sensor entity exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    TargetTemperature,
    WindSpeed,
    Brightness,
    SunHeight,
    SunDirection,
    ContactState,
    BatteryLevel,
}

impl SensorKind {
    /// Suffix of the unique id, after `_f`.
    #[must_use]
    pub const fn id_suffix(self) -> &'static str {
        match self {
            Self::Temperature => "temp",
            Self::TargetTemperature => "target_temp",
            Self::WindSpeed => "wind_speed",
            Self::Brightness => "brightness",
            Self::SunHeight => "sun_height",
            Self::SunDirection => "sun_direction",
            Self::ContactState => "contact_state",
            Self::BatteryLevel => "battery_level",
        }
    }

    /// Suffix of the entity name.
    #[must_use]
    pub const fn name_suffix(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::TargetTemperature => "Target Temperature",
            Self::WindSpeed => "Wind Speed",
            Self::Brightness => "Brightness",
            Self::SunHeight => "Sun Height",
            Self::SunDirection => "Sun Direction",
            Self::ContactState => "Contact State",
            Self::BatteryLevel => "Battery Level",
        }
    }

    #[must_use]
    pub const fn device_class(self) -> Option<&'static str> {
        match self {
            Self::Temperature | Self::TargetTemperature => Some("temperature"),
            Self::Brightness => Some("illuminance"),
            Self::ContactState => Some("enum"),
            Self::BatteryLevel => Some("battery"),
            Self::WindSpeed | Self::SunHeight | Self::SunDirection => None,
        }
    }

    #[must_use]
    pub const fn unit(self) -> Option<&'static str> {
        match self {
            Self::Temperature | Self::TargetTemperature => Some(TEMPERATURE_UNIT),
            Self::WindSpeed => Some("m/s"),
            Self::Brightness => Some("lx"),
            Self::SunHeight | Self::SunDirection => Some("°"),
            Self::BatteryLevel => Some("%"),
            Self::ContactState => None,
        }
    }

    /// Static icon, if any.
    #[must_use]
    pub const fn icon(self) -> Option<&'static str> {
        match self {
            Self::WindSpeed => Some("mdi:weather-windy"),
            Self::SunHeight => Some("mdi:weather-sunset-up"),
            Self::SunDirection => Some("mdi:sun-compass"),
            _ => None,
        }
    }

    /// Returns `true` for readings recorded as measurements.
    #[must_use]
    pub const fn is_measurement(self) -> bool {
        !matches!(self, Self::ContactState)
    }

    #[must_use]
    pub const fn entity_category(self) -> Option<EntityCategory> {
        match self {
            Self::BatteryLevel => Some(EntityCategory::Diagnostic),
            _ => None,
        }
    }

    fn read(self, attributes: &DeviceAttributes) -> Option<SensorValue> {
        let number = match self {
            Self::Temperature => attributes.temperature_value,
            Self::TargetTemperature => attributes.target_temperature_value,
            Self::WindSpeed => attributes.wind_speed_value,
            Self::Brightness => attributes.brightness_value,
            Self::SunHeight => attributes.sun_height_value,
            Self::SunDirection => attributes.sun_direction_value,
            Self::BatteryLevel => attributes.battery_level_value,
            Self::ContactState => {
                return attributes
                    .contact_state_value
                    .map(|state| SensorValue::Text(state.as_str()));
            }
        };
        number.map(SensorValue::Number)
    }
}

/// Value of a sensor entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    Number(f64),
    Text(&'static str),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A sensor entity.
#[derive(Debug, Clone)]
pub struct SensorEntity {
    base: EntityBase,
    kind: SensorKind,
}

impl SensorEntity {
    #[must_use]
    pub fn new(manager: Arc<StateManager>, device: SharedDevice, kind: SensorKind) -> Self {
        let descriptor = device.descriptor();
        let unique_id = format!("{}_f{}", descriptor.uid, kind.id_suffix());
        let name = format!("{} {}", descriptor.name, kind.name_suffix());

        let mut base = EntityBase::new(manager, device, unique_id, name);
        if let Some(class) = kind.device_class() {
            base = base.with_device_class(class);
        }
        if let Some(category) = kind.entity_category() {
            base = base.with_entity_category(category);
        }
        if let Some(icon) = kind.icon() {
            base = base.with_icon(icon);
        }

        Self { base, kind }
    }

    #[must_use]
    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    #[must_use]
    pub fn native_value(&self) -> Option<SensorValue> {
        self.kind.read(&self.base.attributes())
    }

    #[must_use]
    pub fn native_unit_of_measurement(&self) -> Option<&'static str> {
        self.kind.unit()
    }

    /// Returns the allowed values of enum sensors.
    #[must_use]
    pub fn options(&self) -> Option<&'static [&'static str]> {
        (self.kind == SensorKind::ContactState).then_some(&CONTACT_STATE_OPTIONS[..])
    }

    /// Returns the icon, which for contact sensors follows the state.
    #[must_use]
    pub fn icon(&self) -> Option<&'static str> {
        if self.kind != SensorKind::ContactState {
            return self.base.icon();
        }
        let icon = match self.base.attributes().contact_state_value {
            Some(ContactState::Open) => "mdi:square-outline",
            Some(ContactState::Tilted) => "mdi:network-strength-outline",
            Some(ContactState::Closed) | None => "mdi:square",
        };
        Some(icon)
    }
}
