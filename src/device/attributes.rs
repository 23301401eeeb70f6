// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed attribute values reported by a device.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of cover motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverType {
    /// Roller shutter or blind.
    #[default]
    Shutter,
    /// Garage or gate drive.
    Garage,
}

/// State of a three-way window contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactState {
    /// Window fully open.
    Open,
    /// Window tilted.
    Tilted,
    /// Window closed.
    Closed,
}

impl ContactState {
    /// All states in display order.
    pub const ALL: [Self; 3] = [Self::Open, Self::Tilted, Self::Closed];

    /// Returns the capitalized display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Tilted => "Tilted",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for ContactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current attribute values of a device.
///
/// Devices fill in the fields matching their [`Capabilities`](crate::Capabilities).
/// Everything is optional because a value is unknown until the first state
/// snapshot has been applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    /// Installed firmware version.
    pub fw_version: Option<String>,

    /// Cover position, 0 (closed) to 100 (open).
    pub cover_position: Option<u8>,
    /// Slat tilt position, 0 to 100.
    pub cover_tilt_position: Option<u8>,
    /// Cover is moving up.
    pub is_opening: Option<bool>,
    /// Cover is moving down.
    pub is_closing: Option<bool>,
    /// Cover is fully closed.
    pub is_closed: Option<bool>,
    /// Ventilation position mode is enabled.
    pub ventilation_position_mode: Option<bool>,

    /// Output is switched on.
    pub is_on: Option<bool>,
    /// Light brightness, 0 to 100.
    pub brightness: Option<u8>,
    /// Color temperature in mireds.
    pub color_temp_value: Option<u16>,
    /// Active color mode as reported by the hub (`ct` or `rgb`).
    pub color_mode_value: Option<String>,
    /// Red channel.
    pub r_value: Option<u8>,
    /// Green channel.
    pub g_value: Option<u8>,
    /// Blue channel.
    pub b_value: Option<u8>,

    /// Measured temperature in °C.
    pub temperature_value: Option<f64>,
    /// Target temperature in °C.
    pub target_temperature_value: Option<f64>,
    /// Automatic mode is enabled.
    pub auto_mode_value: Option<bool>,
    /// Battery level in percent.
    pub battery_level_value: Option<f64>,

    /// Wind speed in m/s.
    pub wind_speed_value: Option<f64>,
    /// Ambient brightness in lux.
    pub brightness_value: Option<f64>,
    /// Sun elevation in degrees.
    pub sun_height_value: Option<f64>,
    /// Sun direction in degrees.
    pub sun_direction_value: Option<f64>,
    /// Window contact state.
    pub contact_state_value: Option<ContactState>,

    /// Hub LEDs are on.
    pub led_status: Option<bool>,
    /// Hub installs firmware updates automatically.
    pub auto_update: Option<bool>,
    /// A firmware download is in progress.
    pub download_progress: Option<bool>,
    /// Latest available firmware version.
    pub fw_update_version: Option<String>,
    /// Release notes link for the latest firmware.
    pub release_notes: Option<String>,
    /// Software platform name.
    pub sw_platform: Option<String>,

    /// Free-form attributes shown alongside the entity state.
    pub extra_attributes: serde_json::Map<String, serde_json::Value>,
}

/// Static description of a device, fixed at setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Stable unique id used for entity ids.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Model name.
    pub model: String,
    /// Cover motor kind (covers only).
    #[serde(default)]
    pub cover_type: CoverType,
    /// Lowest settable target temperature (thermostats only).
    #[serde(default = "default_min_temp")]
    pub min_target_temperature: f64,
    /// Highest settable target temperature (thermostats only).
    #[serde(default = "default_max_temp")]
    pub max_target_temperature: f64,
    /// Target temperature step (thermostats only).
    #[serde(default = "default_temp_step")]
    pub step_target_temperature: f64,
}

fn default_min_temp() -> f64 {
    4.0
}

fn default_max_temp() -> f64 {
    28.0
}

fn default_temp_step() -> f64 {
    0.5
}

impl DeviceDescriptor {
    /// Creates a descriptor with default thermostat bounds.
    #[must_use]
    pub fn new(uid: impl Into<String>, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            model: model.into(),
            cover_type: CoverType::default(),
            min_target_temperature: default_min_temp(),
            max_target_temperature: default_max_temp(),
            step_target_temperature: default_temp_step(),
        }
    }

    /// Sets the cover type.
    #[must_use]
    pub fn with_cover_type(mut self, cover_type: CoverType) -> Self {
        self.cover_type = cover_type;
        self
    }

    /// Sets the target temperature bounds and step.
    #[must_use]
    pub fn with_target_temperature_range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min_target_temperature = min;
        self.max_target_temperature = max;
        self.step_target_temperature = step;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_state_display() {
        let names: Vec<_> = ContactState::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["Open", "Tilted", "Closed"]);
    }

    #[test]
    fn descriptor_defaults_from_json() {
        let json = r#"{"uid": "abc", "name": "Kitchen", "model": "RolloTron"}"#;
        let desc: DeviceDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(desc.cover_type, CoverType::Shutter);
        assert!((desc.step_target_temperature - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn cover_type_is_lowercase_in_json() {
        let ty: CoverType = serde_json::from_str("\"garage\"").unwrap();
        assert_eq!(ty, CoverType::Garage);
    }
}
