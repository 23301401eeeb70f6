// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands that can be sent to a device.

use std::fmt;

/// A command forwarded to a device by an entity adapter.
///
/// Devices reject commands that do not apply to them with
/// [`DeviceError::UnsupportedCommand`](crate::error::DeviceError::UnsupportedCommand).
///
/// # Examples
///
/// ```
/// use homepilot_lib::DeviceCommand;
///
/// let cmd = DeviceCommand::SetCoverPosition(40);
/// assert_eq!(cmd.name(), "set_cover_position");
/// assert_eq!(cmd.to_string(), "set_cover_position(40)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceCommand {
    /// Move the cover up.
    OpenCover,
    /// Move the cover down.
    CloseCover,
    /// Stop cover movement.
    StopCover,
    /// Move the cover to an absolute position (0-100).
    SetCoverPosition(u8),
    /// Open the slats.
    OpenCoverTilt,
    /// Close the slats.
    CloseCoverTilt,
    /// Stop slat movement.
    StopCoverTilt,
    /// Move the slats to an absolute position (0-100).
    SetCoverTiltPosition(u8),
    /// Enable or disable the ventilation position mode.
    SetVentilationPositionMode(bool),

    /// Switch the output on.
    TurnOn,
    /// Switch the output off.
    TurnOff,
    /// Set light brightness (0-100).
    SetBrightness(u8),
    /// Set the light color.
    SetRgb(u8, u8, u8),
    /// Set the color temperature in mireds.
    SetColorTemp(u16),

    /// Set the thermostat target temperature in °C.
    SetTargetTemperature(f64),
    /// Enable or disable the thermostat automatic mode.
    SetAutoMode(bool),

    /// Ask the device to answer a ping.
    Ping,

    /// Switch the hub LEDs on.
    TurnLedOn,
    /// Switch the hub LEDs off.
    TurnLedOff,
    /// Enable or disable automatic hub firmware updates.
    SetAutoUpdate(bool),
    /// Start installing the latest hub firmware.
    UpdateFirmware,
}

impl DeviceCommand {
    /// Returns a short, stable name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenCover => "open_cover",
            Self::CloseCover => "close_cover",
            Self::StopCover => "stop_cover",
            Self::SetCoverPosition(_) => "set_cover_position",
            Self::OpenCoverTilt => "open_cover_tilt",
            Self::CloseCoverTilt => "close_cover_tilt",
            Self::StopCoverTilt => "stop_cover_tilt",
            Self::SetCoverTiltPosition(_) => "set_cover_tilt_position",
            Self::SetVentilationPositionMode(_) => "set_ventilation_position_mode",
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::SetBrightness(_) => "set_brightness",
            Self::SetRgb(..) => "set_rgb",
            Self::SetColorTemp(_) => "set_color_temp",
            Self::SetTargetTemperature(_) => "set_target_temperature",
            Self::SetAutoMode(_) => "set_auto_mode",
            Self::Ping => "ping",
            Self::TurnLedOn => "turn_led_on",
            Self::TurnLedOff => "turn_led_off",
            Self::SetAutoUpdate(_) => "set_auto_update",
            Self::UpdateFirmware => "update_firmware",
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            Self::SetCoverPosition(v) | Self::SetCoverTiltPosition(v) | Self::SetBrightness(v) => {
                write!(f, "{name}({v})")
            }
            Self::SetVentilationPositionMode(b) | Self::SetAutoMode(b) | Self::SetAutoUpdate(b) => {
                write!(f, "{name}({b})")
            }
            Self::SetRgb(r, g, b) => write!(f, "{name}({r}, {g}, {b})"),
            Self::SetColorTemp(ct) => write!(f, "{name}({ct})"),
            Self::SetTargetTemperature(t) => write!(f, "{name}({t})"),
            _ => f.write_str(name),
        }
    }
}
