// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimming actuators and smart bulbs.
//!
//! The hub reports brightness in percent while hosts use 0-255 levels;
//! conversions round to the nearest value.

use std::sync::Arc;

use crate::device::DeviceCommand;
use crate::directory::SharedDevice;
use crate::error::Result;
use crate::manager::StateManager;

use super::EntityBase;

/// Color mode of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Dimmable only.
    Brightness,
    /// RGB color.
    Rgb,
    /// White with adjustable color temperature.
    ColorTemp,
    /// The device does not report its active mode.
    Unknown,
}

/// Parameters of a turn-on request.
///
/// # Examples
///
/// ```
/// use homepilot_lib::entity::LightTurnOn;
///
/// let request = LightTurnOn::new().with_brightness(128).with_rgb(255, 0, 0);
/// assert_eq!(request.brightness, Some(128));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightTurnOn {
    /// Brightness on the 0-255 scale.
    pub brightness: Option<u8>,
    /// RGB color.
    pub rgb: Option<(u8, u8, u8)>,
    /// Color temperature in mireds.
    pub color_temp: Option<u16>,
}

impl LightTurnOn {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    #[must_use]
    pub fn with_rgb(mut self, r: u8, g: u8, b: u8) -> Self {
        self.rgb = Some((r, g, b));
        self
    }

    #[must_use]
    pub fn with_color_temp(mut self, mireds: u16) -> Self {
        self.color_temp = Some(mireds);
        self
    }
}

/// A light entity.
///
/// Actuators only dim. Color lights additionally accept RGB and color
/// temperature, depending on their capabilities.
#[derive(Debug, Clone)]
pub struct LightEntity {
    base: EntityBase,
    is_color_light: bool,
    supported_color_modes: Vec<ColorMode>,
}

impl LightEntity {
    /// Creates the light of a dimming actuator.
    #[must_use]
    pub fn actuator(manager: Arc<StateManager>, device: SharedDevice) -> Self {
        Self {
            base: Self::base_for(manager, device),
            is_color_light: false,
            supported_color_modes: vec![ColorMode::Brightness],
        }
    }

    /// Creates the light of a smart bulb.
    #[must_use]
    pub fn color(manager: Arc<StateManager>, device: SharedDevice) -> Self {
        let caps = device.capabilities();
        let mut modes = Vec::new();
        if caps.has_rgb {
            modes.push(ColorMode::Rgb);
        }
        if caps.has_color_temp {
            modes.push(ColorMode::ColorTemp);
        }
        if modes.is_empty() {
            modes.push(ColorMode::Brightness);
        }

        Self {
            base: Self::base_for(manager, device),
            is_color_light: true,
            supported_color_modes: modes,
        }
    }

    fn base_for(manager: Arc<StateManager>, device: SharedDevice) -> EntityBase {
        let descriptor = device.descriptor();
        let (uid, name) = (descriptor.uid.clone(), descriptor.name.clone());
        EntityBase::new(manager, device, uid, name)
    }

    #[must_use]
    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    #[must_use]
    pub fn supported_color_modes(&self) -> &[ColorMode] {
        &self.supported_color_modes
    }

    /// Returns the active color mode.
    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        if !self.is_color_light {
            return ColorMode::Brightness;
        }

        let caps = self.base.device().capabilities();
        if caps.has_color_mode {
            match self.base.attributes().color_mode_value.as_deref() {
                Some("ct") => ColorMode::ColorTemp,
                _ => ColorMode::Rgb,
            }
        } else if !caps.has_rgb && !caps.has_color_temp {
            ColorMode::Brightness
        } else {
            ColorMode::Unknown
        }
    }

    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.base.attributes().is_on
    }

    /// Brightness on the 0-255 scale.
    #[must_use]
    pub fn brightness(&self) -> Option<u8> {
        self.base.attributes().brightness.map(percent_to_level)
    }

    #[must_use]
    pub fn color_temp_kelvin(&self) -> Option<u32> {
        if !self.is_color_light || !self.base.device().capabilities().has_color_temp {
            return None;
        }
        self.base.attributes().color_temp_value.and_then(mireds_to_kelvin)
    }

    #[must_use]
    pub fn rgb_color(&self) -> Option<(u8, u8, u8)> {
        if !self.is_color_light {
            return None;
        }
        let attributes = self.base.attributes();
        Some((attributes.r_value?, attributes.g_value?, attributes.b_value?))
    }

    /// Turns the light on, applying the requested settings.
    ///
    /// An actuator given a brightness only sets the brightness. A color
    /// light is switched on first if it is off, then each requested setting
    /// is sent in turn.
    ///
    /// # Errors
    ///
    /// Returns the first command error, or the refresh error.
    pub async fn turn_on(&self, request: LightTurnOn) -> Result<()> {
        if self.is_color_light {
            if !self.is_on().unwrap_or(false) {
                self.base.execute(DeviceCommand::TurnOn).await?;
            }
            if let Some(brightness) = request.brightness {
                self.base
                    .execute(DeviceCommand::SetBrightness(level_to_percent(brightness)))
                    .await?;
            }
            if let Some((r, g, b)) = request.rgb {
                self.base.execute(DeviceCommand::SetRgb(r, g, b)).await?;
            }
            if let Some(mireds) = request.color_temp {
                self.base.execute(DeviceCommand::SetColorTemp(mireds)).await?;
            }
        } else {
            let command = match request.brightness {
                Some(brightness) => DeviceCommand::SetBrightness(level_to_percent(brightness)),
                None => DeviceCommand::TurnOn,
            };
            self.base.execute(command).await?;
        }

        self.base.update_device_state().await
    }

    /// Turns the light off and waits for the device to report it.
    ///
    /// # Errors
    ///
    /// Returns the command error, or a refresh error while waiting.
    pub async fn turn_off(&self) -> Result<()> {
        self.base
            .state_change_context(|| self.base.execute(DeviceCommand::TurnOff))
            .await
    }
}

/// Converts a 0-100 percentage to a 0-255 level.
fn percent_to_level(percent: u8) -> u8 {
    let level = (u16::from(percent.min(100)) * 255 + 50) / 100;
    u8::try_from(level).unwrap_or(u8::MAX)
}

/// Converts a 0-255 level to a 0-100 percentage.
fn level_to_percent(level: u8) -> u8 {
    let percent = (u32::from(level) * 200 + 255) / 510;
    u8::try_from(percent).unwrap_or(100)
}

fn mireds_to_kelvin(mireds: u16) -> Option<u32> {
    let mireds = u32::from(mireds);
    (mireds > 0).then(|| (1_000_000 + mireds / 2) / mireds)
}
