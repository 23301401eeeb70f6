// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capability flags.
//!
//! Every device reports an explicit set of flags describing which readings
//! it provides and which commands it accepts. Entity adapters are only built
//! for a device after checking the matching flag, so an adapter never probes
//! a device for attributes it may not have.

/// Capabilities of a `HomePilot` device.
///
/// # Examples
///
/// ```
/// use homepilot_lib::Capabilities;
///
/// let caps = Capabilities::builder()
///     .with_position()
///     .with_tilt()
///     .build();
///
/// assert!(caps.can_set_position);
/// assert!(caps.has_tilt);
/// assert!(!caps.has_temperature);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
// Each boolean is an independent flag reported by the hub.
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Accepts the ping command.
    pub has_ping_cmd: bool,

    /// Reports a temperature reading.
    pub has_temperature: bool,
    /// Reports a target temperature.
    pub has_target_temperature: bool,
    /// Accepts a new target temperature.
    pub can_set_target_temperature: bool,
    /// Supports the automatic (schedule) mode.
    pub has_auto_mode: bool,
    /// Reports its battery level.
    pub has_battery_level: bool,

    /// Reports wind speed.
    pub has_wind_speed: bool,
    /// Reports ambient brightness.
    pub has_brightness: bool,
    /// Reports the sun's elevation.
    pub has_sun_height: bool,
    /// Reports the sun's direction.
    pub has_sun_direction: bool,
    /// Reports a contact (window) state.
    pub has_contact_state: bool,

    /// Accepts an absolute cover position.
    pub can_set_position: bool,
    /// Has tiltable slats.
    pub has_tilt: bool,
    /// Accepts an absolute tilt position.
    pub can_set_tilt_position: bool,
    /// Exposes the ventilation position mode setting.
    pub has_ventilation_position_config: bool,

    /// Supports RGB colors.
    pub has_rgb: bool,
    /// Supports color temperature.
    pub has_color_temp: bool,
    /// Reports which color mode is active.
    pub has_color_mode: bool,
}

impl Capabilities {
    /// Creates an empty capability set.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns a builder for a custom capability set.
    #[must_use]
    pub fn builder() -> CapabilitiesBuilder {
        CapabilitiesBuilder::new()
    }

    /// Returns whether the device reports any environment reading.
    #[must_use]
    pub const fn has_environment_readings(&self) -> bool {
        self.has_temperature
            || self.has_target_temperature
            || self.has_wind_speed
            || self.has_brightness
            || self.has_sun_height
            || self.has_sun_direction
    }

    /// Returns whether the device supports any color control.
    #[must_use]
    pub const fn is_color_light(&self) -> bool {
        self.has_rgb || self.has_color_temp
    }
}

/// Builder for creating custom capabilities.
#[derive(Debug, Default)]
pub struct CapabilitiesBuilder {
    inner: Capabilities,
}

impl CapabilitiesBuilder {
    /// Creates a new builder with no capabilities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the ping command.
    #[must_use]
    pub fn with_ping(mut self) -> Self {
        self.inner.has_ping_cmd = true;
        self
    }

    /// Enables the temperature reading.
    #[must_use]
    pub fn with_temperature(mut self) -> Self {
        self.inner.has_temperature = true;
        self
    }

    /// Enables the target temperature reading.
    #[must_use]
    pub fn with_target_temperature(mut self) -> Self {
        self.inner.has_target_temperature = true;
        self
    }

    /// Enables setting the target temperature.
    #[must_use]
    pub fn with_settable_target_temperature(mut self) -> Self {
        self.inner.has_target_temperature = true;
        self.inner.can_set_target_temperature = true;
        self
    }

    /// Enables the automatic mode.
    #[must_use]
    pub fn with_auto_mode(mut self) -> Self {
        self.inner.has_auto_mode = true;
        self
    }

    /// Enables the battery level reading.
    #[must_use]
    pub fn with_battery_level(mut self) -> Self {
        self.inner.has_battery_level = true;
        self
    }

    /// Enables the wind speed reading.
    #[must_use]
    pub fn with_wind_speed(mut self) -> Self {
        self.inner.has_wind_speed = true;
        self
    }

    /// Enables the ambient brightness reading.
    #[must_use]
    pub fn with_brightness(mut self) -> Self {
        self.inner.has_brightness = true;
        self
    }

    /// Enables the sun elevation and direction readings.
    #[must_use]
    pub fn with_sun_position(mut self) -> Self {
        self.inner.has_sun_height = true;
        self.inner.has_sun_direction = true;
        self
    }

    /// Enables the contact state reading.
    #[must_use]
    pub fn with_contact_state(mut self) -> Self {
        self.inner.has_contact_state = true;
        self
    }

    /// Enables absolute cover positioning.
    #[must_use]
    pub fn with_position(mut self) -> Self {
        self.inner.can_set_position = true;
        self
    }

    /// Enables tilt control.
    #[must_use]
    pub fn with_tilt(mut self) -> Self {
        self.inner.has_tilt = true;
        self
    }

    /// Enables absolute tilt positioning.
    #[must_use]
    pub fn with_tilt_position(mut self) -> Self {
        self.inner.has_tilt = true;
        self.inner.can_set_tilt_position = true;
        self
    }

    /// Enables the ventilation position mode setting.
    #[must_use]
    pub fn with_ventilation_position_config(mut self) -> Self {
        self.inner.has_ventilation_position_config = true;
        self
    }

    /// Enables RGB color control.
    #[must_use]
    pub fn with_rgb(mut self) -> Self {
        self.inner.has_rgb = true;
        self
    }

    /// Enables color temperature control.
    #[must_use]
    pub fn with_color_temp(mut self) -> Self {
        self.inner.has_color_temp = true;
        self
    }

    /// Enables color mode reporting.
    #[must_use]
    pub fn with_color_mode(mut self) -> Self {
        self.inner.has_color_mode = true;
        self
    }

    /// Builds the capabilities.
    #[must_use]
    pub fn build(self) -> Capabilities {
        self.inner
    }
}
