// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration types for the state manager.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::device::DeviceId;
use crate::error::Result;

/// Timing configuration for the state manager.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use homepilot_lib::manager::ManagerConfig;
///
/// let config = ManagerConfig::new()
///     .with_poll_interval(Duration::from_secs(30))
///     .with_confirmation_budget(Duration::from_secs(3));
///
/// assert_eq!(config.fleet_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Interval between scheduled fleet refreshes.
    pub poll_interval: Duration,
    /// Upper bound for one fleet-wide fetch.
    pub fleet_timeout: Duration,
    /// Upper bound for the fleet refresh an entity requests after a command.
    pub command_refresh_timeout: Duration,
    /// Wall-clock budget of the change-confirmation helper.
    pub confirmation_budget: Duration,
    /// Backoff between confirmation polls.
    pub confirmation_backoff: Backoff,
}

impl ManagerConfig {
    /// Default polling interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
    /// Default fleet fetch timeout.
    pub const DEFAULT_FLEET_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default timeout for refreshes requested after a command.
    pub const DEFAULT_COMMAND_REFRESH_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default change-confirmation budget.
    pub const DEFAULT_CONFIRMATION_BUDGET: Duration = Duration::from_secs(5);

    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the fleet fetch timeout.
    #[must_use]
    pub fn with_fleet_timeout(mut self, timeout: Duration) -> Self {
        self.fleet_timeout = timeout;
        self
    }

    /// Sets the timeout for refreshes requested after a command.
    #[must_use]
    pub fn with_command_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.command_refresh_timeout = timeout;
        self
    }

    /// Sets the change-confirmation budget.
    #[must_use]
    pub fn with_confirmation_budget(mut self, budget: Duration) -> Self {
        self.confirmation_budget = budget;
        self
    }

    /// Sets the backoff between confirmation polls.
    #[must_use]
    pub fn with_confirmation_backoff(mut self, backoff: Backoff) -> Self {
        self.confirmation_backoff = backoff;
        self
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            fleet_timeout: Self::DEFAULT_FLEET_TIMEOUT,
            command_refresh_timeout: Self::DEFAULT_COMMAND_REFRESH_TIMEOUT,
            confirmation_budget: Self::DEFAULT_CONFIRMATION_BUDGET,
            confirmation_backoff: Backoff::default(),
        }
    }
}

/// Doubling backoff with an upper bound.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use homepilot_lib::manager::Backoff;
///
/// let delays: Vec<_> = Backoff::default().delays().take(7).collect();
/// let millis: Vec<_> = delays.iter().map(Duration::as_millis).collect();
/// assert_eq!(millis, vec![50, 100, 200, 400, 800, 1000, 1000]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Largest delay between attempts.
    pub max_delay: Duration,
}

impl Backoff {
    /// Creates a backoff with the given bounds.
    #[must_use]
    pub const fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
        }
    }

    /// Returns the delay for a given attempt, starting at 0.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Returns the endless sequence of delays.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let backoff = *self;
        (0_u32..).map(move |attempt| backoff.delay_for_attempt(attempt))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), Duration::from_secs(1))
    }
}

/// Per-installation options chosen by the user.
///
/// Deserialized from the host's stored options.
///
/// # Examples
///
/// ```
/// use homepilot_lib::manager::EntryOptions;
///
/// let options = EntryOptions::from_json(
///     r#"{"exclude": ["1010"], "sensor_type": ["2020"]}"#,
/// ).unwrap();
///
/// assert!(options.is_excluded(&"1010".into()));
/// assert!(options.is_ternary_contact_sensor(&"2020".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOptions {
    /// Devices for which no entities are created.
    #[serde(default)]
    pub exclude: Vec<DeviceId>,
    /// Contact sensors that report open/tilted/closed.
    #[serde(default, rename = "sensor_type")]
    pub ternary_contact_sensors: Vec<DeviceId>,
}

impl EntryOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options stored by the host as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) if `json` is not a valid options object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Excludes a device from entity setup.
    #[must_use]
    pub fn exclude(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.exclude.push(device_id.into());
        self
    }

    /// Marks a contact sensor as reporting three states.
    #[must_use]
    pub fn ternary_contact_sensor(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.ternary_contact_sensors.push(device_id.into());
        self
    }

    /// Returns `true` if no entities should be created for this device.
    #[must_use]
    pub fn is_excluded(&self, device_id: &DeviceId) -> bool {
        self.exclude.contains(device_id)
    }

    /// Returns `true` if this contact sensor reports three states.
    #[must_use]
    pub fn is_ternary_contact_sensor(&self, device_id: &DeviceId) -> bool {
        self.ternary_contact_sensors.contains(device_id)
    }
}
