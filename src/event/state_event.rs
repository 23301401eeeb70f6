// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events published by the state manager.

use crate::device::DeviceId;

/// Notifications for the host platform's rendering layer.
///
/// # Examples
///
/// ```
/// use homepilot_lib::DeviceId;
/// use homepilot_lib::event::StateEvent;
///
/// let event = StateEvent::DeviceChanged { device_id: DeviceId::new("1010") };
/// assert_eq!(event.device_id(), Some(&DeviceId::new("1010")));
/// assert!(event.requires_render());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// A fleet-wide refresh finished; every entity should re-render.
    Refreshed,

    /// The state of one device changed and its entities should re-render.
    DeviceChanged {
        /// The device whose entities need re-rendering.
        device_id: DeviceId,
    },

    /// A scheduled fleet refresh failed with a transient error.
    ///
    /// Polling continues on the next tick.
    RefreshFailed {
        /// Description of the failure.
        error: String,
    },

    /// The hub rejected the credentials. Polling has stopped and the host
    /// must re-authenticate.
    AuthenticationFailed,
}

impl StateEvent {
    /// Returns the device this event targets, if any.
    #[must_use]
    pub fn device_id(&self) -> Option<&DeviceId> {
        match self {
            Self::DeviceChanged { device_id } => Some(device_id),
            _ => None,
        }
    }

    /// Returns `true` if entities should re-render in response.
    #[must_use]
    pub fn requires_render(&self) -> bool {
        matches!(self, Self::Refreshed | Self::DeviceChanged { .. })
    }

    /// Returns `true` if this event reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RefreshFailed { .. } | Self::AuthenticationFailed)
    }

    /// Creates a device changed event.
    #[must_use]
    pub fn device_changed(device_id: DeviceId) -> Self {
        Self::DeviceChanged { device_id }
    }

    /// Creates a refresh failed event.
    #[must_use]
    pub fn refresh_failed(error: impl Into<String>) -> Self {
        Self::RefreshFailed {
            error: error.into(),
        }
    }
}
