// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seam to the hub's remote API.
//!
//! The HTTP client that talks to the hub lives outside this crate. The
//! state manager only needs the three read operations of [`HubApi`].

use std::collections::HashMap;

use async_trait::async_trait;

use crate::device::DeviceId;
use crate::error::Result;
use crate::state::StateSnapshot;

/// Fleet-wide fetch result, keyed by device id.
pub type FleetState = HashMap<DeviceId, StateSnapshot>;

/// Read access to device state on the hub.
///
/// Implementations must report rejected credentials as
/// [`Error::AuthenticationFailed`](crate::Error::AuthenticationFailed) and
/// every other failure with any other variant, typically
/// [`Error::Fetch`](crate::Error::Fetch).
#[async_trait]
pub trait HubApi: Send + Sync {
    /// Fetches the state of every device in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn get_all_device_states(&self) -> Result<FleetState>;

    /// Fetches the state of a single device.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn get_device_state(&self, device_id: &DeviceId) -> Result<StateSnapshot>;

    /// Fetches the hub's own status (firmware, LEDs, updates).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn get_hub_state(&self) -> Result<StateSnapshot>;
}
