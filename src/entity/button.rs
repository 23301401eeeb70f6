// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use crate::device::DeviceCommand;
use crate::directory::SharedDevice;
use crate::error::Result;
use crate::manager::StateManager;

use super::{EntityBase, EntityCategory};

/// Diagnostic button that pings a device.
///
/// The button stays usable while the device is unavailable, since pinging is
/// how a user checks an unreachable device.
#[derive(Debug, Clone)]
pub struct PingButton {
    base: EntityBase,
}

impl PingButton {
    #[must_use]
    pub fn new(manager: Arc<StateManager>, device: SharedDevice) -> Self {
        let descriptor = device.descriptor();
        let unique_id = format!("{}_ping", descriptor.uid);
        let name = format!("{} Ping", descriptor.name);
        Self {
            base: EntityBase::new(manager, device, unique_id, name)
                .with_entity_category(EntityCategory::Diagnostic),
        }
    }

    #[must_use]
    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    #[must_use]
    pub fn available(&self) -> bool {
        true
    }

    /// Ping buttons are hidden until the user enables them.
    #[must_use]
    pub fn enabled_by_default(&self) -> bool {
        false
    }

    /// Pings the device, then requests a fleet refresh.
    ///
    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn press(&self) -> Result<()> {
        self.base.execute_and_refresh(DeviceCommand::Ping).await
    }
}
