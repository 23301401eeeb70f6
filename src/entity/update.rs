// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub firmware updates.

use std::sync::Arc;

use crate::device::DeviceCommand;
use crate::directory::SharedDevice;
use crate::error::Result;
use crate::manager::StateManager;

use super::EntityBase;

/// Feature set of an update entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct UpdateFeatures(u32);

impl UpdateFeatures {
    pub const INSTALL: Self = Self(1);
    pub const PROGRESS: Self = Self(4);

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Firmware update of the hub.
#[derive(Debug, Clone)]
pub struct FirmwareUpdate {
    base: EntityBase,
}

impl FirmwareUpdate {
    #[must_use]
    pub fn new(manager: Arc<StateManager>, device: SharedDevice) -> Self {
        let descriptor = device.descriptor();
        let unique_id = format!("{}_fw_update", descriptor.uid);
        let name = format!("{} Firmware Update", descriptor.name);
        Self {
            base: EntityBase::new(manager, device, unique_id, name).with_device_class("firmware"),
        }
    }

    #[must_use]
    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    #[must_use]
    pub fn supported_features(&self) -> UpdateFeatures {
        UpdateFeatures::INSTALL.union(UpdateFeatures::PROGRESS)
    }

    /// Returns `true` while the hub downloads an update.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.base.attributes().download_progress.unwrap_or(false)
    }

    #[must_use]
    pub fn auto_update(&self) -> bool {
        self.base.attributes().auto_update.unwrap_or(false)
    }

    #[must_use]
    pub fn installed_version(&self) -> Option<String> {
        self.base.attributes().fw_version
    }

    #[must_use]
    pub fn latest_version(&self) -> Option<String> {
        self.base.attributes().fw_update_version
    }

    #[must_use]
    pub fn release_url(&self) -> Option<String> {
        self.base.attributes().release_notes
    }

    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.base.attributes().sw_platform
    }

    /// Starts the firmware update.
    ///
    /// The hub always installs its latest firmware; `version` and `backup`
    /// are only logged.
    ///
    /// # Errors
    ///
    /// Returns the command error.
    pub async fn install(&self, version: Option<&str>, backup: bool) -> Result<()> {
        tracing::info!(
            device_id = %self.base.device_id(),
            version = version.unwrap_or("latest"),
            backup,
            "Installing firmware update"
        );
        self.base.execute(DeviceCommand::UpdateFirmware).await
    }
}
