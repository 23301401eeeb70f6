// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shutters, blinds and garage doors.

use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

use crate::device::{CoverType, DeviceCommand};
use crate::directory::SharedDevice;
use crate::error::Result;
use crate::manager::StateManager;

use super::EntityBase;

/// Feature set of a cover entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CoverFeatures(u32);

impl CoverFeatures {
    pub const OPEN: Self = Self(1);
    pub const CLOSE: Self = Self(2);
    pub const SET_POSITION: Self = Self(4);
    pub const STOP: Self = Self(8);
    pub const OPEN_TILT: Self = Self(16);
    pub const CLOSE_TILT: Self = Self(32);
    pub const STOP_TILT: Self = Self(64);
    pub const SET_TILT_POSITION: Self = Self(128);

    /// Returns the raw bit mask.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every feature of `other` is present.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CoverFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CoverFeatures {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A cover driven by the hub.
///
/// Every command is followed by a bounded fleet refresh.
#[derive(Debug, Clone)]
pub struct CoverEntity {
    base: EntityBase,
    features: CoverFeatures,
}

impl CoverEntity {
    #[must_use]
    pub fn new(manager: Arc<StateManager>, device: SharedDevice) -> Self {
        let descriptor = device.descriptor();
        let device_class = match descriptor.cover_type {
            CoverType::Shutter => "shutter",
            CoverType::Garage => "garage",
        };
        let base = EntityBase::new(
            manager,
            Arc::clone(&device),
            descriptor.uid.clone(),
            descriptor.name.clone(),
        )
        .with_device_class(device_class);

        let caps = device.capabilities();
        let mut features = CoverFeatures::OPEN | CoverFeatures::CLOSE | CoverFeatures::STOP;
        if caps.can_set_position {
            features |= CoverFeatures::SET_POSITION;
        }
        if caps.has_tilt {
            features |=
                CoverFeatures::OPEN_TILT | CoverFeatures::CLOSE_TILT | CoverFeatures::STOP_TILT;
        }
        if caps.can_set_tilt_position {
            features |= CoverFeatures::SET_TILT_POSITION;
        }

        Self { base, features }
    }

    #[must_use]
    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    #[must_use]
    pub fn supported_features(&self) -> CoverFeatures {
        self.features
    }

    /// Position in percent, 100 being fully open.
    #[must_use]
    pub fn current_cover_position(&self) -> Option<u8> {
        self.base.attributes().cover_position
    }

    #[must_use]
    pub fn current_cover_tilt_position(&self) -> Option<u8> {
        self.base.attributes().cover_tilt_position
    }

    #[must_use]
    pub fn is_opening(&self) -> Option<bool> {
        self.base.attributes().is_opening
    }

    #[must_use]
    pub fn is_closing(&self) -> Option<bool> {
        self.base.attributes().is_closing
    }

    #[must_use]
    pub fn is_closed(&self) -> Option<bool> {
        self.base.attributes().is_closed
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn open_cover(&self) -> Result<()> {
        self.base.execute_and_refresh(DeviceCommand::OpenCover).await
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn close_cover(&self) -> Result<()> {
        self.base.execute_and_refresh(DeviceCommand::CloseCover).await
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn stop_cover(&self) -> Result<()> {
        self.base.execute_and_refresh(DeviceCommand::StopCover).await
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn set_cover_position(&self, position: u8) -> Result<()> {
        self.base
            .execute_and_refresh(DeviceCommand::SetCoverPosition(position.min(100)))
            .await
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn open_cover_tilt(&self) -> Result<()> {
        self.base
            .execute_and_refresh(DeviceCommand::OpenCoverTilt)
            .await
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn close_cover_tilt(&self) -> Result<()> {
        self.base
            .execute_and_refresh(DeviceCommand::CloseCoverTilt)
            .await
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn stop_cover_tilt(&self) -> Result<()> {
        self.base
            .execute_and_refresh(DeviceCommand::StopCoverTilt)
            .await
    }

    /// # Errors
    ///
    /// Returns the command or refresh error.
    pub async fn set_cover_tilt_position(&self, position: u8) -> Result<()> {
        self.base
            .execute_and_refresh(DeviceCommand::SetCoverTiltPosition(position.min(100)))
            .await
    }
}
