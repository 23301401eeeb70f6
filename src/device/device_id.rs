// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the hub assigns to a device (its `did`).
///
/// Hub ids are short decimal strings. The hub itself is addressed with the
/// reserved id `-1`, see [`DeviceId::hub`].
///
/// # Examples
///
/// ```
/// use homepilot_lib::DeviceId;
///
/// let id = DeviceId::new("1010");
/// assert_eq!(id.as_str(), "1010");
/// assert!(DeviceId::hub().is_hub());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Reserved id under which the hub's own status is cached.
    pub const HUB: &'static str = "-1";

    /// Creates an identifier from the hub's `did`.
    #[must_use]
    pub fn new(did: impl Into<String>) -> Self {
        Self(did.into())
    }

    /// Returns the identifier of the hub itself.
    #[must_use]
    pub fn hub() -> Self {
        Self(Self::HUB.to_string())
    }

    /// Returns `true` if this is the hub's own id.
    #[must_use]
    pub fn is_hub(&self) -> bool {
        self.0 == Self::HUB
    }

    /// Returns the raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(did: &str) -> Self {
        Self::new(did)
    }
}

impl From<String> for DeviceId {
    fn from(did: String) -> Self {
        Self(did)
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
