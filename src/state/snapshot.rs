// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State snapshots and their timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FetchError, Result};

/// Key of the status map inside a device snapshot.
pub const STATUSES_MAP: &str = "statusesMap";

/// One state reading of a device, as returned by the hub.
///
/// A snapshot is a JSON object. The device-specific readings live under
/// [`STATUSES_MAP`]; the change-confirmation helper compares that map to
/// decide whether a command has taken effect.
///
/// # Examples
///
/// ```
/// use homepilot_lib::state::StateSnapshot;
/// use serde_json::json;
///
/// let snapshot = StateSnapshot::from_value(json!({"statusesMap": {"Position": 40}})).unwrap();
/// assert_eq!(snapshot.statuses_map(), Some(&json!({"Position": 40})));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot(Map<String, Value>);

impl StateSnapshot {
    /// Creates a snapshot from a JSON object.
    #[must_use]
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Creates a snapshot from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnexpectedFormat`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FetchError::UnexpectedFormat(format!(
                "expected a JSON object, got {other}"
            ))
            .into()),
        }
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the device's status map, if present.
    #[must_use]
    pub fn statuses_map(&self) -> Option<&Value> {
        self.get(STATUSES_MAP)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the snapshot and returns the JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for StateSnapshot {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Moment at which a snapshot was requested from the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The Unix epoch. Lower than any real fetch time.
    pub const EPOCH: Self = Self(DateTime::<Utc>::UNIX_EPOCH);

    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from whole seconds since the Unix epoch.
    ///
    /// Out-of-range values saturate to [`Timestamp::EPOCH`].
    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        DateTime::from_timestamp(secs, 0).map_or(Self::EPOCH, Self)
    }

    /// Creates a timestamp from milliseconds since the Unix epoch.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        DateTime::from_timestamp_millis(millis).map_or(Self::EPOCH, Self)
    }

    /// Returns the wrapped date-time.
    #[must_use]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Source of fetch timestamps.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
