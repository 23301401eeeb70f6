// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state snapshots and the per-device state cache.
//!
//! A [`StateSnapshot`] is one reading of a device fetched from the hub. The
//! [`StateCache`] keeps the most recently *requested* snapshot that was
//! applied for each device, keyed by [`Timestamp`].

mod cache;
mod snapshot;

pub use cache::{CachedState, MergeOutcome, StateCache};
pub use snapshot::{Clock, STATUSES_MAP, StateSnapshot, SystemClock, Timestamp};
