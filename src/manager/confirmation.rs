// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Waiting for a command to show up in the device state.
//!
//! Hub commands return before the device has moved. After issuing one, an
//! entity polls the device until its status map differs from the one seen
//! before the command, then asks the host to re-render. If nothing changes
//! within the budget the helper gives up quietly and the last merged state
//! stays on screen.

use std::future::Future;
use std::time::Duration;

use crate::device::DeviceId;
use crate::error::Result;
use crate::state::StateSnapshot;

use super::StateManager;

impl StateManager {
    /// Runs `action` and waits for the device state to reflect it, using the
    /// configured confirmation budget.
    ///
    /// See [`confirm_change_within`](Self::confirm_change_within).
    ///
    /// # Errors
    ///
    /// Returns the error of `action`, or of a device refresh while waiting.
    pub async fn confirm_change<F, Fut, T>(&self, device_id: &DeviceId, action: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.confirm_change_within(device_id, self.config().confirmation_budget, action)
            .await
    }

    /// Runs `action` and waits up to `budget` for the device state to
    /// reflect it.
    ///
    /// The device's cached snapshot is captured before `action` runs. The
    /// device is then refreshed with exponential backoff (50 ms doubling up
    /// to 1 s by default) until its status map differs from the captured
    /// one. On the first difference a single
    /// [`StateEvent::DeviceChanged`](crate::event::StateEvent::DeviceChanged)
    /// is published. Running out of budget is not an error.
    ///
    /// # Errors
    ///
    /// Returns the error of `action`, or of a device refresh while waiting.
    pub async fn confirm_change_within<F, Fut, T>(
        &self,
        device_id: &DeviceId,
        budget: Duration,
        action: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let before = self.last_known(device_id).map(|entry| entry.snapshot);
        let output = action().await?;

        match tokio::time::timeout(budget, self.wait_for_change(device_id, before.as_ref())).await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::debug!(%device_id, ?budget, "No state change observed within budget");
            }
        }

        Ok(output)
    }

    async fn wait_for_change(
        &self,
        device_id: &DeviceId,
        before: Option<&StateSnapshot>,
    ) -> Result<()> {
        let backoff = self.config().confirmation_backoff;
        let mut delays = backoff.delays();

        loop {
            self.refresh_one(device_id).await?;

            let after = self.last_known(device_id);
            if statuses_changed(before, after.as_ref().map(|entry| &entry.snapshot)) {
                tracing::debug!(%device_id, "State change confirmed");
                self.notify_device_changed(device_id);
                return Ok(());
            }

            let delay = delays.next().unwrap_or(backoff.max_delay);
            tokio::time::sleep(delay).await;
        }
    }
}

/// A device without a captured snapshot counts as changed as soon as any
/// snapshot is cached.
fn statuses_changed(before: Option<&StateSnapshot>, after: Option<&StateSnapshot>) -> bool {
    match (before, after) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(before), Some(after)) => before.statuses_map() != after.statuses_map(),
    }
}
