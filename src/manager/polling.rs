// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduled and on-demand fleet refreshes.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::event::StateEvent;

use super::{RefreshOutcome, StateManager};

/// Why the polling task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The cancellation token was triggered.
    Cancelled,
    /// The hub rejected the credentials; polling must not resume until the
    /// host has re-authenticated.
    AuthenticationFailed,
}

impl StateManager {
    /// Runs the initial fleet refresh during setup.
    ///
    /// # Errors
    ///
    /// Returns any refresh error; setup should fail (and be retried by the
    /// host) or start re-authentication for
    /// [`Error::AuthenticationFailed`].
    pub async fn first_refresh(&self) -> Result<()> {
        self.refresh_all().await?;
        self.publish(StateEvent::Refreshed);
        Ok(())
    }

    /// Spawns the periodic fleet refresh.
    ///
    /// Every [`poll_interval`](super::ManagerConfig::poll_interval) the task
    /// calls [`refresh_all`](Self::refresh_all):
    ///
    /// - on success it publishes [`StateEvent::Refreshed`];
    /// - on a transient failure it publishes [`StateEvent::RefreshFailed`]
    ///   and keeps polling;
    /// - on an authentication failure it publishes
    ///   [`StateEvent::AuthenticationFailed`] and stops.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use tokio_util::sync::CancellationToken;
    /// use homepilot_lib::manager::{PollExit, StateManager};
    ///
    /// # async fn example(manager: Arc<StateManager>) {
    /// let cancel = CancellationToken::new();
    /// let handle = manager.start_polling(cancel.clone());
    ///
    /// // On unload:
    /// cancel.cancel();
    /// assert_eq!(handle.await.unwrap(), PollExit::Cancelled);
    /// # }
    /// ```
    pub fn start_polling(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<PollExit> {
        let manager = Arc::clone(self);
        let interval = manager.config().poll_interval;

        tokio::spawn(async move {
            tracing::debug!(?interval, "Starting state polling");

            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        tracing::debug!("State polling cancelled");
                        return PollExit::Cancelled;
                    }
                    () = tokio::time::sleep(interval) => {}
                }

                match manager.refresh_all().await {
                    Ok(RefreshOutcome::Completed) => manager.publish(StateEvent::Refreshed),
                    Ok(RefreshOutcome::Skipped) => {}
                    Err(Error::AuthenticationFailed) => {
                        tracing::warn!("Hub rejected credentials, stopping state polling");
                        manager.publish(StateEvent::AuthenticationFailed);
                        return PollExit::AuthenticationFailed;
                    }
                    Err(e) if e.is_transient() => {
                        tracing::warn!(error = %e, "Scheduled refresh failed, retrying next interval");
                        manager.publish(StateEvent::refresh_failed(e.to_string()));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Scheduled refresh failed");
                        manager.publish(StateEvent::refresh_failed(e.to_string()));
                    }
                }
            }
        })
    }

    /// Refreshes the fleet after a command, bounded by
    /// [`command_refresh_timeout`](super::ManagerConfig::command_refresh_timeout).
    ///
    /// Transient refresh failures are reported through
    /// [`StateEvent::RefreshFailed`] and not returned, as they are for
    /// scheduled refreshes.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if the refresh does not finish in time.
    /// - [`Error::AuthenticationFailed`] if the hub rejects the credentials.
    pub async fn request_refresh(&self) -> Result<()> {
        let timeout = self.config().command_refresh_timeout;

        let result = tokio::time::timeout(timeout, self.refresh_all())
            .await
            .map_err(|_| Error::Timeout(timeout))?;

        match result {
            Ok(RefreshOutcome::Completed) => {
                self.publish(StateEvent::Refreshed);
                Ok(())
            }
            Ok(RefreshOutcome::Skipped) => Ok(()),
            Err(Error::AuthenticationFailed) => {
                self.publish(StateEvent::AuthenticationFailed);
                Err(Error::AuthenticationFailed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Requested refresh failed");
                self.publish(StateEvent::refresh_failed(e.to_string()));
                Ok(())
            }
        }
    }
}
