// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State reconciliation for `HomePilot` devices.
//!
//! The [`StateManager`] is the single place that fetches, merges and
//! exposes device state:
//!
//! - **Fleet refresh**: [`StateManager::refresh_all`] fetches every device
//!   at once. At most one fleet refresh runs at a time.
//! - **Device refresh**: [`StateManager::refresh_one`] fetches a single
//!   device, typically after a command.
//! - **Ordered merges**: snapshots are stamped when requested and
//!   [`StateManager::apply`] drops any snapshot older than the cached one.
//! - **Change confirmation**: [`StateManager::confirm_change`] runs a
//!   command and polls the device until its state reflects it.
//! - **Polling**: [`StateManager::start_polling`] refreshes the fleet
//!   periodically and stops on authentication failures.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use homepilot_lib::{DeviceCommand, DeviceDirectory, DeviceId, HubApi};
//! use homepilot_lib::manager::{ManagerConfig, StateManager};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(api: Arc<dyn HubApi>, directory: DeviceDirectory) -> homepilot_lib::Result<()> {
//! let manager = Arc::new(StateManager::new(api, directory).with_config(ManagerConfig::default()));
//! manager.first_refresh().await?;
//! let _poller = manager.start_polling(CancellationToken::new());
//!
//! let id = DeviceId::new("1010");
//! let device = Arc::clone(manager.device(&id)?);
//! manager
//!     .confirm_change(&id, || device.execute(DeviceCommand::TurnOff))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod confirmation;
mod polling;
mod state_manager;

pub use config::{Backoff, EntryOptions, ManagerConfig};
pub use polling::PollExit;
pub use state_manager::{RefreshOutcome, StateManager};
