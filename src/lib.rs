// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `HomePilot` Lib - State reconciliation for Rademacher `HomePilot` hubs.
//!
//! This library keeps a consistent local view of the devices attached to a
//! `HomePilot` hub and exposes it to a home-automation host through entity
//! adapters.
//!
//! # Features
//!
//! - **Fleet polling**: Periodic refresh of every device, at most one at a time
//! - **Ordered merges**: Late responses never overwrite newer state
//! - **Change confirmation**: Commands are followed until the device reports them
//! - **Entities**: Covers, switches, lights, thermostats, sensors, buttons, updates
//!
//! The hub's HTTP API is not part of this crate. Hosts plug their client in
//! through the [`HubApi`] trait and their device models through [`HubDevice`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use homepilot_lib::{DeviceDirectory, HubApi};
//! use homepilot_lib::entity::setup_entities;
//! use homepilot_lib::event::StateEvent;
//! use homepilot_lib::manager::{EntryOptions, StateManager};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(api: Arc<dyn HubApi>, directory: DeviceDirectory) -> homepilot_lib::Result<()> {
//! let manager = Arc::new(StateManager::new(api, directory));
//!
//! // Fails setup if the hub cannot be reached
//! manager.first_refresh().await?;
//!
//! let entities = setup_entities(&manager, &EntryOptions::default());
//! let cancel = CancellationToken::new();
//! let poller = manager.start_polling(cancel.clone());
//!
//! let mut events = manager.subscribe();
//! while let Ok(event) = events.recv().await {
//!     if let StateEvent::AuthenticationFailed = event {
//!         break;
//!     }
//!     // Re-render `entities` here
//! }
//! # let _ = (entities, poller);
//! # Ok(())
//! # }
//! ```
//!
//! # Confirming a command
//!
//! ```no_run
//! use std::sync::Arc;
//! use homepilot_lib::{DeviceCommand, DeviceId};
//! use homepilot_lib::manager::StateManager;
//!
//! # async fn example(manager: Arc<StateManager>) -> homepilot_lib::Result<()> {
//! let id = DeviceId::new("1010");
//! let device = Arc::clone(manager.device(&id)?);
//!
//! // Returns once the device reports a new state, or after 5 s
//! manager
//!     .confirm_change(&id, || device.execute(DeviceCommand::SetCoverPosition(50)))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod capabilities;
pub mod device;
mod directory;
pub mod entity;
pub mod error;
pub mod event;
pub mod manager;
pub mod state;

pub use api::{FleetState, HubApi};
pub use capabilities::{Capabilities, CapabilitiesBuilder};
pub use device::{
    ContactState, CoverType, DeviceAttributes, DeviceCommand, DeviceDescriptor, DeviceId,
    DeviceKind, HubDevice,
};
pub use directory::{DeviceDirectory, SharedDevice};
pub use error::{DeviceError, Error, FetchError, Result};
