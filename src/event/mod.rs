// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change notifications for the host platform.
//!
//! The [`EventBus`] uses tokio's broadcast channel so every entity adapter
//! (or the host's render loop) can hold its own receiver.
//!
//! # Examples
//!
//! ```
//! use homepilot_lib::DeviceId;
//! use homepilot_lib::event::{EventBus, StateEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(StateEvent::device_changed(DeviceId::new("1010")));
//! assert!(rx.try_recv().is_ok());
//! ```

mod event_bus;
mod state_event;

pub use event_bus::EventBus;
pub use state_event::StateEvent;
