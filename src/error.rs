// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `HomePilot` library.
//!
//! Authentication failures are kept apart from every other failure kind so
//! callers can start a re-authentication flow instead of retrying.

use std::time::Duration;

use thiserror::Error;

use crate::device::DeviceId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The hub rejected the configured credentials.
    ///
    /// This error is never retried internally. Automatic polling stops when
    /// it is observed.
    #[error("authentication with the hub failed")]
    AuthenticationFailed,

    /// Fetching state from the hub failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A bounded operation did not finish in time.
    #[error("operation timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// A device command failed.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// A hub payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Device was not found in the directory.
    #[error("device {0} not found")]
    DeviceNotFound(DeviceId),

    /// Device does not support the requested capability.
    #[error("device does not support {0}")]
    CapabilityNotSupported(&'static str),
}

impl Error {
    /// Returns `true` if this error means the credentials must be
    /// re-established before polling can resume.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }

    /// Returns `true` for transient failures (network, protocol, timeout)
    /// that are worth retrying on the next poll.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Timeout(_))
    }
}

/// Transient failures while fetching device state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The hub could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The hub answered with an unexpected status.
    #[error("unexpected response status {0}")]
    Status(u16),

    /// The hub response did not have the expected shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors raised by device command execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The hub rejected the command.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// The command does not apply to this kind of device.
    #[error("command {command} not supported by {device_id}")]
    UnsupportedCommand {
        /// The device the command was sent to.
        device_id: DeviceId,
        /// Short name of the command.
        command: &'static str,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_is_distinguished() {
        assert!(Error::AuthenticationFailed.is_auth_failure());
        assert!(!Error::AuthenticationFailed.is_transient());

        let fetch: Error = FetchError::ConnectionFailed("reset".into()).into();
        assert!(!fetch.is_auth_failure());
        assert!(fetch.is_transient());
    }

    #[test]
    fn timeout_display() {
        let err = Error::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "operation timed out after 10000 ms");
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::UnsupportedCommand {
            device_id: DeviceId::new("1010"),
            command: "ping",
        };
        assert_eq!(err.to_string(), "command ping not supported by 1010");
    }

    #[test]
    fn not_found_display() {
        let err = Error::DeviceNotFound(DeviceId::hub());
        assert_eq!(err.to_string(), "device -1 not found");
    }
}
