// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the monitor.
//!
//! Failures are grouped by where they happen: establishing a connection,
//! exchanging a frame with the device, writing an event line, and loading
//! configuration. The poll loop only distinguishes two classes at runtime:
//! [`Error::Transport`] forces a reconnect, everything else is logged as an
//! unexpected error and the loop carries on.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The initial connection to the device failed.
    #[error("connect error: {0}")]
    Connect(#[from] ConnectError),

    /// A read failed mid-session.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// An event line could not be persisted.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Startup configuration is unusable.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Anything not covered by the variants above.
    #[error("{0}")]
    Unexpected(String),
}

/// Errors raised while opening a connection to the device.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Socket-level failure (refused, unreachable, reset during handshake).
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The connection attempt did not complete in time.
    #[error("connect timed out after {0} ms")]
    Timeout(u64),

    /// The configured host could not be resolved to a socket address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors raised while reading a register frame from a connected device.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Socket-level failure (reset, aborted, broken pipe).
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The device answered with an exception response.
    #[error("device exception: {0}")]
    Exception(String),

    /// The response could not be matched to the request.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The device did not answer in time.
    #[error("read timed out after {0} ms")]
    Timeout(u64),

    /// The response carried the wrong number of registers.
    #[error("expected {expected} registers, got {actual}")]
    FrameLength {
        /// Register count the layout requires.
        expected: usize,
        /// Register count actually received.
        actual: usize,
    },

    /// A read was attempted without an open connection.
    #[error("not connected")]
    NotConnected,
}

/// Errors raised by an event sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing or syncing the event line failed.
    #[error("failed to write event line: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file: {0}")]
    Read(#[source] std::io::Error),

    /// The configuration file is not valid JSON for [`MonitorConfig`](crate::MonitorConfig).
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
