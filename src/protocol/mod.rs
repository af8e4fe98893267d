// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport seam between the poll loop and the field bus.
//!
//! A [`Connector`] opens links; a [`RegisterLink`] reads input registers over
//! an open link. [`ModbusTcpConnector`] is the production implementation;
//! tests drive the poll loop with scripted implementations of the same traits.

mod modbus;

pub use modbus::{ModbusTcpConnector, ModbusTcpLink};

use crate::error::{ConnectError, TransportError};

/// An open, half-duplex request/response link to the device.
#[allow(async_fn_in_trait)]
pub trait RegisterLink {
    /// Reads `count` consecutive input registers starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on any socket failure or device exception.
    /// Partial data is never returned.
    async fn read_input_registers(
        &mut self,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, TransportError>;

    /// Closes the link. Must not fail, and may be called more than once.
    async fn close(&mut self);
}

/// Factory for [`RegisterLink`]s.
#[allow(async_fn_in_trait)]
pub trait Connector {
    /// The link type produced by this connector.
    type Link: RegisterLink;

    /// Makes a single connection attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] if the device cannot be reached.
    async fn connect(&mut self) -> Result<Self::Link, ConnectError>;
}
