// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Modbus/TCP implementation of the transport seam.

use std::fmt;
use std::net::SocketAddr;

use tokio_modbus::Slave;
use tokio_modbus::client::{Client, Context, Reader, tcp};

use crate::error::{ConnectError, TransportError};
use crate::protocol::{Connector, RegisterLink};

/// Opens Modbus/TCP connections to a single device.
///
/// The host is resolved on every attempt so that DNS changes are picked up
/// across reconnects.
///
/// # Examples
///
/// ```no_run
/// use espwatch::protocol::{Connector, ModbusTcpConnector, RegisterLink};
///
/// # async fn read() -> Result<(), Box<dyn std::error::Error>> {
/// let mut connector = ModbusTcpConnector::new("192.168.4.1", 502, 1);
/// let mut link = connector.connect().await?;
/// let registers = link.read_input_registers(0, 9).await?;
/// assert_eq!(registers.len(), 9);
/// link.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ModbusTcpConnector {
    host: String,
    port: u16,
    unit_id: u8,
}

impl ModbusTcpConnector {
    /// Creates a connector for `host:port`, addressing unit `unit_id`.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, unit_id: u8) -> Self {
        Self {
            host: host.into(),
            port,
            unit_id,
        }
    }

    async fn resolve(&self) -> Result<SocketAddr, ConnectError> {
        let target = format!("{}:{}", self.host, self.port);
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| ConnectError::InvalidAddress(format!("{target}: {e}")))?
            .next()
            .ok_or(ConnectError::InvalidAddress(target))
    }
}

impl Connector for ModbusTcpConnector {
    type Link = ModbusTcpLink;

    async fn connect(&mut self) -> Result<Self::Link, ConnectError> {
        let addr = self.resolve().await?;
        tracing::debug!(%addr, unit = self.unit_id, "Opening Modbus/TCP connection");

        let context = tcp::connect_slave(addr, Slave(self.unit_id)).await?;
        Ok(ModbusTcpLink {
            context: Some(context),
            peer: addr,
        })
    }
}

/// An open Modbus/TCP client context.
pub struct ModbusTcpLink {
    context: Option<Context>,
    peer: SocketAddr,
}

impl fmt::Debug for ModbusTcpLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModbusTcpLink")
            .field("peer", &self.peer)
            .field("open", &self.context.is_some())
            .finish()
    }
}

impl ModbusTcpLink {
    /// Returns the connected peer address.
    #[must_use]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl RegisterLink for ModbusTcpLink {
    async fn read_input_registers(
        &mut self,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>, TransportError> {
        let context = self.context.as_mut().ok_or(TransportError::NotConnected)?;

        match context.read_input_registers(address, count).await {
            Ok(Ok(words)) => Ok(words),
            Ok(Err(exception)) => Err(TransportError::Exception(exception.to_string())),
            Err(tokio_modbus::Error::Transport(e)) => Err(TransportError::Io(e)),
            Err(e) => Err(TransportError::Protocol(e.to_string())),
        }
    }

    async fn close(&mut self) {
        if let Some(mut context) = self.context.take() {
            if let Err(e) = context.disconnect().await {
                tracing::debug!(peer = %self.peer, error = %e, "Ignoring error on disconnect");
            }
        }
    }
}
