// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection lifecycle for the monitored device.

use std::fmt;
use std::time::Duration;

use crate::config::{MonitorConfig, duration_ms};
use crate::error::{ConnectError, TransportError};
use crate::protocol::{Connector, RegisterLink};
use crate::state::{REGISTER_COUNT, RegisterBlock, START_ADDRESS};

/// Owns at most one open link to the device.
///
/// Connect and read are each bounded by a timeout. Back-off between failed
/// attempts is the caller's job.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    link: Option<C::Link>,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl<C: Connector> fmt::Debug for ConnectionManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connected", &self.link.is_some())
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl<C: Connector> ConnectionManager<C> {
    /// Creates a disconnected manager with explicit timeouts.
    #[must_use]
    pub fn new(connector: C, connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            connector,
            link: None,
            connect_timeout,
            read_timeout,
        }
    }

    /// Creates a disconnected manager with the timeouts from `config`.
    #[must_use]
    pub fn from_config(connector: C, config: &MonitorConfig) -> Self {
        Self::new(connector, config.connect_timeout(), config.read_timeout())
    }

    /// Returns true if a link is currently held.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Returns the open link, connecting first if necessary.
    ///
    /// When already connected this performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] if the single connection attempt fails or
    /// exceeds the connect timeout. The manager stays disconnected.
    pub async fn ensure_connected(&mut self) -> Result<&mut C::Link, ConnectError> {
        match self.link {
            Some(ref mut link) => Ok(link),
            None => {
                let link = tokio::time::timeout(self.connect_timeout, self.connector.connect())
                    .await
                    .map_err(|_| ConnectError::Timeout(duration_ms(self.connect_timeout)))??;
                Ok(self.link.insert(link))
            }
        }
    }

    /// Reads the fixed register block over the open link.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NotConnected`] without a link,
    /// [`TransportError::Timeout`] if the device does not answer in time,
    /// [`TransportError::FrameLength`] for a short or long answer, and the
    /// link's own error otherwise. The link is left open; callers decide
    /// whether to [`close`](Self::close) it.
    pub async fn read_block(&mut self) -> Result<RegisterBlock, TransportError> {
        let link = self.link.as_mut().ok_or(TransportError::NotConnected)?;

        #[allow(clippy::cast_possible_truncation)] // REGISTER_COUNT is 9
        let count = REGISTER_COUNT as u16;

        let words = tokio::time::timeout(
            self.read_timeout,
            link.read_input_registers(START_ADDRESS, count),
        )
        .await
        .map_err(|_| TransportError::Timeout(duration_ms(self.read_timeout)))??;

        RegisterBlock::try_from(words.as_slice())
    }

    /// Closes and drops the link, if any. Never fails.
    pub async fn close(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close().await;
        }
    }
}
