// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The top-level poll loop.

use std::convert::Infallible;
use std::fmt;
use std::time::Duration;

use crate::config::MonitorConfig;
use crate::connection::ConnectionManager;
use crate::error::Error;
use crate::event::{EventKind, MonitorEvent, detect};
use crate::protocol::Connector;
use crate::sink::EventSink;
use crate::state::{LinkState, MonitorState, RegisterSnapshot};

use super::{Ticker, TokioTicker};

/// What a single [`Monitor::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The connection attempt failed; the loop stays disconnected.
    ConnectFailed,
    /// A frame was read and its events recorded.
    Polled {
        /// Number of events recorded for this frame.
        events: usize,
    },
    /// A transport failure closed the connection.
    ConnectionLost,
    /// A non-transport failure was logged; the connection state is unchanged.
    Unexpected,
}

/// Polls one device forever and records every state transition.
///
/// Each [`step`](Self::step) connects if needed, reads one frame, records the
/// transitions it finds and then sleeps: the poll interval after a successful
/// read, the reconnect delay after any failure. No error ever leaves the loop.
///
/// # Examples
///
/// ```no_run
/// use espwatch::monitor::Monitor;
/// use espwatch::protocol::ModbusTcpConnector;
/// use espwatch::sink::LogFileSink;
/// use espwatch::MonitorConfig;
///
/// #[tokio::main]
/// async fn main() -> espwatch::Result<()> {
///     let config = MonitorConfig::new("192.168.4.1");
///     let connector = ModbusTcpConnector::new(config.host(), config.port(), config.unit_id());
///     let sink = LogFileSink::open(config.log_file())?;
///
///     match Monitor::new(connector, sink, &config).run().await {}
/// }
/// ```
pub struct Monitor<C: Connector, S: EventSink, T: Ticker = TokioTicker> {
    connection: ConnectionManager<C>,
    sink: S,
    ticker: T,
    state: MonitorState,
    poll_interval: Duration,
    reconnect_delay: Duration,
}

impl<C: Connector, S: EventSink, T: Ticker> fmt::Debug for Monitor<C, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("connection", &self.connection)
            .field("state", &self.state)
            .field("poll_interval", &self.poll_interval)
            .field("reconnect_delay", &self.reconnect_delay)
            .finish_non_exhaustive()
    }
}

impl<C: Connector, S: EventSink> Monitor<C, S, TokioTicker> {
    /// Creates a monitor that sleeps on the tokio clock.
    #[must_use]
    pub fn new(connector: C, sink: S, config: &MonitorConfig) -> Self {
        Self::with_ticker(connector, sink, TokioTicker, config)
    }
}

impl<C: Connector, S: EventSink, T: Ticker> Monitor<C, S, T> {
    /// Creates a monitor with a custom ticker.
    #[must_use]
    pub fn with_ticker(connector: C, sink: S, ticker: T, config: &MonitorConfig) -> Self {
        Self {
            connection: ConnectionManager::from_config(connector, config),
            sink,
            ticker,
            state: MonitorState::new(),
            poll_interval: config.poll_interval(),
            reconnect_delay: config.reconnect_delay(),
        }
    }

    /// Returns the loop's memory.
    #[must_use]
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Returns the event sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the ticker.
    #[must_use]
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Runs forever.
    pub async fn run(mut self) -> Infallible {
        loop {
            self.step().await;
        }
    }

    /// Runs one iteration of the loop, including its trailing sleep.
    pub async fn step(&mut self) -> StepOutcome {
        if self.state.link() == LinkState::Disconnected {
            tracing::info!("Connecting to device");
            if let Err(e) = self.connection.ensure_connected().await {
                tracing::warn!(error = %e, "Connection failed, retrying");
                self.connection.close().await;
                self.ticker.sleep(self.reconnect_delay).await;
                return StepOutcome::ConnectFailed;
            }
            tracing::info!("Connected");
            self.state.mark_connected();
        }

        match self.poll().await {
            Ok(events) => {
                self.ticker.sleep(self.poll_interval).await;
                StepOutcome::Polled { events }
            }
            Err(Error::Transport(e)) => {
                self.report(&MonitorEvent::connection_lost(&e));
                self.connection.close().await;
                self.state.mark_lost();
                self.ticker.sleep(self.reconnect_delay).await;
                StepOutcome::ConnectionLost
            }
            Err(e) => {
                tracing::error!(error = %e, "Unexpected error in poll loop");
                self.report(&MonitorEvent::unexpected(&e));
                self.ticker.sleep(self.reconnect_delay).await;
                StepOutcome::Unexpected
            }
        }
    }

    /// Reads one frame and records its transitions.
    ///
    /// Each field advances as soon as its event is recorded. A sink failure
    /// keeps that progress, so the next poll only reports what was not
    /// written. The uptime advances once the restart check has nothing left
    /// to record.
    async fn poll(&mut self) -> Result<usize, Error> {
        let block = self.connection.read_block().await?;
        let snapshot = RegisterSnapshot::decode(&block);
        tracing::debug!(?snapshot, "Decoded register block");

        let events = detect(self.state.recorded(), &snapshot);
        let mut progress = *self.state.recorded();
        if events.first().map(MonitorEvent::kind) != Some(&EventKind::DeviceRestart) {
            progress.adopt_uptime(&snapshot);
        }

        for event in &events {
            tracing::debug!(event = %event, "Recording event");
            if let Err(e) = self.sink.record(event) {
                self.state.keep_progress(progress);
                return Err(e.into());
            }
            progress.adopt(event.kind(), &snapshot);
        }

        self.state.commit_snapshot(&snapshot);
        Ok(events.len())
    }

    /// Records a failure-path event, falling back to tracing if that fails too.
    fn report(&mut self, event: &MonitorEvent) {
        if let Err(e) = self.sink.record(event) {
            tracing::error!(event = %event, error = %e, "Failed to record event");
        }
    }
}
