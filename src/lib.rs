// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `espwatch` - unattended register monitor for an ESP32 relay controller.
//!
//! The device exposes its state as nine Modbus input registers. This crate
//! polls them at a fixed cadence, detects transitions between consecutive
//! reads, and appends one timestamped line per transition to an event log.
//! The loop survives any network failure and reconnects indefinitely.
//!
//! # Tracked transitions
//!
//! - **Device restart**: the device uptime counter went backwards
//! - **Relay**: on/off
//! - **Latch**: started (with remaining seconds) / finished
//! - **Station link**: got IP / disconnected
//! - **Access point**: enabled / disabled, client count
//!
//! The first successful read reports every field once as a baseline.
//!
//! # Known limitation
//!
//! The last recorded state is kept across reconnects, so a change that happens
//! while disconnected and is undone before reconnecting is never logged.
//!
//! # Quick Start
//!
//! ```no_run
//! use espwatch::monitor::Monitor;
//! use espwatch::protocol::ModbusTcpConnector;
//! use espwatch::sink::LogFileSink;
//! use espwatch::MonitorConfig;
//!
//! #[tokio::main]
//! async fn main() -> espwatch::Result<()> {
//!     let config = MonitorConfig::new("192.168.1.77").with_log_file("relay.log");
//!     config.validate()?;
//!
//!     let connector = ModbusTcpConnector::new(config.host(), config.port(), config.unit_id());
//!     let sink = LogFileSink::open(config.log_file())?;
//!
//!     match Monitor::new(connector, sink, &config).run().await {}
//! }
//! ```
//!
//! ## Detecting transitions without I/O
//!
//! ```
//! use espwatch::event::{EventKind, diff};
//! use espwatch::state::{RegisterBlock, RegisterSnapshot};
//!
//! let first = RegisterSnapshot::decode(&RegisterBlock::new([0, 0, 0, 0, 0, 1, 0, 100, 0]));
//! let second = RegisterSnapshot::decode(&RegisterBlock::new([1, 0, 0, 0, 0, 1, 0, 101, 0]));
//!
//! assert_eq!(diff(None, &first).len(), 5);
//!
//! let events = diff(Some(&first), &second);
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].kind(), &EventKind::Relay { on: true });
//! ```

mod config;
pub mod connection;
pub mod error;
pub mod event;
pub mod monitor;
pub mod protocol;
pub mod sink;
pub mod state;

pub use config::MonitorConfig;
pub use connection::ConnectionManager;
pub use error::{ConfigError, ConnectError, Error, Result, SinkError, TransportError};
pub use event::{EventKind, MonitorEvent, detect, diff};
pub use monitor::{Monitor, StepOutcome};
pub use protocol::{Connector, ModbusTcpConnector, RegisterLink};
pub use sink::{EventSink, LogFileSink, MemorySink};
pub use state::{MonitorState, RecordedFields, RegisterBlock, RegisterSnapshot};
