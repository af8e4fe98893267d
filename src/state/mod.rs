// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device register state.
//!
//! [`RegisterBlock`] holds the raw words of one read, [`RegisterSnapshot`] is
//! its decoded form, [`RecordedFields`] tracks what has reached the event log
//! field by field, and [`MonitorState`] keeps what the poll loop remembers
//! between iterations.
//!
//! # Examples
//!
//! ```
//! use espwatch::state::{RegisterBlock, RegisterSnapshot};
//!
//! let snapshot = RegisterSnapshot::decode(&RegisterBlock::new([0, 0, 0, 0, 0, 1, 0, 100, 0]));
//! assert!(snapshot.ap_enabled());
//! assert_eq!(snapshot.device_uptime_secs(), 100);
//! ```

mod monitor_state;
mod recorded_fields;
mod register_snapshot;

pub use monitor_state::{LinkState, MonitorState};
pub use recorded_fields::RecordedFields;
pub use register_snapshot::{REGISTER_COUNT, RegisterBlock, RegisterSnapshot, START_ADDRESS};
