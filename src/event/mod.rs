// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events produced by the monitor.
//!
//! [`diff`] turns a pair of snapshots into an ordered list of
//! [`MonitorEvent`]s; [`detect`] does the same against per-field memory. The poll loop adds its own connection-lost and
//! unexpected-error events on failure paths.

mod detector;
mod monitor_event;

pub use detector::{detect, diff};
pub use monitor_event::{EventKind, MonitorEvent};
