// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition detection between consecutive snapshots.

use crate::state::{RecordedFields, RegisterSnapshot};

use super::{EventKind, MonitorEvent};

/// Compares `current` against `previous` and returns the resulting events.
///
/// Rules are checked in a fixed order: restart, relay, latch, station link,
/// access point, access point clients. With no previous snapshot the restart
/// check is skipped and every field is reported once as a baseline.
///
/// All events carry `current`'s uptime.
///
/// # Examples
///
/// ```
/// use espwatch::event::{EventKind, diff};
/// use espwatch::state::RegisterSnapshot;
///
/// let before = RegisterSnapshot::default().with_device_uptime_secs(100);
/// let after = before.with_relay_on(true).with_device_uptime_secs(101);
///
/// let events = diff(Some(&before), &after);
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].kind(), &EventKind::Relay { on: true });
///
/// // First poll reports every field
/// assert_eq!(diff(None, &after).len(), 5);
/// ```
#[must_use]
pub fn diff(previous: Option<&RegisterSnapshot>, current: &RegisterSnapshot) -> Vec<MonitorEvent> {
    let recorded = previous.map(RecordedFields::from).unwrap_or_default();
    detect(&recorded, current)
}

/// Compares `current` against the last recorded value of each field.
///
/// Same rules and order as [`diff`]. A field that was never recorded is
/// always reported, and the restart check needs a recorded uptime.
#[must_use]
pub fn detect(recorded: &RecordedFields, current: &RegisterSnapshot) -> Vec<MonitorEvent> {
    let uptime = current.device_uptime_secs();
    let mut kinds = Vec::new();

    if recorded.device_uptime_secs().is_some_and(|prev| uptime < prev) {
        kinds.push(EventKind::DeviceRestart);
    }

    if recorded.relay_on() != Some(current.relay_on()) {
        kinds.push(EventKind::Relay {
            on: current.relay_on(),
        });
    }

    if recorded.latch_active() != Some(current.latch_active()) {
        kinds.push(if current.latch_active() {
            EventKind::LatchStarted {
                remaining_secs: current.latch_remaining_secs(),
            }
        } else {
            EventKind::LatchFinished
        });
    }

    if recorded.sta_has_ip() != Some(current.sta_has_ip()) {
        kinds.push(EventKind::Station {
            connected: current.sta_has_ip(),
        });
    }

    if recorded.ap_enabled() != Some(current.ap_enabled()) {
        kinds.push(EventKind::AccessPoint {
            enabled: current.ap_enabled(),
        });
    }

    if recorded.ap_client_count() != Some(current.ap_client_count()) {
        kinds.push(EventKind::AccessPointClients {
            count: current.ap_client_count(),
        });
    }

    kinds
        .into_iter()
        .map(|kind| MonitorEvent::with_uptime(kind, uptime))
        .collect()
}
