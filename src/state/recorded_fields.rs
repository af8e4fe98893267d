// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-field memory of what has reached the event log.

use crate::event::EventKind;

use super::RegisterSnapshot;

/// The last value recorded for each tracked field.
///
/// A field is `None` until its first event has been written. Fields advance
/// one at a time as their events are recorded, so an interrupted poll leaves
/// only the unwritten fields behind for the next one.
///
/// # Examples
///
/// ```
/// use espwatch::event::EventKind;
/// use espwatch::state::{RecordedFields, RegisterSnapshot};
///
/// let current = RegisterSnapshot::default().with_relay_on(true);
/// let mut recorded = RecordedFields::new();
///
/// recorded.adopt(&EventKind::Relay { on: true }, &current);
/// assert_eq!(recorded.relay_on(), Some(true));
/// assert_eq!(recorded.latch_active(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordedFields {
    device_uptime_secs: Option<u32>,
    relay_on: Option<bool>,
    latch_active: Option<bool>,
    sta_has_ip: Option<bool>,
    ap_enabled: Option<bool>,
    ap_client_count: Option<u16>,
}

impl RecordedFields {
    /// Creates a memory with nothing recorded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            device_uptime_secs: None,
            relay_on: None,
            latch_active: None,
            sta_has_ip: None,
            ap_enabled: None,
            ap_client_count: None,
        }
    }

    /// Returns `true` if no field has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }

    /// Takes the value behind `kind` from `current`.
    ///
    /// Failure events carry no field and leave the memory unchanged.
    pub fn adopt(&mut self, kind: &EventKind, current: &RegisterSnapshot) {
        match kind {
            EventKind::DeviceRestart => self.adopt_uptime(current),
            EventKind::Relay { .. } => self.relay_on = Some(current.relay_on()),
            EventKind::LatchStarted { .. } | EventKind::LatchFinished => {
                self.latch_active = Some(current.latch_active());
            }
            EventKind::Station { .. } => self.sta_has_ip = Some(current.sta_has_ip()),
            EventKind::AccessPoint { .. } => self.ap_enabled = Some(current.ap_enabled()),
            EventKind::AccessPointClients { .. } => {
                self.ap_client_count = Some(current.ap_client_count());
            }
            EventKind::ConnectionLost { .. } | EventKind::Unexpected { .. } => {}
        }
    }

    /// Takes the device uptime from `current`.
    pub fn adopt_uptime(&mut self, current: &RegisterSnapshot) {
        self.device_uptime_secs = Some(current.device_uptime_secs());
    }

    #[must_use]
    pub fn device_uptime_secs(&self) -> Option<u32> {
        self.device_uptime_secs
    }

    #[must_use]
    pub fn relay_on(&self) -> Option<bool> {
        self.relay_on
    }

    #[must_use]
    pub fn latch_active(&self) -> Option<bool> {
        self.latch_active
    }

    #[must_use]
    pub fn sta_has_ip(&self) -> Option<bool> {
        self.sta_has_ip
    }

    #[must_use]
    pub fn ap_enabled(&self) -> Option<bool> {
        self.ap_enabled
    }

    #[must_use]
    pub fn ap_client_count(&self) -> Option<u16> {
        self.ap_client_count
    }
}

impl From<&RegisterSnapshot> for RecordedFields {
    fn from(snapshot: &RegisterSnapshot) -> Self {
        Self {
            device_uptime_secs: Some(snapshot.device_uptime_secs()),
            relay_on: Some(snapshot.relay_on()),
            latch_active: Some(snapshot.latch_active()),
            sta_has_ip: Some(snapshot.sta_has_ip()),
            ap_enabled: Some(snapshot.ap_enabled()),
            ap_client_count: Some(snapshot.ap_client_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> RegisterSnapshot {
        RegisterSnapshot::default()
            .with_relay_on(true)
            .with_latch(true, 30)
            .with_sta_has_ip(true)
            .with_ap_client_count(2)
            .with_device_uptime_secs(77)
    }

    #[test]
    fn adopting_every_field_matches_snapshot() {
        let current = current();
        let mut recorded = RecordedFields::new();
        assert!(recorded.is_empty());

        for kind in [
            EventKind::DeviceRestart,
            EventKind::Relay { on: true },
            EventKind::LatchStarted { remaining_secs: 30 },
            EventKind::Station { connected: true },
            EventKind::AccessPoint { enabled: false },
            EventKind::AccessPointClients { count: 2 },
        ] {
            recorded.adopt(&kind, &current);
        }

        assert_eq!(recorded, RecordedFields::from(&current));
    }

    #[test]
    fn adopt_touches_only_its_field() {
        let mut recorded = RecordedFields::new();
        recorded.adopt(&EventKind::LatchFinished, &current());

        assert_eq!(recorded.latch_active(), Some(true));
        assert_eq!(recorded.relay_on(), None);
        assert_eq!(recorded.device_uptime_secs(), None);
    }

    #[test]
    fn failure_events_change_nothing() {
        let mut recorded = RecordedFields::new();
        recorded.adopt(
            &EventKind::ConnectionLost {
                reason: "reset".into(),
            },
            &current(),
        );
        recorded.adopt(
            &EventKind::Unexpected {
                reason: "disk full".into(),
            },
            &current(),
        );
        assert!(recorded.is_empty());
    }
}
