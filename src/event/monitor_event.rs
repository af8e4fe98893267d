// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitor event types.

use std::fmt;

/// What happened.
///
/// The `Display` implementation produces the exact text written to the
/// event log.
///
/// # Examples
///
/// ```
/// use espwatch::event::EventKind;
///
/// assert_eq!(EventKind::Relay { on: true }.to_string(), "Relay ON");
/// assert_eq!(
///     EventKind::LatchStarted { remaining_secs: 30 }.to_string(),
///     "Latch STARTED (30s)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The device uptime went backwards.
    DeviceRestart,

    /// The relay switched.
    Relay {
        /// New relay state.
        on: bool,
    },

    /// The latch timer became active.
    LatchStarted {
        /// Seconds remaining when the latch was first seen active.
        remaining_secs: u16,
    },

    /// The latch timer became inactive.
    LatchFinished,

    /// The station interface gained or lost its IP address.
    Station {
        /// Whether the station now holds an IP.
        connected: bool,
    },

    /// The access point was switched on or off.
    AccessPoint {
        /// Whether the access point is now enabled.
        enabled: bool,
    },

    /// The number of access point clients changed.
    AccessPointClients {
        /// New client count.
        count: u16,
    },

    /// A live connection failed and was closed.
    ConnectionLost {
        /// Description of the transport failure.
        reason: String,
    },

    /// A failure outside the transport path.
    Unexpected {
        /// Description of the failure.
        reason: String,
    },
}

impl EventKind {
    /// Short name of the tracked field or condition behind this event.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::DeviceRestart => "restart",
            Self::Relay { .. } => "relay",
            Self::LatchStarted { .. } | Self::LatchFinished => "latch",
            Self::Station { .. } => "sta",
            Self::AccessPoint { .. } => "ap",
            Self::AccessPointClients { .. } => "ap_clients",
            Self::ConnectionLost { .. } => "connection",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceRestart => f.write_str("ESP32 RESTART DETECTED"),
            Self::Relay { on } => write!(f, "Relay {}", if *on { "ON" } else { "OFF" }),
            Self::LatchStarted { remaining_secs } => {
                write!(f, "Latch STARTED ({remaining_secs}s)")
            }
            Self::LatchFinished => f.write_str("Latch FINISHED"),
            Self::Station { connected: true } => f.write_str("STA connected (got IP)"),
            Self::Station { connected: false } => f.write_str("STA disconnected"),
            Self::AccessPoint { enabled: true } => f.write_str("AP ENABLED"),
            Self::AccessPoint { enabled: false } => f.write_str("AP DISABLED"),
            Self::AccessPointClients { count } => write!(f, "AP clients = {count}"),
            Self::ConnectionLost { reason } => write!(f, "Connection lost ({reason})"),
            Self::Unexpected { reason } => write!(f, "Unexpected error: {reason}"),
        }
    }
}

/// A detected transition, ready to be recorded.
///
/// Events are transient: they are rendered into a log line and dropped.
///
/// # Examples
///
/// ```
/// use espwatch::event::{EventKind, MonitorEvent};
///
/// let event = MonitorEvent::with_uptime(EventKind::LatchFinished, 420);
/// assert_eq!(event.device_uptime_secs(), Some(420));
/// assert_eq!(event.to_string(), "Latch FINISHED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorEvent {
    kind: EventKind,
    device_uptime_secs: Option<u32>,
}

impl MonitorEvent {
    /// Creates an event stamped with the device uptime at detection time.
    #[must_use]
    pub fn with_uptime(kind: EventKind, device_uptime_secs: u32) -> Self {
        Self {
            kind,
            device_uptime_secs: Some(device_uptime_secs),
        }
    }

    /// Creates a "connection lost" event. No device uptime is available.
    #[must_use]
    pub fn connection_lost(reason: impl fmt::Display) -> Self {
        Self {
            kind: EventKind::ConnectionLost {
                reason: reason.to_string(),
            },
            device_uptime_secs: None,
        }
    }

    /// Creates an "unexpected error" event. No device uptime is available.
    #[must_use]
    pub fn unexpected(reason: impl fmt::Display) -> Self {
        Self {
            kind: EventKind::Unexpected {
                reason: reason.to_string(),
            },
            device_uptime_secs: None,
        }
    }

    /// Returns what happened.
    #[must_use]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Returns the device uptime captured with the event, if any.
    #[must_use]
    pub fn device_uptime_secs(&self) -> Option<u32> {
        self.device_uptime_secs
    }

    /// Returns `true` for events produced by the transport failure path.
    #[must_use]
    pub fn is_connection_lost(&self) -> bool {
        matches!(self.kind, EventKind::ConnectionLost { .. })
    }
}

impl fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}
