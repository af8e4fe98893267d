// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed register layout exposed by the device firmware.
//!
//! The device publishes its state as nine consecutive input registers
//! starting at address 0:
//!
//! | Index | Field                          |
//! |-------|--------------------------------|
//! | 0     | relay on (nonzero = on)        |
//! | 1     | latch active                   |
//! | 2     | latch remaining seconds        |
//! | 3     | reserved                       |
//! | 4     | station has IP                 |
//! | 5     | access point enabled           |
//! | 6     | access point client count      |
//! | 7     | uptime seconds, low word       |
//! | 8     | uptime seconds, high word      |
//!
//! # Examples
//!
//! ```
//! use espwatch::state::{RegisterBlock, RegisterSnapshot};
//!
//! let block = RegisterBlock::new([1, 0, 0, 0, 1, 1, 2, 0x0001, 0x0002]);
//! let snapshot = RegisterSnapshot::decode(&block);
//!
//! assert!(snapshot.relay_on());
//! assert_eq!(snapshot.ap_client_count(), 2);
//! assert_eq!(snapshot.device_uptime_secs(), 0x0002_0001);
//! ```

use crate::error::TransportError;

/// First register address of the block.
pub const START_ADDRESS: u16 = 0;

/// Number of registers in the block.
pub const REGISTER_COUNT: usize = 9;

const RELAY: usize = 0;
const LATCH_ACTIVE: usize = 1;
const LATCH_REMAINING: usize = 2;
const STA_HAS_IP: usize = 4;
const AP_ENABLED: usize = 5;
const AP_CLIENTS: usize = 6;
const UPTIME_LOW: usize = 7;
const UPTIME_HIGH: usize = 8;

/// Raw contents of one register read, exactly [`REGISTER_COUNT`] words long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterBlock([u16; REGISTER_COUNT]);

impl RegisterBlock {
    /// Creates a block from a fixed-size register array.
    #[must_use]
    pub const fn new(registers: [u16; REGISTER_COUNT]) -> Self {
        Self(registers)
    }

    /// Returns the raw register words.
    #[must_use]
    pub const fn registers(&self) -> &[u16; REGISTER_COUNT] {
        &self.0
    }
}

impl TryFrom<&[u16]> for RegisterBlock {
    type Error = TransportError;

    fn try_from(words: &[u16]) -> Result<Self, Self::Error> {
        <[u16; REGISTER_COUNT]>::try_from(words)
            .map(Self)
            .map_err(|_| TransportError::FrameLength {
                expected: REGISTER_COUNT,
                actual: words.len(),
            })
    }
}

/// One decoded poll of the device registers.
///
/// Snapshots are plain values: two snapshots compare equal exactly when every
/// tracked field matches, including uptime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegisterSnapshot {
    relay_on: bool,
    latch_active: bool,
    latch_remaining_secs: u16,
    sta_has_ip: bool,
    ap_enabled: bool,
    ap_client_count: u16,
    device_uptime_secs: u32,
}

impl RegisterSnapshot {
    /// Decodes a register block.
    ///
    /// Every combination of register values is accepted; boolean fields are
    /// `true` for any nonzero word.
    #[must_use]
    pub fn decode(block: &RegisterBlock) -> Self {
        let ir = block.registers();
        Self {
            relay_on: ir[RELAY] != 0,
            latch_active: ir[LATCH_ACTIVE] != 0,
            latch_remaining_secs: ir[LATCH_REMAINING],
            sta_has_ip: ir[STA_HAS_IP] != 0,
            ap_enabled: ir[AP_ENABLED] != 0,
            ap_client_count: ir[AP_CLIENTS],
            device_uptime_secs: (u32::from(ir[UPTIME_HIGH]) << 16) | u32::from(ir[UPTIME_LOW]),
        }
    }

    /// Returns a builder-style copy with the relay state replaced.
    #[must_use]
    pub const fn with_relay_on(mut self, on: bool) -> Self {
        self.relay_on = on;
        self
    }

    /// Returns a copy with the latch state and remaining time replaced.
    #[must_use]
    pub const fn with_latch(mut self, active: bool, remaining_secs: u16) -> Self {
        self.latch_active = active;
        self.latch_remaining_secs = remaining_secs;
        self
    }

    /// Returns a copy with the station link state replaced.
    #[must_use]
    pub const fn with_sta_has_ip(mut self, has_ip: bool) -> Self {
        self.sta_has_ip = has_ip;
        self
    }

    /// Returns a copy with the access point state replaced.
    #[must_use]
    pub const fn with_ap_enabled(mut self, enabled: bool) -> Self {
        self.ap_enabled = enabled;
        self
    }

    /// Returns a copy with the access point client count replaced.
    #[must_use]
    pub const fn with_ap_client_count(mut self, count: u16) -> Self {
        self.ap_client_count = count;
        self
    }

    /// Returns a copy with the device uptime replaced.
    #[must_use]
    pub const fn with_device_uptime_secs(mut self, secs: u32) -> Self {
        self.device_uptime_secs = secs;
        self
    }

    /// Whether the relay is energised.
    #[must_use]
    pub const fn relay_on(&self) -> bool {
        self.relay_on
    }

    /// Whether the latch timer is running.
    #[must_use]
    pub const fn latch_active(&self) -> bool {
        self.latch_active
    }

    /// Seconds left on the latch timer.
    #[must_use]
    pub const fn latch_remaining_secs(&self) -> u16 {
        self.latch_remaining_secs
    }

    /// Whether the station interface holds an IP address.
    #[must_use]
    pub const fn sta_has_ip(&self) -> bool {
        self.sta_has_ip
    }

    /// Whether the access point is enabled.
    #[must_use]
    pub const fn ap_enabled(&self) -> bool {
        self.ap_enabled
    }

    /// Number of stations associated with the access point.
    #[must_use]
    pub const fn ap_client_count(&self) -> u16 {
        self.ap_client_count
    }

    /// Device uptime counter in seconds.
    #[must_use]
    pub const fn device_uptime_secs(&self) -> u32 {
        self.device_uptime_secs
    }
}

impl From<&RegisterBlock> for RegisterSnapshot {
    fn from(block: &RegisterBlock) -> Self {
        Self::decode(block)
    }
}
