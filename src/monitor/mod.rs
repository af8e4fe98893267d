// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll loop driver.
//!
//! [`Monitor`] ties the connection manager, decoder, transition detector and
//! event sink together. Its two link states are `Disconnected` (connect, back
//! off on failure) and `Connected` (read, diff, record, sleep). A transport
//! failure while connected records one "connection lost" event and drops back
//! to `Disconnected`; any other failure records an "unexpected error" event
//! and keeps the current link state.

mod poll_loop;
mod ticker;

pub use poll_loop::{Monitor, StepOutcome};
pub use ticker::{RecordingTicker, Ticker, TokioTicker};
