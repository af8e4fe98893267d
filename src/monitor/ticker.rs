// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timed pauses between poll attempts.

use std::time::Duration;

/// Source of the delays between loop iterations.
///
/// The poll loop never sleeps any other way, so swapping the ticker gives
/// full control over loop timing.
#[allow(async_fn_in_trait)]
pub trait Ticker {
    /// Waits for `duration`.
    async fn sleep(&mut self, duration: Duration);
}

/// Wall-clock ticker backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTicker;

impl Ticker for TokioTicker {
    async fn sleep(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Ticker that returns immediately and remembers every requested delay.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use espwatch::monitor::{RecordingTicker, Ticker};
///
/// # tokio_test_block_on(async {
/// let mut ticker = RecordingTicker::default();
/// ticker.sleep(Duration::from_secs(5)).await;
/// assert_eq!(ticker.delays(), &[Duration::from_secs(5)]);
/// assert_eq!(ticker.total(), Duration::from_secs(5));
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTicker {
    delays: Vec<Duration>,
}

impl RecordingTicker {
    /// Every delay requested so far, in order.
    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Sum of all requested delays.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delays.iter().sum()
    }

    /// Forgets the recorded delays.
    pub fn clear(&mut self) {
        self.delays.clear();
    }
}

impl Ticker for RecordingTicker {
    async fn sleep(&mut self, duration: Duration) {
        self.delays.push(duration);
    }
}
