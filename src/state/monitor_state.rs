// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Long-lived poll loop memory.

use super::{RecordedFields, RegisterSnapshot};

/// Connection side of the poll loop state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No open connection; the next step attempts to connect.
    #[default]
    Disconnected,
    /// A connection is open; the next step reads a frame.
    Connected,
}

impl LinkState {
    /// Returns true if the loop holds an open connection.
    #[must_use]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// State carried by the poll loop for the life of the process.
///
/// The recorded fields survive reconnects: a dropped and restored connection
/// compares the first new frame against the last values recorded before the
/// drop. A change that happens and reverts while disconnected is therefore
/// never reported.
///
/// # Examples
///
/// ```
/// use espwatch::state::{LinkState, MonitorState};
///
/// let state = MonitorState::new();
/// assert_eq!(state.link(), LinkState::Disconnected);
/// assert!(state.recorded().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    recorded: RecordedFields,
    link: LinkState,
    polls: u64,
    reconnects: u64,
}

impl MonitorState {
    /// Creates state with nothing observed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last recorded value of each field.
    #[must_use]
    pub fn recorded(&self) -> &RecordedFields {
        &self.recorded
    }

    /// Returns the connection side of the state machine.
    #[must_use]
    pub fn link(&self) -> LinkState {
        self.link
    }

    /// Number of frames whose events were fully recorded.
    #[must_use]
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Number of times a live connection was lost.
    #[must_use]
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    /// Marks every field of `snapshot` as recorded and counts the poll.
    pub(crate) fn commit_snapshot(&mut self, snapshot: &RegisterSnapshot) {
        self.recorded = RecordedFields::from(snapshot);
        self.polls += 1;
    }

    /// Keeps the fields recorded before an interrupted poll.
    pub(crate) fn keep_progress(&mut self, recorded: RecordedFields) {
        self.recorded = recorded;
    }

    pub(crate) fn mark_connected(&mut self) {
        self.link = LinkState::Connected;
    }

    pub(crate) fn mark_lost(&mut self) {
        self.link = LinkState::Disconnected;
        self.reconnects += 1;
    }
}
