// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event recording.
//!
//! Every event becomes one text line:
//!
//! ```text
//! [PC 2025-01-31 14:02:11] [ESP 4711s] Relay ON
//! [PC 2025-01-31 14:02:20] Connection lost (connection reset by peer)
//! ```
//!
//! [`LogFileSink`] appends lines to a file and echoes them to the console.
//! [`MemorySink`] keeps events in memory for embedding and tests.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;

use crate::error::SinkError;
use crate::event::MonitorEvent;

/// Timestamp layout of the `[PC ...]` prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destination for monitor events.
pub trait EventSink {
    /// Records one event.
    ///
    /// When this returns `Ok`, the event must be durable.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the event could not be persisted.
    fn record(&mut self, event: &MonitorEvent) -> Result<(), SinkError>;
}

/// Renders an event as a log line without the trailing newline.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use espwatch::event::{EventKind, MonitorEvent};
/// use espwatch::sink::render_line;
///
/// let at = NaiveDate::from_ymd_opt(2025, 1, 31)
///     .unwrap()
///     .and_hms_opt(14, 2, 11)
///     .unwrap();
///
/// let event = MonitorEvent::with_uptime(EventKind::Relay { on: true }, 4711);
/// assert_eq!(render_line(at, &event), "[PC 2025-01-31 14:02:11] [ESP 4711s] Relay ON");
///
/// let lost = MonitorEvent::connection_lost("timed out");
/// assert_eq!(render_line(at, &lost), "[PC 2025-01-31 14:02:11] Connection lost (timed out)");
/// ```
#[must_use]
pub fn render_line(at: NaiveDateTime, event: &MonitorEvent) -> String {
    let pc = at.format(TIMESTAMP_FORMAT);
    match event.device_uptime_secs() {
        Some(uptime) => format!("[PC {pc}] [ESP {uptime}s] {event}"),
        None => format!("[PC {pc}] {event}"),
    }
}

/// Appends event lines to a file and echoes them to a console writer.
///
/// Each line is flushed and synced to disk before [`record`](EventSink::record)
/// returns. Console output is best effort.
#[derive(Debug)]
pub struct LogFileSink<W: Write = io::Stdout> {
    path: PathBuf,
    file: File,
    console: W,
}

impl LogFileSink {
    /// Opens (or creates) `path` for appending, echoing to stdout.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        Self::with_console(path, io::stdout())
    }
}

impl<W: Write> LogFileSink<W> {
    /// Opens (or creates) `path` for appending, echoing to `console`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the file cannot be opened.
    pub fn with_console(path: impl AsRef<Path>, console: W) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!(path = %path.display(), "Opened event log");
        Ok(Self {
            path,
            file,
            console,
        })
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the console writer.
    #[must_use]
    pub fn console(&self) -> &W {
        &self.console
    }
}

impl<W: Write> EventSink for LogFileSink<W> {
    fn record(&mut self, event: &MonitorEvent) -> Result<(), SinkError> {
        let line = render_line(Local::now().naive_local(), event);

        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;
        self.file.sync_data()?;

        if let Err(e) = writeln!(self.console, "{line}").and_then(|()| self.console.flush()) {
            tracing::warn!(error = %e, "Failed to echo event to console");
        }
        Ok(())
    }
}

/// In-memory sink that can be cloned and inspected while the monitor owns it.
///
/// # Examples
///
/// ```
/// use espwatch::event::{EventKind, MonitorEvent};
/// use espwatch::sink::{EventSink, MemorySink};
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
/// writer.record(&MonitorEvent::with_uptime(EventKind::LatchFinished, 9)).unwrap();
///
/// assert_eq!(sink.len(), 1);
/// assert_eq!(sink.events()[0].kind(), &EventKind::LatchFinished);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<MonitorEvent>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns every recorded event.
    #[must_use]
    pub fn drain(&self) -> Vec<MonitorEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &MonitorEvent) -> Result<(), SinkError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
