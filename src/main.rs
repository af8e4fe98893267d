// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `espwatch` command line entry point.
//!
//! Loads configuration, opens the event log and runs the poll loop until the
//! process is killed. Only configuration and log-file errors at startup end
//! the process.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use espwatch::monitor::Monitor;
use espwatch::protocol::ModbusTcpConnector;
use espwatch::sink::LogFileSink;
use espwatch::{MonitorConfig, Result};

/// Monitor an ESP32 relay controller over Modbus/TCP and log state changes.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON configuration file. Missing fields use built-in defaults.
    #[arg(short, long, env = "ESPWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Device host name or IP address.
    #[arg(long, env = "ESPWATCH_HOST")]
    host: Option<String>,

    /// Modbus/TCP port.
    #[arg(long, env = "ESPWATCH_PORT")]
    port: Option<u16>,

    /// Modbus unit identifier.
    #[arg(long)]
    unit_id: Option<u8>,

    /// Event log file (appended to).
    #[arg(long, env = "ESPWATCH_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::load(path)?,
            None => MonitorConfig::default(),
        };

        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(unit_id) = self.unit_id {
            config = config.with_unit_id(unit_id);
        }
        if let Some(log_file) = self.log_file {
            config = config.with_log_file(log_file);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid startup configuration");
            return ExitCode::FAILURE;
        }
    };

    let sink = match LogFileSink::open(config.log_file()) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(path = %config.log_file().display(), error = %e, "Cannot open event log");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        host = config.host(),
        port = config.port(),
        log_file = %sink.path().display(),
        "Starting monitor"
    );

    let connector = ModbusTcpConnector::new(config.host(), config.port(), config.unit_id());
    match Monitor::new(connector, sink, &config).run().await {}
}
