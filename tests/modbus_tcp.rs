// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Modbus/TCP connector against a local responder.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use espwatch::monitor::{Monitor, RecordingTicker, StepOutcome};
use espwatch::protocol::{ModbusTcpConnector, ModbusTcpLink};
use espwatch::sink::{LogFileSink, MemorySink};
use espwatch::{
    ConnectError, ConnectionManager, Connector, MonitorConfig, RegisterLink, TransportError,
};

// ============================================================================
// Responder
// ============================================================================

const READ_INPUT_REGISTERS: u8 = 0x04;

#[derive(Debug, Clone, Copy)]
enum Answer {
    Registers([u16; 9]),
    Exception(u8),
}

/// Serves one client, answering every request with `answer` until it hangs up.
async fn spawn_responder(answer: Answer) -> SocketAddr {
    serve(answer, usize::MAX).await
}

/// Serves one client and closes the socket after `answers` responses.
async fn serve(answer: Answer, answers: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0_u8; 12];
        let mut served = 0;

        while served < answers && socket.read_exact(&mut request).await.is_ok() {
            let transaction = [request[0], request[1]];
            let unit = request[6];
            assert_eq!(request[7], READ_INPUT_REGISTERS);
            assert_eq!(u16::from_be_bytes([request[8], request[9]]), 0);
            assert_eq!(u16::from_be_bytes([request[10], request[11]]), 9);

            let pdu = match answer {
                Answer::Registers(words) => {
                    let mut pdu = vec![READ_INPUT_REGISTERS, 18];
                    pdu.extend(words.iter().flat_map(|w| w.to_be_bytes()));
                    pdu
                }
                Answer::Exception(code) => vec![READ_INPUT_REGISTERS | 0x80, code],
            };

            let length = u16::try_from(pdu.len() + 1).unwrap().to_be_bytes();
            let mut frame = vec![transaction[0], transaction[1], 0, 0, length[0], length[1], unit];
            frame.extend(pdu);

            if socket.write_all(&frame).await.is_err() {
                break;
            }
            served += 1;
        }
    });

    addr
}

async fn connect(addr: SocketAddr) -> ModbusTcpLink {
    ModbusTcpConnector::new(addr.ip().to_string(), addr.port(), 1)
        .connect()
        .await
        .unwrap()
}

// ============================================================================
// Connector
// ============================================================================

mod connector {
    use super::*;

    #[tokio::test]
    async fn reads_register_block() {
        let words = [1, 0, 0, 0, 1, 1, 2, 0x5678, 0x0001];
        let addr = spawn_responder(Answer::Registers(words)).await;

        let mut link = connect(addr).await;
        assert_eq!(link.peer(), addr);

        let registers = link.read_input_registers(0, 9).await.unwrap();
        assert_eq!(registers, words);

        link.close().await;
        link.close().await;
    }

    #[tokio::test]
    async fn exception_response_is_transport_error() {
        let addr = spawn_responder(Answer::Exception(0x02)).await;

        let mut link = connect(addr).await;
        let err = link.read_input_registers(0, 9).await.unwrap_err();
        assert!(matches!(err, TransportError::Exception(_)), "{err:?}");
    }

    #[tokio::test]
    async fn read_after_close_is_rejected() {
        let addr = spawn_responder(Answer::Registers([0; 9])).await;

        let mut link = connect(addr).await;
        link.close().await;
        let err = link.read_input_registers(0, 9).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
    }

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = ModbusTcpConnector::new("127.0.0.1", addr.port(), 1)
            .connect()
            .await;
        assert!(matches!(result, Err(ConnectError::Io(_))));
    }
}

// ============================================================================
// Connection manager and monitor over TCP
// ============================================================================

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn manager_reads_and_decodes() {
        let words = [0, 1, 45, 0, 0, 1, 0, 10, 0];
        let addr = spawn_responder(Answer::Registers(words)).await;

        let connector = ModbusTcpConnector::new("127.0.0.1", addr.port(), 1);
        let mut manager =
            ConnectionManager::new(connector, Duration::from_secs(3), Duration::from_secs(3));

        manager.ensure_connected().await.unwrap();
        let block = manager.read_block().await.unwrap();
        assert_eq!(block.registers(), &words);

        manager.close().await;
        assert!(!manager.is_connected());
    }

    #[tokio::test]
    async fn monitor_writes_baseline_to_log_file() {
        let addr = spawn_responder(Answer::Registers([0, 1, 45, 0, 0, 1, 0, 10, 0])).await;
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("esp32_events.txt");

        let config = MonitorConfig::new("127.0.0.1")
            .with_port(addr.port())
            .with_log_file(&log_path);
        let connector = ModbusTcpConnector::new(config.host(), config.port(), config.unit_id());
        let sink = LogFileSink::with_console(config.log_file(), Vec::new()).unwrap();
        let mut monitor =
            Monitor::with_ticker(connector, sink, RecordingTicker::default(), &config);

        assert_eq!(monitor.step().await, StepOutcome::Polled { events: 5 });
        assert_eq!(monitor.step().await, StepOutcome::Polled { events: 0 });

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let messages: Vec<&str> = contents
            .lines()
            .map(|line| line.split_once("] [ESP 10s] ").unwrap().1)
            .collect();
        assert_eq!(
            messages,
            [
                "Relay OFF",
                "Latch STARTED (45s)",
                "STA disconnected",
                "AP ENABLED",
                "AP clients = 0",
            ]
        );
    }

    #[tokio::test]
    async fn peer_hangup_is_connection_lost() {
        let addr = serve(Answer::Registers([1, 0, 0, 1, 1, 0, 0, 30, 0]), 1).await;
        let config = MonitorConfig::new("127.0.0.1").with_port(addr.port());
        let connector = ModbusTcpConnector::new(config.host(), config.port(), config.unit_id());
        let sink = MemorySink::new();
        let mut monitor =
            Monitor::with_ticker(connector, sink.clone(), RecordingTicker::default(), &config);

        assert_eq!(monitor.step().await, StepOutcome::Polled { events: 5 });
        let _ = sink.drain();

        assert_eq!(monitor.step().await, StepOutcome::ConnectionLost);
        let events = sink.drain();
        assert_eq!(events.len(), 1, "{events:?}");
        assert!(events[0].is_connection_lost());
        assert!(!monitor.state().link().is_connected());
        assert_eq!(monitor.state().reconnects(), 1);
        assert_eq!(monitor.state().recorded().relay_on(), Some(true));
    }
}
