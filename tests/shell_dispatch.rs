//! Integration tests for the dispatch loop.
//!
//! The loop is driven exactly like production, but with the stdin reader
//! replaced by a test-owned channel and the signal replaced by a oneshot,
//! so event ordering and graceful shutdown can be asserted against the
//! mock session's operation log.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::{mpsc, oneshot};

use wsh::device::mock::{MockSession, Operation};
use wsh::device::SharedSession;
use wsh::error::WshError;
use wsh::shell;

struct Harness {
    mock: Arc<MockSession>,
    lines: mpsc::UnboundedSender<String>,
    stop: oneshot::Sender<()>,
    loop_task: tokio::task::JoinHandle<Result<(), WshError>>,
}

fn start(mock: MockSession) -> Harness {
    let mock = Arc::new(mock);
    let session: SharedSession = Arc::clone(&mock) as SharedSession;
    let (lines, rx) = mpsc::unbounded_channel();
    let (stop, stop_rx) = oneshot::channel();
    let loop_task = tokio::spawn(shell::run_loop(session, rx, async {
        let _ = stop_rx.await;
    }));
    Harness {
        mock,
        lines,
        stop,
        loop_task,
    }
}

impl Harness {
    fn send(&self, line: &str) {
        self.lines.send(line.to_string()).unwrap();
    }

    /// Wait until the mock has recorded at least `count` operations.
    async fn wait_for_ops(&self, count: usize) {
        for _ in 0..500 {
            if self.mock.operations().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!(
            "timed out waiting for {count} operations, got: {:#?}",
            self.mock.operations()
        );
    }

    async fn shutdown(self) -> (Arc<MockSession>, Result<(), WshError>) {
        let _ = self.stop.send(());
        let result = self.loop_task.await.unwrap();
        (self.mock, result)
    }
}

#[tokio::test]
async fn test_set_then_get_round_trip() {
    let harness = start(MockSession::seeded());
    harness.send("set volt 10");
    harness.send("get volt");
    harness.wait_for_ops(2).await;

    let (mock, result) = harness.shutdown().await;
    assert!(result.is_ok());
    mock.assert_operations(&[
        Operation::SetProperty {
            alias: "volt".to_string(),
            value: "10".to_string(),
        },
        Operation::GetProperty {
            alias: "volt".to_string(),
        },
        Operation::Disconnect,
    ]);
}

#[tokio::test]
async fn test_get_unknown_alias_keeps_loop_running() {
    let harness = start(MockSession::new());
    harness.send("get foo");
    harness.send("status");
    harness.wait_for_ops(2).await;

    let (mock, result) = harness.shutdown().await;
    assert!(result.is_ok());
    mock.assert_operations(&[
        Operation::GetProperty {
            alias: "foo".to_string(),
        },
        Operation::StatusInfo,
        Operation::Disconnect,
    ]);
}

#[tokio::test]
async fn test_set_with_one_argument_never_reaches_session() {
    let harness = start(MockSession::seeded());
    harness.send("set volt");
    // Marker command proves the shortfall line was fully processed first:
    // events are consumed in order, one per cycle.
    harness.send("status");
    harness.wait_for_ops(1).await;

    let (mock, _) = harness.shutdown().await;
    mock.assert_operations(&[Operation::StatusInfo, Operation::Disconnect]);
}

#[tokio::test]
async fn test_unknown_command_is_reported_not_dispatched() {
    let harness = start(MockSession::seeded());
    harness.send("frobnicate");
    harness.send("update");
    harness.wait_for_ops(1).await;

    let (mock, _) = harness.shutdown().await;
    mock.assert_operations(&[Operation::RequestStatusUpdate, Operation::Disconnect]);
}

#[tokio::test]
async fn test_signal_while_blocked_on_input_disconnects_gracefully() {
    let harness = start(MockSession::seeded());
    // Establish the session, then leave the loop blocked with no pending line.
    harness.send("connect");
    harness.wait_for_ops(1).await;
    assert!(harness.mock.is_connected());

    let (mock, result) = harness.shutdown().await;
    assert!(result.is_ok());
    assert!(!mock.is_connected(), "shutdown must disconnect the session");
    mock.assert_operations(&[Operation::Connect, Operation::Disconnect]);
}

#[tokio::test]
async fn test_notification_does_not_disturb_dispatch() {
    let harness = start(MockSession::seeded());
    harness.send("connect");
    harness.wait_for_ops(1).await;

    harness.mock.push_notification("frequency", json!(49.9));
    harness.send("get frequency");
    harness.wait_for_ops(2).await;

    let (mock, result) = harness.shutdown().await;
    assert!(result.is_ok());
    mock.assert_operations(&[
        Operation::Connect,
        Operation::GetProperty {
            alias: "frequency".to_string(),
        },
        Operation::Disconnect,
    ]);
}

#[tokio::test]
async fn test_closed_input_stream_is_fatal() {
    let mock = Arc::new(MockSession::seeded());
    let session: SharedSession = Arc::clone(&mock) as SharedSession;
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    drop(tx);

    let result = shell::run_loop(session, rx, std::future::pending()).await;
    assert!(matches!(result, Err(WshError::InputStream(_))));
    // No graceful disconnect on the fatal path.
    mock.assert_no_operations();
}

#[tokio::test]
async fn test_log_command_reaches_session() {
    let harness = start(MockSession::seeded());
    harness.send("log debug");
    harness.wait_for_ops(1).await;

    let (mock, _) = harness.shutdown().await;
    mock.assert_contains(&Operation::ParseLogLevel {
        level: "debug".to_string(),
    });
}
