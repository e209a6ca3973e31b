//! Mock session implementation for unit testing.
//!
//! Records every operation the shell performs and supports assertions,
//! error injection, and manual notification injection, so dispatch
//! behavior can be verified without a controller on the wire.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::trace;

use super::real::coerce_scalar;
use super::{DeviceInfo, DeviceSession, Notification, StatusReport};
use crate::error::{Result, WshError};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Disconnect,
    GetProperty { alias: String },
    SetProperty { alias: String, value: String },
    StatusInfo,
    RequestStatusUpdate,
    ParseLogLevel { level: String },
}

/// Mock session backed by an in-memory property store.
pub struct MockSession {
    info: DeviceInfo,
    values: Mutex<BTreeMap<String, Value>>,
    operation_log: Mutex<Vec<Operation>>,
    error_injection: Mutex<Option<WshError>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Notification>>>,
    connected: AtomicBool,
}

impl MockSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            info: DeviceInfo {
                name: "mock-charger".to_string(),
                serial: "MOCK-0001".to_string(),
                firmware: "1.0.0-mock".to_string(),
            },
            values: Mutex::new(BTreeMap::new()),
            operation_log: Mutex::new(Vec::new()),
            error_injection: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
            connected: AtomicBool::new(false),
        }
    }

    /// Mock pre-populated with a value for every alias in the mapping.
    #[must_use]
    pub fn seeded() -> Self {
        let mock = Self::new();
        {
            let mut values = mock.values.lock().unwrap();
            for (idx, alias) in crate::mapping::aliases().enumerate() {
                values.insert(alias.to_string(), Value::from(idx as u64));
            }
        }
        mock
    }

    /// Set a property value directly, bypassing the operation log.
    #[must_use]
    pub fn with_property(self, alias: &str, value: Value) -> Self {
        self.values.lock().unwrap().insert(alias.to_string(), value);
        self
    }

    /// Inject an error for the next failable operation.
    pub fn inject_error(&self, error: WshError) {
        *self.error_injection.lock().unwrap() = Some(error);
    }

    /// Push a notification to all subscribers, as the controller would.
    pub fn push_notification(&self, alias: &str, value: Value) {
        let note = Notification {
            alias: alias.to_string(),
            value,
        };
        self.subscribers
            .lock()
            .unwrap()
            .retain(|tx| tx.send(note.clone()).is_ok());
    }

    // === Assertions ===

    /// Get all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.operation_log.lock().unwrap().clone()
    }

    /// Assert the exact operation sequence.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[Operation]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    /// Assert no operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if any operations were recorded.
    pub fn assert_no_operations(&self) {
        let ops = self.operations();
        assert!(ops.is_empty(), "Expected no operations, but found: {ops:#?}");
    }

    /// Assert a specific operation was performed at least once.
    ///
    /// # Panics
    ///
    /// Panics if the operation was not found.
    pub fn assert_contains(&self, expected: &Operation) {
        let ops = self.operations();
        assert!(
            ops.contains(expected),
            "Expected operation {expected:?} not found in: {ops:#?}",
        );
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    // === Internal helpers ===

    fn record(&self, op: Operation) {
        trace!(?op, "recording operation");
        self.operation_log.lock().unwrap().push(op);
    }

    fn check_error(&self) -> Result<()> {
        if let Some(error) = self.error_injection.lock().unwrap().take() {
            return Err(error);
        }
        Ok(())
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceSession for MockSession {
    async fn connect(&self) -> Result<DeviceInfo> {
        self.record(Operation::Connect);
        self.check_error()?;
        self.connected.store(true, Ordering::SeqCst);
        Ok(self.info.clone())
    }

    async fn disconnect(&self) {
        self.record(Operation::Disconnect);
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn get_property(&self, alias: &str) -> Result<Value> {
        self.record(Operation::GetProperty {
            alias: alias.to_string(),
        });
        self.check_error()?;
        self.values
            .lock()
            .unwrap()
            .get(alias)
            .cloned()
            .ok_or_else(|| WshError::UnknownAlias {
                alias: alias.to_string(),
            })
    }

    async fn set_property(&self, alias: &str, value: &str) -> Result<()> {
        self.record(Operation::SetProperty {
            alias: alias.to_string(),
            value: value.to_string(),
        });
        self.check_error()?;
        let mut values = self.values.lock().unwrap();
        if !values.contains_key(alias) {
            return Err(WshError::UnknownAlias {
                alias: alias.to_string(),
            });
        }
        values.insert(alias.to_string(), coerce_scalar(value));
        Ok(())
    }

    async fn status_info(&self) -> Result<StatusReport> {
        self.record(Operation::StatusInfo);
        self.check_error()?;
        Ok(StatusReport {
            name: self.info.name.clone(),
            serial: self.info.serial.clone(),
            connected: self.is_connected(),
            properties: self
                .values
                .lock()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    async fn request_status_update(&self) -> Result<()> {
        self.record(Operation::RequestStatusUpdate);
        self.check_error()
    }

    fn aliases(&self) -> Vec<String> {
        crate::mapping::aliases().map(String::from).collect()
    }

    fn lookup_alias(&self, alias: &str) -> Option<String> {
        crate::mapping::wire_key(alias).map(String::from)
    }

    fn properties(&self) -> Vec<String> {
        self.values.lock().unwrap().keys().cloned().collect()
    }

    fn parse_log_level(&self, level: &str) -> Result<()> {
        self.record(Operation::ParseLogLevel {
            level: level.to_string(),
        });
        let known = ["trace", "debug", "info", "warn", "error"];
        if known.contains(&level.to_ascii_lowercase().as_str()) {
            Ok(())
        } else {
            Err(WshError::LogLevel(level.to_string()))
        }
    }

    fn name(&self) -> String {
        self.info.name.clone()
    }

    fn serial(&self) -> String {
        self.info.serial.clone()
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<Notification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get_reflects_value() {
        let mock = MockSession::new().with_property("volt", json!(230));
        mock.set_property("volt", "10").await.unwrap();
        assert_eq!(mock.get_property("volt").await.unwrap(), json!(10));
    }

    #[tokio::test]
    async fn test_unknown_alias_errors() {
        let mock = MockSession::new();
        assert!(matches!(
            mock.get_property("nope").await,
            Err(WshError::UnknownAlias { .. })
        ));
    }

    #[tokio::test]
    async fn test_operation_log() {
        let mock = MockSession::seeded();
        mock.connect().await.unwrap();
        mock.set_property("volt", "10").await.unwrap();
        mock.assert_operations(&[
            Operation::Connect,
            Operation::SetProperty {
                alias: "volt".to_string(),
                value: "10".to_string(),
            },
        ]);
    }

    #[tokio::test]
    async fn test_error_injection() {
        let mock = MockSession::seeded();
        mock.inject_error(WshError::Connection("nope".to_string()));
        assert!(mock.connect().await.is_err());
        // Injected error is consumed
        assert!(mock.connect().await.is_ok());
    }

    #[tokio::test]
    async fn test_notification_fan_out() {
        let mock = MockSession::new();
        let mut rx = mock.subscribe();
        mock.push_notification("frequency", json!(50.0));
        let note = rx.try_recv().unwrap();
        assert_eq!(note.alias, "frequency");
    }

    #[test]
    fn test_parse_log_level_validation() {
        let mock = MockSession::new();
        assert!(mock.parse_log_level("debug").is_ok());
        assert!(mock.parse_log_level("loud").is_err());
    }
}
