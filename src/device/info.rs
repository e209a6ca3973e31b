//! Value types describing the controller session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity reported by the controller during the hello exchange.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Configured friendly name
    pub name: String,
    /// Hardware serial number
    pub serial: String,
    /// Firmware version string
    pub firmware: String,
}

/// Full point-in-time view of the controller.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub name: String,
    pub serial: String,
    pub connected: bool,
    /// (alias, value) pairs in ascending alias order
    pub properties: Vec<(String, Value)>,
}

/// Out-of-band property change pushed by the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Property alias when the wire key is known, raw wire key otherwise
    pub alias: String,
    pub value: Value,
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.alias, self.value)
    }
}
