//! Session abstraction over the charging controller.
//!
//! This module provides a trait-based abstraction over the real network
//! session and a mock implementation, enabling the shell to be tested
//! without a device on the wire.

mod info;
pub mod mock;
mod real;

pub use info::{DeviceInfo, Notification, StatusReport};
pub use real::TcpSession;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;

/// Core session operations the shell dispatches against.
///
/// Property access is by alias only; resolving aliases to the device's
/// wire keys is the session's business, via the generated mapping table.
#[async_trait]
pub trait DeviceSession: Send + Sync {
    /// Establish the session. Returns the controller identity on success.
    async fn connect(&self) -> Result<DeviceInfo>;

    /// Close the session. Safe to call when not connected.
    async fn disconnect(&self);

    /// Current value of an aliased property.
    async fn get_property(&self, alias: &str) -> Result<Value>;

    /// Assign an aliased property. The value string is coerced to the
    /// nearest JSON scalar (bool, number, string) before sending.
    async fn set_property(&self, alias: &str, value: &str) -> Result<()>;

    /// Full snapshot of identity and every property with a live value.
    async fn status_info(&self) -> Result<StatusReport>;

    /// Ask the controller to push a fresh full status.
    async fn request_status_update(&self) -> Result<()>;

    /// Every alias the session knows a wire key for, ascending.
    fn aliases(&self) -> Vec<String>;

    /// Raw wire key for an alias, if known.
    fn lookup_alias(&self, alias: &str) -> Option<String>;

    /// Aliases that currently carry a value (the dump/export scope,
    /// possibly narrower than [`aliases`](Self::aliases)).
    fn properties(&self) -> Vec<String>;

    /// Change the active log verbosity.
    fn parse_log_level(&self, level: &str) -> Result<()>;

    /// Controller friendly name (empty until connected).
    fn name(&self) -> String;

    /// Controller serial number (empty until connected).
    fn serial(&self) -> String;

    /// Register for out-of-band property-change notifications.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<Notification>;
}

/// Type alias for a shared session handle.
pub type SharedSession = Arc<dyn DeviceSession>;
