//! Network session implementation.
//!
//! The controller speaks newline-delimited JSON frames over TCP. After an
//! auth frame it answers with `hello` (identity) and a `fullStatus`
//! snapshot, then pushes `deltaStatus` frames whenever properties change.
//! A spawned reader task applies those frames to a shared property store
//! and fans them out to notification subscribers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{DeviceInfo, DeviceSession, Notification, StatusReport};
use crate::error::{Result, WshError};
use crate::{logging, mapping};

const DEFAULT_PORT: u16 = 7183;
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire frames exchanged with the controller.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum Frame {
    Auth { password: String },
    Hello { name: String, serial: String, firmware: String },
    FullStatus { status: HashMap<String, Value> },
    DeltaStatus { status: HashMap<String, Value> },
    SetValue { key: String, value: Value },
    RequestFullStatus,
    Error { message: String },
    Bye,
}

/// State shared between the session handle and its reader task.
struct Shared {
    connected: AtomicBool,
    info: Mutex<DeviceInfo>,
    /// Live property values, keyed by wire key.
    values: Mutex<HashMap<String, Value>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Notification>>>,
}

/// Session over a live TCP connection to the controller.
pub struct TcpSession {
    host: String,
    password: String,
    state: Arc<Shared>,
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl TcpSession {
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: password.into(),
            state: Arc::new(Shared {
                connected: AtomicBool::new(false),
                info: Mutex::new(DeviceInfo::default()),
                values: Mutex::new(HashMap::new()),
                subscribers: Mutex::new(Vec::new()),
            }),
            writer: tokio::sync::Mutex::new(None),
            reader: Mutex::new(None),
        }
    }

    fn addr(&self) -> String {
        if self.host.contains(':') {
            self.host.clone()
        } else {
            format!("{}:{DEFAULT_PORT}", self.host)
        }
    }

    async fn send(&self, frame: &Frame) -> Result<()> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(WshError::NotConnected)?;
        write_frame(writer, frame).await
    }
}

#[async_trait]
impl DeviceSession for TcpSession {
    async fn connect(&self) -> Result<DeviceInfo> {
        if self.state.connected.load(Ordering::SeqCst) {
            return Ok(self.state.info.lock().unwrap().clone());
        }

        let addr = self.addr();
        debug!(%addr, "dialing controller");
        let stream = timeout(HANDSHAKE_TIMEOUT, TcpStream::connect(&addr))
            .await
            .map_err(|_| WshError::Connection(format!("connect to {addr} timed out")))?
            .map_err(|e| WshError::Connection(format!("connect to {addr}: {e}")))?;

        let (read_half, mut write_half) = stream.into_split();
        write_frame(
            &mut write_half,
            &Frame::Auth {
                password: self.password.clone(),
            },
        )
        .await?;

        let mut lines = BufReader::new(read_half).lines();
        let device = timeout(HANDSHAKE_TIMEOUT, read_hello(&mut lines))
            .await
            .map_err(|_| WshError::Connection("handshake timed out".to_string()))??;

        *self.state.info.lock().unwrap() = device.clone();
        self.state.connected.store(true, Ordering::SeqCst);
        *self.writer.lock().await = Some(write_half);

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(reader_loop(lines, state));
        if let Some(old) = self.reader.lock().unwrap().replace(handle) {
            old.abort();
        }

        info!(name = %device.name, serial = %device.serial, "connected");
        Ok(device)
    }

    async fn disconnect(&self) {
        if let Some(mut writer) = self.writer.lock().await.take() {
            // Best effort; the socket may already be gone.
            let _ = write_frame(&mut writer, &Frame::Bye).await;
        }
        if let Some(handle) = self.reader.lock().unwrap().take() {
            handle.abort();
        }
        if self.state.connected.swap(false, Ordering::SeqCst) {
            info!("disconnected");
        }
    }

    async fn get_property(&self, alias: &str) -> Result<Value> {
        let key = mapping::wire_key(alias).ok_or_else(|| WshError::UnknownAlias {
            alias: alias.to_string(),
        })?;
        self.state
            .values
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| WshError::Property(format!("no value for '{alias}' yet")))
    }

    async fn set_property(&self, alias: &str, value: &str) -> Result<()> {
        let key = mapping::wire_key(alias).ok_or_else(|| WshError::UnknownAlias {
            alias: alias.to_string(),
        })?;
        self.send(&Frame::SetValue {
            key: key.to_string(),
            value: coerce_scalar(value),
        })
        .await
    }

    async fn status_info(&self) -> Result<StatusReport> {
        let info = self.state.info.lock().unwrap().clone();
        let values = self.state.values.lock().unwrap();
        let properties = mapping::PROPERTY_MAP
            .iter()
            .filter_map(|(alias, key)| {
                values.get(*key).map(|v| ((*alias).to_string(), v.clone()))
            })
            .collect();
        Ok(StatusReport {
            name: info.name,
            serial: info.serial,
            connected: self.state.connected.load(Ordering::SeqCst),
            properties,
        })
    }

    async fn request_status_update(&self) -> Result<()> {
        self.send(&Frame::RequestFullStatus).await
    }

    fn aliases(&self) -> Vec<String> {
        mapping::aliases().map(String::from).collect()
    }

    fn lookup_alias(&self, alias: &str) -> Option<String> {
        mapping::wire_key(alias).map(String::from)
    }

    fn properties(&self) -> Vec<String> {
        let values = self.state.values.lock().unwrap();
        mapping::PROPERTY_MAP
            .iter()
            .filter(|(_, key)| values.contains_key(*key))
            .map(|(alias, _)| (*alias).to_string())
            .collect()
    }

    fn parse_log_level(&self, level: &str) -> Result<()> {
        logging::set_level(level)
    }

    fn name(&self) -> String {
        self.state.info.lock().unwrap().name.clone()
    }

    fn serial(&self) -> String {
        self.state.info.lock().unwrap().serial.clone()
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<Notification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.subscribers.lock().unwrap().push(tx);
        rx
    }
}

/// Read frames until the controller identifies itself.
async fn read_hello(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> Result<DeviceInfo> {
    loop {
        let line = lines
            .next_line()
            .await
            .map_err(|e| WshError::Connection(e.to_string()))?
            .ok_or_else(|| WshError::Connection("connection closed during handshake".to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Frame>(&line) {
            Ok(Frame::Hello {
                name,
                serial,
                firmware,
            }) => {
                return Ok(DeviceInfo {
                    name,
                    serial,
                    firmware,
                })
            }
            Ok(Frame::Error { message }) => return Err(WshError::Connection(message)),
            Ok(other) => debug!(?other, "frame before hello"),
            Err(e) => warn!(%e, "bad frame during handshake"),
        }
    }
}

/// Apply status frames to the shared store until the connection drops.
async fn reader_loop(mut lines: Lines<BufReader<OwnedReadHalf>>, state: Arc<Shared>) {
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Frame>(&line) {
            Ok(Frame::FullStatus { status }) => apply_status(&state, status, false),
            Ok(Frame::DeltaStatus { status }) => apply_status(&state, status, true),
            Ok(other) => debug!(?other, "ignoring frame"),
            Err(e) => warn!(%e, "bad frame from controller"),
        }
    }
    state.connected.store(false, Ordering::SeqCst);
    info!("controller closed the connection");
}

/// Store incoming values; delta frames additionally notify subscribers.
fn apply_status(state: &Shared, status: HashMap<String, Value>, notify: bool) {
    let mut values = state.values.lock().unwrap();
    for (key, value) in status {
        if notify {
            let note = Notification {
                alias: mapping::alias_for(&key).unwrap_or(&key).to_string(),
                value: value.clone(),
            };
            state
                .subscribers
                .lock()
                .unwrap()
                .retain(|tx| tx.send(note.clone()).is_ok());
        }
        values.insert(key, value);
    }
}

async fn write_frame(writer: &mut OwnedWriteHalf, frame: &Frame) -> Result<()> {
    let mut buf =
        serde_json::to_vec(frame).map_err(|e| WshError::Other(format!("encode frame: {e}")))?;
    buf.push(b'\n');
    writer
        .write_all(&buf)
        .await
        .map_err(|e| WshError::Connection(e.to_string()))?;
    Ok(())
}

/// Coerce an operator-typed value string to the nearest JSON scalar,
/// matching what the controller expects on the wire.
pub(crate) fn coerce_scalar(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                Value::from(n)
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::Number::from_f64(f).map_or_else(|| Value::from(s), Value::Number)
            } else {
                Value::from(s)
            }
        }
    }
}
