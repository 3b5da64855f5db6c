//! mpv playback engine over JSON IPC
//!
//! ```text
//!   MpvEngine::spawn()
//!         │
//!         ├── writer_task   ← receives commands via mpsc, serialises → socket
//!         └── reader_task   ← reads JSON lines from socket
//!                                └── property-change → shared Snapshot
//! ```
//!
//! Commands are fire-and-forget and getters read the snapshot, so no
//! engine call ever waits on mpv.

use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::engine::{EngineError, PlaybackEngine};

/// Fixed observe_property IDs
pub const OBS_TIME_POS: u64 = 1;
pub const OBS_DURATION: u64 = 2;
pub const OBS_VOLUME: u64 = 3;
pub const OBS_PAUSE: u64 = 4;
pub const OBS_IDLE_ACTIVE: u64 = 5;

const OBSERVED: &[(u64, &str)] = &[
    (OBS_TIME_POS, "time-pos"),
    (OBS_DURATION, "duration"),
    (OBS_VOLUME, "volume"),
    (OBS_PAUSE, "pause"),
    (OBS_IDLE_ACTIVE, "idle-active"),
];

/// Options for launching mpv
#[derive(Debug, Clone)]
pub struct MpvOptions {
    /// Executable name or path
    pub binary: String,
    /// Volume applied at startup
    pub initial_volume: i32,
}

impl Default for MpvOptions {
    fn default() -> Self {
        Self {
            binary: "mpv".to_string(),
            initial_volume: 80,
        }
    }
}

/// Last known mpv state, fed by property-change events
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub time_pos: Option<f64>,
    pub duration: Option<f64>,
    pub volume: Option<f64>,
    pub paused: bool,
    pub idle: bool,
    pub connected: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            time_pos: None,
            duration: None,
            volume: None,
            paused: false,
            idle: true,
            connected: true,
        }
    }
}

impl Snapshot {
    /// Fold one IPC message into the snapshot. Returns true if it changed.
    pub fn apply_event(&mut self, event: &Value) -> bool {
        if event.get("event").and_then(Value::as_str) != Some("property-change") {
            return false;
        }
        let data = event.get("data").unwrap_or(&Value::Null);
        let before = self.clone();

        match event.get("name").and_then(Value::as_str) {
            Some("time-pos") => self.time_pos = data.as_f64(),
            Some("duration") => self.duration = data.as_f64(),
            Some("volume") => self.volume = data.as_f64(),
            Some("pause") => self.paused = data.as_bool().unwrap_or(false),
            Some("idle-active") => self.idle = data.as_bool().unwrap_or(true),
            _ => return false,
        }
        *self != before
    }
}

/// Running mpv process plus its IPC tasks
pub struct MpvEngine {
    tx: mpsc::UnboundedSender<Value>,
    snapshot: Arc<Mutex<Snapshot>>,
    socket_path: PathBuf,
    _process: tokio::process::Child,
}

impl MpvEngine {
    /// Launch mpv in idle mode and connect to its IPC socket
    #[cfg(unix)]
    pub async fn spawn(options: &MpvOptions) -> Result<Self, EngineError> {
        use std::process::Stdio;
        use tokio::net::UnixStream;

        let socket_path = std::env::temp_dir().join(format!(
            "tubetui-{}.sock",
            uuid::Uuid::new_v4().simple()
        ));
        let volume = options.initial_volume.clamp(0, 150);

        info!(binary = %options.binary, socket = ?socket_path, "spawning mpv");
        let process = tokio::process::Command::new(&options.binary)
            .arg("--no-video")
            .arg("--idle=yes")
            .arg("--quiet")
            .arg("--no-terminal")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .arg(format!("--volume={}", volume))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EngineError::NotFound(options.binary.clone())
                } else {
                    EngineError::StartFailed(e)
                }
            })?;

        // Wait for socket to appear
        for _ in 0..50 {
            if socket_path.exists() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }
        if !socket_path.exists() {
            return Err(EngineError::SocketTimeout);
        }

        let stream = UnixStream::connect(&socket_path).await?;
        info!("mpv: connected to IPC socket");

        let (read_half, write_half) = stream.into_split();
        let snapshot = Arc::new(Mutex::new(Snapshot {
            volume: Some(f64::from(volume)),
            ..Snapshot::default()
        }));
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(writer_task(write_half, rx, snapshot.clone()));
        tokio::spawn(reader_task(BufReader::new(read_half), snapshot.clone()));

        let engine = Self {
            tx,
            snapshot,
            socket_path,
            _process: process,
        };
        for (id, name) in OBSERVED {
            engine.command(json!(["observe_property", id, name]))?;
        }
        Ok(engine)
    }

    #[cfg(not(unix))]
    pub async fn spawn(_options: &MpvOptions) -> Result<Self, EngineError> {
        Err(EngineError::Unsupported)
    }

    /// Copy of the buffered state
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .map_err(|_| EngineError::Disconnected)
    }

    fn update(&self, f: impl FnOnce(&mut Snapshot)) -> Result<(), EngineError> {
        let mut guard = self.snapshot.lock().map_err(|_| EngineError::Disconnected)?;
        f(&mut guard);
        Ok(())
    }

    /// Queue a raw IPC command
    fn command(&self, command: Value) -> Result<(), EngineError> {
        if !self.snapshot()?.connected {
            return Err(EngineError::Disconnected);
        }
        self.tx
            .send(command)
            .map_err(|_| EngineError::Disconnected)
    }
}

impl PlaybackEngine for MpvEngine {
    fn play(&self, url: &str) -> Result<(), EngineError> {
        self.command(json!(["loadfile", url, "replace"]))?;
        self.command(json!(["set_property", "pause", false]))?;
        self.update(|s| {
            s.idle = false;
            s.paused = false;
            s.time_pos = None;
            s.duration = None;
        })
    }

    fn pause(&self) -> Result<bool, EngineError> {
        let paused = !self.snapshot()?.paused;
        self.command(json!(["set_property", "pause", paused]))?;
        self.update(|s| s.paused = paused)?;
        Ok(paused)
    }

    fn stop(&self) -> Result<(), EngineError> {
        self.command(json!(["stop"]))?;
        self.update(|s| {
            s.idle = true;
            s.time_pos = None;
            s.duration = None;
        })
    }

    fn seek(&self, delta_seconds: f64) -> Result<(), EngineError> {
        if self.snapshot()?.idle {
            return Ok(());
        }
        self.command(json!(["seek", delta_seconds, "relative"]))
    }

    fn time_position(&self) -> Result<Option<f64>, EngineError> {
        Ok(self.snapshot()?.time_pos)
    }

    fn duration(&self) -> Result<Option<f64>, EngineError> {
        Ok(self.snapshot()?.duration)
    }

    fn volume(&self) -> Result<Option<i32>, EngineError> {
        Ok(self.snapshot()?.volume.map(|v| v.round() as i32))
    }

    fn set_volume(&self, level: i32) -> Result<(), EngineError> {
        self.command(json!(["set_property", "volume", level]))?;
        self.update(|s| s.volume = Some(f64::from(level)))
    }

    fn is_idle(&self) -> Result<bool, EngineError> {
        let snapshot = self.snapshot()?;
        if !snapshot.connected {
            return Err(EngineError::Disconnected);
        }
        Ok(snapshot.idle)
    }
}

impl Drop for MpvEngine {
    fn drop(&mut self) {
        let _ = self.tx.send(json!(["quit"]));
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

fn mark_disconnected(snapshot: &Mutex<Snapshot>) {
    if let Ok(mut s) = snapshot.lock() {
        s.connected = false;
    }
}

// ── reader task ───────────────────────────────────────────────────────────────

async fn reader_task<R>(mut reader: BufReader<R>, snapshot: Arc<Mutex<Snapshot>>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("mpv reader: connection closed");
                break;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let val: Value = match serde_json::from_str(trimmed) {
                    Ok(v) => v,
                    Err(e) => {
                        debug!("mpv reader: invalid json '{}': {}", trimmed, e);
                        continue;
                    }
                };

                if let Some(err) = val.get("error").and_then(Value::as_str) {
                    if err != "success" {
                        debug!("mpv reader: command error {}", err);
                    }
                    continue;
                }

                if let Ok(mut s) = snapshot.lock() {
                    s.apply_event(&val);
                }
            }
            Err(e) => {
                warn!("mpv reader: read error: {}", e);
                break;
            }
        }
    }
    mark_disconnected(&snapshot);
}

// ── writer task ───────────────────────────────────────────────────────────────

async fn writer_task<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<Value>,
    snapshot: Arc<Mutex<Snapshot>>,
) where
    W: tokio::io::AsyncWrite + Unpin,
{
    while let Some(command) = rx.recv().await {
        let mut raw = json!({ "command": command }).to_string();
        raw.push('\n');
        if let Err(e) = writer.write_all(raw.as_bytes()).await {
            warn!("mpv writer: write failed: {}", e);
            break;
        }
    }
    mark_disconnected(&snapshot);
}
