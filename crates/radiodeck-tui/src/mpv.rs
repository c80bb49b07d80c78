/// mpv IPC driver with separated reader/writer tasks.
///
/// ```text
///   MpvDriver::spawn_and_connect()
///         │
///         ├── writer_task   ← receives PendingRequest via mpsc, writes JSON lines
///         └── reader_task   ← reads JSON lines from the socket
///                                ├── response (has request_id) → matching oneshot
///                                └── event                      → event_tx channel
/// ```
///
/// `MpvHandle` is cheaply cloneable; `send(cmd)` resolves to mpv's reply.
/// `MpvDriver` owns the child process.
///
/// Unix uses a domain socket, Windows a named pipe `\\.\pipe\<name>`.
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info, warn};

use radiodeck_core::platform;

#[cfg(unix)]
use tokio::net::UnixStream;

#[cfg(windows)]
use tokio::net::windows::named_pipe::ClientOptions;

static NEXT_REQ_ID: AtomicU64 = AtomicU64::new(1);

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<anyhow::Result<Value>>>>>;

struct PendingRequest {
    req_id: u64,
    payload: String, // serialised JSON line, '\n' included
    reply: oneshot::Sender<anyhow::Result<Value>>,
}

/// Why mpv stopped playing a file (`end-file` event).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The server closed the stream.
    Eof,
    /// Unsupported format, unreachable host, decoder failure.
    Error,
    /// We asked for it (`stop`, or `loadfile` replacing the file).
    Stopped,
    Other,
}

/// An unsolicited message from mpv (no request_id).
#[derive(Debug, Clone)]
pub struct MpvEvent {
    pub raw: Value,
}

impl MpvEvent {
    /// The event name, e.g. "end-file", "start-file", "file-loaded".
    pub fn event_name(&self) -> Option<&str> {
        self.raw.get("event")?.as_str()
    }

    /// `Some` for `end-file` events.
    pub fn end_reason(&self) -> Option<EndReason> {
        if self.event_name()? != "end-file" {
            return None;
        }
        Some(match self.raw.get("reason").and_then(|r| r.as_str()) {
            Some("eof") => EndReason::Eof,
            Some("error") => EndReason::Error,
            Some("stop") | Some("quit") => EndReason::Stopped,
            _ => EndReason::Other,
        })
    }

    /// Playlist entry the event refers to (mpv 0.33+).
    pub fn playlist_entry_id(&self) -> Option<u64> {
        self.raw.get("playlist_entry_id")?.as_u64()
    }

    /// mpv's description of a failed load, when it gives one.
    pub fn file_error(&self) -> Option<&str> {
        self.raw.get("file_error")?.as_str()
    }
}

/// Cloneable handle to the mpv writer task.
#[derive(Clone)]
pub struct MpvHandle {
    tx: mpsc::Sender<PendingRequest>,
}

impl MpvHandle {
    pub async fn send(&self, command: Value) -> anyhow::Result<Value> {
        let req_id = NEXT_REQ_ID.fetch_add(1, Ordering::Relaxed);
        let msg = json!({ "command": command, "request_id": req_id });
        let mut raw = serde_json::to_string(&msg)?;
        raw.push('\n');

        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(PendingRequest {
                req_id,
                payload: raw,
                reply: reply_tx,
            })
            .await
            .map_err(|_| anyhow::anyhow!("mpv writer task gone"))?;

        tokio::time::timeout(tokio::time::Duration::from_secs(5), reply_rx)
            .await
            .map_err(|_| anyhow::anyhow!("mpv IPC timeout for req={}", req_id))?
            .map_err(|_| anyhow::anyhow!("mpv reply channel dropped req={}", req_id))?
    }

    /// Replace whatever is loaded with `url` and unpause. Returns the new
    /// playlist entry id when mpv reports one (0.38+).
    pub async fn load_stream(&self, url: &str) -> anyhow::Result<Option<u64>> {
        debug!("mpv: loadfile {}", url);
        let resp = self.send(json!(["loadfile", url, "replace"])).await?;
        self.send(json!(["set_property", "pause", false])).await?;
        Ok(resp["data"]["playlist_entry_id"].as_u64())
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        self.send(json!(["stop"])).await?;
        Ok(())
    }

    pub async fn set_volume(&self, vol: f32) -> anyhow::Result<()> {
        self.send(json!(["set_property", "volume", volume_percent(vol)]))
            .await?;
        Ok(())
    }
}

pub fn volume_percent(vol: f32) -> f64 {
    (f64::from(vol) * 100.0).clamp(0.0, 100.0).round()
}

/// Owns the mpv child process.
pub struct MpvDriver {
    socket_name: String,
    process: Option<tokio::process::Child>,
}

impl MpvDriver {
    pub fn new() -> Self {
        Self {
            socket_name: platform::mpv_socket_name(),
            process: None,
        }
    }

    pub fn process_alive(&mut self) -> bool {
        let Some(child) = self.process.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                match status.code() {
                    Some(code) => warn!("mpv process exited with code: {}", code),
                    None => warn!("mpv process terminated by signal"),
                }
                false
            }
            Err(e) => {
                warn!("mpv process_alive check failed: {}", e);
                false
            }
        }
    }

    /// Kill the process if running.
    pub async fn kill(&mut self) {
        if let Some(mut p) = self.process.take() {
            let _ = p.kill().await;
        }
        #[cfg(unix)]
        let _ = tokio::fs::remove_file(&self.socket_name).await;
    }

    fn spawn_process(&mut self, volume: f32) -> anyhow::Result<()> {
        let mpv_binary =
            platform::find_mpv_binary().ok_or_else(|| anyhow::anyhow!("mpv binary not found"))?;

        let stderr_path = platform::data_dir().join("mpv-stderr.log");
        let stderr_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&stderr_path)?;
        info!("mpv: logging stderr to {:?}", stderr_path);

        let child = tokio::process::Command::new(&mpv_binary)
            .arg("--no-video")
            .arg("--idle=yes")
            .arg("--quiet")
            .arg(platform::mpv_socket_arg(&self.socket_name))
            .arg(format!("--volume={}", volume_percent(volume)))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(stderr_file)
            .kill_on_drop(true)
            .spawn()?;
        info!("mpv: spawned {:?} pid {:?}", mpv_binary, child.id());
        self.process = Some(child);
        Ok(())
    }

    #[cfg(unix)]
    pub async fn spawn_and_connect(
        &mut self,
        volume: f32,
        event_tx: mpsc::Sender<MpvEvent>,
    ) -> anyhow::Result<MpvHandle> {
        self.kill().await;
        self.spawn_process(volume)?;

        let socket_path = std::path::PathBuf::from(&self.socket_name);
        for _ in 0..50 {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            if socket_path.exists() {
                break;
            }
        }
        if !socket_path.exists() {
            anyhow::bail!("mpv IPC socket did not appear");
        }

        let stream = UnixStream::connect(&socket_path).await?;
        info!("mpv: connected to IPC socket");
        let (read_half, write_half) = stream.into_split();
        Ok(start_io_tasks(BufReader::new(read_half), write_half, event_tx))
    }

    #[cfg(windows)]
    pub async fn spawn_and_connect(
        &mut self,
        volume: f32,
        event_tx: mpsc::Sender<MpvEvent>,
    ) -> anyhow::Result<MpvHandle> {
        self.kill().await;
        self.spawn_process(volume)?;

        let pipe_path = format!(r"\\.\pipe\{}", self.socket_name);
        for _ in 0..50 {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            if let Ok(client) = ClientOptions::new().open(&pipe_path) {
                info!("mpv: connected to named pipe");
                let (read_half, write_half) = tokio::io::split(client);
                return Ok(start_io_tasks(BufReader::new(read_half), write_half, event_tx));
            }
        }
        anyhow::bail!("mpv named pipe did not appear")
    }
}

impl Default for MpvDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn start_io_tasks<R, W>(
    reader: BufReader<R>,
    writer: W,
    event_tx: mpsc::Sender<MpvEvent>,
) -> MpvHandle
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    // req_id → reply channel; the writer inserts, the reader resolves
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (cmd_tx, cmd_rx) = mpsc::channel::<PendingRequest>(64);

    tokio::spawn(writer_task(writer, cmd_rx, pending.clone()));
    tokio::spawn(reader_task(reader, pending, event_tx));

    MpvHandle { tx: cmd_tx }
}

async fn fail_all(pending: &PendingMap, reason: &str) {
    let mut map = pending.lock().await;
    for (_, tx) in map.drain() {
        let _ = tx.send(Err(anyhow::anyhow!("{}", reason)));
    }
}

/// Route one line from mpv: a reply to its waiter, anything else to events.
fn route_line(line: &str) -> Option<Result<(u64, anyhow::Result<Value>), MpvEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let val: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(e) => {
            debug!("mpv reader: invalid json '{}': {}", trimmed, e);
            return None;
        }
    };
    match val.get("request_id").and_then(|v| v.as_u64()) {
        Some(req_id) => {
            let result = if val["error"].as_str() == Some("success") {
                Ok(val)
            } else {
                let err = val["error"].as_str().unwrap_or("unknown error").to_string();
                Err(anyhow::anyhow!("mpv error: {}", err))
            };
            Some(Ok((req_id, result)))
        }
        None => Some(Err(MpvEvent { raw: val })),
    }
}

async fn reader_task<R>(
    mut reader: BufReader<R>,
    pending: PendingMap,
    event_tx: mpsc::Sender<MpvEvent>,
) where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("mpv reader: connection closed");
                fail_all(&pending, "mpv IPC connection closed").await;
                break;
            }
            Ok(_) => match route_line(&line) {
                Some(Ok((req_id, result))) => {
                    match pending.lock().await.remove(&req_id) {
                        Some(tx) => {
                            let _ = tx.send(result);
                        }
                        None => debug!("mpv reader: response for unknown req={}", req_id),
                    }
                }
                Some(Err(event)) => {
                    debug!("mpv reader: event {}", line.trim());
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
                None => {}
            },
            Err(e) => {
                warn!("mpv reader: read error: {}", e);
                fail_all(&pending, "mpv IPC read error").await;
                break;
            }
        }
    }
}

async fn writer_task<W>(
    mut writer: W,
    mut rx: mpsc::Receiver<PendingRequest>,
    pending: PendingMap,
) where
    W: tokio::io::AsyncWrite + Unpin,
{
    while let Some(req) = rx.recv().await {
        // register before writing so the reader can match the reply
        pending.lock().await.insert(req.req_id, req.reply);
        debug!("mpv writer: req={} {}", req.req_id, req.payload.trim());
        if let Err(e) = writer.write_all(req.payload.as_bytes()).await {
            warn!("mpv writer: write error: {}", e);
            if let Some(tx) = pending.lock().await.remove(&req.req_id) {
                let _ = tx.send(Err(anyhow::anyhow!("mpv write error: {}", e)));
            }
            break;
        }
    }
    debug!("mpv writer: task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(raw: Value) -> MpvEvent {
        MpvEvent { raw }
    }

    #[test]
    fn end_file_reasons() {
        let e = event(json!({"event": "end-file", "reason": "error", "file_error": "unrecognized file format"}));
        assert_eq!(e.end_reason(), Some(EndReason::Error));
        assert_eq!(e.file_error(), Some("unrecognized file format"));
        assert_eq!(e.playlist_entry_id(), None);

        assert_eq!(event(json!({"event": "end-file", "reason": "eof"})).end_reason(), Some(EndReason::Eof));
        assert_eq!(event(json!({"event": "end-file", "reason": "stop"})).end_reason(), Some(EndReason::Stopped));
        assert_eq!(event(json!({"event": "file-loaded"})).end_reason(), None);
    }

    #[test]
    fn routes_replies_and_events() {
        match route_line(r#"{"request_id":7,"error":"success","data":null}"#) {
            Some(Ok((7, Ok(_)))) => {}
            other => panic!("unexpected {:?}", other.map(|r| r.map(|(id, _)| id))),
        }
        match route_line(r#"{"request_id":8,"error":"property unavailable"}"#) {
            Some(Ok((8, Err(e)))) => assert!(e.to_string().contains("property unavailable")),
            _ => panic!("expected error reply"),
        }
        match route_line(r#"{"event":"idle"}"#) {
            Some(Err(ev)) => assert_eq!(ev.event_name(), Some("idle")),
            _ => panic!("expected event"),
        }
        assert!(route_line("   ").is_none());
        assert!(route_line("not json").is_none());
    }

    #[test]
    fn volume_is_clamped_percent() {
        assert_eq!(volume_percent(0.5), 50.0);
        assert_eq!(volume_percent(1.7), 100.0);
        assert_eq!(volume_percent(-0.2), 0.0);
    }

    #[tokio::test]
    async fn handle_round_trip_over_duplex() {
        let (client, server) = tokio::io::duplex(4096);
        let (client_read, client_write) = tokio::io::split(client);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let handle = start_io_tasks(BufReader::new(client_read), client_write, event_tx);

        // fake mpv: answer every command with success, then emit one event
        let (server_read, mut server_write) = tokio::io::split(server);
        tokio::spawn(async move {
            let mut lines = BufReader::new(server_read).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let req: Value = serde_json::from_str(&line).unwrap();
                let id = req["request_id"].as_u64().unwrap();
                let reply = format!("{{\"request_id\":{},\"error\":\"success\"}}\n", id);
                let ev = "{\"event\":\"end-file\",\"reason\":\"eof\"}\n";
                server_write.write_all(reply.as_bytes()).await.unwrap();
                server_write.write_all(ev.as_bytes()).await.unwrap();
            }
        });

        handle.stop().await.unwrap();
        let ev = event_rx.recv().await.unwrap();
        assert_eq!(ev.end_reason(), Some(EndReason::Eof));
    }
}
