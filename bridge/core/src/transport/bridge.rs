//! RPC Bridge
//!
//! Owns the editor child process and both directions of its JSON stream.
//!
//! Two tasks do the I/O:
//! - the read task decodes stdout line by line and forwards every message,
//!   in order, as a [`BridgeEvent`]
//! - the write task serializes [`Request`]s onto stdin in call order
//!
//! When stdout ends (the editor quit or crashed) the read task emits exactly
//! one [`BridgeEvent::SessionEnded`] and closes the event stream. A session
//! never restarts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::codec::LineDecoder;
use super::process::EditorCommand;
use crate::protocol::{EditorMessage, Request};

/// How long [`RpcBridge::shutdown`] waits before killing the editor
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Read chunk size
const READ_CHUNK: usize = 8192;

/// Errors from the bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The editor binary could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        /// Program that was attempted
        program: String,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// A standard stream of the child was not captured
    #[error("Editor {0} is not piped")]
    MissingPipe(&'static str),

    /// The editor is gone; nothing more can be sent
    #[error("Editor session has ended")]
    SessionEnded,

    /// IO error while managing the child
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Events delivered by the bridge, in the order the editor produced them
#[derive(Clone, Debug, PartialEq)]
pub enum BridgeEvent {
    /// A decoded display update
    Message(EditorMessage),
    /// The editor's output ended; always the last event
    SessionEnded,
}

/// Connection to one editor process
pub struct RpcBridge {
    requests: mpsc::UnboundedSender<Request>,
    events: mpsc::UnboundedReceiver<BridgeEvent>,
    ended: Arc<AtomicBool>,
    child: Option<Child>,
    writer: JoinHandle<()>,
}

impl RpcBridge {
    /// Start the editor and attach to its standard streams
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Spawn` if the binary cannot be executed.
    pub fn spawn(command: &EditorCommand) -> Result<Self, BridgeError> {
        let mut child = command
            .to_command()
            .spawn()
            .map_err(|source| BridgeError::Spawn {
                program: command.program().to_string(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(BridgeError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(BridgeError::MissingPipe("stdout"))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain_stderr(stderr));
        }

        tracing::info!(
            program = command.program(),
            args = ?command.argv(),
            pid = child.id(),
            "Editor started"
        );

        let mut bridge = Self::from_streams(stdout, stdin);
        bridge.child = Some(child);
        Ok(bridge)
    }

    /// Run the protocol over an arbitrary pair of streams
    ///
    /// `reader` carries editor output, `writer` editor input. Used for
    /// in-process editors and tests.
    pub fn from_streams<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let ended = Arc::new(AtomicBool::new(false));

        tokio::spawn(read_loop(reader, event_tx, Arc::clone(&ended)));
        let writer = tokio::spawn(write_loop(writer, request_rx));

        Self {
            requests: request_tx,
            events: event_rx,
            ended,
            child: None,
            writer,
        }
    }

    /// Receive the next event
    ///
    /// Returns `None` once [`BridgeEvent::SessionEnded`] has been delivered.
    /// Cancel safe.
    pub async fn recv(&mut self) -> Option<BridgeEvent> {
        self.events.recv().await
    }

    /// Receive an event if one is ready
    pub fn try_recv(&mut self) -> Option<BridgeEvent> {
        self.events.try_recv().ok()
    }

    /// Whether the editor's output has ended
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    /// Queue a request; it is written after every earlier one
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::SessionEnded` once the editor is gone.
    pub fn send(&self, request: Request) -> Result<(), BridgeError> {
        if self.is_ended() {
            return Err(BridgeError::SessionEnded);
        }
        tracing::trace!(method = request.method(), "Queueing request");
        self.requests
            .send(request)
            .map_err(|_| BridgeError::SessionEnded)
    }

    /// Send keys in editor notation
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::SessionEnded` once the editor is gone.
    pub fn send_keys(&self, keys: impl Into<String>) -> Result<(), BridgeError> {
        self.send(Request::Keys(keys.into()))
    }

    /// Announce a new grid size
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::SessionEnded` once the editor is gone.
    pub fn send_resize(&self, rows: u16, columns: u16) -> Result<(), BridgeError> {
        self.send(Request::Resize { rows, columns })
    }

    /// Close the editor's input and wait for it to exit
    ///
    /// Requests already queued are written first. An editor that does not
    /// exit within [`SHUTDOWN_TIMEOUT`] is killed.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting on or killing the child fails.
    pub async fn shutdown(self) -> Result<(), BridgeError> {
        let Self {
            requests,
            writer,
            child,
            ..
        } = self;

        drop(requests);
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, writer).await.is_err() {
            tracing::warn!("Timed out flushing editor input");
        }

        let Some(mut child) = child else {
            return Ok(());
        };
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, child.wait()).await {
            Ok(status) => {
                let status = status?;
                tracing::info!(%status, "Editor exited");
            }
            Err(_) => {
                tracing::warn!("Editor did not exit in time, killing it");
                child.kill().await?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for RpcBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcBridge")
            .field("ended", &self.is_ended())
            .field("pid", &self.child.as_ref().and_then(Child::id))
            .finish_non_exhaustive()
    }
}

/// Decode editor output until it ends, then announce the end once
async fn read_loop<R>(mut reader: R, events: mpsc::UnboundedSender<BridgeEvent>, ended: Arc<AtomicBool>)
where
    R: AsyncRead + Unpin,
{
    let mut decoder = LineDecoder::new();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                tracing::debug!("Editor output closed");
                break;
            }
            Ok(n) => {
                decoder.push(&buf[..n]);
                drain_decoder(&mut decoder, &events);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Read error");
                break;
            }
        }
    }

    match decoder.finish() {
        Ok(Some(msg)) => forward(&events, msg),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Skipping malformed final line"),
    }

    ended.store(true, Ordering::SeqCst);
    // Receiver may already be gone during shutdown
    let _ = events.send(BridgeEvent::SessionEnded);
    tracing::info!("Editor session ended");
}

fn drain_decoder(decoder: &mut LineDecoder, events: &mpsc::UnboundedSender<BridgeEvent>) {
    loop {
        match decoder.decode() {
            Ok(Some(msg)) => forward(events, msg),
            Ok(None) => break,
            Err(e) => tracing::warn!(error = %e, "Skipping malformed line"),
        }
    }
}

fn forward(events: &mpsc::UnboundedSender<BridgeEvent>, msg: EditorMessage) {
    tracing::trace!(method = msg.method(), "Editor message");
    if events.send(BridgeEvent::Message(msg)).is_err() {
        tracing::debug!("Event receiver dropped");
    }
}

/// Write requests in order until every sender is gone
async fn write_loop<W>(mut writer: W, mut requests: mpsc::UnboundedReceiver<Request>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(request) = requests.recv().await {
        let data = match request.to_line() {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Encode error");
                continue;
            }
        };
        if let Err(e) = writer.write_all(&data).await {
            tracing::warn!(error = %e, "Write error");
            break;
        }
        if let Err(e) = writer.flush().await {
            tracing::warn!(error = %e, "Flush error");
            break;
        }
    }

    if let Err(e) = writer.shutdown().await {
        tracing::debug!(error = %e, "Closing editor input failed");
    }
}

/// Forward the editor's stderr to the log
async fn drain_stderr<R>(stderr: R)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => tracing::debug!(target: "kak", "{line}"),
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Editor stderr closed");
                break;
            }
        }
    }
}
