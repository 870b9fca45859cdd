use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use posebridge_frame::{PoseFrame, PoseReader};
use posebridge_transport::default_endpoint_path;
#[cfg(unix)]
use posebridge_transport::{IpcStream, UnixDomainSocket};
use tracing::{debug, info, warn};

use crate::buffer::{FrameBuffer, FrameSource};
use crate::error::{ListenerError, Result};

/// Configuration for a [`HeadsetListener`].
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Endpoint path the producer connects to.
    pub endpoint: PathBuf,
    /// How often the reader thread checks for a connection (and for shutdown).
    pub accept_poll_interval: Duration,
    /// Upper bound on a single blocking read, after which shutdown is checked.
    pub read_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint_path(),
            accept_poll_interval: Duration::from_millis(50),
            read_timeout: Duration::from_millis(100),
        }
    }
}

impl ListenerConfig {
    /// Default timings with an explicit endpoint path.
    pub fn with_endpoint(endpoint: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

/// Lifecycle of the reader thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Waiting for the producer to connect.
    Waiting = 0,
    /// Connected and decoding records.
    Connected = 1,
    /// The connection ended or shutdown was requested; no further frames arrive.
    Finished = 2,
}

impl ReaderState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ReaderState::Waiting,
            1 => ReaderState::Connected,
            _ => ReaderState::Finished,
        }
    }
}

#[derive(Debug)]
struct Shared {
    buffer: FrameBuffer,
    shutdown: AtomicBool,
    state: AtomicU8,
    frames_received: AtomicU64,
}

impl Shared {
    fn set_state(&self, state: ReaderState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

/// Binds the pose endpoint and owns the thread that feeds a [`FrameBuffer`].
///
/// Exactly one producer connection is served. When it ends (cleanly or not)
/// the thread logs the reason and stops; the last good frame stays available.
/// Dropping the listener stops the thread and removes the endpoint.
pub struct HeadsetListener {
    shared: Arc<Shared>,
    endpoint: PathBuf,
    thread: Option<JoinHandle<()>>,
}

impl HeadsetListener {
    /// Bind the default endpoint and start reading.
    pub fn start() -> Result<Self> {
        Self::start_with_config(ListenerConfig::default())
    }

    /// Bind `config.endpoint` and start the reader thread.
    ///
    /// Bind errors are returned here, before any thread exists.
    #[cfg(unix)]
    pub fn start_with_config(config: ListenerConfig) -> Result<Self> {
        let socket = UnixDomainSocket::bind(&config.endpoint)?;
        socket.set_nonblocking(true)?;

        let shared = Arc::new(Shared {
            buffer: FrameBuffer::new(),
            shutdown: AtomicBool::new(false),
            state: AtomicU8::new(ReaderState::Waiting as u8),
            frames_received: AtomicU64::new(0),
        });

        let endpoint = config.endpoint.clone();
        let thread_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("posebridge-reader".to_string())
            .spawn(move || {
                reader_loop(&socket, &thread_shared, &config);
                thread_shared.set_state(ReaderState::Finished);
            })
            .map_err(ListenerError::Spawn)?;

        Ok(Self {
            shared,
            endpoint,
            thread: Some(thread),
        })
    }

    #[cfg(not(unix))]
    pub fn start_with_config(_config: ListenerConfig) -> Result<Self> {
        Err(posebridge_transport::TransportError::Unsupported(std::env::consts::OS).into())
    }

    /// True if a frame has arrived since the last take.
    pub fn has_unread_frame(&self) -> bool {
        self.shared.buffer.has_unread_frame()
    }

    /// Mark the latest frame consumed and return it.
    pub fn take_frame(&self) -> PoseFrame {
        self.shared.buffer.take_frame()
    }

    /// Take the latest frame only if it is unread.
    pub fn try_take_frame(&self) -> Option<PoseFrame> {
        self.shared.buffer.try_take_frame()
    }

    /// Current reader thread state.
    pub fn state(&self) -> ReaderState {
        ReaderState::from_u8(self.shared.state.load(Ordering::SeqCst))
    }

    /// Total frames decoded since start.
    pub fn frames_received(&self) -> u64 {
        self.shared.frames_received.load(Ordering::Relaxed)
    }

    /// Endpoint path the producer should connect to.
    ///
    /// The socket file is owned by the reader thread and removed once the
    /// producer disconnects, so after [`ReaderState::Finished`] this path
    /// no longer accepts connections.
    pub fn endpoint(&self) -> &Path {
        &self.endpoint
    }

    /// Stop the reader thread and wait for it.
    ///
    /// Returns within roughly one poll interval or read timeout.
    pub fn shutdown(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("pose reader thread panicked");
            }
        }
    }
}

impl FrameSource for HeadsetListener {
    fn has_unread_frame(&self) -> bool {
        HeadsetListener::has_unread_frame(self)
    }

    fn take_frame(&self) -> PoseFrame {
        HeadsetListener::take_frame(self)
    }
}

impl Drop for HeadsetListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(unix)]
fn reader_loop(socket: &UnixDomainSocket, shared: &Shared, config: &ListenerConfig) {
    let Some(stream) = wait_for_producer(socket, shared, config) else {
        debug!("shutdown requested before a producer connected");
        return;
    };

    if let Some((uid, _gid, pid)) = stream.peer_credentials() {
        info!(pid, uid, "pose producer connected");
    } else {
        info!("pose producer connected");
    }

    let mut reader = match PoseReader::with_read_timeout(stream, Some(config.read_timeout)) {
        Ok(reader) => reader,
        Err(err) => {
            warn!(error = %err, "failed to configure pose stream");
            return;
        }
    };
    shared.set_state(ReaderState::Connected);

    while !shared.shutdown_requested() {
        match reader.read_pose_frame() {
            Ok(frame) => {
                shared.buffer.store(frame);
                shared.frames_received.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) if err.is_timeout() => continue,
            Err(err) => {
                warn!(
                    error = %err,
                    frames = shared.frames_received.load(Ordering::Relaxed),
                    "pose stream ended; keeping last frame"
                );
                return;
            }
        }
    }
    debug!("pose reader stopped by shutdown request");
}

#[cfg(unix)]
fn wait_for_producer(
    socket: &UnixDomainSocket,
    shared: &Shared,
    config: &ListenerConfig,
) -> Option<IpcStream> {
    while !shared.shutdown_requested() {
        match socket.try_accept() {
            Ok(Some(stream)) => return Some(stream),
            Ok(None) => std::thread::sleep(config.accept_poll_interval),
            Err(err) => {
                warn!(error = %err, "accept failed; retrying");
                std::thread::sleep(config.accept_poll_interval);
            }
        }
    }
    None
}
