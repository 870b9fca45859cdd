use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn, Dispatch};

use crate::error::{ProcessControlError, ProcessExitError, Result};
use crate::layout::ServerLayout;
use crate::mode::StartupMode;

/// Prefix for every forwarded line of server output.
pub const OUTPUT_TAG: &str = "[XR Server]";

/// Configuration for a [`ServerRunner`].
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub layout: ServerLayout,
    /// Prepended to each forwarded stdout/stderr line.
    pub output_tag: String,
    /// How often the exit watcher checks the child.
    pub exit_poll_interval: Duration,
}

impl RunnerConfig {
    pub fn new(layout: ServerLayout) -> Self {
        Self {
            layout,
            output_tag: OUTPUT_TAG.to_string(),
            exit_poll_interval: Duration::from_millis(100),
        }
    }
}

/// Observable state of a [`ServerRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running { pid: u32 },
}

#[derive(Debug)]
struct RunningServer {
    child: Child,
    pid: u32,
    /// Which launch this is; lets a watcher tell its own child from a later one.
    launch: u64,
}

#[derive(Debug, Default)]
struct Inner {
    running: Option<RunningServer>,
    launches: u64,
}

/// Owns at most one XR server child process.
///
/// Each launch gets an exit watcher thread. If the child dies on its own the
/// watcher logs a [`ProcessExitError`] and returns the runner to
/// [`RunnerState::Idle`], as if [`stop`](Self::stop) had been called. Stdout
/// is forwarded to the log at `info`, stderr at `error`.
///
/// Dropping the runner kills a running child.
#[derive(Debug)]
pub struct ServerRunner {
    config: RunnerConfig,
    inner: Arc<Mutex<Inner>>,
}

impl ServerRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn state(&self) -> RunnerState {
        match &self.inner.lock().running {
            Some(server) => RunnerState::Running { pid: server.pid },
            None => RunnerState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() != RunnerState::Idle
    }

    /// Launch the server for `mode`.
    ///
    /// [`StartupMode::Disabled`] does nothing. Fails without side effects if a
    /// server is already running or the program cannot be spawned.
    pub fn start(&self, mode: &StartupMode) -> Result<()> {
        let Some(plan) = self.config.layout.launch_plan(mode) else {
            debug!("server startup disabled");
            return Ok(());
        };

        let mut inner = self.inner.lock();
        if let Some(server) = &inner.running {
            let err = ProcessControlError::AlreadyRunning { pid: server.pid };
            error!(error = %err, "refusing to start server");
            return Err(err);
        }

        let mut child = Command::new(&plan.program)
            .args(&plan.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                let err = ProcessControlError::Spawn {
                    program: plan.program.clone(),
                    source,
                };
                error!(error = %err, "failed to start server");
                err
            })?;

        let pid = child.id();
        inner.launches += 1;
        let launch = inner.launches;

        // Helper threads log through whatever subscriber the caller has.
        let dispatch = tracing::dispatcher::get_default(Dispatch::clone);
        let tag = &self.config.output_tag;
        if let Some(stdout) = child.stdout.take() {
            forward_output(stdout, OutputStream::Stdout, tag.clone(), dispatch.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_output(stderr, OutputStream::Stderr, tag.clone(), dispatch.clone());
        }

        inner.running = Some(RunningServer { child, pid, launch });
        drop(inner);

        let watcher = {
            let inner = Arc::clone(&self.inner);
            let interval = self.config.exit_poll_interval;
            thread::Builder::new()
                .name("posebridge-server-watch".to_string())
                .spawn(move || {
                    tracing::dispatcher::with_default(&dispatch, || {
                        watch_for_exit(&inner, launch, interval)
                    })
                })
        };
        if let Err(e) = watcher {
            warn!(pid, error = %e, "failed to spawn exit watcher; unexpected exits will go unnoticed");
        }

        info!(pid, program = %plan.program.display(), mode = %mode, "started server");
        Ok(())
    }

    /// Kill the running server and return to idle.
    ///
    /// A child that has already exited counts as stopped.
    pub fn stop(&self) -> Result<()> {
        let server = self.inner.lock().running.take();
        match server {
            Some(server) => {
                info!(pid = server.pid, "stopping server");
                terminate(server)
            }
            None => {
                let err = ProcessControlError::NotRunning;
                error!(error = %err, "stop requested");
                Err(err)
            }
        }
    }
}

impl Drop for ServerRunner {
    fn drop(&mut self) {
        if let Some(server) = self.inner.lock().running.take() {
            debug!(pid = server.pid, "stopping server on drop");
            let _ = terminate(server);
        }
    }
}

fn terminate(server: RunningServer) -> Result<()> {
    let RunningServer { mut child, pid, .. } = server;

    match child.kill() {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => {
            debug!(pid, "server already exited");
        }
        Err(source) => {
            let err = ProcessControlError::Kill { pid, source };
            error!(error = %err, "failed to stop server");
            return Err(err);
        }
    }

    match child.wait() {
        Ok(status) => debug!(pid, %status, "server reaped"),
        Err(e) => warn!(pid, error = %e, "failed to reap server"),
    }
    Ok(())
}

fn watch_for_exit(inner: &Mutex<Inner>, launch: u64, interval: Duration) {
    loop {
        thread::sleep(interval);

        let mut guard = inner.lock();
        let Some(server) = guard.running.as_mut().filter(|s| s.launch == launch) else {
            // Stopped (or replaced) by someone else.
            return;
        };

        match server.child.try_wait() {
            Ok(None) => continue,
            Ok(Some(status)) => {
                let exit = ProcessExitError {
                    pid: server.pid,
                    status,
                };
                warn!(error = %exit, "server exited");
                let server = guard.running.take();
                drop(guard);
                if let Some(server) = server {
                    let _ = terminate(server);
                }
                return;
            }
            Err(e) => {
                warn!(pid = server.pid, error = %e, "failed to poll server; no longer watching");
                return;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    fn name(self) -> &'static str {
        match self {
            OutputStream::Stdout => "stdout",
            OutputStream::Stderr => "stderr",
        }
    }
}

fn forward_output<R>(reader: R, stream: OutputStream, tag: String, dispatch: Dispatch)
where
    R: Read + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name(format!("posebridge-server-{}", stream.name()))
        .spawn(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                forward_lines(BufReader::new(reader), stream, &tag)
            })
        });
    if let Err(e) = spawned {
        warn!(stream = stream.name(), error = %e, "failed to spawn output forwarder");
    }
}

fn forward_lines(mut reader: impl BufRead, stream: OutputStream, tag: &str) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                match stream {
                    OutputStream::Stdout => info!(target: "posebridge::server", "{tag} {line}"),
                    OutputStream::Stderr => error!(target: "posebridge::server", "{tag} {line}"),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(stream = stream.name(), error = %e, "server output closed");
                return;
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use super::*;
    use crate::layout::{SERVER_SCRIPT, VENV_INTERPRETER};
    use crate::mode::ServerDir;

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    /// A fake source checkout whose "python" is `/bin/sh` and whose entry
    /// script is a shell script.
    struct FakeServer {
        root: PathBuf,
    }

    impl FakeServer {
        fn new(script: &str) -> Self {
            let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
            let root = std::env::temp_dir().join(format!(
                "posebridge-supervisor-{}-{n}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&root);

            let interpreter = root.join(VENV_INTERPRETER);
            let entry = root.join(SERVER_SCRIPT);
            std::fs::create_dir_all(interpreter.parent().unwrap()).unwrap();
            std::fs::create_dir_all(entry.parent().unwrap()).unwrap();
            std::os::unix::fs::symlink("/bin/sh", &interpreter).unwrap();
            std::fs::write(&entry, script).unwrap();

            Self { root }
        }

        fn mode(&self) -> StartupMode {
            StartupMode::ExternalPath(ServerDir::new(&self.root).unwrap())
        }
    }

    impl Drop for FakeServer {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn capture_logs() -> (Captured, tracing::subscriber::DefaultGuard) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    fn runner() -> ServerRunner {
        let mut config = RunnerConfig::new(ServerLayout::for_data_dir("/nonexistent/data"));
        config.exit_poll_interval = Duration::from_millis(20);
        ServerRunner::new(config)
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        condition()
    }

    #[test]
    fn disabled_mode_is_a_no_op() {
        let runner = runner();
        runner.start(&StartupMode::Disabled).unwrap();
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[test]
    fn stop_while_idle_is_not_running() {
        let runner = runner();
        let err = runner.stop().unwrap_err();
        assert!(matches!(err, ProcessControlError::NotRunning));
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[test]
    fn external_path_launches_script_and_forwards_stdout() {
        let (logs, _guard) = capture_logs();
        let server = FakeServer::new("echo ready\nexec sleep 30\n");
        let runner = runner();

        runner.start(&server.mode()).unwrap();
        assert!(matches!(runner.state(), RunnerState::Running { .. }));
        assert!(
            wait_until(|| logs.contents().contains("[XR Server] ready")),
            "stdout not forwarded: {}",
            logs.contents()
        );

        runner.stop().unwrap();
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[test]
    fn stderr_is_logged_as_error() {
        let (logs, _guard) = capture_logs();
        let server = FakeServer::new("echo broken >&2\nexec sleep 30\n");
        let runner = runner();

        runner.start(&server.mode()).unwrap();
        assert!(wait_until(|| logs.contents().contains("[XR Server] broken")));
        let line = logs
            .contents()
            .lines()
            .find(|l| l.contains("[XR Server] broken"))
            .map(str::to_owned)
            .unwrap();
        assert!(line.contains("ERROR"), "{line}");

        runner.stop().unwrap();
    }

    #[test]
    fn second_start_is_rejected_and_keeps_first_child() {
        let server = FakeServer::new("exec sleep 30\n");
        let runner = runner();

        runner.start(&server.mode()).unwrap();
        let RunnerState::Running { pid } = runner.state() else {
            panic!("not running");
        };

        let err = runner.start(&server.mode()).unwrap_err();
        assert!(matches!(err, ProcessControlError::AlreadyRunning { pid: p } if p == pid));
        assert_eq!(runner.state(), RunnerState::Running { pid });

        runner.stop().unwrap();
        assert!(matches!(
            runner.stop().unwrap_err(),
            ProcessControlError::NotRunning
        ));
    }

    #[test]
    fn child_exit_returns_runner_to_idle() {
        let (logs, _guard) = capture_logs();
        let server = FakeServer::new("echo bye\nexit 3\n");
        let runner = runner();

        runner.start(&server.mode()).unwrap();
        assert!(wait_until(|| runner.state() == RunnerState::Idle));
        assert!(wait_until(|| logs.contents().contains("exited unexpectedly")));
        assert!(matches!(
            runner.stop().unwrap_err(),
            ProcessControlError::NotRunning
        ));

        // A fresh launch works after reconciliation.
        let again = FakeServer::new("exec sleep 30\n");
        runner.start(&again.mode()).unwrap();
        assert!(runner.is_running());
        runner.stop().unwrap();
    }

    #[test]
    fn spawn_failure_leaves_runner_idle() {
        let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        let empty = std::env::temp_dir().join(format!("posebridge-empty-{}-{n}", std::process::id()));
        std::fs::create_dir_all(&empty).unwrap();
        let runner = runner();

        let mode = StartupMode::ExternalPath(ServerDir::new(&empty).unwrap());
        let err = runner.start(&mode).unwrap_err();
        match err {
            ProcessControlError::Spawn { program, .. } => {
                assert_eq!(program, empty.join(VENV_INTERPRETER));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.state(), RunnerState::Idle);

        let err = runner.start(&StartupMode::Inbuilt).unwrap_err();
        assert!(matches!(err, ProcessControlError::Spawn { .. }));
        assert_eq!(runner.state(), RunnerState::Idle);

        let _ = std::fs::remove_dir_all(&empty);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn drop_kills_running_child() {
        let server = FakeServer::new("exec sleep 30\n");
        let runner = runner();
        runner.start(&server.mode()).unwrap();
        let RunnerState::Running { pid } = runner.state() else {
            panic!("not running");
        };

        let proc_entry = Path::new("/proc").join(pid.to_string());
        assert!(proc_entry.exists());
        drop(runner);
        assert!(!proc_entry.exists());
    }
}
