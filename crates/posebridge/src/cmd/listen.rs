use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use posebridge_listener::{HeadsetListener, ListenerConfig, ReaderState};
use posebridge_render::ViewTracker;
use posebridge_supervisor::{RunnerConfig, ServerLayout, ServerRunner, StartupMode};
use posebridge_transport::default_endpoint_path;
use tracing::{info, warn};

use crate::cmd::ListenArgs;
use crate::exit::{config_error, listener_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_view, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    // Reject a bad startup argument before anything is bound or launched.
    let mode = StartupMode::parse(&args.server_startup)
        .map_err(|err| config_error("--server-startup", err))?;
    let tick = tick_interval(args.tick_hz)?;

    let endpoint = args.endpoint.clone().unwrap_or_else(default_endpoint_path);
    let mut listener = HeadsetListener::start_with_config(ListenerConfig::with_endpoint(endpoint))
        .map_err(|err| listener_error("bind failed", err))?;

    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    let runner = ServerRunner::new(RunnerConfig::new(ServerLayout::for_data_dir(&data_dir)));
    if !mode.is_disabled() {
        info!(mode = %mode, "launching XR server");
        // Launch failures are logged by the runner; the bridge still serves
        // an externally started producer.
        let _ = runner.start(&mode);
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut tracker = ViewTracker::new(args.planes.into(), args.convention.into());
    let mut recentre_pending = args.recentre_first;
    let mut printed = 0u64;

    while running.load(Ordering::SeqCst) {
        let recentre = recentre_pending && listener.has_unread_frame();
        if let Some(view) = tracker.poll(&listener, recentre) {
            recentre_pending &= !recentre;
            printed = printed.saturating_add(1);
            print_view(printed, recentre, &view, format);

            if let Some(count) = args.count {
                if printed >= count as u64 {
                    break;
                }
            }
        } else if listener.state() == ReaderState::Finished {
            info!(frames = listener.frames_received(), "producer disconnected");
            break;
        }

        std::thread::sleep(tick);
    }

    listener.shutdown();
    if runner.is_running() {
        let _ = runner.stop();
    }
    Ok(SUCCESS)
}

fn tick_interval(hz: f64) -> CliResult<Duration> {
    if !(hz.is_finite() && hz > 0.0) {
        return Err(CliError::new(
            USAGE,
            format!("--tick-hz must be a positive number, got {hz}"),
        ));
    }
    Ok(Duration::from_secs_f64(1.0 / hz))
}

fn default_data_dir() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    match dir {
        Some(dir) => dir,
        None => {
            warn!("could not resolve executable directory; using the working directory");
            PathBuf::from(".")
        }
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
