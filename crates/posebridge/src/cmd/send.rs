use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{Quat, Vec3};
use posebridge_frame::{EyePose, FovAngles, PoseFrame, PoseWriter};
use posebridge_transport::default_endpoint_path;
use tracing::{debug, info};

use crate::cmd::SendArgs;
use crate::exit::{connection_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_send_summary, OutputFormat};

const HEAD_HEIGHT: f32 = 1.7;
const SWAY_PERIOD_SECS: f32 = 4.0;
const SWAY_YAW: f32 = 0.3;

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    if !(args.rate_hz.is_finite() && args.rate_hz > 0.0) {
        return Err(CliError::new(
            USAGE,
            format!("--rate-hz must be a positive number, got {}", args.rate_hz),
        ));
    }
    let interval = Duration::from_secs_f64(1.0 / args.rate_hz);
    let endpoint = args.endpoint.clone().unwrap_or_else(default_endpoint_path);

    let stream = connect(&endpoint)?;
    let mut writer = PoseWriter::with_write_timeout(stream, Some(Duration::from_secs(5)))
        .map_err(|err| connection_error("socket setup failed", err))?;
    info!(endpoint = %endpoint.display(), rate_hz = args.rate_hz, "connected");

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)).map_err(|err| {
            CliError::new(
                crate::exit::INTERNAL,
                format!("signal handler setup failed: {err}"),
            )
        })?;
    }

    let fov = FovAngles::from_array(args.fov_deg.to_array().map(f32::to_radians));
    let ipd = args.ipd_mm / 1000.0;
    let started = Instant::now();
    let mut sent = 0u64;

    while running.load(Ordering::SeqCst) && args.count.is_none_or(|count| sent < count) {
        let frame = synthetic_frame(started.elapsed().as_secs_f32(), ipd, fov);
        writer
            .send(&frame)
            .map_err(|err| connection_error("send failed", err))?;
        sent += 1;
        debug!(seq = sent, "frame sent");
        std::thread::sleep(interval);
    }

    print_send_summary(&endpoint.display().to_string(), sent, format);
    Ok(SUCCESS)
}

#[cfg(unix)]
fn connect(endpoint: &std::path::Path) -> CliResult<posebridge_transport::IpcStream> {
    posebridge_transport::UnixDomainSocket::connect(endpoint)
        .map_err(|err| crate::exit::transport_error("connect failed", err))
}

#[cfg(not(unix))]
fn connect(_endpoint: &std::path::Path) -> CliResult<posebridge_transport::IpcStream> {
    Err(crate::exit::transport_error(
        "connect failed",
        posebridge_transport::TransportError::Unsupported(std::env::consts::OS),
    ))
}

/// A head swaying left and right at standing height.
///
/// `fov` is the left eye's; the right eye gets the mirror image.
fn synthetic_frame(t: f32, ipd: f32, fov: FovAngles) -> PoseFrame {
    let phase = t / SWAY_PERIOD_SECS * std::f32::consts::TAU;
    let head = Quat::from_rotation_y(SWAY_YAW * phase.sin());
    let center = Vec3::new(0.0, HEAD_HEIGHT, 0.0);
    let half = head * Vec3::new(ipd / 2.0, 0.0, 0.0);

    let mirrored = FovAngles::new(fov.up, fov.down, fov.left, fov.right);
    PoseFrame::new(
        EyePose::new(center - half, head, fov),
        EyePose::new(center + half, head, mirrored),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_eyes_are_ipd_apart_and_mirrored() {
        let fov = FovAngles::new(0.8, 0.9, 0.7, 0.85);
        let frame = synthetic_frame(1.3, 0.064, fov);

        let separation = frame.left_eye.position.distance(frame.right_eye.position);
        assert!((separation - 0.064).abs() < 1e-6);
        assert_eq!(frame.left_eye.fov, fov);
        assert_eq!(frame.right_eye.fov.right, fov.left);
        assert!(frame.left_eye.orientation.is_normalized());
    }

    #[test]
    fn starts_facing_forward() {
        let frame = synthetic_frame(0.0, 0.064, FovAngles::symmetric(0.7, 0.7));
        assert_eq!(frame.left_eye.orientation, Quat::IDENTITY);
        assert_eq!(frame.left_eye.position, Vec3::new(-0.032, HEAD_HEIGHT, 0.0));
    }
}
