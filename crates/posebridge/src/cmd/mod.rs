use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use posebridge_frame::FovAngles;
use posebridge_render::{ClipConvention, ClipPlanes};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod listen;
pub mod project;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Listen for pose frames and print per-eye views.
    Listen(ListenArgs),
    /// Stream synthetic pose frames to a listener.
    Send(SendArgs),
    /// Print the projection matrix for a set of FOV angles.
    Project(ProjectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Project(args) => project::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Named near/far pairs.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PlanesPreset {
    Cockpit,
    Scenery,
}

impl From<PlanesPreset> for ClipPlanes {
    fn from(preset: PlanesPreset) -> Self {
        match preset {
            PlanesPreset::Cockpit => ClipPlanes::COCKPIT,
            PlanesPreset::Scenery => ClipPlanes::SCENERY,
        }
    }
}

/// Target graphics backend.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Convention {
    Opengl,
    Vulkan,
    Direct3d,
    Metal,
}

impl From<Convention> for ClipConvention {
    fn from(convention: Convention) -> Self {
        match convention {
            Convention::Opengl => ClipConvention::OPENGL,
            Convention::Vulkan => ClipConvention::VULKAN,
            Convention::Direct3d => ClipConvention::DIRECT3D,
            Convention::Metal => ClipConvention::METAL,
        }
    }
}

/// Parse `up,down,right,left`.
pub fn parse_fov(input: &str) -> Result<FovAngles, String> {
    let values = input
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|_| format!("invalid angle: {:?}", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let angles: [f32; 4] = values
        .try_into()
        .map_err(|v: Vec<f32>| format!("expected 4 angles (up,down,right,left), got {}", v.len()))?;
    Ok(FovAngles::from_array(angles))
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Socket path to bind. Defaults to the well-known headset endpoint.
    #[arg(long, env = "POSEBRIDGE_ENDPOINT")]
    pub endpoint: Option<PathBuf>,
    /// XR server startup: "None", "Inbuilt" or a path to a server checkout.
    #[arg(
        long,
        env = "POSEBRIDGE_SERVER_STARTUP",
        default_value = "None",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub server_startup: String,
    /// Application data directory; the inbuilt server is found beside it.
    #[arg(long, value_name = "DIR", env = "POSEBRIDGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
    /// Render ticks per second.
    #[arg(long, default_value = "90", env = "POSEBRIDGE_TICK_HZ")]
    pub tick_hz: f64,
    /// Exit after printing N views.
    #[arg(long)]
    pub count: Option<usize>,
    /// Near/far planes for the printed projections.
    #[arg(long, value_enum, default_value = "scenery", env = "POSEBRIDGE_PLANES")]
    pub planes: PlanesPreset,
    /// Clip-space convention for the printed projections.
    #[arg(long, value_enum, default_value = "opengl", env = "POSEBRIDGE_CONVENTION")]
    pub convention: Convention,
    /// Recentre on the first received frame.
    #[arg(long)]
    pub recentre_first: bool,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Socket path to connect to.
    #[arg(long, env = "POSEBRIDGE_ENDPOINT")]
    pub endpoint: Option<PathBuf>,
    /// Number of frames to send. Default: until interrupted.
    #[arg(long)]
    pub count: Option<u64>,
    /// Frames per second.
    #[arg(long, default_value = "90", env = "POSEBRIDGE_RATE_HZ")]
    pub rate_hz: f64,
    /// Distance between the eyes, in millimetres.
    #[arg(long, default_value = "64", env = "POSEBRIDGE_IPD_MM")]
    pub ipd_mm: f32,
    /// Per-eye FOV half-angles in degrees: up,down,right,left.
    #[arg(long, value_parser = parse_fov, default_value = "45,50,40,48")]
    pub fov_deg: FovAngles,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// FOV half-angles: up,down,right,left (radians unless --degrees).
    #[arg(long, value_parser = parse_fov, allow_hyphen_values = true)]
    pub fov: FovAngles,
    /// Interpret --fov in degrees.
    #[arg(long)]
    pub degrees: bool,
    /// Near plane distance (requires --far).
    #[arg(long, requires = "far", conflicts_with = "planes")]
    pub near: Option<f32>,
    /// Far plane distance (requires --near).
    #[arg(long, requires = "near", conflicts_with = "planes")]
    pub far: Option<f32>,
    /// Named near/far pair.
    #[arg(long, value_enum)]
    pub planes: Option<PlanesPreset>,
    /// Clip-space convention.
    #[arg(long, value_enum, default_value = "opengl")]
    pub convention: Convention,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fov_reads_four_angles_in_order() {
        let fov = parse_fov("0.1, 0.2,0.3,0.4").unwrap();
        assert_eq!(fov, FovAngles::new(0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn parse_fov_rejects_wrong_count_and_junk() {
        assert!(parse_fov("0.1,0.2,0.3").unwrap_err().contains("got 3"));
        assert!(parse_fov("0.1,0.2,x,0.4").unwrap_err().contains("invalid angle"));
    }
}
