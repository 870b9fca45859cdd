use posebridge_frame::FovAngles;
use posebridge_render::{projection_from_fov, ClipConvention, ClipPlanes};

use crate::cmd::{Convention, PlanesPreset, ProjectArgs};
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_matrix, OutputFormat};

pub fn run(args: ProjectArgs, format: OutputFormat) -> CliResult<i32> {
    let fov = if args.degrees {
        FovAngles::from_array(args.fov.to_array().map(f32::to_radians))
    } else {
        args.fov
    };
    if fov.is_degenerate() {
        tracing::warn!(?fov, "FOV has no extent; matrix will contain non-finite values");
    }

    let planes = resolve_planes(&args)?;
    let matrix = projection_from_fov(fov, planes, ClipConvention::from(args.convention));
    print_matrix(
        &matrix,
        convention_name(args.convention),
        planes.near,
        planes.far,
        format,
    );
    Ok(SUCCESS)
}

fn resolve_planes(args: &ProjectArgs) -> CliResult<ClipPlanes> {
    let planes = match (args.near, args.far, args.planes) {
        (Some(near), Some(far), _) => ClipPlanes::new(near, far),
        (_, _, Some(preset)) => ClipPlanes::from(preset),
        _ => ClipPlanes::from(PlanesPreset::Scenery),
    };
    if !(planes.near > 0.0 && planes.far > planes.near) {
        return Err(CliError::new(
            USAGE,
            format!(
                "clip planes must satisfy 0 < near < far (near={}, far={})",
                planes.near, planes.far
            ),
        ));
    }
    Ok(planes)
}

fn convention_name(convention: Convention) -> &'static str {
    match convention {
        Convention::Opengl => "opengl",
        Convention::Vulkan => "vulkan",
        Convention::Direct3d => "direct3d",
        Convention::Metal => "metal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(near: Option<f32>, far: Option<f32>, planes: Option<PlanesPreset>) -> ProjectArgs {
        ProjectArgs {
            fov: FovAngles::symmetric(0.6, 0.7),
            degrees: false,
            near,
            far,
            planes,
            convention: Convention::Opengl,
        }
    }

    #[test]
    fn explicit_planes_win() {
        let planes = resolve_planes(&args(Some(0.5), Some(10.0), None)).unwrap();
        assert_eq!(planes, ClipPlanes::new(0.5, 10.0));
    }

    #[test]
    fn preset_and_default_planes() {
        assert_eq!(
            resolve_planes(&args(None, None, Some(PlanesPreset::Cockpit))).unwrap(),
            ClipPlanes::COCKPIT
        );
        assert_eq!(
            resolve_planes(&args(None, None, None)).unwrap(),
            ClipPlanes::SCENERY
        );
    }

    #[test]
    fn inverted_planes_are_usage_error() {
        let err = resolve_planes(&args(Some(10.0), Some(1.0), None)).unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
