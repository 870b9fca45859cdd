//! Asymmetric off-axis perspective projection.
//!
//! Adapted from the Khronos/Oculus `XrMatrix4x4f_CreateProjection` helper
//! (Apache-2.0), with the clip-space convention passed in explicitly.

use glam::Mat4;
use posebridge_frame::FovAngles;

use crate::clip::{ClipConvention, ClipPlanes, YAxis, ZRange};

/// Projection from signed frustum-edge tangents.
///
/// `tan_left` and `tan_down` are the (normally negative) tangents of the
/// left and lower edges; `tan_right` and `tan_up` those of the right and upper
/// edges. The returned matrix, read by rows (`m.row(i)`), is:
///
/// ```text
/// [ 2/w   0     (r+l)/w   0                    ]
/// [ 0     2/h   (u+d)/h   0                    ]
/// [ 0     0     -(f+o)/(f-n)  -f(n+o)/(f-n)    ]
/// [ 0     0     -1        0                    ]
/// ```
///
/// with `w = r - l`, `h = u - d` (or `d - u` for a Y-down clip space) and
/// `o = n` for a `[-1, 1]` depth range, `0` for `[0, 1]`.
pub fn projection_from_tangents(
    tan_left: f32,
    tan_right: f32,
    tan_up: f32,
    tan_down: f32,
    planes: ClipPlanes,
    convention: ClipConvention,
) -> Mat4 {
    let ClipPlanes { near, far } = planes;

    let tan_width = tan_right - tan_left;
    let tan_height = match convention.y_axis {
        YAxis::Down => tan_down - tan_up,
        YAxis::Up => tan_up - tan_down,
    };
    let offset_z = match convention.z_range {
        ZRange::NegativeOneToOne => near,
        ZRange::ZeroToOne => 0.0,
    };

    let rows = [
        [
            2.0 / tan_width,
            0.0,
            (tan_right + tan_left) / tan_width,
            0.0,
        ],
        [
            0.0,
            2.0 / tan_height,
            (tan_up + tan_down) / tan_height,
            0.0,
        ],
        [
            0.0,
            0.0,
            -(far + offset_z) / (far - near),
            -(far * (near + offset_z)) / (far - near),
        ],
        [0.0, 0.0, -1.0, 0.0],
    ];

    // glam stores columns; build from rows and transpose.
    Mat4::from_cols_array_2d(&rows).transpose()
}

/// Projection from FOV half-angle magnitudes.
///
/// `left` and `down` are negated before taking tangents, turning magnitudes
/// into signed edge tangents for [`projection_from_tangents`]. Degenerate
/// angles are not rejected; see [`FovAngles::is_degenerate`].
pub fn projection_from_fov(fov: FovAngles, planes: ClipPlanes, convention: ClipConvention) -> Mat4 {
    let tan_left = (-fov.left).tan();
    let tan_right = fov.right.tan();
    let tan_up = fov.up.tan();
    let tan_down = (-fov.down).tan();
    projection_from_tangents(tan_left, tan_right, tan_up, tan_down, planes, convention)
}
