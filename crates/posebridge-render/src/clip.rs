/// Direction of +Y in clip space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAxis {
    /// OpenGL, Direct3D, Metal.
    Up,
    /// Vulkan.
    Down,
}

/// Depth range of clip space after the perspective divide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZRange {
    /// `[-1, 1]`: OpenGL, OpenGL ES.
    NegativeOneToOne,
    /// `[0, 1]`: Vulkan, Direct3D, Metal.
    ZeroToOne,
}

/// Clip-space convention of the target graphics backend.
///
/// Resolved once by the rendering layer and passed in explicitly; nothing
/// here queries the active backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipConvention {
    pub y_axis: YAxis,
    pub z_range: ZRange,
}

impl ClipConvention {
    pub const OPENGL: Self = Self::new(YAxis::Up, ZRange::NegativeOneToOne);
    pub const VULKAN: Self = Self::new(YAxis::Down, ZRange::ZeroToOne);
    pub const DIRECT3D: Self = Self::new(YAxis::Up, ZRange::ZeroToOne);
    pub const METAL: Self = Self::new(YAxis::Up, ZRange::ZeroToOne);

    pub const fn new(y_axis: YAxis, z_range: ZRange) -> Self {
        Self { y_axis, z_range }
    }
}

/// Near and far clip distances for one class of content.
///
/// Which pair to use is the renderer's decision; the builders never assume one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlanes {
    pub near: f32,
    pub far: f32,
}

impl ClipPlanes {
    /// Close-up content such as a cockpit interior.
    pub const COCKPIT: Self = Self::new(0.01, 1000.0);
    /// Distant scenery.
    pub const SCENERY: Self = Self::new(1.0, 75000.0);

    pub const fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }
}
