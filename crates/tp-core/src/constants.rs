//! Global constants for tp-core

/// Default number of latitude segments for sphere mesh generation
pub const SPHERE_LAT_SEGMENTS: u32 = 10;

/// Default number of longitude segments for sphere mesh generation
pub const SPHERE_LON_SEGMENTS: u32 = 10;

/// Upper bound applied to the device pixel ratio when sizing the output
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Label selector prefix; anchor `n` is addressed as `.point-n`
pub const LABEL_SELECTOR_PREFIX: &str = ".point-";

/// Smallest frame delta reported by the frame clock (seconds)
pub const MIN_FRAME_DELTA: f32 = 0.0001;

/// Largest frame delta reported by the frame clock (seconds)
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Triangle determinant threshold below which a ray counts as parallel
pub const RAY_EPSILON: f32 = 1e-7;
