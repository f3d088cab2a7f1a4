//! Rendering constants
//!
//! Magic numbers shared by the renderer's pipelines and resources.

/// Viewport constants
pub mod viewport {
    /// Depth buffer format used by every pipeline
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    /// Sample counts accepted for MSAA; anything else falls back to 1
    pub const SUPPORTED_SAMPLE_COUNTS: [u32; 2] = [1, 4];
}

/// Instance buffer capacities
pub mod instances {
    /// Maximum number of axes helpers drawn at once
    pub const MAX_AXES: u32 = 4;
}

/// Orbit camera limits
pub mod camera {
    /// Keeps the polar angle away from the poles so `look_at` stays defined
    pub const POLAR_EPSILON: f32 = 1e-4;
    /// Damping factors are expressed per frame at this rate
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Scale applied per scroll step before sensitivity
    pub const ZOOM_STEP: f32 = 0.95;
    /// Remaining pan/rotate velocity below which damping snaps to rest
    pub const REST_THRESHOLD: f32 = 1e-6;
}

/// Shader material modes, mirrored in `shaders/scene.wgsl`
pub mod material_mode {
    /// Unlit lightmap sample
    pub const BAKED: u32 = 0;
    /// Directional light plus environment
    pub const STANDARD: u32 = 1;
    /// Animated projector surface
    pub const PROJECTOR_LIGHT: u32 = 2;
    /// Animated glass-brick glow
    pub const GLASS_BRICK_LIGHT: u32 = 3;
    /// Environment-lit transmissive glass
    pub const GLASS: u32 = 4;
    /// Unlit video frame
    pub const SCREEN: u32 = 5;
    /// Matcap lookup masked by the title glyphs
    pub const MATCAP: u32 = 6;
    /// View-space normal as color
    pub const NORMAL: u32 = 7;
}
