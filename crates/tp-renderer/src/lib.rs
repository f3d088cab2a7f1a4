//! Time Passing Renderer
//!
//! WGPU-based rendering of the Time Passing scene graph.
//!
//! # Module Structure
//!
//! ```text
//! tp-renderer/
//! ├── buffers.rs       # Instance and uniform buffer helpers
//! ├── camera.rs        # Damped orbit camera
//! ├── config.rs        # Renderer settings
//! ├── pipeline.rs      # Pipeline builder
//! ├── textures.rs      # Texture slots and fallbacks
//! ├── sub_renderers/   # Scene meshes, axes helper, loading overlay
//! └── renderer/        # Main Renderer, lighting, render pass
//! ```

pub mod buffers;
pub mod camera;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod renderer;
pub mod sub_renderers;
pub mod textures;
pub mod vertex;

pub use camera::{CameraUniform, OrbitCamera};
pub use config::{ControlsConfig, LightingConfig, RendererConfig, ViewportConfig};
pub use renderer::{FrameInputs, Renderer};
pub use textures::TextureStore;
