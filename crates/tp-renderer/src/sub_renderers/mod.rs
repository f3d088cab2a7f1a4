//! Sub-renderers drawn by the main render pass, in order:
//!
//! - [`scene::SceneRenderer`]: scene-graph meshes, opaque then blended
//! - [`axis::AxisRenderer`]: the axes helper
//! - [`overlay::OverlayRenderer`]: the fading loading overlay

pub mod axis;
pub mod overlay;
pub mod scene;

pub use axis::{AxisInstance, AxisRenderer};
pub use overlay::{OverlayRenderer, OverlayUniform};
pub use scene::{DrawItem, MaterialTextures, NodeUniform, PipelineKind, SceneRenderer};
