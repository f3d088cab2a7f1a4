//! Time Passing core
//!
//! GPU-free model of the "Beauty of Time Passing" scene:
//! - Config: one serializable scene description
//! - Scene: retained-mode scene graph, primitives and scene construction
//! - Raycast / projection: occlusion rays and NDC conversion
//! - Clock / uniforms: elapsed time and animated shader parameters
//! - Visibility: point-of-interest label resolution
//! - Session: per-session state and the per-frame update
//! - Loading: asynchronous asset decoding with a polled join point

pub mod anchor;
pub mod clock;
pub mod config;
pub mod constants;
pub mod loading;
pub mod matcap;
pub mod mesh;
pub mod primitive;
pub mod projection;
pub mod raycast;
pub mod scene;
pub mod session;
pub mod uniforms;
pub mod viewport;
pub mod visibility;

pub use anchor::{Anchor, AnchorSet};
pub use clock::{FrameClock, FrameTime, RenderClock};
pub use config::{ConfigError, SceneConfig};
pub use loading::{AssetError, ImageData, LoadHandle, LoadedAsset, LoadingManager, Pixels, TextureSlot};
pub use matcap::MatcapCycler;
pub use mesh::{CpuMesh, SharedMesh};
pub use projection::CameraView;
pub use raycast::{Intersection, Ray};
pub use scene::build::{DirectionalLight, SceneHandles};
pub use scene::{BoundingBox, GlassParams, MaterialKind, NodeId, SceneGraph, SceneNode, Transform};
pub use session::{
    CameraControls, FrameReport, OverlayFade, Readiness, SessionContext, SessionState, TextureUpload,
};
pub use uniforms::{AnimatedMaterial, AnimatedUniform, UniformDriver};
pub use viewport::Viewport;
pub use visibility::{LabelSink, LabelUpdate};
