//! Scene nodes and their material assignment

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Transform;
use crate::mesh::SharedMesh;

/// Node identifier
pub type NodeId = Uuid;

/// Physical glass parameters (transmissive, environment-lit)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassParams {
    pub roughness: f32,
    pub transmission: f32,
    pub thickness: f32,
}

impl Default for GlassParams {
    fn default() -> Self {
        Self {
            roughness: 0.15,
            transmission: 1.0,
            thickness: 0.5,
        }
    }
}

/// How a node is shaded. The renderer picks its shader path from this.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MaterialKind {
    /// Not drawn (groups)
    #[default]
    None,
    /// Unlit, sampled from the baked lightmap texture
    Baked,
    /// Lit with the directional light and the environment map
    Standard { base_color: [f32; 4] },
    /// Animated projector surface driven by `uTime`
    ProjectorLight,
    /// Animated glass-brick glow driven by `uTime` and a color ramp
    GlassBrickLight,
    /// Transmissive glass
    Glass(GlassParams),
    /// Unlit, sampled from a video source
    Screen(usize),
    /// Shaded by the active matcap texture
    Matcap,
    /// View normal as color
    Normal,
    /// Vertex-colored line list
    Lines,
}

impl MaterialKind {
    pub fn is_drawable(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn is_transparent(&self) -> bool {
        matches!(
            self,
            Self::Glass(_) | Self::ProjectorLight | Self::GlassBrickLight
        )
    }

    /// Whether the material reads the shared time uniform
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::ProjectorLight | Self::GlassBrickLight)
    }
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub transform: Transform,
    pub mesh: Option<SharedMesh>,
    pub material: MaterialKind,
    pub visible: bool,
    /// Whether occlusion rays test this node's mesh
    pub raycastable: bool,
    pub double_sided: bool,
    /// Receives environment-map intensity updates
    pub env_intensity_target: bool,
    pub env_map_intensity: f32,
}

impl SceneNode {
    /// Empty group node
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent: None,
            transform: Transform::IDENTITY,
            mesh: None,
            material: MaterialKind::None,
            visible: true,
            raycastable: false,
            double_sided: false,
            env_intensity_target: false,
            env_map_intensity: 1.0,
        }
    }

    /// Drawable node; raycastable unless it is a line helper
    pub fn mesh(name: impl Into<String>, mesh: SharedMesh, material: MaterialKind) -> Self {
        Self {
            mesh: Some(mesh),
            material,
            raycastable: material != MaterialKind::Lines,
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn env_intensity_target(mut self) -> Self {
        self.env_intensity_target = true;
        self
    }

    pub fn not_raycastable(mut self) -> Self {
        self.raycastable = false;
        self
    }
}
