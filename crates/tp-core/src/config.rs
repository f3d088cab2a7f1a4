//! Scene configuration
//!
//! One `SceneConfig` describes everything that differs between scene
//! variants: asset paths, colors, camera pose, anchor coordinates and
//! object placements. `Default` reproduces the shipped scene.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scene::{GlassParams, Transform};

/// Complete scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Directory asset paths are resolved against
    pub asset_root: PathBuf,
    pub assets: AssetPaths,
    pub camera: CameraConfig,
    pub model: ModelConfig,
    pub glass_bricks: GlassBrickConfig,
    pub laptop_screens: Vec<ScreenConfig>,
    pub title: TitleConfig,
    pub points_of_interest: PointsOfInterestConfig,
    pub light: LightConfig,
    pub matcap: MatcapConfig,
    pub loading: LoadingConfig,
    pub env_map_intensity: f32,
    pub axes_size: f32,
    pub axes_visible: bool,
    pub tone_mapping_exposure: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            assets: AssetPaths::default(),
            camera: CameraConfig::default(),
            model: ModelConfig::default(),
            glass_bricks: GlassBrickConfig::default(),
            laptop_screens: vec![
                ScreenConfig {
                    video: 0,
                    transform: Transform::from_position([-1.631, -0.247, -0.583])
                        .with_rotation([0.0, 2.13, 0.0])
                        .with_uniform_scale(0.1),
                    ..ScreenConfig::default()
                },
                ScreenConfig {
                    video: 1,
                    transform: Transform::from_position([-1.44, -0.247, -2.419])
                        .with_rotation([0.0, 2.13, 0.0])
                        .with_uniform_scale(0.1),
                    ..ScreenConfig::default()
                },
            ],
            title: TitleConfig::default(),
            points_of_interest: PointsOfInterestConfig::default(),
            light: LightConfig::default(),
            matcap: MatcapConfig::default(),
            loading: LoadingConfig::default(),
            env_map_intensity: 1.0,
            axes_size: 3.0,
            axes_visible: false,
            tone_mapping_exposure: 3.0,
        }
    }
}

/// Paths of every loaded asset, relative to `asset_root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub model: String,
    pub baked_texture: String,
    pub environment_map: String,
    pub font: String,
    /// Looping frame sequences (animated GIF), indexed by `ScreenConfig::video`
    pub videos: Vec<String>,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            model: "/models/BeautyOfTimePassingNew/bakedWithoutGlassBricks/glb/BeautyOfTimePassing.glb"
                .to_string(),
            baked_texture: "./models/BeautyOfTimePassing/baked.jpg".to_string(),
            environment_map: "./textures/environmentMaps/empty_warehouse_01_2k.hdr".to_string(),
            font: "/fonts/Vollkorn-Regular.ttf".to_string(),
            videos: vec!["/videos/clear.gif".to_string(), "/videos/rain.gif".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Orbit damping factor applied per update
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            position: [3.595, 1.118, -1.75],
            target: [0.0, 0.0, 0.0],
            damping: 0.05,
        }
    }
}

/// Room model placement and the child names that receive special materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub transform: Transform,
    pub baked_node: String,
    pub projector_nodes: Vec<String>,
    /// Children whose name starts with this prefix get the glass-brick light material
    pub glass_brick_light_prefix: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            transform: Transform::from_position([1.5, -1.0, 0.0])
                .with_rotation([0.0, std::f32::consts::FRAC_PI_2, 0.0])
                .with_uniform_scale(0.1),
            baked_node: "baked".to_string(),
            projector_nodes: vec!["projectorLightA".to_string(), "projectorLightB".to_string()],
            glass_brick_light_prefix: "glassBrickLight".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassBrickConfig {
    /// Box width, length (stacking axis, Y) and depth
    pub size: [f32; 3],
    pub scale: f32,
    pub count: usize,
    /// Gap factor applied to the scaled length between stacked bricks
    pub spacing: f32,
    pub material: GlassParams,
    /// One column per entry
    pub groups: Vec<Transform>,
    pub light_color_start: u32,
    pub light_color_end: u32,
}

impl GlassBrickConfig {
    /// Vertical distance between consecutive bricks of a column
    pub fn pitch(&self) -> f32 {
        self.size[1] * self.spacing * self.scale
    }
}

impl Default for GlassBrickConfig {
    fn default() -> Self {
        Self {
            size: [0.8, 1.9, 0.9],
            scale: 0.099,
            count: 10,
            spacing: 1.03,
            material: GlassParams::default(),
            groups: vec![
                Transform::from_position([1.5, -0.9, 0.0]),
                Transform::from_position([0.597, -0.9, -0.654]).with_rotation([0.0, 2.736, 0.0]),
            ],
            light_color_start: 0x1d62ed,
            light_color_end: 0x039801,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Index into `AssetPaths::videos`
    pub video: usize,
    pub size: [f32; 2],
    pub transform: Transform,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            video: 0,
            size: [2.53, 1.65],
            transform: Transform::IDENTITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    pub text: String,
    /// Rasterized glyph height in pixels
    pub pixel_height: f32,
    /// Height of the text quad in world units
    pub world_height: f32,
    pub transform: Transform,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            text: "Beauty of Time Passing".to_string(),
            pixel_height: 96.0,
            world_height: 0.13,
            transform: Transform::from_position([2.1, 1.6, 0.08])
                .with_rotation([0.0, std::f32::consts::PI, 0.0]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointOfInterest {
    /// Marker location; the label anchor sits at this plus the shared offset
    pub position: [f32; 3],
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsOfInterestConfig {
    pub offset: f32,
    pub marker_radius: f32,
    pub points: Vec<PointOfInterest>,
}

impl Default for PointOfInterest {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            label: String::new(),
        }
    }
}

impl Default for PointsOfInterestConfig {
    fn default() -> Self {
        let point = |position: [f32; 3], label: &str| PointOfInterest {
            position,
            label: label.to_string(),
        };
        Self {
            offset: 0.1,
            marker_radius: 0.03,
            points: vec![
                point([1.8, 0.3, -0.16], "Glass bricks"),
                point([0.82, 0.57, -0.65], "Window light"),
                point([1.06, -0.3, -1.15], "Desk"),
                point([-1.4, 0.1, -1.8], "Clear sky"),
                point([-1.15, -0.16, -2.6], "Rain"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 3.0,
            position: [0.25, 3.0, -2.25],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcapConfig {
    pub base: String,
    pub initial: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for MatcapConfig {
    fn default() -> Self {
        Self {
            base: "/textures/matcaps/".to_string(),
            initial: 3,
            min: 1,
            max: 12,
        }
    }
}

/// Timings of the post-load sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Delay between load completion and the overlay fade start (ms)
    pub overlay_start_ms: u64,
    /// Extra delay inside the fade before alpha starts dropping (s)
    pub fade_delay_secs: f32,
    pub fade_duration_secs: f32,
    /// Delay between load completion and label resolution (ms)
    pub ready_delay_ms: u64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            overlay_start_ms: 500,
            fade_delay_secs: 1.0,
            fade_duration_secs: 3.0,
            ready_delay_ms: 2000,
        }
    }
}

/// `0xRRGGBB` to RGB components in [0, 1], without color-space conversion
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

impl SceneConfig {
    /// Resolve an asset path against `asset_root`. Leading `/` and `./` are
    /// treated as relative to the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches("./").trim_start_matches('/');
        self.asset_root.join(relative)
    }

    /// Path of the matcap texture with the given index
    pub fn matcap_path(&self, index: u32) -> String {
        format!("{}{}.png", self.matcap.base, index)
    }

    /// Save config to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_bytes()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Serialize config to pretty RON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load config from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Load config from bytes
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, ConfigError> {
        let content =
            std::str::from_utf8(data).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Load from `path` if given, falling back to the default on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => {
                tracing::info!("Loaded scene config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}, using default scene", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Config-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_shipped_scene_parses() {
        let config = SceneConfig::load_from_bytes(include_bytes!("../../../assets/scene.ron"))
            .expect("shipped scene.ron must parse");
        assert_eq!(config.points_of_interest.points.len(), 5);
        assert_eq!(config.laptop_screens.len(), 2);
        assert_eq!(config.glass_bricks.light_color_start, 0x1d62ed);
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ron");
        let mut config = SceneConfig::default();
        config.camera.position = [1.0, 2.0, 3.0];
        config.save(&path).unwrap();
        assert_eq!(SceneConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = SceneConfig::load_from_bytes(b"(env_map_intensity: 2.5)").unwrap();
        assert_eq!(config.env_map_intensity, 2.5);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "not ron at all (").unwrap();
        assert_eq!(SceneConfig::load_or_default(Some(&path)), SceneConfig::default());
        assert!(matches!(SceneConfig::load(&path), Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_resolve_and_matcap_path() {
        let config = SceneConfig::default();
        assert_eq!(
            config.resolve("/videos/rain.gif"),
            PathBuf::from("assets/videos/rain.gif")
        );
        assert_eq!(
            config.resolve("./models/BeautyOfTimePassing/baked.jpg"),
            PathBuf::from("assets/models/BeautyOfTimePassing/baked.jpg")
        );
        assert_eq!(config.matcap_path(3), "/textures/matcaps/3.png");
    }

    #[test]
    fn test_hex_to_rgb() {
        let [r, g, b] = hex_to_rgb(0x1d62ed);
        assert_relative_eq!(r, 29.0 / 255.0);
        assert_relative_eq!(g, 98.0 / 255.0);
        assert_relative_eq!(b, 237.0 / 255.0);
    }

    #[test]
    fn test_brick_pitch() {
        let bricks = GlassBrickConfig::default();
        assert_relative_eq!(bricks.pitch(), 1.9 * 1.03 * 0.099);
    }
}
