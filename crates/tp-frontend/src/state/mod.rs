//! Application state module

mod labels;
mod viewport;

pub use labels::{Label, LabelOverlay};
pub use viewport::{SharedViewportState, ViewportState};

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;

use tp_core::{SceneConfig, SessionContext, Transform};

/// Edits requested by the UI, applied at the start of the next frame
#[derive(Debug, Clone, PartialEq)]
pub enum SceneAction {
    /// Show or hide the axes helper
    SetAxesVisible(bool),
    /// Move the 3D title
    SetTitleTransform(Transform),
    /// Move a laptop screen
    SetScreenTransform { index: usize, transform: Transform },
    /// Move a glass brick column
    SetBrickGroupTransform { index: usize, transform: Transform },
    /// Move a point-of-interest marker; its label anchor follows
    SetPointOfInterest { index: usize, location: Vec3 },
    /// Reposition the camera eye
    SetCameraPosition(Vec3),
    /// Environment-map intensity on tagged materials
    SetEnvMapIntensity(f32),
    /// Step the title matcap
    CycleMatcap { forward: bool },
}

/// Per-frame readout for the stats folder
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub draw_count: usize,
}

/// Application state
pub struct AppState {
    /// Scene, clocks and loading for this session
    pub session: SessionContext,
    /// Point-of-interest label state
    pub labels: LabelOverlay,
    /// Camera eye as of the last frame
    pub camera_position: Vec3,
    /// Last frame's timing
    pub stats: FrameStats,
    /// Pending actions
    pending_actions: Vec<SceneAction>,
}

impl AppState {
    /// Build the scene and start loading its assets
    pub fn new(config: SceneConfig) -> Self {
        let session = SessionContext::start(config);
        let labels = LabelOverlay::from_anchors(&session.anchors);
        let camera_position = Vec3::from_array(session.config.camera.position);
        Self {
            session,
            labels,
            camera_position,
            stats: FrameStats::default(),
            pending_actions: Vec::new(),
        }
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: SceneAction) {
        self.pending_actions.push(action);
    }

    /// Take pending actions
    pub fn take_pending_actions(&mut self) -> Vec<SceneAction> {
        std::mem::take(&mut self.pending_actions)
    }
}

/// Shared application state
pub type SharedAppState = Arc<Mutex<AppState>>;

/// Create the shared state for a scene configuration
pub fn create_shared_state(config: SceneConfig) -> SharedAppState {
    Arc::new(Mutex::new(AppState::new(config)))
}
