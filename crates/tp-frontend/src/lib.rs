//! Time Passing Frontend
//!
//! eframe application hosting the scene: offscreen viewport, point-of-interest
//! labels, loading bar and the debug-parameter panel.

pub mod actions;
pub mod app;
pub mod panels;
pub mod state;
pub mod theme;

pub use app::TimePassingApp;
pub use state::{AppState, SceneAction, SharedAppState, SharedViewportState, ViewportState};
