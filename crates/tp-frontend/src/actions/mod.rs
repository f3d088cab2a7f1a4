//! Action handling module
//!
//! Panel and keyboard edits are queued as [`SceneAction`]s in the app state
//! and dispatched here at the start of each frame.

mod scene;

use crate::state::{SceneAction, SharedAppState, SharedViewportState};

pub use scene::apply_scene_action;

/// Context for action handlers
pub struct ActionContext<'a> {
    pub app_state: &'a SharedAppState,
    pub viewport_state: &'a Option<SharedViewportState>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        app_state: &'a SharedAppState,
        viewport_state: &'a Option<SharedViewportState>,
    ) -> Self {
        Self {
            app_state,
            viewport_state,
        }
    }
}

/// Dispatch an action to the appropriate handler
pub fn dispatch_action(action: SceneAction, ctx: &ActionContext) {
    match action {
        SceneAction::SetCameraPosition(position) => {
            if let Some(viewport_state) = ctx.viewport_state {
                viewport_state.lock().camera.set_position(position);
            }
        }
        action => {
            let mut app = ctx.app_state.lock();
            if !apply_scene_action(&mut app.session, &action) {
                tracing::debug!("Ignored {:?}", action);
            }
        }
    }
}
