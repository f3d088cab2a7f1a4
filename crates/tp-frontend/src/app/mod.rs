//! Main application module

mod input;

use std::sync::Arc;

use parking_lot::Mutex;

use tp_core::SceneConfig;
use tp_renderer::RendererConfig;

use crate::actions::{ActionContext, dispatch_action};
use crate::panels::{DebugPanel, Panel, ViewportPanel};
use crate::state::{SharedAppState, SharedViewportState, ViewportState, create_shared_state};

pub use input::keyboard_actions;

/// Main application
pub struct TimePassingApp {
    app_state: SharedAppState,
    viewport_state: Option<SharedViewportState>,
    debug_panel: DebugPanel,
    viewport_panel: ViewportPanel,
}

impl TimePassingApp {
    /// Create the app and start loading the scene
    pub fn new(cc: &eframe::CreationContext<'_>, config: SceneConfig) -> Self {
        crate::theme::apply_theme(&cc.egui_ctx);

        // Create viewport state if WGPU is available
        let viewport_state = cc.wgpu_render_state.as_ref().map(|render_state| {
            let device = Arc::new(render_state.device.clone());
            let queue = Arc::new(render_state.queue.clone());
            let format = render_state.target_format;

            Arc::new(Mutex::new(ViewportState::new(
                device,
                queue,
                format,
                &config.camera,
                RendererConfig::default(),
            )))
        });
        if viewport_state.is_none() {
            tracing::warn!("No wgpu render state, the scene will not be drawn");
        }

        Self {
            app_state: create_shared_state(config),
            viewport_state,
            debug_panel: DebugPanel::new(),
            viewport_panel: ViewportPanel::new(),
        }
    }

    /// Process pending actions
    fn process_actions(&mut self) {
        let actions = self.app_state.lock().take_pending_actions();
        let ctx = ActionContext::new(&self.app_state, &self.viewport_state);

        for action in actions {
            dispatch_action(action, &ctx);
        }
    }
}

impl eframe::App for TimePassingApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Keyboard shortcuts are ignored while a widget has focus
        if ctx.memory(|m| m.focused().is_none()) {
            let actions = ctx.input(|i| keyboard_actions(&i.events));
            let mut app = self.app_state.lock();
            for action in actions {
                app.queue_action(action);
            }
        }

        self.process_actions();

        egui::SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading(self.debug_panel.name());
                self.debug_panel.ui(ui, &self.app_state);
            });

        let render_state = frame.wgpu_render_state();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| match (render_state, &self.viewport_state) {
                (Some(render_state), Some(viewport_state)) => self
                    .viewport_panel
                    .ui_with_render_context(ui, &self.app_state, render_state, viewport_state),
                _ => self.viewport_panel.ui(ui, &self.app_state),
            });

        // The scene animates continuously
        ctx.request_repaint();
    }
}
