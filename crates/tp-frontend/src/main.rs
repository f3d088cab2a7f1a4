//! Time Passing viewer entry point

use std::path::PathBuf;

use tp_core::SceneConfig;

fn main() -> eframe::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tp_frontend=debug,tp_renderer=debug,tp_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Time Passing");

    // Optional first argument: RON scene configuration
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = SceneConfig::load_or_default(config_path.as_deref());

    // Use DX12 on Windows to avoid AMD Vulkan driver freeze issues
    let wgpu_options = egui_wgpu::WgpuConfiguration {
        wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
            instance_descriptor: wgpu::InstanceDescriptor {
                #[cfg(target_os = "windows")]
                backends: wgpu::Backends::DX12,
                #[cfg(not(target_os = "windows"))]
                backends: wgpu::Backends::all(),
                ..Default::default()
            },
            power_preference: wgpu::PowerPreference::HighPerformance,
            device_descriptor: std::sync::Arc::new(|adapter| wgpu::DeviceDescriptor {
                label: Some("tp device"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
            }),
            ..Default::default()
        }),
        ..Default::default()
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Beauty of Time Passing"),
        wgpu_options,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "tp",
        native_options,
        Box::new(|cc| Ok(Box::new(tp_frontend::TimePassingApp::new(cc, config)))),
    )
}
