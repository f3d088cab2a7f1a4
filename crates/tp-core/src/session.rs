//! Session context and the per-frame update
//!
//! [`SessionContext`] owns every piece of per-session state: scene graph,
//! anchors, clocks, animated uniforms, readiness, viewport and the asset
//! loading aggregator. The frame loop calls [`SessionContext::update_frame`]
//! once per tick.

use std::time::{Duration, Instant};

use glam::Vec3;

use crate::anchor::AnchorSet;
use crate::clock::{FrameClock, RenderClock};
use crate::config::{LoadingConfig, SceneConfig, hex_to_rgb};
use crate::loading::{
    ImageData, LoadHandle, LoadedAsset, LoadingManager, TextureSlot, VideoFrames, load_environment,
    load_model, load_texture, load_video, rasterize_title,
};
use crate::matcap::MatcapCycler;
use crate::primitive::generate_plane_mesh;
use crate::projection::CameraView;
use crate::scene::build::{DirectionalLight, SceneHandles, build_scene, insert_model};
use crate::scene::SceneGraph;
use crate::uniforms::{AnimatedMaterial, AnimatedUniform, UniformDriver};
use crate::viewport::Viewport;
use crate::visibility::{LabelSink, LabelUpdate, resolve_labels};

/// Session-wide readiness; only ever moves from `Loading` to `Ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
}

/// Timer-driven transitions after all assets finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessEvent {
    /// Loading bar hidden and overlay fade started
    LoadingBarEnded,
    BecameReady,
}

/// Readiness state machine
#[derive(Debug, Clone)]
pub struct Readiness {
    state: SessionState,
    loaded_at: Option<Instant>,
    bar_ended: bool,
    overlay_start: Duration,
    ready_delay: Duration,
}

impl Readiness {
    pub fn new(config: &LoadingConfig) -> Self {
        Self {
            state: SessionState::Loading,
            loaded_at: None,
            bar_ended: false,
            overlay_start: Duration::from_millis(config.overlay_start_ms),
            ready_delay: Duration::from_millis(config.ready_delay_ms),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn bar_ended(&self) -> bool {
        self.bar_ended
    }

    /// Record the all-loaded signal; later calls are ignored
    pub fn mark_loaded(&mut self, now: Instant) {
        if self.loaded_at.is_none() {
            self.loaded_at = Some(now);
        }
    }

    /// Fire any transitions whose delay has passed
    pub fn poll(&mut self, now: Instant) -> Vec<ReadinessEvent> {
        let mut events = Vec::new();
        let Some(loaded_at) = self.loaded_at else {
            return events;
        };
        let since = now.saturating_duration_since(loaded_at);

        if !self.bar_ended && since >= self.overlay_start {
            self.bar_ended = true;
            events.push(ReadinessEvent::LoadingBarEnded);
        }
        if self.state == SessionState::Loading && since >= self.ready_delay {
            self.state = SessionState::Ready;
            events.push(ReadinessEvent::BecameReady);
        }
        events
    }

    /// Instant the overlay fade started, if it has
    fn fade_origin(&self) -> Option<Instant> {
        self.loaded_at
            .filter(|_| self.bar_ended)
            .map(|t| t + self.overlay_start)
    }
}

/// Alpha of the black loading overlay
#[derive(Debug, Clone, Copy)]
pub struct OverlayFade {
    started_at: Option<Instant>,
    delay: f32,
    duration: f32,
}

impl OverlayFade {
    pub fn new(config: &LoadingConfig) -> Self {
        Self {
            started_at: None,
            delay: config.fade_delay_secs,
            duration: config.fade_duration_secs,
        }
    }

    pub fn start(&mut self, at: Instant) {
        self.started_at.get_or_insert(at);
    }

    /// 1 until the fade starts, then eased (power1.out) down to 0
    pub fn alpha(&self, now: Instant) -> f32 {
        let Some(start) = self.started_at else {
            return 1.0;
        };
        let t = now.saturating_duration_since(start).as_secs_f32() - self.delay;
        if t <= 0.0 {
            return 1.0;
        }
        let p = if self.duration > 0.0 {
            (t / self.duration).min(1.0)
        } else {
            1.0
        };
        let eased = 1.0 - (1.0 - p) * (1.0 - p);
        1.0 - eased
    }
}

/// Camera with per-frame controls, updated before labels are resolved
pub trait CameraControls {
    /// Match the projection to a new viewport aspect ratio
    fn set_aspect(&mut self, aspect: f32);

    /// Advance damping by `dt` seconds and return the resulting view
    fn update(&mut self, dt: f32) -> CameraView;
}

/// Texture data waiting to be uploaded to the GPU
#[derive(Debug, Clone)]
pub struct TextureUpload {
    pub slot: TextureSlot,
    pub image: ImageData,
}

/// Summary of one [`SessionContext::update_frame`]
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub elapsed: f32,
    pub dt: f32,
    pub state: SessionState,
    pub camera: CameraView,
    pub overlay_alpha: f32,
    pub progress: f32,
    pub uniforms_written: usize,
    /// Empty while loading
    pub labels: Vec<LabelUpdate>,
}

/// All per-session state
pub struct SessionContext {
    pub config: SceneConfig,
    pub scene: SceneGraph,
    pub anchors: AnchorSet,
    pub handles: SceneHandles,
    pub light: DirectionalLight,
    pub uniforms: UniformDriver,
    pub viewport: Viewport,
    pub matcap: MatcapCycler,
    pub env_map_intensity: f32,
    clock: RenderClock,
    frame_clock: FrameClock,
    readiness: Readiness,
    overlay: OverlayFade,
    loading: LoadingManager,
    matcap_load: Option<LoadHandle<LoadedAsset>>,
    videos: Vec<Option<VideoFrames>>,
    video_frames_shown: Vec<Option<usize>>,
    uploads: Vec<TextureUpload>,
}

impl SessionContext {
    /// Build the scene without starting any asset loads
    pub fn new(config: SceneConfig) -> Self {
        let built = build_scene(&config);

        let mut uniforms = UniformDriver::new();
        uniforms.register(AnimatedMaterial::ProjectorLight, AnimatedUniform::timed());
        uniforms.register(
            AnimatedMaterial::GlassBrickLight,
            AnimatedUniform::timed().with_colors(
                hex_to_rgb(config.glass_bricks.light_color_start),
                hex_to_rgb(config.glass_bricks.light_color_end),
            ),
        );

        let video_count = config.assets.videos.len();
        Self {
            scene: built.graph,
            anchors: built.anchors,
            handles: built.handles,
            light: built.light,
            uniforms,
            viewport: Viewport::default(),
            matcap: MatcapCycler::new(&config.matcap),
            env_map_intensity: config.env_map_intensity,
            clock: RenderClock::new(),
            frame_clock: FrameClock::new(),
            readiness: Readiness::new(&config.loading),
            overlay: OverlayFade::new(&config.loading),
            loading: LoadingManager::new(),
            matcap_load: None,
            videos: vec![None; video_count],
            video_frames_shown: vec![None; video_count],
            uploads: Vec::new(),
            config,
        }
    }

    /// Build the scene and start loading every configured asset
    pub fn start(config: SceneConfig) -> Self {
        let mut session = Self::new(config);
        session.start_loads();
        session
    }

    fn start_loads(&mut self) {
        let config = &self.config;

        let model_path = config.resolve(&config.assets.model);
        self.loading.track(LoadHandle::spawn("model", move || {
            load_model(&model_path).map(LoadedAsset::Model)
        }));

        let baked_path = config.resolve(&config.assets.baked_texture);
        self.loading.track(LoadHandle::spawn("baked texture", move || {
            load_texture(&baked_path).map(|image| LoadedAsset::Texture(TextureSlot::Baked, image))
        }));

        let env_path = config.resolve(&config.assets.environment_map);
        self.loading.track(LoadHandle::spawn("environment map", move || {
            load_environment(&env_path)
                .map(|image| LoadedAsset::Texture(TextureSlot::Environment, image))
        }));

        let font_path = config.resolve(&config.assets.font);
        let text = config.title.text.clone();
        let pixel_height = config.title.pixel_height;
        self.loading.track(LoadHandle::spawn("title", move || {
            rasterize_title(&font_path, &text, pixel_height)
                .map(|(image, aspect)| LoadedAsset::Title { image, aspect })
        }));

        for (i, video) in config.assets.videos.iter().enumerate() {
            let path = config.resolve(video);
            self.loading.track(LoadHandle::spawn(format!("video {}", i), move || {
                load_video(&path).map(|frames| LoadedAsset::Video(i, frames))
            }));
        }

        let matcap_path = config.resolve(&self.matcap.path());
        self.loading.track(LoadHandle::spawn("matcap", move || {
            load_texture(&matcap_path).map(|image| LoadedAsset::Texture(TextureSlot::Matcap, image))
        }));
    }

    pub fn state(&self) -> SessionState {
        self.readiness.state()
    }

    pub fn loading_progress(&self) -> f32 {
        self.loading.progress()
    }

    pub fn loading_bar_ended(&self) -> bool {
        self.readiness.bar_ended()
    }

    pub fn fps(&self) -> f32 {
        self.frame_clock.fps()
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.frame_clock.frame_time_ms()
    }

    /// Drain pending texture uploads for the renderer
    pub fn take_uploads(&mut self) -> Vec<TextureUpload> {
        std::mem::take(&mut self.uploads)
    }

    /// Track an externally created load (used by tests and reload paths)
    pub fn track_load(&mut self, handle: LoadHandle<LoadedAsset>) {
        self.loading.track(handle);
    }

    /// Apply a viewport resize; the next frame's projection picks it up
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        if self.viewport.resize(width, height, device_pixel_ratio) {
            tracing::debug!(
                "Viewport resized to {}x{} @{}",
                self.viewport.width,
                self.viewport.height,
                self.viewport.pixel_ratio()
            );
        }
    }

    /// Set the environment-map intensity on every tagged node
    pub fn set_env_map_intensity(&mut self, intensity: f32) {
        self.env_map_intensity = intensity;
        self.scene.apply_env_map_intensity(intensity);
    }

    /// Move a point of interest; the marker follows and the label keeps its offset
    pub fn set_anchor_location(&mut self, index: usize, location: Vec3) {
        let Some(marker) = self.anchors.set_location(index, location) else {
            return;
        };
        if let Some(node) = self.scene.get_mut(marker) {
            node.transform.position = location.to_array();
        }
    }

    /// Step the matcap index and reload its texture
    pub fn cycle_matcap(&mut self, forward: bool) -> u32 {
        let index = if forward {
            self.matcap.next()
        } else {
            self.matcap.previous()
        };
        let path = self.matcap.path();
        tracing::info!("{}", path);

        let resolved = self.config.resolve(&path);
        self.matcap_load = Some(LoadHandle::spawn("matcap", move || {
            load_texture(&resolved).map(|image| LoadedAsset::Texture(TextureSlot::Matcap, image))
        }));
        index
    }

    /// Single join point for finished loads
    pub fn poll_assets(&mut self, now: Instant) {
        let poll = self.loading.poll();
        for asset in poll.loaded {
            self.apply_asset(asset);
        }
        if poll.all_complete {
            self.readiness.mark_loaded(now);
        }

        if let Some(handle) = self.matcap_load.as_mut() {
            match handle.take() {
                Some(Ok(asset)) => {
                    self.apply_asset(asset);
                    self.matcap_load = None;
                }
                Some(Err(e)) => {
                    tracing::warn!("Failed to load matcap: {}", e);
                    self.matcap_load = None;
                }
                None => {}
            }
        }
    }

    fn apply_asset(&mut self, asset: LoadedAsset) {
        match asset {
            LoadedAsset::Model(model) => {
                let root = insert_model(&mut self.scene, &self.config.model, model);
                self.handles.model = Some(root);
                self.scene.apply_env_map_intensity(self.env_map_intensity);
            }
            LoadedAsset::Texture(slot, image) => {
                self.uploads.push(TextureUpload { slot, image });
            }
            LoadedAsset::Video(index, frames) => {
                if let Some(slot) = self.videos.get_mut(index) {
                    *slot = Some(frames);
                }
            }
            LoadedAsset::Title { image, aspect } => {
                let height = self.config.title.world_height;
                if let Some(title) = self.handles.title.and_then(|id| self.scene.get_mut(id)) {
                    title.mesh = Some(generate_plane_mesh(height * aspect, height).shared());
                }
                self.uploads.push(TextureUpload {
                    slot: TextureSlot::Title,
                    image,
                });
            }
        }
    }

    fn advance_videos(&mut self, elapsed: f32) {
        for (index, video) in self.videos.iter().enumerate() {
            let Some(video) = video else { continue };
            let frame = video.frame_index_at(elapsed);
            if self.video_frames_shown[index] == Some(frame) {
                continue;
            }
            if let Some(image) = video.frame(frame) {
                self.uploads.push(TextureUpload {
                    slot: TextureSlot::Video(index),
                    image: image.clone(),
                });
                self.video_frames_shown[index] = Some(frame);
            }
        }
    }

    /// One frame: join finished loads, advance readiness and clocks, update
    /// the camera, publish animated uniforms and, once ready, resolve labels.
    pub fn update_frame(
        &mut self,
        now: Instant,
        controls: &mut dyn CameraControls,
        labels: &mut dyn LabelSink,
    ) -> FrameReport {
        self.poll_assets(now);
        for event in self.readiness.poll(now) {
            match event {
                ReadinessEvent::LoadingBarEnded => {
                    if let Some(origin) = self.readiness.fade_origin() {
                        self.overlay.start(origin);
                    }
                    tracing::debug!("Loading bar ended, overlay fading");
                }
                ReadinessEvent::BecameReady => tracing::info!("Scene ready"),
            }
        }

        let elapsed = self.clock.tick(now);
        let frame = self.frame_clock.tick(now);

        controls.set_aspect(self.viewport.aspect());
        let camera = controls.update(frame.dt);

        let uniforms_written = self.uniforms.publish(elapsed);
        self.advance_videos(elapsed);
        self.scene.update_world_transforms();

        let labels = if self.readiness.is_ready() {
            resolve_labels(&self.anchors, &camera, &self.scene, &self.viewport, labels)
        } else {
            Vec::new()
        };

        FrameReport {
            elapsed,
            dt: frame.dt,
            state: self.readiness.state(),
            camera,
            overlay_alpha: self.overlay.alpha(now),
            progress: self.loading.progress(),
            uniforms_written,
            labels,
        }
    }
}
