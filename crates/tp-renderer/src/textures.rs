//! GPU textures for the scene's texture slots
//!
//! Decoded images arrive as [`TextureUpload`]s. A slot keeps its texture
//! while the size and format stay the same (video frames overwrite in
//! place); anything else allocates a new texture and bumps the generation so
//! bind groups referencing the old one are rebuilt.

use std::collections::HashMap;

use tp_core::{ImageData, Pixels, TextureSlot, TextureUpload};

/// A texture plus its default view
pub struct GpuTexture {
    #[allow(dead_code)] // Held for GPU resource lifetime
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
}

impl GpuTexture {
    fn create(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
            format,
        }
    }

    fn write(&self, queue: &wgpu::Queue, bytes: &[u8], bytes_per_row: u32) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Default view
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// GPU format, row pitch and raw bytes of a decoded image.
///
/// Returns `None` when the pixel buffer does not match the dimensions.
pub fn texel_layout(image: &ImageData) -> Option<(wgpu::TextureFormat, u32, &[u8])> {
    if image.width == 0 || image.height == 0 {
        return None;
    }
    let texels = image.width as usize * image.height as usize;
    match &image.pixels {
        Pixels::Srgba8(bytes) if bytes.len() == texels * 4 => Some((
            wgpu::TextureFormat::Rgba8UnormSrgb,
            image.width * 4,
            bytes.as_slice(),
        )),
        Pixels::Rgba32F(floats) if floats.len() == texels * 4 => Some((
            wgpu::TextureFormat::Rgba32Float,
            image.width * 16,
            bytemuck::cast_slice(floats.as_slice()),
        )),
        _ => None,
    }
}

fn slot_label(slot: TextureSlot) -> String {
    match slot {
        TextureSlot::Baked => "Baked Texture".to_string(),
        TextureSlot::Matcap => "Matcap Texture".to_string(),
        TextureSlot::Environment => "Environment Texture".to_string(),
        TextureSlot::Title => "Title Texture".to_string(),
        TextureSlot::Video(i) => format!("Video Texture {}", i),
    }
}

/// Textures by slot, with fallbacks for slots that never loaded
pub struct TextureStore {
    slots: HashMap<TextureSlot, GpuTexture>,
    white: GpuTexture,
    black_environment: GpuTexture,
    generation: u64,
}

impl TextureStore {
    /// Create the store with its 1x1 fallbacks
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white = GpuTexture::create(
            device,
            "Fallback White Texture",
            1,
            1,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        );
        white.write(queue, &[255, 255, 255, 255], 4);

        let black_environment = GpuTexture::create(
            device,
            "Fallback Environment Texture",
            1,
            1,
            wgpu::TextureFormat::Rgba32Float,
        );
        black_environment.write(queue, bytemuck::cast_slice(&[0.0f32, 0.0, 0.0, 1.0]), 16);

        Self {
            slots: HashMap::new(),
            white,
            black_environment,
            generation: 0,
        }
    }

    /// Incremented whenever a slot's texture object is replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a slot has received data
    pub fn contains(&self, slot: TextureSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Upload decoded pixels into a slot
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, upload: &TextureUpload) {
        let Some((format, bytes_per_row, bytes)) = texel_layout(&upload.image) else {
            tracing::warn!(
                "Skipping {:?} upload: {}x{} image has mismatched pixel data",
                upload.slot,
                upload.image.width,
                upload.image.height
            );
            return;
        };

        let (width, height) = (upload.image.width, upload.image.height);
        let reusable = self
            .slots
            .get(&upload.slot)
            .is_some_and(|t| t.width == width && t.height == height && t.format == format);

        if !reusable {
            let texture = GpuTexture::create(device, &slot_label(upload.slot), width, height, format);
            self.slots.insert(upload.slot, texture);
            self.generation += 1;
            tracing::debug!("Allocated {:?} texture {}x{} {:?}", upload.slot, width, height, format);
        }

        if let Some(texture) = self.slots.get(&upload.slot) {
            texture.write(queue, bytes, bytes_per_row);
        }
    }

    /// View for a color slot, white when the slot is empty or absent
    pub fn color_view(&self, slot: Option<TextureSlot>) -> &wgpu::TextureView {
        slot.and_then(|s| self.slots.get(&s))
            .filter(|t| t.format != wgpu::TextureFormat::Rgba32Float)
            .map_or(self.white.view(), GpuTexture::view)
    }

    /// View for the environment map, black when not loaded
    pub fn environment_view(&self) -> &wgpu::TextureView {
        self.slots
            .get(&TextureSlot::Environment)
            .filter(|t| t.format == wgpu::TextureFormat::Rgba32Float)
            .map_or(self.black_environment.view(), GpuTexture::view)
    }
}
