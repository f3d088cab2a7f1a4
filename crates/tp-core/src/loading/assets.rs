//! Asset decoders: glTF models, textures, HDR environment maps,
//! animated GIF frame sequences and rasterized title text.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glam::{Mat3, Mat4, Vec3};
use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

use crate::mesh::CpuMesh;

/// Asset-loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("No mesh data in {0}")]
    MissingMesh(String),
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Where a decoded texture is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Baked,
    Matcap,
    /// Equirectangular HDR map
    Environment,
    Title,
    Video(usize),
}

/// Pixel storage of a decoded image
#[derive(Debug, Clone, PartialEq)]
pub enum Pixels {
    /// sRGB-encoded RGBA8
    Srgba8(Vec<u8>),
    /// Linear RGBA32F (HDR)
    Rgba32F(Vec<f32>),
}

/// Decoded image, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Pixels,
}

impl ImageData {
    /// 1x1 image of one color
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: Pixels::Srgba8(rgba.to_vec()),
        }
    }

    fn from_rgba8(image: image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: Pixels::Srgba8(image.into_raw()),
        }
    }
}

/// Looping frame sequence standing in for a video
#[derive(Debug, Clone)]
pub struct VideoFrames {
    frames: Vec<ImageData>,
    /// End time of each frame in seconds, cumulative
    ends: Vec<f32>,
}

impl VideoFrames {
    /// Build from frames and their display durations in seconds.
    /// Non-positive durations are shown for one 1/30 s tick.
    pub fn new(frames: Vec<(ImageData, f32)>) -> Self {
        let mut ends = Vec::with_capacity(frames.len());
        let mut images = Vec::with_capacity(frames.len());
        let mut t = 0.0;
        for (image, duration) in frames {
            t += if duration > 0.0 { duration } else { 1.0 / 30.0 };
            ends.push(t);
            images.push(image);
        }
        Self {
            frames: images,
            ends,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn duration(&self) -> f32 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    /// Index of the frame shown at `elapsed` seconds, looping
    pub fn frame_index_at(&self, elapsed: f32) -> usize {
        let duration = self.duration();
        if self.frames.is_empty() || duration <= 0.0 {
            return 0;
        }
        let t = elapsed.rem_euclid(duration);
        self.ends
            .partition_point(|&end| end <= t)
            .min(self.frames.len() - 1)
    }

    pub fn frame(&self, index: usize) -> Option<&ImageData> {
        self.frames.get(index)
    }
}

/// One named mesh of a model, positioned in model space
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub mesh: CpuMesh,
    pub base_color: [f32; 4],
}

#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub parts: Vec<ModelPart>,
}

/// A finished load
#[derive(Debug, Clone)]
pub enum LoadedAsset {
    Model(ModelData),
    Texture(TextureSlot, ImageData),
    Video(usize, VideoFrames),
    Title { image: ImageData, aspect: f32 },
}

fn decode_err(path: &Path, e: impl std::fmt::Display) -> AssetError {
    AssetError::Decode(format!("{}: {}", path.display(), e))
}

/// Load a glTF/GLB model, flattening every mesh node into model space.
///
/// Nodes whose primitives carry no readable positions (for example
/// Draco-compressed ones) are skipped.
pub fn load_model(path: &Path) -> Result<ModelData, AssetError> {
    let (doc, buffers, _images) = gltf::import(path).map_err(|e| decode_err(path, e))?;

    let scene = doc
        .default_scene()
        .or_else(|| doc.scenes().next())
        .ok_or_else(|| AssetError::MissingMesh(path.display().to_string()))?;

    let mut model = ModelData::default();
    let mut stack: Vec<(gltf::Node, Mat4)> =
        scene.nodes().map(|n| (n, Mat4::IDENTITY)).collect();

    while let Some((node, parent)) = stack.pop() {
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        if let Some(mesh) = node.mesh() {
            let name = node
                .name()
                .or_else(|| mesh.name())
                .unwrap_or_default()
                .to_string();
            if let Some(part) = read_mesh(&mesh, &buffers, world, name) {
                model.parts.push(part);
            }
        }
        stack.extend(node.children().map(|child| (child, world)));
    }

    if model.parts.is_empty() {
        tracing::warn!("Model {} has no decodable meshes", path.display());
    }
    Ok(model)
}

fn read_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    world: Mat4,
    name: String,
) -> Option<ModelPart> {
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();
    let mut base_color = [1.0; 4];

    for prim in mesh.primitives() {
        let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
        let Some(prim_positions) = reader.read_positions() else {
            continue;
        };
        let base = positions.len() as u32;
        let prim_positions: Vec<[f32; 3]> = prim_positions
            .map(|p| world.transform_point3(Vec3::from(p)).to_array())
            .collect();
        let count = prim_positions.len();

        let prim_normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|it| {
                it.map(|n| (normal_matrix * Vec3::from(n)).normalize_or(Vec3::Y).to_array())
                    .collect()
            })
            .unwrap_or_default();
        let prim_uvs: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|it| it.into_f32().collect())
            .unwrap_or_default();
        let prim_indices: Vec<u32> = match reader.read_indices() {
            Some(it) => it.into_u32().collect(),
            None => (0..count as u32).collect(),
        };

        // Fill gaps per primitive so attributes stay aligned with positions
        if prim_normals.len() == count {
            normals.extend(prim_normals);
        } else {
            normals.extend(crate::mesh::compute_vertex_normals(&prim_positions, &prim_indices));
        }
        if prim_uvs.len() == count {
            uvs.extend(prim_uvs);
        } else {
            uvs.extend(std::iter::repeat_n([0.0, 0.0], count));
        }
        positions.extend(prim_positions);
        indices.extend(prim_indices.into_iter().map(|i| i + base));
        base_color = prim.material().pbr_metallic_roughness().base_color_factor();
    }

    if positions.is_empty() {
        tracing::debug!("Skipping mesh node '{}' without readable positions", name);
        return None;
    }

    Some(ModelPart {
        name,
        mesh: CpuMesh::new(positions, normals, uvs, indices),
        base_color,
    })
}

/// Load an 8-bit texture (PNG/JPEG)
pub fn load_texture(path: &Path) -> Result<ImageData, AssetError> {
    let image = image::open(path).map_err(|e| decode_err(path, e))?;
    Ok(ImageData::from_rgba8(image.to_rgba8()))
}

/// Load an equirectangular HDR environment map as linear RGBA32F
pub fn load_environment(path: &Path) -> Result<ImageData, AssetError> {
    let image = image::open(path).map_err(|e| decode_err(path, e))?;
    let rgba = image.into_rgba32f();
    Ok(ImageData {
        width: rgba.width(),
        height: rgba.height(),
        pixels: Pixels::Rgba32F(rgba.into_raw()),
    })
}

/// Decode an animated GIF into a looping frame sequence
pub fn load_video(path: &Path) -> Result<VideoFrames, AssetError> {
    let file = File::open(path).map_err(|e| AssetError::Io(format!("{}: {}", path.display(), e)))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| decode_err(path, e))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| decode_err(path, e))?;

    let frames: Vec<(ImageData, f32)> = frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let seconds = numer as f32 / denom.max(1) as f32 / 1000.0;
            (ImageData::from_rgba8(frame.into_buffer()), seconds)
        })
        .collect();

    if frames.is_empty() {
        return Err(AssetError::Decode(format!("{}: no frames", path.display())));
    }
    Ok(VideoFrames::new(frames))
}

/// Rasterize a single line of text into a white RGBA image with coverage in alpha.
///
/// Returns the image and its width / height ratio.
pub fn rasterize_title(
    font_path: &Path,
    text: &str,
    pixel_height: f32,
) -> Result<(ImageData, f32), AssetError> {
    let bytes = std::fs::read(font_path)
        .map_err(|e| AssetError::Io(format!("{}: {}", font_path.display(), e)))?;
    let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| decode_err(font_path, e))?;
    Ok(rasterize_with_font(&font, text, pixel_height))
}

fn rasterize_with_font(
    font: &fontdue::Font,
    text: &str,
    pixel_height: f32,
) -> (ImageData, f32) {
    let (ascent, descent) = font
        .horizontal_line_metrics(pixel_height)
        .map(|m| (m.ascent, m.descent))
        .unwrap_or((pixel_height, 0.0));
    let glyphs: Vec<(fontdue::Metrics, Vec<u8>)> =
        text.chars().map(|c| font.rasterize(c, pixel_height)).collect();

    let padding = 4.0;
    let advance: f32 = glyphs.iter().map(|(m, _)| m.advance_width).sum();
    let width = (advance + padding * 2.0).ceil().max(1.0) as u32;
    let height = (ascent - descent + padding * 2.0).ceil().max(1.0) as u32;
    let baseline = padding + ascent;

    let mut pixels = vec![0u8; (width * height * 4) as usize];
    let mut pen_x = padding;
    for (metrics, coverage) in &glyphs {
        let left = (pen_x + metrics.xmin as f32).round() as i64;
        // ymin is the offset of the bitmap bottom from the baseline, Y up
        let top = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i64;
        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let x = left + col as i64;
                let y = top + row as i64;
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    continue;
                }
                let alpha = coverage[row * metrics.width + col];
                let offset = ((y as u32 * width + x as u32) * 4) as usize;
                pixels[offset..offset + 3].copy_from_slice(&[255, 255, 255]);
                pixels[offset + 3] = pixels[offset + 3].max(alpha);
            }
        }
        pen_x += metrics.advance_width;
    }

    let aspect = width as f32 / height as f32;
    (
        ImageData {
            width,
            height,
            pixels: Pixels::Srgba8(pixels),
        },
        aspect,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(shade: u8) -> ImageData {
        ImageData::solid([shade, shade, shade, 255])
    }

    #[test]
    fn test_video_frame_lookup_loops() {
        let video = VideoFrames::new(vec![(frame(0), 0.5), (frame(1), 0.25), (frame(2), 0.25)]);
        assert_eq!(video.len(), 3);
        assert!((video.duration() - 1.0).abs() < 1e-6);
        assert_eq!(video.frame_index_at(0.0), 0);
        assert_eq!(video.frame_index_at(0.6), 1);
        assert_eq!(video.frame_index_at(0.9), 2);
        assert_eq!(video.frame_index_at(1.1), 0);
    }

    #[test]
    fn test_zero_delay_frames_still_advance() {
        let video = VideoFrames::new(vec![(frame(0), 0.0), (frame(1), 0.0)]);
        assert!(video.duration() > 0.0);
        assert_eq!(video.frame_index_at(0.04), 1);
    }

    #[test]
    fn test_missing_files_fail_with_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nothing.png");
        assert!(load_texture(&missing).is_err());
        assert!(matches!(load_video(&missing), Err(AssetError::Io(_))));
        assert!(matches!(
            rasterize_title(&missing, "x", 32.0),
            Err(AssetError::Io(_))
        ));
        assert!(load_model(&dir.path().join("room.glb")).is_err());
    }

    #[test]
    fn test_texture_roundtrip_through_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matcap.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let loaded = load_texture(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (4, 2));
        match loaded.pixels {
            Pixels::Srgba8(bytes) => assert_eq!(&bytes[..4], &[10, 20, 30, 255]),
            Pixels::Rgba32F(_) => panic!("expected 8-bit pixels"),
        }
    }
}
