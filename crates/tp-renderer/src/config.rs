//! Renderer configuration structures
//!
//! Settings that shape how the scene is drawn but are not part of the scene
//! itself. Every section falls back to its defaults when missing.

use serde::{Deserialize, Serialize};

use crate::constants::viewport::SUPPORTED_SAMPLE_COUNTS;

/// Viewport rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    /// Background clear color (RGBA, linear)
    pub background_color: [f32; 4],
    /// MSAA sample count (1 = disabled, 4)
    pub msaa_sample_count: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0, 1.0],
            msaa_sample_count: 4,
        }
    }
}

impl ViewportConfig {
    /// Sample count actually used by the pipelines
    pub fn sample_count(&self) -> u32 {
        if SUPPORTED_SAMPLE_COUNTS.contains(&self.msaa_sample_count) {
            self.msaa_sample_count
        } else {
            tracing::warn!(
                "Unsupported MSAA sample count {}, rendering without MSAA",
                self.msaa_sample_count
            );
            1
        }
    }

    /// Clear color as a wgpu color
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.background_color;
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

/// Ambient lighting added on top of the scene's directional light
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Ambient light color (RGB)
    pub ambient_color: [f32; 3],
    /// Ambient light strength
    pub ambient_strength: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_strength: 0.3,
        }
    }
}

/// Orbit control sensitivities and limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Multiplier on drag-to-rotate
    pub orbit_sensitivity: f32,
    /// Multiplier on drag-to-pan
    pub pan_sensitivity: f32,
    /// Multiplier on scroll-to-dolly
    pub zoom_sensitivity: f32,
    /// Closest allowed distance to the orbit target
    pub min_distance: f32,
    /// Farthest allowed distance to the orbit target
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 1.0,
            pan_sensitivity: 1.0,
            zoom_sensitivity: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

/// Complete renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RendererConfig {
    /// Viewport settings
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// Lighting settings
    #[serde(default)]
    pub lighting: LightingConfig,
    /// Orbit control settings
    #[serde(default)]
    pub controls: ControlsConfig,
}

impl RendererConfig {
    /// Create a new renderer configuration with default values
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_sample_count_falls_back() {
        let viewport = ViewportConfig {
            msaa_sample_count: 3,
            ..ViewportConfig::default()
        };
        assert_eq!(viewport.sample_count(), 1);
        assert_eq!(ViewportConfig::default().sample_count(), 4);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RendererConfig =
            ron::from_str("(viewport: (msaa_sample_count: 1))").expect("parse");
        assert_eq!(config.viewport.msaa_sample_count, 1);
        assert_eq!(config.viewport.background_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.lighting, LightingConfig::default());
        assert_eq!(config.controls, ControlsConfig::default());
    }
}
