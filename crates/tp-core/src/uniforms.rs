//! Animated shader uniforms refreshed once per frame

use crate::scene::MaterialKind;

/// Materials whose shader parameters change over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatedMaterial {
    ProjectorLight,
    GlassBrickLight,
}

impl AnimatedMaterial {
    pub fn for_material(kind: &MaterialKind) -> Option<Self> {
        match kind {
            MaterialKind::ProjectorLight => Some(Self::ProjectorLight),
            MaterialKind::GlassBrickLight => Some(Self::GlassBrickLight),
            _ => None,
        }
    }
}

/// Parameter set of one animated material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedUniform {
    /// `uTime`
    pub time: f32,
    /// `uColorStart`
    pub color_start: Option<[f32; 3]>,
    /// `uColorEnd`
    pub color_end: Option<[f32; 3]>,
    /// Only uniforms that declare a time dependency receive the clock
    pub declares_time: bool,
}

impl AnimatedUniform {
    pub fn timed() -> Self {
        Self {
            time: 0.0,
            color_start: None,
            color_end: None,
            declares_time: true,
        }
    }

    pub fn with_colors(mut self, start: [f32; 3], end: [f32; 3]) -> Self {
        self.color_start = Some(start);
        self.color_end = Some(end);
        self
    }
}

/// Registry of animated uniforms, written before every draw
#[derive(Debug, Clone, Default)]
pub struct UniformDriver {
    entries: Vec<(AnimatedMaterial, AnimatedUniform)>,
}

impl UniformDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the uniforms of a material
    pub fn register(&mut self, material: AnimatedMaterial, uniform: AnimatedUniform) {
        match self.entries.iter_mut().find(|(m, _)| *m == material) {
            Some(entry) => entry.1 = uniform,
            None => self.entries.push((material, uniform)),
        }
    }

    pub fn get(&self, material: AnimatedMaterial) -> Option<&AnimatedUniform> {
        self.entries
            .iter()
            .find(|(m, _)| *m == material)
            .map(|(_, u)| u)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(AnimatedMaterial, AnimatedUniform)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write `elapsed` into every time-dependent uniform.
    /// Returns how many uniforms were written; an empty registry writes none.
    pub fn publish(&mut self, elapsed: f32) -> usize {
        let mut written = 0;
        for (_, uniform) in self.entries.iter_mut().filter(|(_, u)| u.declares_time) {
            uniform.time = elapsed;
            written += 1;
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_on_empty_registry_is_noop() {
        let mut driver = UniformDriver::new();
        assert_eq!(driver.publish(1.0), 0);
        assert!(driver.is_empty());
    }

    #[test]
    fn test_publish_skips_uniforms_without_time() {
        let mut driver = UniformDriver::new();
        driver.register(AnimatedMaterial::ProjectorLight, AnimatedUniform::timed());
        driver.register(
            AnimatedMaterial::GlassBrickLight,
            AnimatedUniform {
                declares_time: false,
                ..AnimatedUniform::timed()
            },
        );
        assert_eq!(driver.publish(2.5), 1);
        assert_eq!(driver.get(AnimatedMaterial::ProjectorLight).unwrap().time, 2.5);
        assert_eq!(driver.get(AnimatedMaterial::GlassBrickLight).unwrap().time, 0.0);
    }

    #[test]
    fn test_published_time_is_non_decreasing() {
        let mut driver = UniformDriver::new();
        driver.register(AnimatedMaterial::ProjectorLight, AnimatedUniform::timed());
        let mut clock = crate::clock::RenderClock::new();
        let t0 = std::time::Instant::now();
        let mut previous = f32::MIN;
        for frame in 0..120u64 {
            let elapsed = clock.tick(t0 + std::time::Duration::from_millis(frame * 16));
            driver.publish(elapsed);
            let written = driver.get(AnimatedMaterial::ProjectorLight).unwrap().time;
            assert!(written >= previous);
            previous = written;
        }
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut driver = UniformDriver::new();
        driver.register(AnimatedMaterial::GlassBrickLight, AnimatedUniform::timed());
        driver.register(
            AnimatedMaterial::GlassBrickLight,
            AnimatedUniform::timed().with_colors([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        );
        assert_eq!(driver.iter().count(), 1);
        assert!(driver.get(AnimatedMaterial::GlassBrickLight).unwrap().color_start.is_some());
    }
}
