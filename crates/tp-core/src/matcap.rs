//! Keyboard-driven matcap selection

use crate::config::MatcapConfig;

/// Bounded, wrapping matcap index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcapCycler {
    index: u32,
    min: u32,
    max: u32,
    base: String,
}

impl MatcapCycler {
    pub fn new(config: &MatcapConfig) -> Self {
        let min = config.min.min(config.max);
        let max = config.max.max(config.min);
        Self {
            index: config.initial.clamp(min, max),
            min,
            max,
            base: config.base.clone(),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Step down, wrapping from the lower bound to the upper one
    pub fn previous(&mut self) -> u32 {
        self.index = if self.index <= self.min {
            self.max
        } else {
            self.index - 1
        };
        self.index
    }

    /// Step up, wrapping from the upper bound to the lower one
    pub fn next(&mut self) -> u32 {
        self.index = if self.index >= self.max {
            self.min
        } else {
            self.index + 1
        };
        self.index
    }

    /// `base + index + ".png"`
    pub fn path(&self) -> String {
        format!("{}{}.png", self.base, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrement_wraps_to_upper_bound() {
        let mut cycler = MatcapCycler::new(&MatcapConfig::default());
        assert_eq!(cycler.index(), 3);
        cycler.previous();
        cycler.previous();
        assert_eq!(cycler.previous(), 12);
        assert_eq!(cycler.path(), "/textures/matcaps/12.png");
    }

    #[test]
    fn test_increment_wraps_to_lower_bound() {
        let mut cycler = MatcapCycler::new(&MatcapConfig {
            initial: 12,
            ..MatcapConfig::default()
        });
        assert_eq!(cycler.next(), 1);
        assert_eq!(cycler.next(), 2);
    }
}
