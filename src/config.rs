#[cfg(feature = "headless")]
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::geometry::{Vec2, Viewport};

/// bounceblur configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Fixed drawing surface (pixels)
    pub viewport: Viewport,

    /// Bouncing rect size (pixels), constant for the whole run
    pub rect_size: Vec2,

    /// Starting top-left corner (pixels)
    pub rect_position: Vec2,

    /// Starting velocity (pixels/second)
    pub rect_velocity: Vec2,

    /// Blur intensity lost per second after a collision flash
    pub blur_decay_rate: f32,

    /// How often the frame timer fires
    pub frame_interval: Duration,

    /// Upper bound on a single frame's dt (seconds). `None` keeps stalls
    /// as one big step, tunneling included.
    pub max_frame_dt: Option<f32>,

    /// Cleared before the quad is drawn. The quad covers every pixel, so
    /// this only shows if the draw goes wrong.
    pub clear_color: [f32; 4],

    /// CPU raster run settings
    #[cfg(feature = "headless")]
    pub headless: HeadlessConfig,
}

#[cfg(feature = "headless")]
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Frames to simulate before the snapshot
    pub frames: u32,

    /// Where the last frame is written
    pub snapshot_path: PathBuf,
}

#[cfg(feature = "headless")]
impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            snapshot_path: PathBuf::from("bounceblur.png"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("viewport must have positive extents, got {0}x{1}")]
    EmptyViewport(u32, u32),

    #[error("rect size must be positive, got {0}x{1}")]
    EmptyRect(f32, f32),

    #[error("rect {0}x{1} does not fit in the {2}x{3} viewport")]
    RectTooLarge(f32, f32, u32, u32),

    #[error("frame interval must be non-zero")]
    ZeroFrameInterval,

    #[error("blur decay rate must be a non-negative number, got {0}")]
    NegativeBlurDecay(f32),

    #[error("frame dt cap must be a non-negative number, got {0}")]
    InvalidFrameDtCap(f32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(800, 600),
            rect_size: Vec2::new(100.0, 100.0),
            rect_position: Vec2::new(10.0, 10.0),
            rect_velocity: Vec2::new(-300.0, -300.0),
            blur_decay_rate: 8.0,
            frame_interval: Duration::from_millis(16),
            max_frame_dt: None,
            // Loud red so a missed draw is obvious
            clear_color: [1.0, 0.0, 0.0, 1.0],
            #[cfg(feature = "headless")]
            headless: HeadlessConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyViewport(width, height));
        }

        let size = self.rect_size;
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(ConfigError::EmptyRect(size.x, size.y));
        }
        if size.x > width as f32 || size.y > height as f32 {
            return Err(ConfigError::RectTooLarge(size.x, size.y, width, height));
        }

        if self.frame_interval.is_zero() {
            return Err(ConfigError::ZeroFrameInterval);
        }

        // Either would push blur outside [0, 1]
        if !(self.blur_decay_rate >= 0.0 && self.blur_decay_rate.is_finite()) {
            return Err(ConfigError::NegativeBlurDecay(self.blur_decay_rate));
        }
        if let Some(cap) = self.max_frame_dt {
            if !(cap >= 0.0 && cap.is_finite()) {
                return Err(ConfigError::InvalidFrameDtCap(cap));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_sizes() {
        let config = Config {
            viewport: Viewport::new(0, 600),
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyViewport(0, 600)));

        let config = Config {
            rect_size: Vec2::new(100.0, 0.0),
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyRect(100.0, 0.0)));

        let config = Config {
            rect_size: Vec2::new(900.0, 100.0),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::RectTooLarge(..))));
    }

    #[test]
    fn rejects_negative_blur_decay() {
        let config = Config {
            blur_decay_rate: -8.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NegativeBlurDecay(-8.0)));

        let config = Config {
            blur_decay_rate: f32::NAN,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NegativeBlurDecay(_))));
    }

    #[test]
    fn rejects_negative_or_non_finite_dt_cap() {
        for cap in [-0.1, f32::NAN, f32::INFINITY] {
            let config = Config {
                max_frame_dt: Some(cap),
                ..Config::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidFrameDtCap(_))),
                "cap {cap} accepted"
            );
        }

        let config = Config {
            max_frame_dt: Some(0.0),
            ..Config::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_frame_interval() {
        let config = Config {
            frame_interval: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameInterval));
    }
}
