//! Bounce simulation
//!
//! One explicit state struct, advanced once per frame. No rendering context
//! needed, which keeps every transition unit-testable.

use crate::config::Config;
use crate::geometry::{Rect, Vec2, Viewport};

/// Frames longer than this get a warning in the log
const STALL_WARN_SECS: f32 = 0.25;

/// Turns frame timestamps (milliseconds) into elapsed seconds
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed seconds since the previous tick. The very first tick is 0.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((timestamp_ms - last) * 0.001) as f32,
            None => 0.0,
        };
        self.last = Some(timestamp_ms);
        dt
    }
}

/// Which walls were hit during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collision {
    pub x: bool,
    pub y: bool,
}

impl Collision {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Mutable animation state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceState {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub blur: f32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub rect: Rect,
    pub blur: f32,
    pub collision: Collision,
}

pub struct BounceSimulator {
    pub state: BounceState,
    size: Vec2,
    viewport: Viewport,
    blur_decay_rate: f32,
    max_frame_dt: Option<f32>,
    clock: FrameClock,
    bounces: u64,
}

impl BounceSimulator {
    pub fn new(config: &Config) -> Self {
        Self {
            state: BounceState {
                pos: config.rect_position,
                velocity: config.rect_velocity,
                blur: 0.0,
            },
            size: config.rect_size,
            viewport: config.viewport,
            blur_decay_rate: config.blur_decay_rate,
            max_frame_dt: config.max_frame_dt,
            clock: FrameClock::new(),
            bounces: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.state.pos, self.size)
    }

    /// Number of collision events so far (a corner hit counts once)
    pub fn bounces(&self) -> u64 {
        self.bounces
    }

    /// Advance to the frame at `timestamp_ms` and return what to draw
    pub fn advance(&mut self, timestamp_ms: f64) -> FrameParams {
        let mut dt = self.clock.tick(timestamp_ms);

        if dt > STALL_WARN_SECS {
            tracing::warn!("Long frame: {:.3}s since the previous one", dt);
        }
        if let Some(max) = self.max_frame_dt {
            dt = dt.min(max);
        }

        let collision = self.step(dt);
        if collision.any() {
            self.bounces += 1;
            tracing::debug!(
                x = collision.x,
                y = collision.y,
                pos = ?self.state.pos,
                "bounce #{}",
                self.bounces
            );
        }

        FrameParams {
            rect: self.rect(),
            blur: self.state.blur,
            collision,
        }
    }

    /// Move the rect by `dt` seconds, reflect off walls and flash the blur
    pub fn step(&mut self, dt: f32) -> Collision {
        let s = &mut self.state;
        let bounds = self.viewport.extent();

        // Decay uses the blur from the previous frame
        s.blur = (s.blur - dt * self.blur_decay_rate).max(0.0);

        s.pos.x += s.velocity.x * dt;
        s.pos.y += s.velocity.y * dt;

        let collision = Collision {
            x: s.pos.x < 0.0 || s.pos.x + self.size.x > bounds.x,
            y: s.pos.y < 0.0 || s.pos.y + self.size.y > bounds.y,
        };

        if collision.x {
            s.velocity.x = -s.velocity.x;
            s.blur = 1.0;
        }
        if collision.y {
            s.velocity.y = -s.velocity.y;
            s.blur = 1.0;
        }

        collision
    }
}
