use std::time::{Duration, Instant};

use anyhow::Result;
use smithay::reexports::calloop::{
    timer::{TimeoutAction, Timer},
    EventLoop,
};

use crate::config::Config;
use crate::sim::{BounceSimulator, FrameParams};

/// Main application state, shared by both backends
pub struct BounceBlur {
    pub config: Config,
    pub start_time: Instant,
    pub running: bool,

    pub sim: BounceSimulator,

    /// Deadline of a timer tick that hasn't been rendered yet
    pending_frame: Option<Instant>,

    /// Frames rendered so far
    pub frames: u64,
}

impl BounceBlur {
    pub fn new(event_loop: &mut EventLoop<'static, Self>, config: Config) -> Result<Self> {
        config.validate()?;

        let interval = config.frame_interval;

        // Frame clock: each tick asks for exactly one frame, like
        // requestAnimationFrame. Ticks that land before the previous frame
        // was drawn collapse into one.
        event_loop
            .handle()
            .insert_source(Timer::immediate(), move |deadline, _, state: &mut Self| {
                state.pending_frame = Some(deadline);
                TimeoutAction::ToDuration(interval)
            })
            .map_err(|e| anyhow::anyhow!("Failed to insert frame timer: {}", e.error))?;

        tracing::info!(
            "Viewport {}x{}, rect {}x{}, frame every {:?}",
            config.viewport.width,
            config.viewport.height,
            config.rect_size.x,
            config.rect_size.y,
            interval
        );

        Ok(Self {
            sim: BounceSimulator::new(&config),
            config,
            start_time: Instant::now(),
            running: true,
            pending_frame: None,
            frames: 0,
        })
    }

    /// Run one simulation step if the frame timer fired since the last call
    pub fn next_frame(&mut self) -> Option<FrameParams> {
        let deadline = self.pending_frame.take()?;
        let timestamp = deadline.saturating_duration_since(self.start_time);

        let frame = self.sim.advance(timestamp_ms(timestamp));
        self.frames += 1;

        tracing::trace!(
            frame = self.frames,
            x = frame.rect.pos.x,
            y = frame.rect.pos.y,
            blur = frame.blur,
            bounced = frame.collision.any(),
            "step"
        );

        Some(frame)
    }

    /// How long the event loop may block waiting for the next tick
    pub fn dispatch_timeout(&self) -> Duration {
        self.config.frame_interval
    }
}

fn timestamp_ms(since_start: Duration) -> f64 {
    since_start.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_milliseconds() {
        assert_eq!(timestamp_ms(Duration::from_millis(1500)), 1500.0);
        assert_eq!(timestamp_ms(Duration::ZERO), 0.0);
    }

    #[test]
    fn frames_only_follow_timer_ticks() -> Result<()> {
        let mut event_loop: EventLoop<'static, BounceBlur> = EventLoop::try_new()?;
        let mut state = BounceBlur::new(&mut event_loop, Config::default())?;

        assert!(state.next_frame().is_none());

        // The immediate timer fires on the first dispatch
        event_loop.dispatch(Duration::from_millis(50), &mut state)?;
        let first = state.next_frame().expect("tick after dispatch");
        assert_eq!(first.rect.pos.x, 10.0);
        assert_eq!(first.blur, 0.0);

        assert!(state.next_frame().is_none());
        assert_eq!(state.frames, 1);
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected() -> Result<()> {
        let mut event_loop: EventLoop<'static, BounceBlur> = EventLoop::try_new()?;
        let config = Config {
            frame_interval: Duration::ZERO,
            ..Config::default()
        };
        assert!(BounceBlur::new(&mut event_loop, config).is_err());

        // A negative dt cap would turn the first frame's zero dt negative
        let config = Config {
            max_frame_dt: Some(-0.1),
            ..Config::default()
        };
        assert!(BounceBlur::new(&mut event_loop, config).is_err());
        Ok(())
    }
}
