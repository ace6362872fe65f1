//! Headless backend for bounceblur
//!
//! Same frame timer and simulation as the winit backend, but every frame is
//! rasterized on the CPU. After `headless.frames` frames the last one is
//! written out as a PNG.

use anyhow::{Context, Result};
use smithay::reexports::calloop::EventLoop;

use crate::raster;
use crate::state::BounceBlur;

pub fn run_headless(event_loop: &mut EventLoop<'static, BounceBlur>, state: &mut BounceBlur) -> Result<()> {
    let viewport = state.config.viewport;
    let target = u64::from(state.config.headless.frames);

    tracing::info!(
        "Headless backend: {} frames at {}x{}",
        target,
        viewport.width,
        viewport.height
    );

    let mut last = None;

    while state.running {
        event_loop
            .dispatch(state.dispatch_timeout(), state)
            .context("Event loop error")?;

        if let Some(params) = state.next_frame() {
            last = Some(raster::rasterize(viewport, &params));

            if state.frames >= target {
                state.running = false;
            }
        }
    }

    if let Some(image) = last {
        let path = &state.config.headless.snapshot_path;
        image
            .save(path)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        tracing::info!("Wrote frame {} to {}", state.frames, path.display());
    }

    tracing::info!("Rendered {} frames, {} bounces", state.frames, state.sim.bounces());

    Ok(())
}
