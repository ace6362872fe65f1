//! Backend initialization for bounceblur
//!
//! Winit backend: a fixed-size window drawn through smithay's glow renderer

use anyhow::Result;
use smithay::{
    backend::{
        egl::context::GlAttributes,
        renderer::{glow::GlowRenderer, Frame, Renderer},
        winit::{self, WinitEvent},
    },
    reexports::{
        calloop::EventLoop,
        winit::{dpi::PhysicalSize, platform::pump_events::PumpStatus, window::WindowAttributes},
    },
    utils::{Physical, Rectangle, Transform},
};

use crate::render::EdgeBlurProgram;
use crate::state::BounceBlur;

/// Run bounceblur in a window until it is closed
pub fn run_winit(event_loop: &mut EventLoop<'static, BounceBlur>, state: &mut BounceBlur) -> Result<()> {
    let viewport = state.config.viewport;

    let attributes = WindowAttributes::default()
        .with_title("bounceblur")
        .with_inner_size(PhysicalSize::new(viewport.width, viewport.height))
        .with_resizable(false);

    let (mut backend, mut winit_event_loop) = winit::init_from_attributes_with_gl_attr::<GlowRenderer>(
        attributes,
        GlAttributes {
            version: (3, 0),
            profile: None,
            debug: cfg!(debug_assertions),
            vsync: true,
        },
    )
    .map_err(|e| anyhow::anyhow!("Failed to init winit backend: {:?}", e))?;

    let size = backend.window_size();
    if (size.w, size.h) != (viewport.width as i32, viewport.height as i32) {
        tracing::warn!(
            "Window is {}x{}, drawing a fixed {}x{} viewport",
            size.w,
            size.h,
            viewport.width,
            viewport.height
        );
    }

    // No program, no animation
    let program = backend
        .renderer()
        .with_context(|gl| EdgeBlurProgram::new(gl, viewport, state.config.rect_size))
        .map_err(|e| anyhow::anyhow!("GL context error: {:?}", e))?
        .inspect_err(|e| {
            if let Some((stage, code)) = e.rejected_source() {
                tracing::debug!("Rejected {} source:\n{}", stage, code);
            }
        })?;

    tracing::info!("Winit backend initialized: {}x{}", size.w, size.h);

    let clear_color = state.config.clear_color;
    let frame_size = (viewport.width as i32, viewport.height as i32).into();
    let damage = Rectangle::<i32, Physical>::from_size(frame_size);

    while state.running {
        let pump_status = winit_event_loop.dispatch_new_events(|event| match event {
            WinitEvent::CloseRequested => state.running = false,
            WinitEvent::Resized { size, .. } => {
                tracing::debug!("Window resized to {}x{}, viewport stays fixed", size.w, size.h);
            }
            WinitEvent::Input(_) | WinitEvent::Focus(_) | WinitEvent::Redraw => {}
        });

        if matches!(pump_status, PumpStatus::Exit(_)) {
            state.running = false;
        }
        if !state.running {
            break;
        }

        if let Some(params) = state.next_frame() {
            let (renderer, mut target) = backend
                .bind()
                .map_err(|e| anyhow::anyhow!("Bind error: {:?}", e))?;

            let mut frame = renderer
                .render(&mut target, frame_size, Transform::Normal)
                .map_err(|e| anyhow::anyhow!("Render start error: {:?}", e))?;

            frame
                .clear(clear_color.into(), &[damage])
                .map_err(|e| anyhow::anyhow!("Clear error: {:?}", e))?;

            frame
                .with_context(|gl| program.draw(gl, &params))
                .map_err(|e| anyhow::anyhow!("Draw error: {:?}", e))?;

            // No fence synchronization needed for a single window
            let _ = frame
                .finish()
                .map_err(|e| anyhow::anyhow!("Frame finish error: {:?}", e))?;

            drop(target);

            backend
                .submit(None)
                .map_err(|e| anyhow::anyhow!("Submit error: {:?}", e))?;
        }

        // Sleep until the next frame tick
        event_loop.dispatch(state.dispatch_timeout(), state)?;
    }

    tracing::info!("Rendered {} frames, {} bounces", state.frames, state.sim.bounces());

    backend
        .renderer()
        .with_context(|gl| program.destroy(gl))
        .map_err(|e| anyhow::anyhow!("Cleanup error: {:?}", e))?;

    Ok(())
}
