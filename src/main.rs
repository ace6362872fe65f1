mod config;
mod field;
mod geometry;
#[cfg(any(feature = "headless", test))]
mod raster;
#[cfg(any(not(feature = "headless"), test))]
mod render;
#[cfg(any(not(feature = "headless"), test))]
mod shader;
mod sim;
mod state;

// Backend modules - winit window by default, CPU raster when headless
#[cfg(not(feature = "headless"))]
mod backend;
#[cfg(feature = "headless")]
mod backend_headless;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use smithay::reexports::calloop::EventLoop;
use crate::state::BounceBlur;
use crate::config::Config;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("bounceblur starting up");

    let config = Config::default();

    let mut event_loop: EventLoop<'static, BounceBlur> = EventLoop::try_new()?;

    let mut state = BounceBlur::new(&mut event_loop, config)?;

    #[cfg(not(feature = "headless"))]
    {
        info!("Using winit backend (windowed mode)");
        backend::run_winit(&mut event_loop, &mut state)?;
    }

    #[cfg(feature = "headless")]
    {
        info!("Using headless backend (CPU raster)");
        backend_headless::run_headless(&mut event_loop, &mut state)?;
    }

    info!("bounceblur shutting down");
    Ok(())
}
