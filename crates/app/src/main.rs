#![deny(unsafe_code)]
//! stillshade - displays a color/depth image pair on a fullscreen quad
//! and keeps the window's depth buffer populated for screen-space tools
//! that read it from outside.

mod app;
mod decoder;
mod gl_window;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;
use winit::event_loop::{ControlFlow, EventLoop};

/// stillshade - a still image viewer with an authored depth buffer
#[derive(Parser, Debug)]
#[command(name = "stillshade")]
#[command(version, about, long_about = None)]
struct Args {
    /// Color image drawn on the quad
    #[arg(long, value_name = "FILE", default_value = "assets/color.png")]
    color: PathBuf,

    /// Depth image authored into the depth buffer (red channel)
    #[arg(long, value_name = "FILE", default_value = "assets/depth.png")]
    depth: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!(
        "starting stillshade with color: {:?}, depth: {:?}",
        args.color, args.depth
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(args.color, args.depth);
    event_loop.run_app(&mut app)?;

    // Startup failures happen inside the loop; surface them as exit status.
    app.into_result()
}
