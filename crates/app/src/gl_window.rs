//! Window and GL context bootstrap.
//!
//! Builds the winit window together with a 24-bit-depth GL config, makes
//! a 3.3 core context current on it, and loads the glow function table.
//! Everything the event loop needs to draw lives in one [`GlHost`].

use std::num::NonZeroU32;

use anyhow::{anyhow, Context as _, Result};
use glam::UVec2;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::warn;
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// Startup window size before any fit computation runs.
pub const INITIAL_SIZE: PhysicalSize<u32> = PhysicalSize::new(1024, 768);

/// The live window with its current GL context, surface, and function table.
pub struct GlHost {
    pub window: Window,
    pub gl: glow::Context,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl GlHost {
    /// Creates the window and everything needed to draw into it.
    ///
    /// The config template requires a 24-bit depth buffer on the default
    /// framebuffer; without it there is nothing for outside depth readers
    /// to see. Vsync is requested but a driver refusal is only logged.
    #[allow(unsafe_code)]
    pub fn new(event_loop: &ActiveEventLoop, title: &str) -> Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(INITIAL_SIZE)
            .with_resizable(false);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, |mut configs| {
                configs.next().expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("failed to create window and GL config: {e}"))?;
        let window = window.context("display builder returned no window")?;

        let raw_handle = window.window_handle()?.as_raw();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));

        let display = config.display();
        // SAFETY: the raw handle belongs to the live window created above.
        let not_current = unsafe { display.create_context(&config, &context_attributes) }
            .context("failed to create GL context")?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
            .map_err(|e| anyhow!("failed to build surface attributes: {e}"))?;
        // SAFETY: the attributes were built from the same live window.
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .context("failed to create GL surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            warn!("vsync unavailable: {e}");
        }

        // SAFETY: the context is current on this thread and the display
        // outlives every loader call.
        let gl =
            unsafe { glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s)) };

        Ok(Self {
            window,
            gl,
            surface,
            context,
        })
    }

    /// Resizes the GL surface to the window's new framebuffer size.
    /// Zero-sized updates (minimization) are skipped.
    pub fn resize_surface(&self, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.surface.resize(&self.context, width, height);
        }
    }

    /// Presents the frame.
    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }

    /// The resolution fits are computed against: the primary monitor,
    /// falling back to the window's current monitor, then to 1920x1080.
    pub fn screen_size(&self) -> UVec2 {
        let monitor = self
            .window
            .primary_monitor()
            .or_else(|| self.window.current_monitor());
        match monitor {
            Some(monitor) => {
                let size = monitor.size();
                UVec2::new(size.width, size.height)
            }
            None => {
                warn!("no monitor reported, assuming 1920x1080");
                UVec2::new(1920, 1080)
            }
        }
    }

    /// Current inner window size in physical pixels.
    pub fn inner_size(&self) -> UVec2 {
        let size = self.window.inner_size();
        UVec2::new(size.width, size.height)
    }
}
