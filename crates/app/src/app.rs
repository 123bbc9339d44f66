//! winit event handling: translates window events into core callbacks.
//!
//! The event loop owns a [`GlHost`] (window + GL context) and a
//! [`FitRenderer`]. Each winit event maps to exactly one renderer
//! callback; window changes the renderer requests flow back through a
//! short-lived [`WinitHost`] adapter.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use glam::{UVec2, Vec2};
use log::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use stillshade_core::{FitRenderer, Key, WindowHost};

use crate::decoder::PngDecoder;
use crate::gl_window::GlHost;

/// Adapts the live window to the core's host interface for the duration
/// of one callback.
///
/// Close requests are latched because only the event loop can honor
/// them. Resize requests that the platform applies immediately (no
/// `Resized` event will follow) are latched too, so the caller can run
/// the resize path itself.
struct WinitHost<'a> {
    window: &'a Window,
    close_requested: bool,
    applied_size: Option<PhysicalSize<u32>>,
}

impl<'a> WinitHost<'a> {
    fn new(window: &'a Window) -> Self {
        Self {
            window,
            close_requested: false,
            applied_size: None,
        }
    }
}

impl WindowHost for WinitHost<'_> {
    fn set_size(&mut self, size: UVec2) {
        if let Some(applied) = self
            .window
            .request_inner_size(PhysicalSize::new(size.x, size.y))
        {
            self.applied_size = Some(applied);
        }
    }

    fn set_border_visible(&mut self, visible: bool) {
        self.window.set_decorations(visible);
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }
}

/// Everything that exists only while the window does.
struct State {
    host: GlHost,
    renderer: FitRenderer,
}

/// Runs the latched host effects after a renderer callback returns.
fn apply_host_effects(
    state: &mut State,
    applied: Option<PhysicalSize<u32>>,
    close: bool,
    event_loop: &ActiveEventLoop,
) {
    if let Some(size) = applied {
        state.host.resize_surface(size);
        state
            .renderer
            .on_resize(&state.host.gl, UVec2::new(size.width, size.height));
    }
    if close {
        event_loop.exit();
    }
}

/// The winit application: defers all real work until `resumed` provides
/// an active event loop to build the window against.
pub struct App {
    color_path: PathBuf,
    depth_path: PathBuf,
    state: Option<State>,
    pending_drops: Vec<PathBuf>,
    fatal: Option<anyhow::Error>,
}

impl App {
    pub fn new(color_path: PathBuf, depth_path: PathBuf) -> Self {
        Self {
            color_path,
            depth_path,
            state: None,
            pending_drops: Vec::new(),
            fatal: None,
        }
    }

    /// Consumes the handler after the loop exits, surfacing any fatal
    /// startup error as the process result.
    pub fn into_result(self) -> Result<()> {
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<State> {
        let host = GlHost::new(event_loop, "stillshade")?;
        let screen = host.screen_size();
        info!("screen size: {}x{}", screen.x, screen.y);

        let renderer = FitRenderer::new(
            &host.gl,
            Box::new(PngDecoder),
            screen,
            host.inner_size(),
            &self.color_path,
            &self.depth_path,
        )
        .context("viewer startup failed")?;

        Ok(State { host, renderer })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => {
                state.host.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                error!("{e:#}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                state.host.resize_surface(size);
                state
                    .renderer
                    .on_resize(&state.host.gl, UVec2::new(size.width, size.height));
            }

            WindowEvent::CursorMoved { position, .. } => {
                state
                    .renderer
                    .on_mouse_move(Vec2::new(position.x as f32, position.y as f32));
            }

            // One event per file; the batch flushes in about_to_wait so a
            // multi-file drop arrives at the renderer as a single list.
            WindowEvent::DroppedFile(path) => {
                self.pending_drops.push(path);
            }

            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if key_event.state == ElementState::Pressed && !key_event.repeat {
                    if let Some(key) = map_key(key_event.physical_key) {
                        let mut host = WinitHost::new(&state.host.window);
                        state.renderer.on_key(&mut host, key);
                        let (applied, close) = (host.applied_size, host.close_requested);
                        apply_host_effects(state, applied, close, event_loop);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                state.renderer.on_frame(&state.host.gl);
                if let Err(e) = state.host.swap_buffers() {
                    warn!("{e:#}");
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if !self.pending_drops.is_empty() {
            let paths = std::mem::take(&mut self.pending_drops);
            let mut host = WinitHost::new(&state.host.window);
            if let Err(e) = state
                .renderer
                .on_file_drop(&state.host.gl, &mut host, &paths)
            {
                // Already logged by the renderer; nothing else to undo.
                debug!("drop ignored: {e}");
            }
            let (applied, close) = (host.applied_size, host.close_requested);
            apply_host_effects(state, applied, close, event_loop);
        }

        state.host.window.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            state.renderer.destroy(&state.host.gl);
            info!("released GPU resources");
        }
    }
}

/// Translates the physical keys the viewer cares about; everything else
/// is ignored.
fn map_key(key: PhysicalKey) -> Option<Key> {
    match key {
        PhysicalKey::Code(KeyCode::Escape) => Some(Key::Escape),
        PhysicalKey::Code(KeyCode::Tab) => Some(Key::Tab),
        PhysicalKey::Code(KeyCode::KeyB) => Some(Key::B),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_key_translates_the_three_viewer_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), Some(Key::Escape));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Tab)), Some(Key::Tab));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyB)), Some(Key::B));
    }

    #[test]
    fn map_key_ignores_other_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Space)), None);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Enter)), None);
    }

    #[test]
    fn into_result_surfaces_fatal_errors() {
        let mut app = App::new(PathBuf::from("c.png"), PathBuf::from("d.png"));
        app.fatal = Some(anyhow::anyhow!("startup failed"));
        assert!(app.into_result().is_err());
    }

    #[test]
    fn into_result_is_ok_after_clean_exit() {
        let app = App::new(PathBuf::from("c.png"), PathBuf::from("d.png"));
        assert!(app.into_result().is_ok());
    }
}
