//! The fit renderer: every host callback lands here.
//!
//! [`FitRenderer`] owns the GL resources (quad, program, texture slots,
//! depth-exposure rig) and a [`ControlState`] that tracks the GL-free
//! side: cursor position, window size, border visibility, and the sizing
//! mode. Window changes flow back out through the host's
//! [`WindowHost`] rather than any direct windowing calls.

use std::fs;
use std::path::{Path, PathBuf};

use glam::{UVec2, Vec2};
use log::{debug, info, warn};

use crate::decode::{DecodedImage, ImageDecoder};
use crate::drop_zone::{route_drop, DropTarget};
use crate::error::ViewerError;
use crate::fit::FitState;
use crate::host::{Key, WindowHost};
use crate::render::{DepthExposureRig, QuadGeometry, QuadProgram, TextureRole, TextureSlot};

/// Background clear color (cornflower blue).
const CLEAR_COLOR: [f32; 4] = [100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0, 1.0];

/// Reads a file and decodes it through the given codec.
///
/// # Errors
///
/// Returns [`ViewerError::Io`] if the file cannot be read, or whatever
/// the decoder reports for undecodable bytes.
pub fn read_and_decode(
    decoder: &dyn ImageDecoder,
    path: &Path,
) -> Result<DecodedImage, ViewerError> {
    let bytes =
        fs::read(path).map_err(|e| ViewerError::Io(format!("{}: {e}", path.display())))?;
    decoder.decode(&bytes)
}

/// Input-tracking state consumed by the renderer: cursor, window size,
/// border visibility, and the sizing mode.
///
/// Kept separate from the GL resources so every key and drop decision is
/// testable without a context.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    fit: FitState,
    cursor: Vec2,
    window_size: UVec2,
    border_visible: bool,
}

impl ControlState {
    /// Creates tracking state for a screen, the loaded image, and the
    /// host-chosen startup window size. The cursor starts at the origin,
    /// which routes a drop before any mouse movement to the color slot.
    pub fn new(screen: UVec2, image: UVec2, window_size: UVec2) -> Self {
        Self {
            fit: FitState::new(screen, image),
            cursor: Vec2::ZERO,
            window_size,
            border_visible: true,
        }
    }

    /// Records the cursor position in window coordinates.
    pub fn on_mouse_move(&mut self, position: Vec2) {
        self.cursor = position;
    }

    /// Records the new window size.
    pub fn on_resize(&mut self, size: UVec2) {
        self.window_size = size;
    }

    /// Applies a key press, forwarding window changes to the host.
    ///
    /// Escape requests close; Tab flips between native and fitted preview
    /// size; B toggles the border, and hiding the border while at full
    /// image size additionally re-applies the preview fit so the
    /// undecorated window is back on screen.
    pub fn on_key(&mut self, host: &mut dyn WindowHost, key: Key) {
        debug!("key pressed: {key:?}");
        match key {
            Key::Escape => host.request_close(),
            Key::Tab => {
                let size = self.fit.toggle();
                host.set_size(size);
            }
            Key::B => {
                self.border_visible = !self.border_visible;
                host.set_border_visible(self.border_visible);
                if !self.border_visible && self.fit.is_full_size() {
                    let size = self.fit.apply(true);
                    host.set_size(size);
                }
            }
        }
    }

    /// Routes a drop payload against the tracked cursor and window size.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InputRejected`] exactly as
    /// [`route_drop`] does.
    pub fn route(&self, paths: &[PathBuf]) -> Result<DropTarget, ViewerError> {
        route_drop(paths, self.cursor, self.window_size.y)
    }

    /// Adopts a new color image size and returns the preview-fitted
    /// window size to request.
    pub fn refit_to(&mut self, image: UVec2) -> UVec2 {
        self.fit.set_image(image);
        self.fit.apply(true)
    }

    /// The sizing-mode state.
    pub fn fit(&self) -> &FitState {
        &self.fit
    }

    /// Last tracked cursor position.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Last tracked window size.
    pub fn window_size(&self) -> UVec2 {
        self.window_size
    }

    /// Whether the window border is currently shown.
    pub fn border_visible(&self) -> bool {
        self.border_visible
    }
}

/// The viewer's rendering state and callback surface.
pub struct FitRenderer {
    geometry: QuadGeometry,
    program: QuadProgram,
    color: TextureSlot,
    depth: TextureSlot,
    rig: DepthExposureRig,
    control: ControlState,
    decoder: Box<dyn ImageDecoder>,
}

impl FitRenderer {
    /// Loads both startup images and builds the full pipeline: quad
    /// geometry, color and depth slots, the depth-exposure rig (sized to
    /// the depth image, completeness re-validated), and the quad program.
    ///
    /// # Errors
    ///
    /// Fatal startup errors only: unreadable or undecodable startup
    /// images, GPU object creation failures, and shader compile/link
    /// failures. Rig incompleteness is logged, not returned.
    #[allow(unsafe_code)]
    pub fn new(
        gl: &glow::Context,
        decoder: Box<dyn ImageDecoder>,
        screen: UVec2,
        window_size: UVec2,
        color_path: &Path,
        depth_path: &Path,
    ) -> Result<Self, ViewerError> {
        use glow::HasContext;

        // SAFETY: fixed in-range clear color.
        unsafe {
            gl.clear_color(
                CLEAR_COLOR[0],
                CLEAR_COLOR[1],
                CLEAR_COLOR[2],
                CLEAR_COLOR[3],
            );
        }

        let geometry = QuadGeometry::new(gl)?;

        let color_image = read_and_decode(decoder.as_ref(), color_path)?;
        let color = TextureSlot::new(gl, TextureRole::Color, &color_image)?;

        let depth_image = read_and_decode(decoder.as_ref(), depth_path)?;
        let depth = TextureSlot::new(gl, TextureRole::Depth, &depth_image)?;

        let mut rig = DepthExposureRig::new(gl, depth.size())?;
        rig.revalidate(gl);

        let program = QuadProgram::new(gl)?;

        info!(
            "viewer ready: color {}x{}, depth {}x{}",
            color.size().x,
            color.size().y,
            depth.size().x,
            depth.size().y
        );

        Ok(Self {
            geometry,
            program,
            color,
            depth,
            rig,
            control: ControlState::new(screen, color_image.size(), window_size),
            decoder,
        })
    }

    /// Draws the frame twice: once into the rig, once into the default
    /// framebuffer. Both passes are identical; the auxiliary pass exists
    /// so the driver keeps depth state live for outside observers.
    #[allow(unsafe_code)]
    pub fn on_frame(&self, gl: &glow::Context) {
        use glow::HasContext;

        self.rig.bind(gl);
        self.draw_pass(gl);

        // SAFETY: binding the default framebuffer is always valid.
        unsafe { gl.bind_framebuffer(glow::FRAMEBUFFER, None) };
        self.draw_pass(gl);
    }

    /// One full draw into whatever framebuffer is bound.
    #[allow(unsafe_code)]
    fn draw_pass(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: all handles were created in new() and outlive self.
        // DEPTH_TEST with ALWAYS lets every fragment through while still
        // writing its authored depth.
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::ALWAYS);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        self.program.bind(gl);
        self.geometry.bind(gl);
        self.color.bind(gl);
        self.depth.bind(gl);

        // SAFETY: the bound VAO holds index_count() indices.
        unsafe {
            gl.draw_elements(
                glow::TRIANGLES,
                self.geometry.index_count(),
                glow::UNSIGNED_INT,
                0,
            );
        }
    }

    /// Tracks the new size and pins the viewport to it. Sizing modes are
    /// driven by keys and drops, never by the resize itself.
    #[allow(unsafe_code)]
    pub fn on_resize(&mut self, gl: &glow::Context, size: UVec2) {
        use glow::HasContext;

        self.control.on_resize(size);

        // SAFETY: non-negative viewport extents.
        unsafe { gl.viewport(0, 0, size.x as i32, size.y as i32) };
    }

    /// Tracks the cursor for later drop routing.
    pub fn on_mouse_move(&mut self, position: Vec2) {
        self.control.on_mouse_move(position);
    }

    /// Applies a key press; see [`ControlState::on_key`].
    pub fn on_key(&mut self, host: &mut dyn WindowHost, key: Key) {
        self.control.on_key(host, key);
    }

    /// Handles a file drop: routes it by cursor position, decodes the
    /// file, and replaces the matching slot's contents. A color
    /// replacement also re-fits the window in preview mode; a depth
    /// replacement leaves the window and the rig untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InputRejected`], [`ViewerError::Io`], or
    /// [`ViewerError::Decode`]. Every error leaves the previous textures
    /// and window state in place, and is logged here once.
    pub fn on_file_drop(
        &mut self,
        gl: &glow::Context,
        host: &mut dyn WindowHost,
        paths: &[PathBuf],
    ) -> Result<(), ViewerError> {
        let result = self.handle_drop(gl, host, paths);
        if let Err(e) = &result {
            warn!("{e}");
        }
        result
    }

    fn handle_drop(
        &mut self,
        gl: &glow::Context,
        host: &mut dyn WindowHost,
        paths: &[PathBuf],
    ) -> Result<(), ViewerError> {
        let target = self.control.route(paths)?;
        let image = read_and_decode(self.decoder.as_ref(), &paths[0])?;
        debug!(
            "dropped {} onto the {target:?} slot ({}x{})",
            paths[0].display(),
            image.size().x,
            image.size().y
        );

        match target {
            DropTarget::Color => {
                self.color.upload(gl, image.pixels(), image.size())?;
                let size = self.control.refit_to(image.size());
                host.set_size(size);
            }
            DropTarget::Depth => {
                // The rig keeps its construction-time size.
                self.depth.upload(gl, image.pixels(), image.size())?;
            }
        }
        Ok(())
    }

    /// The input-tracking state.
    pub fn control(&self) -> &ControlState {
        &self.control
    }

    /// The color texture slot.
    pub fn color_slot(&self) -> &TextureSlot {
        &self.color
    }

    /// The depth texture slot.
    pub fn depth_slot(&self) -> &TextureSlot {
        &self.depth
    }

    /// The depth-exposure rig.
    pub fn rig(&self) -> &DepthExposureRig {
        &self.rig
    }

    /// Releases every GPU object. Call from the host's shutdown hook;
    /// nothing here cleans up on drop.
    pub fn destroy(&self, gl: &glow::Context) {
        self.geometry.destroy(gl);
        self.program.destroy(gl);
        self.color.destroy(gl);
        self.depth.destroy(gl);
        self.rig.destroy(gl);
    }
}
