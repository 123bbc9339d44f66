//! The depth-exposure rig: auxiliary framebuffer state that keeps the
//! default framebuffer's depth buffer observable from outside.
//!
//! Screen-space tooling that probes a window's depth buffer only sees
//! data when the driver treats depth state as live. The rig holds a
//! framebuffer whose depth attachment is wired twice -- first through a
//! renderbuffer, then re-pointed at a depth texture -- plus a color
//! target, and the frame loop draws into it before every visible pass.
//! The rig is sized to the depth image at construction and never resized;
//! its contents are never sampled.

use glam::UVec2;
use log::{info, warn};

use crate::error::ViewerError;

/// Auxiliary framebuffer machinery exercised once per frame.
pub struct DepthExposureRig {
    fbo: glow::Framebuffer,
    depth_buffer: glow::Renderbuffer,
    dummy_depth: glow::Texture,
    color_target: glow::Texture,
    size: UVec2,
    complete: bool,
}

impl DepthExposureRig {
    /// Builds the rig at the given size, in attachment order:
    /// renderbuffer depth storage first, then a depth texture re-pointed
    /// at the same attachment (the texture is the one that sticks), then
    /// the color target.
    ///
    /// Completeness is checked at the end and logged. An incomplete rig
    /// is not an error: the viewer keeps running with whatever depth
    /// exposure the driver provides.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Attachment`] only if the driver refuses to
    /// create one of the GPU objects.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, size: UVec2) -> Result<Self, ViewerError> {
        use glow::HasContext;

        let width = size.x as i32;
        let height = size.y as i32;

        // SAFETY: glow wraps raw GL calls as unsafe. Handles created here
        // are deleted on every failure path; fixed enums and the sizes are
        // valid arguments throughout.
        let fbo = unsafe { gl.create_framebuffer().map_err(ViewerError::Attachment)? };
        let depth_buffer = match unsafe { gl.create_renderbuffer() } {
            Ok(rb) => rb,
            Err(e) => {
                unsafe { gl.delete_framebuffer(fbo) };
                return Err(ViewerError::Attachment(e));
            }
        };
        let dummy_depth = match unsafe { gl.create_texture() } {
            Ok(t) => t,
            Err(e) => {
                unsafe {
                    gl.delete_renderbuffer(depth_buffer);
                    gl.delete_framebuffer(fbo);
                }
                return Err(ViewerError::Attachment(e));
            }
        };
        let color_target = match unsafe { gl.create_texture() } {
            Ok(t) => t,
            Err(e) => {
                unsafe {
                    gl.delete_texture(dummy_depth);
                    gl.delete_renderbuffer(depth_buffer);
                    gl.delete_framebuffer(fbo);
                }
                return Err(ViewerError::Attachment(e));
            }
        };

        let complete = unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));

            // Depth attachment, first through renderbuffer storage.
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth_buffer));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT24, width, height);
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth_buffer),
            );

            // Then re-pointed at an unfilled depth texture. The second
            // attachment replaces the first; both objects stay alive.
            gl.bind_texture(glow::TEXTURE_2D, Some(dummy_depth));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::DEPTH_COMPONENT24 as i32,
                width,
                height,
                0,
                glow::DEPTH_COMPONENT,
                glow::UNSIGNED_INT,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::TEXTURE_2D,
                Some(dummy_depth),
                0,
            );

            // Color target so the auxiliary pass has somewhere to draw.
            gl.bind_texture(glow::TEXTURE_2D, Some(color_target));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color_target),
                0,
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            let complete = status == glow::FRAMEBUFFER_COMPLETE;
            if complete {
                info!("depth-exposure rig complete at {width}x{height}");
            } else {
                // Report the default framebuffer's status alongside so a
                // bad surface configuration shows up in the same line.
                gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                let default_status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
                warn!(
                    "depth-exposure rig incomplete: rig status 0x{status:04X}, \
                     default framebuffer status 0x{default_status:04X}; \
                     continuing with degraded depth exposure"
                );
            }

            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            gl.bind_texture(glow::TEXTURE_2D, None);

            complete
        };

        Ok(Self {
            fbo,
            depth_buffer,
            dummy_depth,
            color_target,
            size,
            complete,
        })
    }

    /// Re-runs the completeness check against the current attachments and
    /// updates [`DepthExposureRig::is_complete`].
    #[allow(unsafe_code)]
    pub fn revalidate(&mut self, gl: &glow::Context) -> bool {
        use glow::HasContext;

        // SAFETY: self.fbo is a valid handle from new().
        let status = unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            status
        };
        self.complete = status == glow::FRAMEBUFFER_COMPLETE;
        self.complete
    }

    /// Binds the rig's framebuffer as the draw target for the auxiliary
    /// pass. The caller owns viewport state; the rig does not touch it.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.fbo is a valid handle from new().
        unsafe { gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo)) };
    }

    /// The size the rig was built at. Replacing the depth image does not
    /// change it.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Whether the last completeness check passed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Deletes the framebuffer, renderbuffer, and both textures.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: all four handles are valid handles from new().
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_renderbuffer(self.depth_buffer);
            gl.delete_texture(self.dummy_depth);
            gl.delete_texture(self.color_target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_struct_has_expected_fields() {
        fn _assert_fields(rig: &DepthExposureRig) {
            let _fbo = rig.fbo;
            let _depth_buffer = rig.depth_buffer;
            let _dummy_depth = rig.dummy_depth;
            let _color_target = rig.color_target;
            let _size = rig.size;
            let _complete = rig.complete;
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_builds_rig_at_depth_image_size() {
        // Would test: DepthExposureRig::new(gl, (512, 512)) succeeds,
        // size() reports (512, 512), is_complete() is true on a
        // conformant driver.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn depth_texture_attachment_replaces_renderbuffer() {
        // Would test: FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE for
        // DEPTH_ATTACHMENT reports TEXTURE after construction.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn revalidate_is_stable_after_construction() {
        // Would test: revalidate() returns the same value as
        // is_complete() immediately after new().
    }

    #[test]
    #[ignore = "requires GL context"]
    fn destroy_releases_all_objects() {
        // Would test: after destroy(), all four handles are deleted.
    }
}
