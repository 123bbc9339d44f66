//! Texture slots: the two replaceable GPU images behind the quad.
//!
//! A slot owns one texture handle for the lifetime of the viewer and
//! re-uploads storage in place when its image is replaced, so the shader's
//! sampler bindings never need rewiring.

use glam::UVec2;

use crate::decode::{DecodedImage, BYTES_PER_PIXEL};
use crate::error::ViewerError;
use crate::render::program::{COLOR_UNIT, DEPTH_UNIT};

/// Which sampler a texture slot feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRole {
    /// The RGBA image shown on the quad; sampled from unit 0.
    Color,
    /// The grayscale image authored into fragment depth; sampled from unit 1.
    Depth,
}

impl TextureRole {
    /// The texture unit this role is sampled from.
    pub fn unit(self) -> u32 {
        match self {
            TextureRole::Color => COLOR_UNIT as u32,
            TextureRole::Depth => DEPTH_UNIT as u32,
        }
    }

    /// The `active_texture` enum for this role's unit.
    pub fn gl_unit(self) -> u32 {
        glow::TEXTURE0 + self.unit()
    }
}

/// Validates an RGBA upload against its stated dimensions.
///
/// # Errors
///
/// Returns [`ViewerError::Decode`] for zero dimensions, an empty buffer,
/// or a length that does not equal `width * height * 4`.
pub fn check_upload(size: UVec2, len: usize) -> Result<(), ViewerError> {
    if size.x == 0 || size.y == 0 {
        return Err(ViewerError::Decode(format!(
            "invalid upload dimensions {}x{}",
            size.x, size.y
        )));
    }
    if len == 0 {
        return Err(ViewerError::Decode("empty upload buffer".into()));
    }
    let expected = size.x as usize * size.y as usize * BYTES_PER_PIXEL;
    if len != expected {
        return Err(ViewerError::Decode(format!(
            "upload buffer holds {len} bytes but {}x{} RGBA needs {expected}",
            size.x, size.y
        )));
    }
    Ok(())
}

/// A GPU texture with a fixed role and replaceable contents.
pub struct TextureSlot {
    texture: glow::Texture,
    role: TextureRole,
    size: UVec2,
}

impl TextureSlot {
    /// Creates the slot and uploads its initial image.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Attachment`] if the texture cannot be
    /// created, or [`ViewerError::Decode`] if the upload fails validation.
    #[allow(unsafe_code)]
    pub fn new(
        gl: &glow::Context,
        role: TextureRole,
        image: &DecodedImage,
    ) -> Result<Self, ViewerError> {
        use glow::HasContext;

        // SAFETY: glow wraps raw GL calls as unsafe; the handle is deleted
        // if the initial upload is rejected.
        let texture = unsafe { gl.create_texture().map_err(ViewerError::Attachment)? };

        let mut slot = Self {
            texture,
            role,
            size: UVec2::ZERO,
        };
        if let Err(e) = slot.upload(gl, image.pixels(), image.size()) {
            // SAFETY: texture is a valid handle from create_texture above.
            unsafe { gl.delete_texture(texture) };
            return Err(e);
        }
        Ok(slot)
    }

    /// Replaces the slot's contents in place, keeping the same handle.
    ///
    /// Storage is RGBA8 with repeat wrap on both axes, trilinear
    /// minification, linear magnification, and freshly generated mipmaps.
    /// On validation failure the previous contents stay intact.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Decode`] if `pixels` does not match `size`.
    #[allow(unsafe_code)]
    pub fn upload(
        &mut self,
        gl: &glow::Context,
        pixels: &[u8],
        size: UVec2,
    ) -> Result<(), ViewerError> {
        use glow::HasContext;

        check_upload(size, pixels.len())?;

        // SAFETY: self.texture is a valid handle and check_upload has
        // verified that the slice covers width * height RGBA texels.
        unsafe {
            gl.active_texture(self.role.gl_unit());
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                size.x as i32,
                size.y as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.generate_mipmap(glow::TEXTURE_2D);

            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        self.size = size;
        Ok(())
    }

    /// Binds the texture on its role's unit for drawing.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.texture is a valid handle from new().
        unsafe {
            gl.active_texture(self.role.gl_unit());
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        }
    }

    /// The slot's role.
    pub fn role(&self) -> TextureRole {
        self.role
    }

    /// Dimensions of the current contents in pixels.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// The underlying texture handle.
    pub fn handle(&self) -> glow::Texture {
        self.texture
    }

    /// Deletes the texture, releasing its GPU storage.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.texture is a valid handle from new().
        unsafe { gl.delete_texture(self.texture) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_role_uses_unit_zero() {
        assert_eq!(TextureRole::Color.unit(), 0);
        assert_eq!(TextureRole::Color.gl_unit(), glow::TEXTURE0);
    }

    #[test]
    fn depth_role_uses_unit_one() {
        assert_eq!(TextureRole::Depth.unit(), 1);
        assert_eq!(TextureRole::Depth.gl_unit(), glow::TEXTURE1);
    }

    #[test]
    fn check_upload_accepts_matching_buffer() {
        assert!(check_upload(UVec2::new(8, 4), 8 * 4 * 4).is_ok());
    }

    #[test]
    fn check_upload_rejects_zero_dimensions() {
        assert!(matches!(
            check_upload(UVec2::new(0, 4), 16),
            Err(ViewerError::Decode(_))
        ));
        assert!(matches!(
            check_upload(UVec2::new(4, 0), 16),
            Err(ViewerError::Decode(_))
        ));
    }

    #[test]
    fn check_upload_rejects_empty_buffer() {
        assert!(matches!(
            check_upload(UVec2::new(4, 4), 0),
            Err(ViewerError::Decode(_))
        ));
    }

    #[test]
    fn check_upload_rejects_mismatched_length() {
        let err = check_upload(UVec2::new(4, 4), 63).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("63"), "missing actual length in: {msg}");
        assert!(msg.contains("64"), "missing expected length in: {msg}");
    }

    #[test]
    fn texture_slot_struct_has_expected_fields() {
        fn _assert_fields(slot: &TextureSlot) {
            let _texture = slot.texture;
            let _role = slot.role;
            let _size = slot.size;
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_uploads_initial_image() {
        // Would test: TextureSlot::new(gl, Color, &image) succeeds and
        // size() matches the image.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn upload_keeps_the_same_handle() {
        // Would test: handle() is identical before and after a second
        // upload with different dimensions.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn failed_upload_leaves_previous_contents() {
        // Would test: a mismatched buffer is rejected and size() still
        // reports the old dimensions.
    }
}
