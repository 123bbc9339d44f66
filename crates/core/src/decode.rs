//! Decoded image data and the codec seam.
//!
//! The core never parses file formats itself: hosts hand it raw file bytes
//! and an [`ImageDecoder`] that turns them into validated RGBA pixels.

use glam::UVec2;

use crate::error::ViewerError;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A decoded image: tightly packed RGBA bytes, row-major from the top-left.
///
/// Construction validates that the buffer matches the stated dimensions, so
/// GPU uploads can trust `pixels().len()` without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    size: UVec2,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Creates a decoded image after validating the pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Decode`] if either dimension is zero, the
    /// buffer is empty, or its length does not equal `width * height * 4`.
    pub fn new(size: UVec2, pixels: Vec<u8>) -> Result<Self, ViewerError> {
        if size.x == 0 || size.y == 0 {
            return Err(ViewerError::Decode(format!(
                "invalid dimensions {}x{}",
                size.x, size.y
            )));
        }
        if pixels.is_empty() {
            return Err(ViewerError::Decode("empty pixel buffer".into()));
        }
        let expected = size.x as usize * size.y as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(ViewerError::Decode(format!(
                "pixel buffer holds {} bytes but {}x{} RGBA needs {expected}",
                pixels.len(),
                size.x,
                size.y
            )));
        }
        Ok(Self { size, pixels })
    }

    /// Image dimensions in pixels.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// The raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Decodes raw file bytes into RGBA pixel data.
///
/// Object-safe so hosts can plug in whichever codec they ship; tests use
/// in-memory fakes.
pub trait ImageDecoder {
    /// Decodes `bytes` into a validated RGBA image.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Decode`] when the bytes are not a decodable
    /// image.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, ViewerError>;
}
