//! PNG decoding through the `image` crate.

use std::io::Cursor;

use glam::UVec2;
use image::ImageFormat;
use stillshade_core::{DecodedImage, ImageDecoder, ViewerError};

/// The one codec the viewer ships: PNG in, RGBA out.
pub struct PngDecoder;

impl ImageDecoder for PngDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, ViewerError> {
        let img = image::load(Cursor::new(bytes), ImageFormat::Png)
            .map_err(|e| ViewerError::Decode(e.to_string()))?;

        // Normalize every PNG color type (palette, gray, 16-bit) to RGBA8.
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        DecodedImage::new(UVec2::new(width, height), rgba.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_an_rgba_png() {
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        source.put_pixel(2, 1, Rgba([0, 0, 255, 128]));
        let bytes = encode_png(&source);

        let decoded = PngDecoder.decode(&bytes).unwrap();
        assert_eq!(decoded.size(), UVec2::new(3, 2));
        assert_eq!(&decoded.pixels()[..4], &[255, 0, 0, 255]);
        let last = decoded.pixels().len() - 4;
        assert_eq!(&decoded.pixels()[last..], &[0, 0, 255, 128]);
    }

    #[test]
    fn rejects_garbage_bytes() {
        let err = PngDecoder.decode(b"not a png at all").unwrap_err();
        assert!(matches!(err, ViewerError::Decode(_)));
    }

    #[test]
    fn rejects_truncated_png() {
        let source = RgbaImage::new(8, 8);
        let bytes = encode_png(&source);
        let err = PngDecoder.decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, ViewerError::Decode(_)));
    }

    #[test]
    fn buffer_length_matches_dimensions() {
        let source = RgbaImage::new(5, 7);
        let bytes = encode_png(&source);
        let decoded = PngDecoder.decode(&bytes).unwrap();
        assert_eq!(decoded.pixels().len(), 5 * 7 * 4);
    }
}
