// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image decoding for page composition, using the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use pdfkit_core::error::PdfKitError;
use tracing::{debug, instrument};

/// A fully decoded image, ready to be placed on a PDF page.
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    /// Decode raw encoded bytes (PNG, JPEG, GIF, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PdfKitError> {
        let image = image::load_from_memory(data)
            .map_err(|err| PdfKitError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the image and return packed RGB8 pixels. Alpha is dropped.
    pub fn into_rgb8(self) -> Vec<u8> {
        self.image.to_rgb8().into_raw()
    }

    /// Encode the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, PdfKitError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| PdfKitError::ImageError(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
        DecodedImage::from_dynamic(DynamicImage::ImageRgb8(img))
            .to_png_bytes()
            .unwrap()
    }

    #[test]
    fn decode_keeps_dimensions_and_pixels() {
        let decoded = DecodedImage::from_bytes(&png(3, 2)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        let raw = decoded.into_rgb8();
        assert_eq!(raw.len(), 3 * 2 * 3);
        assert_eq!(&raw[..3], &[200, 30, 30]);
    }

    #[test]
    fn garbage_is_an_image_error() {
        let err = DecodedImage::from_bytes(b"definitely not an image").err().unwrap();
        assert!(matches!(err, PdfKitError::ImageError(_)));
        assert!(DecodedImage::from_bytes(b"%PDF-1.5").is_err());
    }
}
