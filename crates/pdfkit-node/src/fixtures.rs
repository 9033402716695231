// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test fixtures: generated images and PDFs, and in-process rasterisers.

use image::{DynamicImage, Rgb, RgbImage};
use pdfkit_core::error::PdfKitError;
use pdfkit_core::Attachment;
use pdfkit_document::{DecodedImage, ImagePdfBuilder, PdfReader, RasterRequest, Rasterizer};

pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 90]));
    DecodedImage::from_dynamic(DynamicImage::ImageRgb8(img))
        .to_png_bytes()
        .unwrap()
}

pub(crate) fn image_attachment(width: u32, height: u32) -> Attachment {
    Attachment::from_buffer(png(width, height), Some("img.png"), Some("image/png"))
}

/// PDF with one page per `(width, height)` pair, sizes in points.
pub(crate) fn pdf_with_pages(sizes: &[(u32, u32)]) -> Vec<u8> {
    let (first, rest) = sizes.split_first().expect("at least one page");
    let mut builder = ImagePdfBuilder::from_first_image("Fixture", &png(first.0, first.1)).unwrap();
    for (width, height) in rest {
        builder.append_image(&png(*width, *height)).unwrap();
    }
    builder.finish()
}

/// `pages`-page PDF attachment; page `n` is `10 + n` points wide.
pub(crate) fn pdf_attachment(pages: u32) -> Attachment {
    let sizes: Vec<(u32, u32)> = (1..=pages).map(|n| (10 + n, 10)).collect();
    Attachment::from_buffer(pdf_with_pages(&sizes), Some("source.pdf"), None)
}

/// Writes one unpadded `<prefix>-<n>.png` per page of the input; page `n` is
/// an `n`x1 image so tests can tell pages apart.
pub(crate) struct PageCountingRasterizer;

impl Rasterizer for PageCountingRasterizer {
    async fn render(&self, request: &RasterRequest<'_>) -> Result<(), PdfKitError> {
        let pages = PdfReader::open(request.pdf_path)?.page_count();
        for n in 1..=pages as u32 {
            let name = format!("{}-{}.png", request.prefix, n);
            tokio::fs::write(request.output_dir.join(name), png(n, 1)).await?;
        }
        Ok(())
    }
}

/// Reports success without writing any page.
pub(crate) struct SilentRasterizer;

impl Rasterizer for SilentRasterizer {
    async fn render(&self, _request: &RasterRequest<'_>) -> Result<(), PdfKitError> {
        Ok(())
    }
}

pub(crate) struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    async fn render(&self, request: &RasterRequest<'_>) -> Result<(), PdfKitError> {
        tokio::fs::write(request.output_dir.join("page-1.png"), b"partial").await?;
        Err(PdfKitError::RasterError("pdftoppm exited with status 1".into()))
    }
}
