// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfkit-document — Document libraries behind the PdfKit node.
//
// Provides image decoding, image-to-PDF composition,
// PDF merging and inspection, and page rasterisation through an external
// renderer inside a scoped temporary workspace.

pub mod image;
pub mod pdf;
pub mod raster;

// Re-export the primary structs so callers can use `pdfkit_document::PdfMerger` etc.
pub use self::image::decode::DecodedImage;
pub use pdf::merge::PdfMerger;
pub use pdf::reader::{PageSize, PdfReader};
pub use pdf::writer::ImagePdfBuilder;
pub use raster::pdftoppm::PdftoppmRasterizer;
pub use raster::workspace::{RenderOptions, RenderedPage, render_pages};
pub use raster::{RasterFormat, RasterRequest, Rasterizer};
