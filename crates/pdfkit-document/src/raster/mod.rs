// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — render PDF pages to image files.
//
// Rendering is delegated to an external renderer behind the `Rasterizer`
// trait. `workspace` owns the temporary directory the renderer works in and
// reads the produced pages back in page order.

pub mod pdftoppm;
pub mod workspace;

use std::future::Future;
use std::path::Path;

use pdfkit_core::DocumentType;
use pdfkit_core::error::PdfKitError;

pub use pdftoppm::PdftoppmRasterizer;
pub use workspace::{RenderOptions, RenderedPage, render_pages};

/// Image format pages are rendered to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RasterFormat {
    #[default]
    Png,
}

impl RasterFormat {
    /// Extension of the files the renderer produces, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            Self::Png => DocumentType::Png,
        }
    }
}

/// One render job: every page of `pdf_path` into `output_dir`, file names
/// starting with `prefix`.
#[derive(Debug, Clone, Copy)]
pub struct RasterRequest<'a> {
    pub pdf_path: &'a Path,
    pub output_dir: &'a Path,
    pub prefix: &'a str,
    pub format: RasterFormat,
    pub dpi: u32,
}

/// Renders every page of a PDF file to one image file per page.
///
/// Implementations write `<prefix><separator><page number>.<extension>` files
/// into the request's output directory; zero-padding of the page number is
/// optional.
pub trait Rasterizer: Send + Sync {
    fn render(
        &self,
        request: &RasterRequest<'_>,
    ) -> impl Future<Output = Result<(), PdfKitError>> + Send;
}
