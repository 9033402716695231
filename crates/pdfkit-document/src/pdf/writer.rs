// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — compose a PDF from raster images using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use pdfkit_core::error::PdfKitError;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::image::DecodedImage;

/// Millimetres per PostScript point.
const MM_PER_PT: f32 = 25.4 / 72.0;

/// At 72 dpi one image pixel covers exactly one point.
const PIXELS_PER_INCH: f32 = 72.0;

/// Builds a PDF with one page per image, each page sized to its image.
///
/// There is no empty state: a builder always starts from its first image, so
/// finishing can never produce a page-less document.
///
/// ```ignore
/// let mut builder = ImagePdfBuilder::from_first_image("Album", &first)?;
/// builder.append_image(&second)?;
/// let pdf_bytes = builder.finish();
/// ```
pub struct ImagePdfBuilder {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
}

impl ImagePdfBuilder {
    /// Start a document whose first page is sized to and filled by `image_bytes`.
    #[instrument(skip(image_bytes), fields(bytes_len = image_bytes.len()))]
    pub fn from_first_image(title: &str, image_bytes: &[u8]) -> Result<Self, PdfKitError> {
        info!(title, "Starting image PDF");
        let mut builder = Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
        };
        builder.append_image(image_bytes)?;
        Ok(builder)
    }

    /// Append a page sized to `image_bytes` and draw the image across it.
    ///
    /// Returns the page size in points.
    #[instrument(skip_all, fields(page = self.pages.len() + 1, bytes_len = image_bytes.len()))]
    pub fn append_image(&mut self, image_bytes: &[u8]) -> Result<(u32, u32), PdfKitError> {
        let decoded = DecodedImage::from_bytes(image_bytes)?;
        let (width, height) = (decoded.width(), decoded.height());

        let raw = RawImage {
            pixels: RawImageData::U8(decoded.into_rgb8()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.doc.add_image(&raw);

        // Zero margin: the image sits at the origin at its native size.
        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(PIXELS_PER_INCH),
                rotate: None,
            },
        }];

        self.pages.push(PdfPage::new(
            points_to_mm(width),
            points_to_mm(height),
            ops,
        ));

        debug!(width, height, "Image page added");
        Ok((width, height))
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialise the document.
    pub fn finish(mut self) -> Vec<u8> {
        let page_count = self.pages.len();
        self.doc.with_pages(self.pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(
            pages = page_count,
            warnings = warnings.len(),
            output_bytes = output.len(),
            "Image PDF serialised"
        );
        output
    }
}

fn points_to_mm(points: u32) -> Mm {
    Mm(points as f32 * MM_PER_PT)
}
