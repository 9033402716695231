// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfToImages — render every page of a PDF attachment to a PNG attachment.

use pdfkit_core::error::{FieldRole, PdfKitError, Result};
use pdfkit_core::{Item, NodeConfig};
use pdfkit_document::{PdfReader, RasterFormat, RenderOptions, Rasterizer, render_pages};
use tracing::{debug, info, instrument};

use super::require_field;
use crate::host::ExecutionHost;

#[instrument(skip(host, config, rasterizer, item))]
#[allow(clippy::too_many_arguments)]
pub(crate) async fn pdf_to_images<H: ExecutionHost, R: Rasterizer>(
    host: &H,
    config: &NodeConfig,
    rasterizer: &R,
    item_index: usize,
    item: &mut Item,
    pdf_field: &str,
    output_prefix: &str,
    keep_source_pdf: bool,
) -> Result<()> {
    require_field(item, FieldRole::Pdf, pdf_field)?;
    let pdf = host.binary_buffer(item_index, item, pdf_field)?;
    let expected_pages = PdfReader::from_bytes(&pdf)?.page_count();

    let options = RenderOptions {
        prefix: output_prefix.to_string(),
        format: RasterFormat::Png,
        dpi: config.raster_dpi,
        temp_root: config.temp_dir.clone(),
    };
    let pages = render_pages(rasterizer, &pdf, &options).await?;
    // The item is only rewritten once every page has an image.
    if pages.len() != expected_pages {
        return Err(PdfKitError::RasterError(format!(
            "renderer produced {} page image(s) for {} page(s)",
            pages.len(),
            expected_pages
        )));
    }

    let mime_type = options.format.document_type().mime_type();
    let mut outputs = Vec::with_capacity(pages.len());
    for (index, page) in pages.into_iter().enumerate() {
        let key = format!("{}{}", output_prefix, index + 1);
        debug!(%key, file_name = %page.file_name, "Page attached");
        let attachment = host.prepare_binary(page.data, &page.file_name, Some(mime_type))?;
        outputs.push((key, attachment));
    }

    if !keep_source_pdf {
        item.binary.shift_remove(pdf_field);
    }
    let page_count = outputs.len();
    item.binary.extend(outputs);

    info!(pages = page_count, "PDF split into images");
    Ok(())
}
