// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imagesToPDF — one page per image attachment, in key order.

use pdfkit_core::error::{PdfKitError, Result};
use pdfkit_core::{DocumentType, Item, NodeConfig};
use pdfkit_document::ImagePdfBuilder;
use tracing::{debug, info, instrument};

use crate::host::ExecutionHost;

#[instrument(skip(host, config, item))]
pub(crate) fn images_to_pdf<H: ExecutionHost>(
    host: &H,
    config: &NodeConfig,
    item_index: usize,
    item: &mut Item,
    output_key: &str,
    pdf_name: &str,
    keep_images: bool,
) -> Result<()> {
    // Snapshot the keys; the map is rewritten after the document is built.
    let keys: Vec<String> = item.binary.keys().cloned().collect();

    let mut builder: Option<ImagePdfBuilder> = None;
    let mut consumed: Vec<String> = Vec::new();

    for key in keys {
        let is_image = item.binary.get(&key).is_some_and(|a| a.is_image());
        if !is_image {
            debug!(%key, "Skipping non-image attachment");
            continue;
        }

        let buffer = host.binary_buffer(item_index, item, &key)?;
        match builder.as_mut() {
            None => {
                builder = Some(ImagePdfBuilder::from_first_image(
                    &config.document_title,
                    &buffer,
                )?)
            }
            Some(document) => {
                document.append_image(&buffer)?;
            }
        }
        consumed.push(key);
    }

    let document = builder.ok_or(PdfKitError::NoImages)?;
    let page_count = document.page_count();
    let file_name = format!("{}.{}", pdf_name, DocumentType::Pdf.extension());
    let attachment = host.prepare_binary(document.finish(), &file_name, None)?;

    if !keep_images {
        for key in &consumed {
            item.binary.shift_remove(key);
        }
    }
    item.binary.insert(output_key.to_string(), attachment);

    info!(pages = page_count, %file_name, "Images converted to PDF");
    Ok(())
}
