// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mergePDFs — concatenate two PDF attachments, first then second.

use pdfkit_core::error::{FieldRole, Result};
use pdfkit_core::{DocumentType, Item};
use pdfkit_document::PdfMerger;
use tracing::{info, instrument};

use super::require_field;
use crate::host::ExecutionHost;

/// Keys and names a merge works with.
pub(crate) struct MergeFields<'a> {
    pub first_pdf_field: &'a str,
    pub second_pdf_field: &'a str,
    pub output_key: &'a str,
    pub pdf_name: &'a str,
}

#[instrument(skip(host, item, merge), fields(
    first = merge.first_pdf_field,
    second = merge.second_pdf_field,
    output_key = merge.output_key,
))]
pub(crate) fn merge_pdfs<H: ExecutionHost>(
    host: &H,
    item_index: usize,
    item: &mut Item,
    merge: &MergeFields<'_>,
    keep_source_pdfs: bool,
) -> Result<()> {
    require_field(item, FieldRole::FirstPdf, merge.first_pdf_field)?;
    require_field(item, FieldRole::SecondPdf, merge.second_pdf_field)?;

    let first = host.binary_buffer(item_index, item, merge.first_pdf_field)?;
    let second = host.binary_buffer(item_index, item, merge.second_pdf_field)?;

    let mut merger = PdfMerger::new();
    merger.add(&first)?;
    merger.add(&second)?;
    let merged = merger.save_as_buffer()?;

    let file_name = format!("{}.{}", merge.pdf_name, DocumentType::Pdf.extension());
    let attachment = host.prepare_binary(
        merged,
        &file_name,
        Some(DocumentType::Pdf.mime_type()),
    )?;

    item.binary.insert(merge.output_key.to_string(), attachment);
    if !keep_source_pdfs {
        // Sources that share the output key were just overwritten; keep the output.
        for key in [merge.first_pdf_field, merge.second_pdf_field] {
            if key != merge.output_key {
                item.binary.shift_remove(key);
            }
        }
    }

    info!(%file_name, "PDFs merged");
    Ok(())
}
