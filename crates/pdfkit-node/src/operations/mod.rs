// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The node's three operations. Each one reads what it needs from the item,
// produces its outputs, and only then rewrites the item's attachment map.

mod images_to_pdf;
mod merge_pdfs;
mod pdf_to_images;

pub(crate) use images_to_pdf::images_to_pdf;
pub(crate) use merge_pdfs::{MergeFields, merge_pdfs};
pub(crate) use pdf_to_images::pdf_to_images;

use pdfkit_core::error::{FieldRole, PdfKitError, Result};
use pdfkit_core::params::OPERATION_PARAMETER;
use pdfkit_core::{Item, Operation, OperationParameters};
use serde_json::{Map, Value};

use crate::host::ExecutionHost;

/// Resolve the operation and its parameters for one item.
pub(crate) fn resolve_parameters<H: ExecutionHost>(
    host: &H,
    item_index: usize,
) -> Result<OperationParameters> {
    let operation_value = host.node_parameter(OPERATION_PARAMETER, item_index);
    let operation = match &operation_value {
        None | Some(Value::Null) => Operation::default(),
        Some(Value::String(name)) => name.parse()?,
        Some(other) => {
            return Err(PdfKitError::InvalidParameters(format!(
                "operation must be a string, got {other}"
            )));
        }
    };

    let mut values = Map::new();
    values.insert(
        OPERATION_PARAMETER.to_string(),
        Value::String(operation.as_str().to_string()),
    );
    for name in operation.parameter_names() {
        if let Some(value) = host.node_parameter(name, item_index) {
            values.insert((*name).to_string(), value);
        }
    }

    OperationParameters::from_values(values)
}

/// Fail unless `key` is present on the item.
fn require_field(item: &Item, role: FieldRole, key: &str) -> Result<()> {
    if item.binary.contains_key(key) {
        Ok(())
    } else {
        Err(PdfKitError::MissingField {
            role,
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    #[test]
    fn unset_operation_resolves_to_images_to_pdf() {
        let host = MemoryHost::new().with_parameter("pdfName", "album");
        let params = resolve_parameters(&host, 0).unwrap();
        assert_eq!(params.operation(), Operation::ImagesToPdf);
    }

    #[test]
    fn only_parameters_of_the_selected_operation_are_read() {
        // `keepImages` is not a merge parameter, so its bad type is irrelevant.
        let host = MemoryHost::new()
            .with_parameter("operation", "mergePDFs")
            .with_parameter("pdfName", "merged")
            .with_parameter("firstPdfField", "a")
            .with_parameter("secondPdfField", "b")
            .with_parameter("keepImages", "not a bool");
        let params = resolve_parameters(&host, 0).unwrap();
        assert_eq!(params.operation(), Operation::MergePdfs);
    }

    #[test]
    fn non_string_operation_is_rejected() {
        let host = MemoryHost::new().with_parameter("operation", 3);
        assert!(matches!(
            resolve_parameters(&host, 0),
            Err(PdfKitError::InvalidParameters(_))
        ));
    }

    #[test]
    fn operation_can_differ_per_item() {
        let host = MemoryHost::new()
            .with_parameter("pdfName", "album")
            .with_parameter("pdfField", "doc")
            .with_item_parameter(1, "operation", "pdfToImages");
        assert_eq!(
            resolve_parameters(&host, 0).unwrap().operation(),
            Operation::ImagesToPdf
        );
        assert_eq!(
            resolve_parameters(&host, 1).unwrap().operation(),
            Operation::PdfToImages
        );
    }
}
