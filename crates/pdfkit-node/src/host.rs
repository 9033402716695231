// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host capability interface — what the node needs from the workflow runtime
// that executes it.

use std::collections::HashMap;

use pdfkit_core::error::{PdfKitError, Result};
use pdfkit_core::{Attachment, Item};
use serde_json::{Map, Value};

/// Capabilities the executing workflow runtime provides to the node.
///
/// Only [`ExecutionHost::node_parameter`] is mandatory. The default
/// implementations treat attachments as in-memory buffers, which is what
/// [`MemoryHost`] and most embedders want; hosts with external binary storage
/// override `binary_buffer` and `prepare_binary`.
pub trait ExecutionHost {
    /// Resolve a node parameter for the given item. `None` when unset.
    fn node_parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    /// Bytes of the attachment stored under `key` on `item`.
    fn binary_buffer(&self, item_index: usize, item: &Item, key: &str) -> Result<Vec<u8>> {
        let _ = item_index;
        item.binary
            .get(key)
            .map(|attachment| attachment.data.clone())
            .ok_or_else(|| PdfKitError::BinaryNotFound(key.to_string()))
    }

    /// Wrap produced bytes as an attachment. The MIME type is inferred from
    /// `file_name` when not given.
    fn prepare_binary(
        &self,
        data: Vec<u8>,
        file_name: &str,
        mime_type: Option<&str>,
    ) -> Result<Attachment> {
        Ok(Attachment::from_buffer(data, Some(file_name), mime_type))
    }

    /// Whether failures become error items instead of aborting the batch.
    fn continue_on_fail(&self) -> bool {
        false
    }
}

/// In-memory host: one parameter set for every item, with optional per-item
/// overrides.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    parameters: Map<String, Value>,
    item_parameters: HashMap<usize, Map<String, Value>>,
    continue_on_fail: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose parameters are the entries of a JSON object.
    pub fn from_parameters(parameters: Map<String, Value>) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    /// Set a parameter for every item.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Set a parameter for one item only, shadowing the shared value.
    pub fn with_item_parameter(
        mut self,
        item_index: usize,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.item_parameters
            .entry(item_index)
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }
}

impl ExecutionHost for MemoryHost {
    fn node_parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.item_parameters
            .get(&item_index)
            .and_then(|overrides| overrides.get(name))
            .or_else(|| self.parameters.get(name))
            .cloned()
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn item_overrides_shadow_shared_parameters() {
        let host = MemoryHost::new()
            .with_parameter("pdfName", "shared")
            .with_item_parameter(1, "pdfName", "second");

        assert_eq!(host.node_parameter("pdfName", 0), Some(json!("shared")));
        assert_eq!(host.node_parameter("pdfName", 1), Some(json!("second")));
        assert_eq!(host.node_parameter("outputKey", 1), None);
        assert!(!host.continue_on_fail());
    }

    #[test]
    fn default_buffer_lookup_reports_missing_key() {
        let host = MemoryHost::new();
        let item = Item::new(json!({}))
            .with_binary("a", Attachment::from_buffer(vec![7, 8], Some("a.bin"), None));

        assert_eq!(host.binary_buffer(0, &item, "a").unwrap(), vec![7, 8]);
        let err = host.binary_buffer(0, &item, "b").unwrap_err();
        assert!(matches!(err, PdfKitError::BinaryNotFound(key) if key == "b"));
    }

    #[test]
    fn prepared_binary_infers_pdf_mime() {
        let attachment = MemoryHost::new()
            .prepare_binary(b"%PDF".to_vec(), "report.pdf", None)
            .unwrap();
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.file_name.as_deref(), Some("report.pdf"));
    }
}
