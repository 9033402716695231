// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PdfKit node — runs the selected operation over every input item.

use pdfkit_core::error::{NodeOperationError, PdfKitError, Result};
use pdfkit_core::{Item, NodeConfig, OperationParameters};
use pdfkit_document::{PdftoppmRasterizer, Rasterizer};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::description::{NodeDescription, node_description};
use crate::host::ExecutionHost;
use crate::operations::{self, MergeFields};

/// The PdfKit workflow node.
///
/// Stateless between executions: every call to [`PdfKitNode::execute`] reads
/// its parameters from the host, per item.
#[derive(Debug, Clone)]
pub struct PdfKitNode<R = PdftoppmRasterizer> {
    config: NodeConfig,
    rasterizer: R,
}

impl Default for PdfKitNode {
    fn default() -> Self {
        Self::new(NodeConfig::default())
    }
}

impl PdfKitNode {
    /// Node rendering pages with the `pdftoppm` named in `config`.
    pub fn new(config: NodeConfig) -> Self {
        let rasterizer = PdftoppmRasterizer::new(config.pdftoppm_path.clone());
        Self { config, rasterizer }
    }
}

impl<R: Rasterizer> PdfKitNode<R> {
    /// Swap the page renderer used by `pdfToImages`.
    pub fn with_rasterizer<T: Rasterizer>(self, rasterizer: T) -> PdfKitNode<T> {
        PdfKitNode {
            config: self.config,
            rasterizer,
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn description(&self) -> NodeDescription {
        node_description()
    }

    /// Process `items` in order, one output item per input item.
    ///
    /// A failing item aborts the run with its index, unless the host is in
    /// continue-on-fail mode: then it is replaced by an error item in the same
    /// position and the remaining items still run.
    pub async fn execute<H: ExecutionHost>(
        &self,
        host: &H,
        items: Vec<Item>,
    ) -> std::result::Result<Vec<Item>, NodeOperationError> {
        info!(items = items.len(), "Executing PdfKit node");
        let mut output = Vec::with_capacity(items.len());

        for (item_index, mut item) in items.into_iter().enumerate() {
            let span = info_span!("item", index = item_index);
            match self
                .process_item(host, item_index, &mut item)
                .instrument(span)
                .await
            {
                Ok(()) => output.push(item),
                Err(err) if host.continue_on_fail() => {
                    warn!(item_index, %err, "Item failed, continuing");
                    output.push(Item::failed(item.json, item_index, err.to_string()));
                }
                Err(err) => return Err(NodeOperationError::new(item_index, err)),
            }
        }

        Ok(output)
    }

    async fn process_item<H: ExecutionHost>(
        &self,
        host: &H,
        item_index: usize,
        item: &mut Item,
    ) -> Result<()> {
        if item.binary.is_empty() {
            return Err(PdfKitError::MissingBinaryData);
        }

        let parameters = operations::resolve_parameters(host, item_index)?;
        debug!(operation = %parameters.operation(), "Parameters resolved");

        match parameters {
            OperationParameters::ImagesToPdf {
                output_key,
                pdf_name,
                keep_images,
            } => operations::images_to_pdf(
                host,
                &self.config,
                item_index,
                item,
                &output_key,
                &pdf_name,
                keep_images,
            ),
            OperationParameters::MergePdfs {
                output_key,
                pdf_name,
                first_pdf_field,
                second_pdf_field,
                keep_source_pdfs,
            } => {
                let fields = MergeFields {
                    first_pdf_field: &first_pdf_field,
                    second_pdf_field: &second_pdf_field,
                    output_key: &output_key,
                    pdf_name: &pdf_name,
                };
                operations::merge_pdfs(host, item_index, item, &fields, keep_source_pdfs)
            }
            OperationParameters::PdfToImages {
                pdf_field,
                output_prefix,
                keep_source_pdf,
            } => {
                operations::pdf_to_images(
                    host,
                    &self.config,
                    &self.rasterizer,
                    item_index,
                    item,
                    &pdf_field,
                    &output_prefix,
                    keep_source_pdf,
                )
                .await
            }
        }
    }
}
