// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Node description — the metadata a host uses to register the node and build
// its parameter form.

use pdfkit_core::Operation;
use serde::Serialize;
use serde_json::{Value, json};

/// Registration metadata for the node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    pub group: Vec<&'static str>,
    pub version: u32,
    pub description: &'static str,
    pub defaults: NodeDefaults,
    pub inputs: Vec<&'static str>,
    pub outputs: Vec<&'static str>,
    pub properties: Vec<NodeProperty>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDefaults {
    pub name: &'static str,
}

/// Form widget type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Options,
    String,
    Boolean,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyOption {
    pub name: &'static str,
    pub value: Operation,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayOptions {
    pub show: ShowWhen,
}

/// The property is shown only while `operation` is one of these.
#[derive(Debug, Clone, Serialize)]
pub struct ShowWhen {
    pub operation: Vec<Operation>,
}

/// One parameter of the node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub default: Value,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_options: Option<DisplayOptions>,
}

impl NodeDescription {
    /// Look up a property by parameter name.
    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl NodeProperty {
    /// Whether the property is relevant to `operation`.
    pub fn applies_to(&self, operation: Operation) -> bool {
        self.display_options
            .as_ref()
            .is_none_or(|options| options.show.operation.contains(&operation))
    }
}

fn property(
    display_name: &'static str,
    name: &'static str,
    kind: PropertyType,
    default: Value,
    required: bool,
    description: &'static str,
    operations: &[Operation],
) -> NodeProperty {
    NodeProperty {
        display_name,
        name,
        kind,
        default,
        required,
        description: Some(description),
        options: Vec::new(),
        display_options: Some(DisplayOptions {
            show: ShowWhen {
                operation: operations.to_vec(),
            },
        }),
    }
}

/// Description of the PdfKit node.
pub fn node_description() -> NodeDescription {
    use Operation::{ImagesToPdf, MergePdfs, PdfToImages};
    let (text, boolean) = (PropertyType::String, PropertyType::Boolean);

    let operation = NodeProperty {
        display_name: "Operation",
        name: "operation",
        kind: PropertyType::Options,
        default: json!(Operation::default().as_str()),
        required: true,
        description: None,
        options: Operation::ALL
            .into_iter()
            .map(|op| PropertyOption {
                name: op.display_name(),
                value: op,
            })
            .collect(),
        display_options: None,
    };

    NodeDescription {
        display_name: "PdfKit",
        name: "pdfKit",
        group: vec!["transform"],
        version: 1,
        description: "Convert images to PDF, merge PDFs, and split PDFs into page images",
        defaults: NodeDefaults { name: "PDFKit" },
        inputs: vec!["main"],
        outputs: vec!["main"],
        properties: vec![
            operation,
            property(
                "Destination Key",
                "outputKey",
                text,
                json!("data"),
                true,
                "The name the binary key to copy data to",
                &[ImagesToPdf, MergePdfs],
            ),
            property(
                "PDF Name",
                "pdfName",
                text,
                json!(""),
                true,
                "The name of the output PDF",
                &[ImagesToPdf, MergePdfs],
            ),
            property(
                "Keep Images",
                "keepImages",
                boolean,
                json!(false),
                false,
                "Whether to keep images that were used in the PDF",
                &[ImagesToPdf],
            ),
            property(
                "First PDF Binary Field",
                "firstPdfField",
                text,
                json!(""),
                true,
                "The binary field containing the first PDF to merge",
                &[MergePdfs],
            ),
            property(
                "Second PDF Binary Field",
                "secondPdfField",
                text,
                json!(""),
                true,
                "The binary field containing the second PDF to merge",
                &[MergePdfs],
            ),
            property(
                "Keep Source PDFs",
                "keepSourcePdfs",
                boolean,
                json!(false),
                false,
                "Whether to keep the source PDFs in the binary data",
                &[MergePdfs],
            ),
            property(
                "PDF Binary Field",
                "pdfField",
                text,
                json!(""),
                true,
                "The binary field containing the PDF to split into images",
                &[PdfToImages],
            ),
            property(
                "Output Prefix",
                "outputPrefix",
                text,
                json!("page"),
                false,
                "Prefix of the binary keys and file names of the page images",
                &[PdfToImages],
            ),
            property(
                "Keep Source PDF",
                "keepSourcePdf",
                boolean,
                json!(false),
                false,
                "Whether to keep the source PDF in the binary data",
                &[PdfToImages],
            ),
        ],
    }
}
