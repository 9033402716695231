// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Node parameters — the operation selector and the per-operation settings the
// host resolves for every item.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PdfKitError, Result};

/// Parameter holding the operation selector.
pub const OPERATION_PARAMETER: &str = "operation";

/// The three document operations the node can perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[default]
    #[serde(rename = "imagesToPDF")]
    ImagesToPdf,
    #[serde(rename = "mergePDFs")]
    MergePdfs,
    #[serde(rename = "pdfToImages")]
    PdfToImages,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Self::ImagesToPdf, Self::MergePdfs, Self::PdfToImages];

    /// Value used for this operation in the `operation` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImagesToPdf => "imagesToPDF",
            Self::MergePdfs => "mergePDFs",
            Self::PdfToImages => "pdfToImages",
        }
    }

    /// Human-readable option label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ImagesToPdf => "Convert Images To PDF",
            Self::MergePdfs => "Merge PDFs",
            Self::PdfToImages => "Convert PDF To Images",
        }
    }

    /// Names of the parameters this operation reads, besides `operation`.
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            Self::ImagesToPdf => &["outputKey", "pdfName", "keepImages"],
            Self::MergePdfs => &[
                "outputKey",
                "pdfName",
                "firstPdfField",
                "secondPdfField",
                "keepSourcePdfs",
            ],
            Self::PdfToImages => &["pdfField", "outputPrefix", "keepSourcePdf"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = PdfKitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| PdfKitError::InvalidParameters(format!("unknown operation \"{s}\"")))
    }
}

fn default_output_key() -> String {
    "data".to_string()
}

fn default_output_prefix() -> String {
    "page".to_string()
}

/// Fully resolved settings for one item, tagged by operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation")]
pub enum OperationParameters {
    #[serde(rename = "imagesToPDF", rename_all = "camelCase")]
    ImagesToPdf {
        #[serde(default = "default_output_key")]
        output_key: String,
        pdf_name: String,
        #[serde(default)]
        keep_images: bool,
    },
    #[serde(rename = "mergePDFs", rename_all = "camelCase")]
    MergePdfs {
        #[serde(default = "default_output_key")]
        output_key: String,
        pdf_name: String,
        first_pdf_field: String,
        second_pdf_field: String,
        #[serde(default)]
        keep_source_pdfs: bool,
    },
    #[serde(rename = "pdfToImages", rename_all = "camelCase")]
    PdfToImages {
        pdf_field: String,
        #[serde(default = "default_output_prefix")]
        output_prefix: String,
        #[serde(default)]
        keep_source_pdf: bool,
    },
}

impl OperationParameters {
    /// Build parameters from raw values keyed by parameter name.
    ///
    /// A missing `operation` selects the default operation; `null` values
    /// count as unset so their defaults apply.
    pub fn from_values(mut values: Map<String, Value>) -> Result<Self> {
        values.retain(|_, value| !value.is_null());
        values
            .entry(OPERATION_PARAMETER)
            .or_insert_with(|| Value::String(Operation::default().as_str().to_string()));

        serde_json::from_value(Value::Object(values))
            .map_err(|err| PdfKitError::InvalidParameters(err.to_string()))
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::ImagesToPdf { .. } => Operation::ImagesToPdf,
            Self::MergePdfs { .. } => Operation::MergePdfs,
            Self::PdfToImages { .. } => Operation::PdfToImages,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn values(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn images_to_pdf_defaults_apply() {
        let params =
            OperationParameters::from_values(values(json!({"pdfName": "album"}))).unwrap();
        assert_eq!(
            params,
            OperationParameters::ImagesToPdf {
                output_key: "data".into(),
                pdf_name: "album".into(),
                keep_images: false,
            }
        );
    }

    #[test]
    fn merge_requires_both_fields() {
        let err = OperationParameters::from_values(values(json!({
            "operation": "mergePDFs",
            "pdfName": "merged",
            "firstPdfField": "a",
        })))
        .unwrap_err();
        assert!(err.to_string().contains("secondPdfField"), "{err}");
    }

    #[test]
    fn split_defaults_prefix_and_keep_flag() {
        let params = OperationParameters::from_values(values(json!({
            "operation": "pdfToImages",
            "pdfField": "doc",
            "outputPrefix": null,
        })))
        .unwrap();
        assert_eq!(
            params,
            OperationParameters::PdfToImages {
                pdf_field: "doc".into(),
                output_prefix: "page".into(),
                keep_source_pdf: false,
            }
        );
        assert_eq!(params.operation(), Operation::PdfToImages);
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let err = OperationParameters::from_values(values(json!({"operation": "rotate"})))
            .unwrap_err();
        assert!(matches!(err, PdfKitError::InvalidParameters(_)));
        assert!("rotate".parse::<Operation>().is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = OperationParameters::from_values(values(json!({
            "operation": "imagesToPDF",
            "pdfName": "x",
            "keepImages": "yes",
        })))
        .unwrap_err();
        assert!(matches!(err, PdfKitError::InvalidParameters(_)));
    }

    #[test]
    fn operation_names_parse_back() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }
}
