// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for PdfKit.

use std::fmt;

use thiserror::Error;

/// Which source parameter a missing attachment key was configured through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    FirstPdf,
    SecondPdf,
    Pdf,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FirstPdf => "First PDF",
            Self::SecondPdf => "Second PDF",
            Self::Pdf => "PDF",
        };
        f.write_str(label)
    }
}

/// Top-level error type for all PdfKit operations.
#[derive(Debug, Error)]
pub enum PdfKitError {
    // -- Item errors --
    #[error("No binary data exists on item!")]
    MissingBinaryData,

    #[error("{role} field \"{key}\" does not exist on item!")]
    MissingField { role: FieldRole, key: String },

    #[error("binary data \"{0}\" could not be read from item")]
    BinaryNotFound(String),

    #[error("no image binary data found on item to convert into a PDF")]
    NoImages,

    #[error("invalid node parameters: {0}")]
    InvalidParameters(String),

    // -- Library errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("rasterisation failed: {0}")]
    RasterError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A failure raised while processing one item, tagged with that item's index
/// so the host can correlate it upstream.
#[derive(Debug, Error)]
#[error("{source} [item {item_index}]")]
pub struct NodeOperationError {
    pub item_index: usize,
    #[source]
    pub source: PdfKitError,
}

impl NodeOperationError {
    pub fn new(item_index: usize, source: PdfKitError) -> Self {
        Self { item_index, source }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PdfKitError>;
