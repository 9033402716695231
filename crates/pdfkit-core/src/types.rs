// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the PdfKit node: pipeline items and their attachments.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered attachment map of an item, keyed by binary property name.
///
/// Order matters: `imagesToPDF` lays out pages in key order, so removals must
/// use `shift_remove` to keep the remaining keys where they were.
pub type BinaryMap = IndexMap<String, Attachment>;

/// Coarse attachment category, derived from the MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Pdf,
    Text,
    Json,
    Html,
    Audio,
    Video,
}

impl FileType {
    /// Category for a MIME type, `None` for anything without a category
    /// (e.g. `application/octet-stream`).
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let mime = mime_type.to_ascii_lowercase();
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence {
            "application/pdf" => Some(Self::Pdf),
            "application/json" => Some(Self::Json),
            "text/html" => Some(Self::Html),
            m if m.starts_with("image/") => Some(Self::Image),
            m if m.starts_with("text/") => Some(Self::Text),
            m if m.starts_with("audio/") => Some(Self::Audio),
            m if m.starts_with("video/") => Some(Self::Video),
            _ => None,
        }
    }
}

/// Document formats the node reads or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
    PlainText,
    Json,
}

impl DocumentType {
    /// MIME type string stored on the attachment.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Webp => "image/webp",
            Self::PlainText => "text/plain",
            Self::Json => "application/json",
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
            Self::PlainText => "txt",
            Self::Json => "json",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::Webp),
            "txt" => Some(Self::PlainText),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Infer document type from the extension of a file name.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        file_extension(file_name).and_then(Self::from_extension)
    }
}

/// Extension of `file_name` (text after the last dot), if it has one.
pub fn file_extension(file_name: &str) -> Option<&str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

/// A binary attachment: raw bytes plus the metadata the host keeps with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub file_type: Option<FileType>,
    pub file_name: Option<String>,
    pub file_extension: Option<String>,
}

impl Attachment {
    /// Build an attachment from a buffer.
    ///
    /// When `mime_type` is `None` it is inferred from the extension of
    /// `file_name`, falling back to `application/octet-stream`.
    pub fn from_buffer(data: Vec<u8>, file_name: Option<&str>, mime_type: Option<&str>) -> Self {
        let mime_type = match mime_type {
            Some(mime) => mime.to_string(),
            None => file_name
                .and_then(DocumentType::from_file_name)
                .map(|doc| doc.mime_type())
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        Self {
            data,
            file_type: FileType::from_mime(&mime_type),
            file_extension: file_name.and_then(file_extension).map(str::to_string),
            file_name: file_name.map(str::to_string),
            mime_type,
        }
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_image(&self) -> bool {
        self.file_type == Some(FileType::Image)
    }
}

/// Failure recorded on an item emitted in continue-on-fail mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub message: String,
    pub item_index: usize,
}

/// One unit of pipeline data: a JSON payload plus named attachments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub json: Value,
    pub binary: BinaryMap,
    pub error: Option<ItemFailure>,
    /// Index of the input item this one was derived from, set on error items.
    pub paired_item: Option<usize>,
}

impl Item {
    pub fn new(json: Value) -> Self {
        Self {
            json,
            ..Self::default()
        }
    }

    /// Add an attachment, builder-style.
    pub fn with_binary(mut self, key: impl Into<String>, attachment: Attachment) -> Self {
        self.binary.insert(key.into(), attachment);
        self
    }

    /// Error item standing in for a failed input: keeps the payload, drops
    /// the attachments.
    pub fn failed(json: Value, item_index: usize, message: impl Into<String>) -> Self {
        Self {
            json,
            binary: BinaryMap::new(),
            error: Some(ItemFailure {
                message: message.into(),
                item_index,
            }),
            paired_item: Some(item_index),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
