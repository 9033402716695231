// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and inspect existing PDF documents using the `lopdf` crate.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfkit_core::error::PdfKitError;
use tracing::{debug, info, instrument};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub(crate) const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Page dimensions in points, taken from the page's MediaBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// Whether this size matches `width` x `height` within rounding error.
    pub fn approx_eq(&self, width: f32, height: f32) -> bool {
        (self.width - width).abs() < 0.05 && (self.height - height).abs() < 0.05
    }
}

/// Read-only view of an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfKitError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PdfKitError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PdfKitError> {
        let document = Document::load_mem(data).map_err(|err| {
            PdfKitError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// MediaBox size of every page, in page order.
    pub fn page_sizes(&self) -> Result<Vec<PageSize>, PdfKitError> {
        self.document
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| {
                let media_box = inherited_attribute(&self.document, page_id, b"MediaBox")
                    .ok_or_else(|| {
                        PdfKitError::PdfError(format!("page {} has no MediaBox", page_number))
                    })?;
                page_size_from_box(&self.document, media_box)
            })
            .collect()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Look up `key` on a page dictionary, walking up `/Parent` links when the
/// page itself does not carry it.
pub(crate) fn inherited_attribute<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = document.get_dictionary(page_id).ok();
    // Bounded walk; malformed files can contain /Parent cycles.
    for _ in 0..64 {
        let dict: &Dictionary = current?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|parent| document.get_dictionary(parent))
            .ok();
    }
    None
}

fn page_size_from_box(document: &Document, media_box: &Object) -> Result<PageSize, PdfKitError> {
    let media_box = match media_box {
        Object::Reference(id) => document
            .get_object(*id)
            .map_err(|err| PdfKitError::PdfError(format!("unresolvable MediaBox: {}", err)))?,
        other => other,
    };
    let corners = media_box
        .as_array()
        .map_err(|err| PdfKitError::PdfError(format!("MediaBox is not an array: {}", err)))?
        .iter()
        .map(|value| {
            value
                .as_float()
                .map_err(|err| PdfKitError::PdfError(format!("MediaBox entry: {}", err)))
        })
        .collect::<Result<Vec<f32>, PdfKitError>>()?;

    match corners.as_slice() {
        [x0, y0, x1, y1] => Ok(PageSize {
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }),
        _ => Err(PdfKitError::PdfError(format!(
            "MediaBox has {} entries, expected 4",
            corners.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use lopdf::dictionary;

    use super::*;

    /// Two pages that inherit their MediaBox from the page tree root.
    fn inherited_media_box_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_ids: Vec<Object> = (0..2)
            .map(|_| {
                Object::Reference(doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                }))
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => 2,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn page_sizes_resolve_inherited_media_box() {
        let reader = PdfReader::from_bytes(&inherited_media_box_pdf()).unwrap();
        assert_eq!(reader.page_count(), 2);
        let sizes = reader.page_sizes().unwrap();
        assert!(sizes.iter().all(|s| s.approx_eq(612.0, 792.0)), "{sizes:?}");
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = PdfReader::from_bytes(b"GIF89a").err().unwrap();
        assert!(matches!(err, PdfKitError::PdfError(_)));
    }
}
