// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF merger — concatenate PDF buffers page by page using the `lopdf` crate.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfkit_core::error::PdfKitError;
use tracing::{debug, info, instrument, warn};

use super::reader::{INHERITABLE_PAGE_KEYS, inherited_attribute};

/// Concatenates PDFs in the order they are added.
///
/// The first source becomes the base document; pages of every later source are
/// deep-copied and appended to the base's page tree.
#[derive(Default)]
pub struct PdfMerger {
    sources: Vec<Document>,
}

impl PdfMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and queue a source PDF.
    #[instrument(skip_all, fields(source = self.sources.len() + 1, bytes_len = buffer.len()))]
    pub fn add(&mut self, buffer: &[u8]) -> Result<(), PdfKitError> {
        let document = Document::load_mem(buffer).map_err(|err| {
            PdfKitError::PdfError(format!(
                "failed to load PDF #{}: {}",
                self.sources.len() + 1,
                err
            ))
        })?;
        debug!(pages = document.get_pages().len(), "Merge source loaded");
        self.sources.push(document);
        Ok(())
    }

    /// Number of queued sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Merge all queued sources into one serialised PDF.
    #[instrument(skip(self), fields(sources = self.sources.len()))]
    pub fn save_as_buffer(self) -> Result<Vec<u8>, PdfKitError> {
        let mut sources = self.sources.into_iter();
        let mut merged = sources
            .next()
            .ok_or_else(|| PdfKitError::PdfError("no PDFs to merge".to_string()))?;

        info!(base_pages = merged.get_pages().len(), "Merging PDFs");

        for (index, other) in sources.enumerate() {
            // Page numbers are the keys of a BTreeMap, so this is page order.
            let page_ids: Vec<ObjectId> = other.get_pages().into_values().collect();
            // Reserve every page's id up front so references between pages
            // (annotation /P, link destinations) resolve to the copies.
            let mut copied: HashMap<ObjectId, ObjectId> = page_ids
                .iter()
                .map(|page_id| (*page_id, merged.new_object_id()))
                .collect();
            for page_id in &page_ids {
                clone_page_into(&other, &mut merged, *page_id, &mut copied)?;
            }
            debug!(source = index + 2, pages = page_ids.len(), "Pages appended");
        }

        let mut output = Vec::new();
        merged.save_to(&mut output).map_err(|err| {
            PdfKitError::PdfError(format!("failed to serialise merged PDF: {}", err))
        })?;

        debug!(
            pages = merged.get_pages().len(),
            output_bytes = output.len(),
            "Merge complete"
        );
        Ok(output)
    }
}

/// Clone a single page object (and its referenced resources) from `source` into
/// `target`, appending it as the last page.
///
/// `copied` maps source object ids to their copies in `target`; objects shared
/// between pages of the same source are copied once.
fn clone_page_into(
    source: &Document,
    target: &mut Document,
    page_id: ObjectId,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Result<(), PdfKitError> {
    let mut page_dict = source.get_dictionary(page_id).cloned().map_err(|err| {
        PdfKitError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
    })?;

    // /Parent is dropped below, so pull down what the page inherited from it.
    for key in INHERITABLE_PAGE_KEYS {
        if !page_dict.has(key)
            && let Some(value) = inherited_attribute(source, page_id, key)
        {
            page_dict.set(key.to_vec(), value.clone());
        }
    }

    // The copy is attached to the target's page tree below.
    page_dict.remove(b"Parent");

    let cloned_id = *copied
        .entry(page_id)
        .or_insert_with(|| target.new_object_id());
    let cloned_page = deep_clone_object(source, target, &Object::Dictionary(page_dict), copied)?;
    target.objects.insert(cloned_id, cloned_page);

    // Retrieve the document's page tree root (/Pages) and append the new page.
    let pages_id = target
        .catalog()
        .map_err(|err| PdfKitError::PdfError(format!("no catalog: {}", err)))
        .and_then(|catalog| {
            catalog
                .get(b"Pages")
                .and_then(Object::as_reference)
                .map_err(|err| PdfKitError::PdfError(format!("no /Pages reference: {}", err)))
        })?;

    let Ok(Object::Dictionary(pages_dict)) = target.get_object_mut(pages_id) else {
        return Err(PdfKitError::PdfError(
            "/Pages is not a dictionary".to_string(),
        ));
    };
    match pages_dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(cloned_id)),
        _ => pages_dict.set("Kids", vec![Object::Reference(cloned_id)]),
    }
    let count = pages_dict
        .get(b"Count")
        .and_then(Object::as_i64)
        .unwrap_or(0);
    pages_dict.set("Count", count + 1);

    // Set the cloned page's /Parent to point at the target's /Pages node.
    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

/// Deep-clone a single lopdf Object, recursively resolving references.
fn deep_clone_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object, PdfKitError> {
    match object {
        Object::Dictionary(dict) => Ok(Object::Dictionary(clone_dictionary(
            source, target, dict, copied,
        )?)),
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(deep_clone_object(source, target, item, copied)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => {
            if let Some(existing) = copied.get(ref_id) {
                return Ok(Object::Reference(*existing));
            }
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    let new_id = target.new_object_id();
                    copied.insert(*ref_id, new_id);
                    let cloned = deep_clone_object(source, target, referenced, copied)?;
                    target.objects.insert(new_id, cloned);
                    Ok(Object::Reference(new_id))
                }
                Err(err) => {
                    warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                    Ok(Object::Null)
                }
            }
        }
        Object::Stream(stream) => {
            let new_dict = clone_dictionary(source, target, &stream.dict, copied)?;
            Ok(Object::Stream(lopdf::Stream::new(
                new_dict,
                stream.content.clone(),
            )))
        }
        // Booleans, numbers, strings, names, and null carry no references.
        other => Ok(other.clone()),
    }
}

fn clone_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary, PdfKitError> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        let cloned_value = deep_clone_object(source, target, value, copied)?;
        new_dict.set(key.clone(), cloned_value);
    }
    Ok(new_dict)
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgb, RgbImage};
    use lopdf::dictionary;

    use super::*;
    use crate::image::DecodedImage;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::writer::ImagePdfBuilder;

    /// A PDF whose pages are `sizes[i]` points large.
    fn pdf_with_pages(sizes: &[(u32, u32)]) -> Vec<u8> {
        let png = |(w, h): (u32, u32)| {
            DecodedImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                w,
                h,
                Rgb([0, 0, 0]),
            )))
            .to_png_bytes()
            .unwrap()
        };
        let mut builder = ImagePdfBuilder::from_first_image("fixture", &png(sizes[0])).unwrap();
        for size in &sizes[1..] {
            builder.append_image(&png(*size)).unwrap();
        }
        builder.finish()
    }

    #[test]
    fn page_count_is_sum_in_first_then_second_order() {
        let first = pdf_with_pages(&[(11, 11), (12, 12)]);
        let second = pdf_with_pages(&[(21, 21), (22, 22), (23, 23)]);

        let mut merger = PdfMerger::new();
        merger.add(&first).unwrap();
        merger.add(&second).unwrap();
        assert_eq!(merger.source_count(), 2);

        let merged = PdfReader::from_bytes(&merger.save_as_buffer().unwrap()).unwrap();
        assert_eq!(merged.page_count(), 5);
        let widths: Vec<u32> = merged
            .page_sizes()
            .unwrap()
            .iter()
            .map(|s| s.width.round() as u32)
            .collect();
        assert_eq!(widths, vec![11, 12, 21, 22, 23]);
    }

    #[test]
    fn repeated_merge_yields_same_page_sequence() {
        let first = pdf_with_pages(&[(5, 6)]);
        let second = pdf_with_pages(&[(7, 8), (9, 10)]);
        let run = || {
            let mut merger = PdfMerger::new();
            merger.add(&first).unwrap();
            merger.add(&second).unwrap();
            PdfReader::from_bytes(&merger.save_as_buffer().unwrap())
                .unwrap()
                .page_sizes()
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn invalid_source_names_its_position() {
        let mut merger = PdfMerger::new();
        merger.add(&pdf_with_pages(&[(5, 5)])).unwrap();
        let err = merger.add(b"not a pdf").unwrap_err();
        assert!(err.to_string().contains("PDF #2"), "{err}");
    }

    #[test]
    fn empty_merger_fails() {
        assert!(PdfMerger::new().save_as_buffer().is_err());
    }

    /// One page carrying a text-field widget whose /Parent is the field.
    fn form_field_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();
        let widget_id = doc.new_object_id();
        let field_id = doc.new_object_id();

        doc.objects.insert(
            field_id,
            Object::Dictionary(dictionary! {
                "FT" => "Tx",
                "T" => Object::string_literal("name"),
                "Kids" => vec![Object::Reference(widget_id)],
            }),
        );
        doc.objects.insert(
            widget_id,
            Object::Dictionary(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Widget",
                "Rect" => vec![0.into(), 0.into(), 50.into(), 10.into()],
                "Parent" => field_id,
                "P" => page_id,
            }),
        );
        doc.objects.insert(
            page_id,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
                "Annots" => vec![Object::Reference(widget_id)],
            }),
        );
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
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
    fn widget_annotations_keep_their_field_parent() {
        let mut merger = PdfMerger::new();
        merger.add(&pdf_with_pages(&[(5, 5)])).unwrap();
        merger.add(&form_field_pdf()).unwrap();
        let merged = PdfReader::from_bytes(&merger.save_as_buffer().unwrap())
            .unwrap()
            .into_document();

        let pages = merged.get_pages();
        assert_eq!(pages.len(), 2);
        let page_id = pages[&2];
        let page = merged.get_dictionary(page_id).unwrap();
        let widget_id = page.get(b"Annots").unwrap().as_array().unwrap()[0]
            .as_reference()
            .unwrap();
        let widget = merged.get_dictionary(widget_id).unwrap();

        // /P points at the copied page, not at a second copy of it.
        assert_eq!(widget.get(b"P").unwrap().as_reference().unwrap(), page_id);

        let field_id = widget.get(b"Parent").unwrap().as_reference().unwrap();
        let field = merged.get_dictionary(field_id).unwrap();
        assert!(matches!(field.get(b"FT"), Ok(Object::Name(name)) if name == b"Tx"));
        let kids = field.get(b"Kids").unwrap().as_array().unwrap();
        assert_eq!(kids[0].as_reference().unwrap(), widget_id);

        // The page itself hangs off the merged page tree.
        let pages_id = merged
            .catalog()
            .unwrap()
            .get(b"Pages")
            .unwrap()
            .as_reference()
            .unwrap();
        assert_eq!(page.get(b"Parent").unwrap().as_reference().unwrap(), pages_id);
    }
}
