// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render workspace — a temporary directory holding the source PDF and the
// rendered pages for the duration of one render.
//
// The directory is a `tempfile::TempDir`, so it is removed when it goes out of
// scope: on success, on `?` early returns, and on panics alike.

use std::path::{Path, PathBuf};

use pdfkit_core::error::PdfKitError;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

use super::{RasterFormat, RasterRequest, Rasterizer};

const INPUT_DIR: &str = "input";
const PAGES_DIR: &str = "pages";
const SOURCE_FILE: &str = "source.pdf";

/// Settings for one call to [`render_pages`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub prefix: String,
    pub format: RasterFormat,
    pub dpi: u32,
    /// Parent of the temporary workspace; the system temp dir when `None`.
    pub temp_root: Option<PathBuf>,
}

impl RenderOptions {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            format: RasterFormat::Png,
            dpi: 72,
            temp_root: None,
        }
    }
}

/// One rendered page, read back from the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Page number parsed from the file name, if it had one.
    pub page_number: Option<u32>,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Reject prefixes that could escape the output directory or match nothing.
pub fn validate_prefix(prefix: &str) -> Result<(), PdfKitError> {
    if prefix.is_empty() {
        return Err(PdfKitError::InvalidParameters(
            "output prefix must not be empty".to_string(),
        ));
    }
    if prefix.contains(['/', '\\']) || prefix == "." || prefix == ".." {
        return Err(PdfKitError::InvalidParameters(format!(
            "output prefix \"{}\" must be a plain file name prefix",
            prefix
        )));
    }
    Ok(())
}

/// Render every page of `pdf` with `rasterizer` and return the pages in page
/// order.
///
/// The PDF is written into a fresh temporary workspace which is removed before
/// this function returns, whatever the outcome.
#[instrument(skip(rasterizer, pdf), fields(bytes_len = pdf.len(), prefix = %options.prefix))]
pub async fn render_pages<R: Rasterizer>(
    rasterizer: &R,
    pdf: &[u8],
    options: &RenderOptions,
) -> Result<Vec<RenderedPage>, PdfKitError> {
    validate_prefix(&options.prefix)?;

    let workspace = create_workspace(options.temp_root.as_deref())?;
    debug!(path = %workspace.path().display(), "Render workspace created");

    let input_dir = workspace.path().join(INPUT_DIR);
    let pages_dir = workspace.path().join(PAGES_DIR);
    tokio::fs::create_dir(&input_dir).await?;
    tokio::fs::create_dir(&pages_dir).await?;

    let pdf_path = input_dir.join(SOURCE_FILE);
    tokio::fs::write(&pdf_path, pdf).await?;

    let request = RasterRequest {
        pdf_path: &pdf_path,
        output_dir: &pages_dir,
        prefix: &options.prefix,
        format: options.format,
        dpi: options.dpi,
    };
    rasterizer.render(&request).await?;

    let pages = collect_pages(&pages_dir, &options.prefix, options.format).await?;
    info!(pages = pages.len(), "Rendered pages collected");

    let workspace_path = workspace.path().to_path_buf();
    if let Err(err) = workspace.close() {
        warn!(path = %workspace_path.display(), %err, "Failed to remove render workspace");
    }

    Ok(pages)
}

fn create_workspace(temp_root: Option<&Path>) -> Result<TempDir, PdfKitError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("pdfkit-render-");
    let workspace = match temp_root {
        Some(root) => builder.tempdir_in(root)?,
        None => builder.tempdir()?,
    };
    Ok(workspace)
}

/// Read back every `<prefix>*.<ext>` file in `dir`, ordered by the page number
/// in its name. Files without a parsable number sort last, by name.
async fn collect_pages(
    dir: &Path,
    prefix: &str,
    format: RasterFormat,
) -> Result<Vec<RenderedPage>, PdfKitError> {
    let suffix = format!(".{}", format.extension());
    let mut found: Vec<(Option<u32>, String, PathBuf)> = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Ok(file_name) = entry.file_name().into_string() else {
            continue;
        };
        if !file_name.starts_with(prefix) || !file_name.ends_with(&suffix) {
            continue;
        }
        let number = page_number(&file_name, prefix, &suffix);
        found.push((number, file_name, entry.path()));
    }

    found.sort_by(|a, b| {
        (a.0.is_none(), a.0, &a.1).cmp(&(b.0.is_none(), b.0, &b.1))
    });

    let mut pages = Vec::with_capacity(found.len());
    for (page_number, file_name, path) in found {
        let data = tokio::fs::read(&path).await?;
        debug!(%file_name, ?page_number, bytes = data.len(), "Page read back");
        pages.push(RenderedPage {
            page_number,
            file_name,
            data,
        });
    }
    Ok(pages)
}

/// Page number between the prefix and the extension: `page-07.png`,
/// `page.7.png` and `page7.png` all give 7.
fn page_number(file_name: &str, prefix: &str, suffix: &str) -> Option<u32> {
    file_name
        .strip_prefix(prefix)?
        .strip_suffix(suffix)?
        .trim_start_matches(['-', '_', '.'])
        .parse()
        .ok()
}
