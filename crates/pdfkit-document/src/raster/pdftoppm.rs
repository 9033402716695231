// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Poppler `pdftoppm` backend for the `Rasterizer` trait.

use std::ffi::OsString;
use std::path::PathBuf;

use pdfkit_core::error::PdfKitError;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use super::{RasterFormat, RasterRequest, Rasterizer};

/// Runs the `pdftoppm` binary from Poppler.
///
/// `pdftoppm` names its output `<prefix>-<page>.<ext>`, zero-padding the page
/// number to the width of the page count.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl PdftoppmRasterizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    /// Command-line arguments for `request`.
    pub fn arguments(&self, request: &RasterRequest<'_>) -> Vec<OsString> {
        let format_flag = match request.format {
            RasterFormat::Png => "-png",
        };
        vec![
            format_flag.into(),
            "-r".into(),
            request.dpi.to_string().into(),
            request.pdf_path.as_os_str().to_owned(),
            request.output_dir.join(request.prefix).into_os_string(),
        ]
    }
}

impl Rasterizer for PdftoppmRasterizer {
    #[instrument(skip_all, fields(binary = %self.binary.display(), dpi = request.dpi))]
    async fn render(&self, request: &RasterRequest<'_>) -> Result<(), PdfKitError> {
        let args = self.arguments(request);
        debug!(?args, "Launching pdftoppm");

        let output = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                PdfKitError::RasterError(format!(
                    "failed to launch {}: {}",
                    self.binary.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfKitError::RasterError(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        info!("Pages rendered");
        Ok(())
    }
}
