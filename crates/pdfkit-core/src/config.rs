// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Node configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable overriding the `pdftoppm` binary.
pub const ENV_PDFTOPPM: &str = "PDFKIT_PDFTOPPM";
/// Environment variable overriding the render resolution.
pub const ENV_RASTER_DPI: &str = "PDFKIT_RASTER_DPI";
/// Environment variable overriding the root of render workspaces.
pub const ENV_TEMP_DIR: &str = "PDFKIT_TEMP_DIR";

/// Process-level settings for the node. Per-item settings come from the host
/// as [`crate::OperationParameters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Rasteriser binary used by `pdfToImages`.
    pub pdftoppm_path: PathBuf,
    /// Resolution pages are rendered at (72 dpi = one pixel per point).
    pub raster_dpi: u32,
    /// Where render workspaces are created; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// Title written into generated PDFs.
    pub document_title: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            pdftoppm_path: PathBuf::from("pdftoppm"),
            raster_dpi: 72,
            temp_dir: None,
            document_title: "PdfKit".to_string(),
        }
    }
}

impl NodeConfig {
    /// Defaults, overridden by the `PDFKIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`. Unusable values are logged and skipped.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ENV_PDFTOPPM).filter(|v| !v.trim().is_empty()) {
            self.pdftoppm_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_RASTER_DPI) {
            match raw.trim().parse::<u32>() {
                Ok(dpi) if dpi > 0 => self.raster_dpi = dpi,
                _ => warn!(value = %raw, "ignoring invalid {}", ENV_RASTER_DPI),
            }
        }

        if let Some(dir) = lookup(ENV_TEMP_DIR).filter(|v| !v.trim().is_empty()) {
            self.temp_dir = Some(PathBuf::from(dir));
        }

        self
    }
}
