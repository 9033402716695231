// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — composing PDFs from images, merging, and inspecting PDFs.

pub mod merge;
pub mod reader;
pub mod writer;

pub use merge::PdfMerger;
pub use reader::{PageSize, PdfReader};
pub use writer::ImagePdfBuilder;
