// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdfkit-node — The PdfKit workflow node.
//
// Binds the document operations in `pdfkit-document` to a workflow host:
// per-item parameter resolution, operation dispatch, attachment bookkeeping
// and the continue-on-fail error policy.

pub mod description;
pub mod host;
pub mod node;
mod operations;

#[cfg(test)]
mod fixtures;

pub use description::{NodeDescription, node_description};
pub use host::{ExecutionHost, MemoryHost};
pub use node::PdfKitNode;
