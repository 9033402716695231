// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PdfKit — Core types, parameters, and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod params;
pub mod types;

pub use config::NodeConfig;
pub use error::{NodeOperationError, PdfKitError};
pub use params::{Operation, OperationParameters};
pub use types::*;
