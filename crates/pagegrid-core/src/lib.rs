// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagegrid — Core types, error definitions and configuration shared by the
// document and CLI crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{ConvertConfig, SizingPolicy};
pub use error::PageGridError;
pub use types::*;
