// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for pagegrid.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::FailureKind;

/// Top-level error type for all pagegrid operations.
#[derive(Debug, Error)]
pub enum PageGridError {
    // -- Per-document / per-page errors --
    #[error("input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("error opening input file {}: {reason}", path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    /// `page` is 1-based.
    #[error("page {page} could not be rendered: {reason}")]
    PageRender { page: usize, reason: String },

    #[error("cell ({row}, {column}) is outside the grid ({rows} rows x {columns} columns)")]
    Placement {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    // -- Batch-level errors --
    #[error("failed to save output to {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },

    #[error("no input files selected")]
    NoInputs,

    #[error("output file path not set")]
    NoOutput,

    #[error("unsupported output format: {0}")]
    UnsupportedOutput(String),

    // -- Collaborators --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("page renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PageGridError {
    /// How this error is classified when recorded against a batch item.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::MissingFile(_) => FailureKind::MissingFile,
            Self::DocumentOpen { .. } => FailureKind::DocumentOpen,
            Self::Placement { .. } => FailureKind::Placement,
            Self::Save { .. } => FailureKind::Save,
            // Anything else raised while handling a single page costs only
            // that page.
            _ => FailureKind::PageRender,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PageGridError>;
