// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — counting source pages, rasterising them, and writing the
// contact-sheet variant of the output.

pub mod reader;
pub mod render;
pub mod writer;

pub use reader::PdfReader;
pub use render::PdfiumRenderer;
pub use writer::PdfWriter;
