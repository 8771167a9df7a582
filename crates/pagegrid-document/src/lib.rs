// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagegrid-document — Rendering PDF pages and packing them into a table.
//
// Provides page rasterisation (PDFium), page counting (lopdf), PNG encoding,
// the row-major grid layout engine, DOCX and PDF table writers, and the batch
// converter that ties them together.

pub mod convert;
pub mod docx;
pub mod grid;
pub mod image;
pub mod layout;
pub mod pdf;
pub mod render;

// Re-export the primary structs so callers can use `pagegrid_document::BatchConverter` etc.
pub use convert::{BatchConverter, ProgressReporter, SilentReporter};
pub use docx::DocxWriter;
pub use grid::{GridDocument, OutputGrid, open_document};
pub use image::{EncodedImage, ImageProcessor};
pub use layout::{GridLayoutEngine, GrowableGrid, Placement};
pub use pdf::{PdfReader, PdfWriter, PdfiumRenderer};
pub use render::{PageImage, PageRenderer, RenderedDocument};
