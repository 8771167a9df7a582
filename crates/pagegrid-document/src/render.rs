// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rendering seam.
//
// A `PageRenderer` opens one source document at a time and hands back a
// scoped handle. The handle renders pages on demand; `pages()` walks them once,
// front to back, yielding one result per page so a bad page never hides the
// ones after it. Dropping the handle releases the underlying document.

use std::path::Path;

use image::RgbImage;
use pagegrid_core::config::RENDER_DPI;
use pagegrid_core::error::Result;

/// One rendered page. Consumed by the output builder and then dropped.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 0-based index of the page within its document.
    pub index: usize,
    /// RGB pixels, sized from the page box at [`RENDER_DPI`].
    pub pixels: RgbImage,
    pub dpi: u32,
}

impl PageImage {
    pub fn new(index: usize, pixels: RgbImage) -> Self {
        Self {
            index,
            pixels,
            dpi: RENDER_DPI,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Opens source documents for rendering.
pub trait PageRenderer {
    /// Open `path`, failing with `PageGridError::DocumentOpen` when the file
    /// is unreadable or not a document this renderer understands.
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RenderedDocument + 'a>>;
}

/// An open source document. Released when dropped.
pub trait RenderedDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render the page at `index` (0-based), failing with
    /// `PageGridError::PageRender` for that page only.
    fn render_page(&mut self, index: usize) -> Result<PageImage>;
}

/// Walk every page of `document` once, in order.
pub fn pages<'d>(document: &'d mut dyn RenderedDocument) -> Pages<'d> {
    let count = document.page_count();
    Pages {
        document,
        next: 0,
        count,
    }
}

/// Lazy, single-pass sequence of page results. Pages are rendered only when
/// the iterator is advanced.
pub struct Pages<'d> {
    document: &'d mut dyn RenderedDocument,
    next: usize,
    count: usize,
}

impl Iterator for Pages<'_> {
    /// The page index travels with the result so failures can be attributed.
    type Item = (usize, Result<PageImage>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some((index, self.document.render_page(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Pages<'_> {}
