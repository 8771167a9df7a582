// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF rasteriser — renders pages to RGB bitmaps at 300 DPI through PDFium,
// using the `pdfium-render` bindings.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use pagegrid_core::config::render_zoom;
use pagegrid_core::error::{PageGridError, Result};
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use crate::render::{PageImage, PageRenderer, RenderedDocument};

/// Page renderer backed by a dynamically bound PDFium library.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
    /// Scale from PDF user space (72 DPI) to the render resolution.
    zoom: f32,
}

impl PdfiumRenderer {
    /// Bind PDFium from `library_dir` if given, otherwise from the system
    /// library search path.
    #[instrument(skip_all, fields(library_dir = ?library_dir))]
    pub fn bind(library_dir: Option<&Path>) -> Result<Self> {
        let bindings = match library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|err| PageGridError::RendererUnavailable(format!("{err:?}")))?;

        info!("PDFium bound");

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            zoom: render_zoom(),
        })
    }
}

impl PageRenderer for PdfiumRenderer {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RenderedDocument + 'a>> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|err| PageGridError::DocumentOpen {
                path: path.to_path_buf(),
                reason: format!("{err:?}"),
            })?;

        debug!(pages = document.pages().len(), "PDF opened");

        Ok(Box::new(PdfiumSource {
            document,
            path: path.to_path_buf(),
            zoom: self.zoom,
        }))
    }
}

/// One open PDF. PDFium closes the document when this is dropped.
struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
    zoom: f32,
}

impl RenderedDocument for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn render_page(&mut self, index: usize) -> Result<PageImage> {
        let page_error = |reason: String| PageGridError::PageRender {
            page: index + 1,
            reason,
        };

        let page = self
            .document
            .pages()
            .get(index as PdfPageIndex)
            .map_err(|err| page_error(format!("{err:?}")))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(self.zoom);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|err| page_error(format!("{err:?}")))?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
            .ok_or_else(|| page_error(format!("bitmap buffer does not match {width}x{height}")))?;

        debug!(width, height, "Page rendered");

        Ok(PageImage::new(index, DynamicImage::ImageRgba8(rgba).to_rgb8()))
    }
}

impl Drop for PdfiumSource<'_> {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "PDF closed");
    }
}
