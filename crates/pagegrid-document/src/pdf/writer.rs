// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — lays the output grid out as a paginated contact sheet using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::io::Write;
use std::path::Path;

use pagegrid_core::error::{PageGridError, Result};
use pagegrid_core::types::{GridCell, PlacementSize};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::grid::{CellImage, GridDocument, OutputGrid, write_atomically};
use crate::image::{EncodedImage, ImageProcessor};
use crate::layout::GrowableGrid;

/// US Letter, the page size the DOCX table is designed around.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;

const MARGIN_IN: f32 = 0.5;
/// Gap around each picture inside its cell.
const CELL_PADDING_IN: f32 = 0.15;
/// Height given to a row that holds no pictures (pre-sized tables).
const EMPTY_ROW_IN: f32 = 0.25;

const PT_PER_IN: f32 = 72.0;

const TITLE: &str = "Page grid";

/// Builds a PDF contact sheet with the same grid as the DOCX output.
pub struct PdfWriter {
    grid: OutputGrid,
}

impl PdfWriter {
    pub fn new(columns: usize) -> Self {
        Self {
            grid: OutputGrid::new(columns),
        }
    }

    /// Serialise the grid to PDF bytes.
    #[instrument(skip(self), fields(rows = self.grid.row_count()))]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new(TITLE);

        let page_h_pt = Mm(PAGE_HEIGHT_MM).into_pt().0;
        let margin_pt = MARGIN_IN * PT_PER_IN;
        let padding_pt = CELL_PADDING_IN * PT_PER_IN;
        let column_pt = column_width_in(&self.grid) * PT_PER_IN;

        let heights: Vec<f32> = self.grid.rows().iter().map(|row| row_height_pt(row)).collect();
        let pages = paginate(&heights, page_h_pt - 2.0 * margin_pt);

        let mut pdf_pages = Vec::with_capacity(pages.len());
        for rows_on_page in &pages {
            let mut ops: Vec<Op> = Vec::new();
            let mut top = page_h_pt - margin_pt;

            for &row_index in rows_on_page {
                for (column, cell) in self.grid.rows()[row_index].iter().enumerate() {
                    let mut cell_top = top - padding_pt / 2.0;
                    for placed in cell {
                        let (w_pt, h_pt) = placed.size.to_points();
                        let x = margin_pt + column as f32 * column_pt + padding_pt / 2.0;
                        let y = cell_top - h_pt;
                        ops.push(place_picture(&mut doc, &placed.image, x, y, w_pt, h_pt)?);
                        cell_top = y - padding_pt;
                    }
                }
                top -= heights[row_index];
            }

            pdf_pages.push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));
        }

        doc.with_pages(pdf_pages);
        debug!(pages = doc.pages.len(), "Contact sheet laid out");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }
}

/// Embed `image` and return the op that draws it at (`x`, `y`) with the given
/// size in points.
fn place_picture(
    doc: &mut PdfDocument,
    image: &EncodedImage,
    x: f32,
    y: f32,
    w_pt: f32,
    h_pt: f32,
) -> Result<Op> {
    let rgb = ImageProcessor::from_bytes(&image.png, image.dpi)?
        .into_dynamic()
        .to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let raw = RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width,
        height,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let id = doc.add_image(&raw);

    // Native size of the bitmap at its render DPI, in points.
    let dpi = image.dpi as f32;
    let native_w_pt = width as f32 / dpi * PT_PER_IN;
    let native_h_pt = height as f32 / dpi * PT_PER_IN;

    Ok(Op::UseXobject {
        id,
        transform: XObjectTransform {
            translate_x: Some(Pt(x)),
            translate_y: Some(Pt(y)),
            scale_x: Some(w_pt / native_w_pt),
            scale_y: Some(h_pt / native_h_pt),
            dpi: Some(dpi),
            rotate: None,
        },
    })
}

/// Column pitch in inches: the widest picture plus padding.
fn column_width_in(grid: &OutputGrid) -> f32 {
    grid.rows()
        .iter()
        .flatten()
        .flatten()
        .map(|placed| placed.size.width_in)
        .fold(PlacementSize::FIRST_ROW.width_in, f32::max)
        + CELL_PADDING_IN
}

/// Row pitch in points: the tallest cell's stacked pictures plus padding.
fn row_height_pt(row: &[Vec<CellImage>]) -> f32 {
    let tallest_in = row
        .iter()
        .map(|cell| {
            cell.iter()
                .map(|placed| placed.size.height_in + CELL_PADDING_IN)
                .sum::<f32>()
        })
        .fold(0.0, f32::max);

    if tallest_in == 0.0 {
        EMPTY_ROW_IN * PT_PER_IN
    } else {
        tallest_in * PT_PER_IN
    }
}

/// Split rows over pages of `usable_pt` height. Rows are never split; a row
/// taller than a page gets a page of its own. Always yields at least one page.
fn paginate(heights: &[f32], usable_pt: f32) -> Vec<Vec<usize>> {
    let mut pages: Vec<Vec<usize>> = vec![Vec::new()];
    let mut used = 0.0;

    for (index, &height) in heights.iter().enumerate() {
        let current = pages.last_mut().map(|page| !page.is_empty()).unwrap_or(false);
        if current && used + height > usable_pt {
            pages.push(Vec::new());
            used = 0.0;
        }
        if let Some(page) = pages.last_mut() {
            page.push(index);
        }
        used += height;
    }

    pages
}

impl GrowableGrid for PdfWriter {
    fn column_count(&self) -> usize {
        self.grid.columns()
    }

    fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    fn ensure_row(&mut self, index: usize) {
        self.grid.ensure_row(index);
    }
}

impl GridDocument for PdfWriter {
    fn place_image(
        &mut self,
        cell: GridCell,
        image: EncodedImage,
        size: PlacementSize,
    ) -> Result<()> {
        self.grid.place(cell, image, size)
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes().map_err(|err| PageGridError::Save {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        write_atomically(path, |file| Ok(file.write_all(&bytes)?))?;
        info!("Wrote PDF grid to {}", path.display());
        Ok(())
    }
}
