// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer — materialises the output grid as a Word document holding a
// single bordered table, one picture per cell, using `docx-rs`.
//
// docx-rs builds documents by value, so placements are collected in an
// `OutputGrid` and the document tree is assembled once, at save time.

use std::path::Path;

use docx_rs::{Docx, Paragraph, Pic, Run, Table, TableCell, TableRow};
use pagegrid_core::error::{PageGridError, Result};
use pagegrid_core::types::{GridCell, PlacementSize};
use tracing::{debug, info, instrument};

use crate::grid::{CellImage, GridDocument, OutputGrid, write_atomically};
use crate::image::EncodedImage;
use crate::layout::GrowableGrid;

const TWIPS_PER_INCH: f32 = 1440.0;

/// Horizontal room left around a picture inside its cell.
const CELL_PADDING_IN: f32 = 0.15;

/// Builds a `.docx` file containing one table of placed page images.
pub struct DocxWriter {
    grid: OutputGrid,
}

impl DocxWriter {
    pub fn new(columns: usize) -> Self {
        Self {
            grid: OutputGrid::new(columns),
        }
    }

    /// Assemble the document tree from the current grid.
    fn build(&self) -> Docx {
        let mut rows: Vec<TableRow> = self
            .grid
            .rows()
            .iter()
            .map(|row| TableRow::new(row.iter().map(|cell| build_cell(cell)).collect()))
            .collect();

        // A table needs at least one row to be a valid document part.
        if rows.is_empty() {
            rows.push(TableRow::new(
                (0..self.grid.columns()).map(|_| build_cell(&[])).collect(),
            ));
        }

        let column_width = column_width_twips(&self.grid);
        let table = Table::new(rows).set_grid(vec![column_width; self.grid.columns()]);

        Docx::new().add_table(table)
    }
}

/// A cell starts with an empty paragraph; each image follows in its own.
fn build_cell(images: &[CellImage]) -> TableCell {
    images.iter().fold(
        TableCell::new().add_paragraph(Paragraph::new()),
        |cell, placed| {
            let (width_emu, height_emu) = placed.size.to_emu();
            let pic = Pic::new_with_dimensions(
                placed.image.png.clone(),
                placed.image.width_px,
                placed.image.height_px,
            )
            .size(width_emu, height_emu);
            cell.add_paragraph(Paragraph::new().add_run(Run::new().add_image(pic)))
        },
    )
}

/// Width that fits the widest picture in the grid, plus padding.
fn column_width_twips(grid: &OutputGrid) -> usize {
    let widest_in = grid
        .rows()
        .iter()
        .flatten()
        .flatten()
        .map(|placed| placed.size.width_in)
        .fold(PlacementSize::FIRST_ROW.width_in, f32::max);
    ((widest_in + CELL_PADDING_IN) * TWIPS_PER_INCH).round() as usize
}

impl GrowableGrid for DocxWriter {
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

impl GridDocument for DocxWriter {
    fn place_image(
        &mut self,
        cell: GridCell,
        image: EncodedImage,
        size: PlacementSize,
    ) -> Result<()> {
        self.grid.place(cell, image, size)
    }

    #[instrument(skip_all, fields(path = %path.display(), images = self.grid.image_count()))]
    fn save(&mut self, path: &Path) -> Result<()> {
        let docx = self.build();
        debug!(rows = self.grid.row_count(), "DOCX tree assembled");

        write_atomically(path, |file| {
            docx.build().pack(file).map_err(|err| PageGridError::Save {
                path: path.to_path_buf(),
                reason: format!("DOCX packaging failed: {err}"),
            })
        })?;

        info!("Wrote DOCX grid to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;
    use crate::image::ImageProcessor;
    use crate::render::PageImage;

    fn sample_image(shade: u8) -> EncodedImage {
        let page = PageImage::new(0, RgbImage::from_pixel(30, 40, Rgb([shade, shade, shade])));
        ImageProcessor::from_page(page).encode().expect("encode")
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn saves_a_zip_package_with_document_part() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("grid.docx");

        let mut writer = DocxWriter::new(3);
        writer.ensure_row(1);
        for (i, column) in [0usize, 1, 2, 0].into_iter().enumerate() {
            let row = i / 3;
            let size = if row == 0 {
                PlacementSize::FIRST_ROW
            } else {
                PlacementSize::LATER_ROWS
            };
            writer
                .place_image(GridCell::new(row, column), sample_image(i as u8 * 40), size)
                .expect("place");
        }
        writer.save(&path).expect("save");

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(&bytes[..2], b"PK");
        assert!(contains(&bytes, b"word/document.xml"));
    }

    #[test]
    fn empty_grid_still_saves() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.docx");
        DocxWriter::new(3).save(&path).expect("save");
        assert!(path.is_file());
    }

    #[test]
    fn save_into_missing_directory_is_a_save_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing/grid.docx");
        let err = DocxWriter::new(3).save(&path).expect_err("must fail");
        assert!(matches!(err, PageGridError::Save { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn column_width_follows_widest_picture() {
        let mut writer = DocxWriter::new(2);
        assert_eq!(column_width_twips(&writer.grid), 2664);

        writer.ensure_row(1);
        writer
            .place_image(GridCell::new(1, 0), sample_image(0), PlacementSize::LATER_ROWS)
            .expect("place");
        assert_eq!(column_width_twips(&writer.grid), 3096);
    }
}
