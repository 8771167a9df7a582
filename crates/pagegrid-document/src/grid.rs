// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output grid — the in-memory table every output document is built from,
// the builder contract, and the all-or-nothing file write used by `save`.

use std::fs::{self, File};
use std::path::Path;

use pagegrid_core::error::{PageGridError, Result};
use pagegrid_core::types::{GridCell, OutputFormat, PlacementSize};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use crate::docx::DocxWriter;
use crate::image::EncodedImage;
use crate::layout::GrowableGrid;
use crate::pdf::PdfWriter;

/// Builder that materialises placed images as a table-structured document.
pub trait GridDocument: GrowableGrid {
    /// Insert `image` into `cell`, drawn at `size`.
    ///
    /// Fails with `PageGridError::Placement` when the cell lies outside the
    /// current grid; callers must `ensure_row` first.
    fn place_image(&mut self, cell: GridCell, image: EncodedImage, size: PlacementSize)
    -> Result<()>;

    /// Write the document to `path`. Either the whole file appears or nothing
    /// does.
    fn save(&mut self, path: &Path) -> Result<()>;
}

/// Create an empty builder for `format` with `columns` columns.
pub fn open_document(format: OutputFormat, columns: usize) -> Box<dyn GridDocument> {
    match format {
        OutputFormat::Docx => Box::new(DocxWriter::new(columns)),
        OutputFormat::Pdf => Box::new(PdfWriter::new(columns)),
    }
}

/// One image in a cell, with its display size.
#[derive(Debug, Clone)]
pub struct CellImage {
    pub image: EncodedImage,
    pub size: PlacementSize,
}

/// Rows of fixed-width cells. Rows are appended on demand and never removed.
#[derive(Debug, Clone)]
pub struct OutputGrid {
    columns: usize,
    rows: Vec<Vec<Vec<CellImage>>>,
}

impl OutputGrid {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Make sure rows `0..=index` exist.
    pub fn ensure_row(&mut self, index: usize) {
        while self.rows.len() <= index {
            self.rows.push(vec![Vec::new(); self.columns]);
        }
    }

    /// Append `image` to the content of `cell`.
    pub fn place(&mut self, cell: GridCell, image: EncodedImage, size: PlacementSize) -> Result<()> {
        let rows = self.rows.len();
        let columns = self.columns;
        let slot = self
            .rows
            .get_mut(cell.row)
            .and_then(|row| row.get_mut(cell.column))
            .ok_or(PageGridError::Placement {
                row: cell.row,
                column: cell.column,
                rows,
                columns,
            })?;
        slot.push(CellImage { image, size });
        Ok(())
    }

    /// Rows in order; each row holds `columns` cells.
    pub fn rows(&self) -> &[Vec<Vec<CellImage>>] {
        &self.rows
    }

    /// Number of images placed anywhere in the grid.
    pub fn image_count(&self) -> usize {
        self.rows.iter().flatten().map(Vec::len).sum()
    }
}

/// Write `path` through a temporary file in the same directory, renamed into
/// place only after `write` succeeds. Every failure becomes
/// `PageGridError::Save` and leaves nothing at `path`.
///
/// The saved file gets the permissions a plain create would give it (0666
/// minus the umask), or keeps those of the file it replaces.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let save_error = |reason: String| PageGridError::Save {
        path: path.to_path_buf(),
        reason,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = staging_file(dir).map_err(|err| save_error(err.to_string()))?;
    debug!(staging = %staging.path().display(), "Writing output");

    if let Ok(existing) = fs::metadata(path) {
        staging
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(|err| save_error(err.to_string()))?;
    }

    write(staging.as_file_mut()).map_err(|err| match err {
        PageGridError::Save { .. } => err,
        other => save_error(other.to_string()),
    })?;

    staging
        .as_file()
        .sync_all()
        .map_err(|err| save_error(err.to_string()))?;
    staging
        .persist(path)
        .map_err(|err| save_error(err.error.to_string()))?;

    info!(path = %path.display(), "Output saved");
    Ok(())
}

/// Temp file in `dir`, created with the regular file-creation mode instead
/// of tempfile's owner-only default.
fn staging_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".pagegrid-");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder.tempfile_in(dir)
}
