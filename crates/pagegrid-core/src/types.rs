// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the pagegrid batch converter.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PageGridError, Result};

/// One input file, probed once at batch start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub path: PathBuf,
    /// Whether `path` resolved to an existing regular file when probed.
    pub exists: bool,
}

impl SourceDocument {
    /// Record `path` together with its current existence on disk.
    pub fn probe(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let exists = path.is_file();
        Self { path, exists }
    }

    /// Probe every path, preserving input order.
    pub fn probe_all<I, P>(paths: I) -> Vec<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().map(Self::probe).collect()
    }
}

/// Logical address of a cell in the output grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Display size of an embedded image, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementSize {
    pub width_in: f32,
    pub height_in: f32,
}

impl PlacementSize {
    /// Size used for the first row of the grid.
    pub const FIRST_ROW: Self = Self {
        width_in: 1.7,
        height_in: 1.2,
    };

    /// Size used for every row after the first.
    pub const LATER_ROWS: Self = Self {
        width_in: 2.0,
        height_in: 1.5,
    };

    /// Width and height in EMU (914 400 per inch), rounded to the nearest unit.
    pub fn to_emu(self) -> (u32, u32) {
        let emu = |inches: f32| (f64::from(inches) * crate::config::EMU_PER_INCH as f64).round() as u32;
        (emu(self.width_in), emu(self.height_in))
    }

    /// Width and height in PDF points (72 per inch).
    pub fn to_points(self) -> (f32, f32) {
        (self.width_in * 72.0, self.height_in * 72.0)
    }
}

/// Output artifact format, chosen from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Word document with one table (the default).
    Docx,
    /// Paginated PDF contact sheet with the same grid.
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Validate an output path and decide its format.
    ///
    /// An empty path is rejected, a path without an extension gets `.docx`
    /// appended, and any extension other than `docx` or `pdf` is rejected.
    pub fn resolve(path: &Path) -> Result<(PathBuf, Self)> {
        if path.as_os_str().is_empty() {
            return Err(PageGridError::NoOutput);
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            None => Ok((path.with_extension(Self::Docx.extension()), Self::Docx)),
            Some(ext) => Self::from_extension(ext)
                .map(|format| (path.to_path_buf(), format))
                .ok_or_else(|| PageGridError::UnsupportedOutput(ext.to_string())),
        }
    }
}

/// Classification of a recorded batch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Input path does not exist. The document is skipped.
    MissingFile,
    /// Source document could not be opened. The document is skipped.
    DocumentOpen,
    /// A single page failed to render or encode. The page is skipped.
    PageRender,
    /// A cell was addressed outside the grid. The page is lost.
    Placement,
    /// The output artifact could not be written. Fatal for the batch.
    Save,
}

impl FailureKind {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Save)
    }
}

/// One failure recorded during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Input document, or the output path for a save failure.
    pub path: PathBuf,
    /// 1-based page number when the failure concerns a single page.
    pub page: Option<usize>,
    pub kind: FailureKind,
    pub message: String,
}

impl ItemFailure {
    /// Record `error` against a whole document (or the output artifact).
    pub fn for_document(path: impl Into<PathBuf>, error: &PageGridError) -> Self {
        Self {
            path: path.into(),
            page: None,
            kind: error.failure_kind(),
            message: error.to_string(),
        }
    }

    /// Record a failed save of the output artifact at `path`. `reason` is the
    /// underlying cause only.
    pub fn for_save(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            page: None,
            kind: FailureKind::Save,
            message: reason.into(),
        }
    }

    /// Record `error` against one page (1-based) of a document.
    pub fn for_page(path: impl Into<PathBuf>, page: usize, error: &PageGridError) -> Self {
        Self {
            path: path.into(),
            page: Some(page),
            kind: error.failure_kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.page) {
            (FailureKind::Save, _) => write!(
                f,
                "failed to save output to {}: {}",
                self.path.display(),
                self.message
            ),
            (_, Some(_)) => write!(f, "{}: {}", self.path.display(), self.message),
            // Document-level messages already name the file.
            (_, None) => f.write_str(&self.message),
        }
    }
}

/// Snapshot handed to the progress callback after every page attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Pages attempted so far, successful or not.
    pub current: usize,
    /// Best current estimate of the pages the batch will attempt.
    pub total: usize,
}

/// Summary of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub documents: usize,
    pub pages_attempted: usize,
    pub pages_placed: usize,
    /// Failures in the order they were encountered.
    pub failures: Vec<ItemFailure>,
    /// Where the artifact was written; `None` when the save failed.
    pub output: Option<PathBuf>,
}

impl BatchResult {
    pub fn is_saved(&self) -> bool {
        self.output.is_some()
    }

    /// The fatal save failure, if any.
    pub fn save_failure(&self) -> Option<&ItemFailure> {
        self.failures.iter().find(|failure| failure.kind.is_fatal())
    }

    /// Surface a failed save as an error, keeping per-item failures in `Ok`.
    pub fn into_result(self) -> Result<Self> {
        match self.save_failure() {
            Some(failure) => Err(PageGridError::Save {
                path: failure.path.clone(),
                reason: failure.message.clone(),
            }),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_appends_docx_extension() {
        let (path, format) = OutputFormat::resolve(Path::new("out/sheet")).expect("resolve");
        assert_eq!(path, PathBuf::from("out/sheet.docx"));
        assert_eq!(format, OutputFormat::Docx);
    }

    #[test]
    fn resolve_accepts_pdf_case_insensitively() {
        let (path, format) = OutputFormat::resolve(Path::new("sheet.PDF")).expect("resolve");
        assert_eq!(path, PathBuf::from("sheet.PDF"));
        assert_eq!(format, OutputFormat::Pdf);
    }

    #[test]
    fn resolve_rejects_empty_and_unknown() {
        assert!(matches!(
            OutputFormat::resolve(Path::new("")),
            Err(PageGridError::NoOutput)
        ));
        assert!(matches!(
            OutputFormat::resolve(Path::new("sheet.odt")),
            Err(PageGridError::UnsupportedOutput(ext)) if ext == "odt"
        ));
    }

    #[test]
    fn placement_sizes_in_emu() {
        assert_eq!(PlacementSize::FIRST_ROW.to_emu(), (1_554_480, 1_097_280));
        assert_eq!(PlacementSize::LATER_ROWS.to_emu(), (1_828_800, 1_371_600));
    }

    #[test]
    fn probe_flags_missing_files() {
        let doc = SourceDocument::probe("/definitely/not/here.pdf");
        assert!(!doc.exists);
    }

    #[test]
    fn into_result_surfaces_save_failure() {
        let now = Utc::now();
        let result = BatchResult {
            started_at: now,
            finished_at: now,
            documents: 1,
            pages_attempted: 2,
            pages_placed: 2,
            failures: vec![ItemFailure::for_save("out.docx", "read-only")],
            output: None,
        };

        assert!(!result.is_saved());
        assert_eq!(result.save_failure().map(|failure| failure.kind), Some(FailureKind::Save));
        match result.into_result() {
            Err(err) => assert_eq!(err.to_string(), "failed to save output to out.docx: read-only"),
            Ok(_) => panic!("save failure must surface as an error"),
        }
    }
}
