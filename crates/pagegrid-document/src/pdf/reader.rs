// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — structural inspection of source documents using `lopdf`.
//
// Used ahead of conversion to learn how many pages a batch holds, so the
// progress total reflects pages rather than files.

use std::path::Path;

use lopdf::Document;
use pagegrid_core::error::{PageGridError, Result};
use pagegrid_core::types::SourceDocument;
use tracing::{debug, instrument, warn};

/// Parses a PDF's object tree without rendering anything.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();

        let document = Document::load(path_ref).map_err(|err| PageGridError::DocumentOpen {
            path: path_ref.to_path_buf(),
            reason: err.to_string(),
        })?;

        debug!(pages = document.get_pages().len(), "PDF structure loaded");

        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| PageGridError::DocumentOpen {
            path: "<memory>".into(),
            reason: err.to_string(),
        })?;

        Ok(Self { document })
    }

    /// Number of pages in the document's page tree.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

/// Count the pages of every existing document, in input order.
///
/// Missing files count as zero pages. Files `lopdf` cannot parse yield `None`:
/// the renderer may still manage to open them, so their size stays unknown.
pub fn count_pages(documents: &[SourceDocument]) -> Vec<Option<usize>> {
    documents
        .iter()
        .map(|doc| {
            if !doc.exists {
                return Some(0);
            }
            match PdfReader::open(&doc.path) {
                Ok(reader) => Some(reader.page_count()),
                Err(err) => {
                    warn!(path = %doc.path.display(), %err, "Could not count pages up front");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use printpdf::{Mm, PdfDocument, PdfPage, PdfSaveOptions};

    use super::*;

    fn blank_pdf(pages: usize) -> Vec<u8> {
        let mut doc = PdfDocument::new("blank");
        doc.with_pages(
            (0..pages)
                .map(|_| PdfPage::new(Mm(210.0), Mm(297.0), Vec::new()))
                .collect(),
        );
        let mut warnings = Vec::new();
        doc.save(&PdfSaveOptions::default(), &mut warnings)
    }

    #[test]
    fn counts_pages_in_memory() {
        let reader = PdfReader::from_bytes(&blank_pdf(3)).expect("parse");
        assert_eq!(reader.page_count(), 3);
    }

    #[test]
    fn garbage_is_a_document_open_error() {
        let result = PdfReader::from_bytes(b"definitely not a pdf");
        assert!(matches!(result, Err(PageGridError::DocumentOpen { .. })));
    }

    #[test]
    fn count_pages_handles_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("good.pdf");
        let bad = dir.path().join("bad.pdf");
        std::fs::write(&good, blank_pdf(2)).expect("write good");
        std::fs::write(&bad, b"%PDF-garbage").expect("write bad");

        let documents = SourceDocument::probe_all([
            good,
            dir.path().join("missing.pdf"),
            bad,
        ]);
        assert_eq!(count_pages(&documents), vec![Some(2), Some(0), None]);
    }
}
