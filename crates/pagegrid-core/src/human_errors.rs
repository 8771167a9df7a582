// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing alert text for batch failures and start-up errors.
//
// Every recorded failure becomes exactly one alert. The severity drives how
// a front-end presents it.

use crate::error::PageGridError;
use crate::types::{FailureKind, ItemFailure};

/// Severity of an alert from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// One document or page was skipped; the rest of the batch carried on.
    Skipped,
    /// Nothing was converted until the user fixes their selection.
    ActionRequired,
    /// The batch produced no output file.
    Fatal,
}

/// A human-readable alert with a plain summary and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (alert title or first line).
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    pub severity: Severity,
}

/// Turn one recorded batch failure into an alert.
pub fn humanize_failure(failure: &ItemFailure) -> HumanError {
    let path = failure.path.display();

    match failure.kind {
        FailureKind::MissingFile => HumanError {
            message: format!("Input file not found: {path}"),
            suggestion: "It may have been moved or renamed. Select the file again.".into(),
            severity: Severity::Skipped,
        },

        FailureKind::DocumentOpen => HumanError {
            message: format!("Error opening input file {path}"),
            suggestion: format!(
                "The file may be damaged, encrypted or not a PDF. ({})",
                failure.message
            ),
            severity: Severity::Skipped,
        },

        FailureKind::PageRender => {
            let page = failure
                .page
                .map(|page| format!("Page {page}"))
                .unwrap_or_else(|| "A page".to_string());
            HumanError {
                message: format!("{page} of {path} could not be converted"),
                suggestion: format!(
                    "The remaining pages were still added. ({})",
                    failure.message
                ),
                severity: Severity::Skipped,
            }
        }

        FailureKind::Placement => HumanError {
            message: format!("An image from {path} could not be placed in the table"),
            suggestion: format!("Please report this problem. ({})", failure.message),
            severity: Severity::Skipped,
        },

        FailureKind::Save => HumanError {
            message: format!("An error occurred while saving {path}"),
            suggestion: format!(
                "Check that the folder exists, that you can write to it, and that the file is not open in another program. ({})",
                failure.message
            ),
            severity: Severity::Fatal,
        },
    }
}

/// Turn an error raised before or around a batch into an alert.
pub fn humanize_error(err: &PageGridError) -> HumanError {
    match err {
        PageGridError::NoInputs => HumanError {
            message: "No input files selected.".into(),
            suggestion: "Add one or more PDF files, then convert again.".into(),
            severity: Severity::ActionRequired,
        },

        PageGridError::NoOutput => HumanError {
            message: "Output file path not set.".into(),
            suggestion: "Choose where the Word document should be saved.".into(),
            severity: Severity::ActionRequired,
        },

        PageGridError::UnsupportedOutput(ext) => HumanError {
            message: format!("Cannot write a .{ext} file."),
            suggestion: "Save the output as .docx (or .pdf for a printable sheet).".into(),
            severity: Severity::ActionRequired,
        },

        PageGridError::RendererUnavailable(detail) => HumanError {
            message: "The PDF renderer could not be loaded.".into(),
            suggestion: format!(
                "Install the PDFium library or point --pdfium-dir at the folder containing it. ({detail})"
            ),
            severity: Severity::Fatal,
        },

        PageGridError::Config(detail) => HumanError {
            message: "The conversion settings are invalid.".into(),
            suggestion: detail.clone(),
            severity: Severity::ActionRequired,
        },

        PageGridError::Save { path, reason } => {
            humanize_failure(&ItemFailure::for_save(path.clone(), reason.clone()))
        }

        PageGridError::MissingFile(path) => {
            humanize_failure(&ItemFailure::for_document(path.clone(), err))
        }

        PageGridError::DocumentOpen { path, .. } => {
            humanize_failure(&ItemFailure::for_document(path.clone(), err))
        }

        other => HumanError {
            message: "An error occurred.".into(),
            suggestion: other.to_string(),
            severity: Severity::Fatal,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn missing_file_is_skipped() {
        let err = PageGridError::MissingFile(PathBuf::from("/in/a.pdf"));
        let human = humanize_failure(&ItemFailure::for_document("/in/a.pdf", &err));
        assert_eq!(human.severity, Severity::Skipped);
        assert_eq!(human.message, "Input file not found: /in/a.pdf");
    }

    #[test]
    fn page_failure_names_the_page() {
        let err = PageGridError::PageRender {
            page: 4,
            reason: "bad stream".into(),
        };
        let human = humanize_failure(&ItemFailure::for_page("b.pdf", 4, &err));
        assert_eq!(human.message, "Page 4 of b.pdf could not be converted");
        assert!(human.suggestion.contains("bad stream"));
    }

    #[test]
    fn save_failure_is_fatal() {
        let human = humanize_failure(&ItemFailure::for_save("out.docx", "permission denied"));
        assert_eq!(human.severity, Severity::Fatal);
    }

    #[test]
    fn empty_selection_requires_action() {
        assert_eq!(
            humanize_error(&PageGridError::NoInputs).severity,
            Severity::ActionRequired
        );
        assert_eq!(
            humanize_error(&PageGridError::NoOutput).message,
            "Output file path not set."
        );
    }
}
