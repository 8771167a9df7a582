// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch conversion — every page of every input document becomes one picture
// in the output table.
//
// Documents are processed strictly one after another and pages strictly in
// order. A missing file, an unopenable document or a broken page is recorded
// and skipped; only a failed save makes the whole batch fail, and then no
// output file exists at all.

use std::path::{Path, PathBuf};

use chrono::Utc;
use pagegrid_core::config::ConvertConfig;
use pagegrid_core::error::{PageGridError, Result};
use pagegrid_core::types::{
    BatchResult, ItemFailure, OutputFormat, ProgressUpdate, SourceDocument,
};
use tracing::{debug, error, info, instrument, warn};

use crate::grid::{GridDocument, open_document};
use crate::image::ImageProcessor;
use crate::layout::GridLayoutEngine;
use crate::pdf::reader::count_pages;
use crate::render::{self, PageRenderer};

/// Receives progress and failure events while a batch runs.
///
/// All methods are called synchronously from the converting thread.
pub trait ProgressReporter {
    /// Called once after every page attempt, successful or not.
    fn on_progress(&mut self, _update: ProgressUpdate) {}

    /// Called once per recorded failure, including a failed save.
    fn on_error(&mut self, _failure: &ItemFailure) {}

    /// Called once when the batch has finished (saved or not).
    fn on_complete(&mut self, _result: &BatchResult) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// Drives a renderer, the layout engine and an output document over a batch.
pub struct BatchConverter<'r> {
    renderer: &'r dyn PageRenderer,
    config: ConvertConfig,
}

impl<'r> BatchConverter<'r> {
    pub fn new(renderer: &'r dyn PageRenderer, config: ConvertConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { renderer, config })
    }

    /// Convert `inputs` into a new document at `output`.
    ///
    /// Validates the selection, appends `.docx` to an extension-less output
    /// path, probes every input and picks the output format from the
    /// extension. Errors are returned only for an unusable selection; a
    /// failed save is reported inside the [`BatchResult`].
    pub fn run(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<BatchResult> {
        if inputs.is_empty() {
            return Err(PageGridError::NoInputs);
        }
        let (output, format) = OutputFormat::resolve(output)?;

        let documents = SourceDocument::probe_all(inputs.iter().cloned());
        let mut sink = open_document(format, self.config.columns);

        self.convert(&documents, sink.as_mut(), &output, reporter)
    }

    /// Convert `documents` into `sink` and save it to `output`.
    #[instrument(skip_all, fields(documents = documents.len(), output = %output.display()))]
    pub fn convert(
        &self,
        documents: &[SourceDocument],
        sink: &mut dyn GridDocument,
        output: &Path,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<BatchResult> {
        if documents.is_empty() {
            return Err(PageGridError::NoInputs);
        }

        let started_at = Utc::now();
        let mut engine = GridLayoutEngine::for_grid(&*sink, self.config.sizing)?;

        if self.config.presize_rows {
            sink.ensure_row(documents.len() - 1);
            debug!(rows = sink.row_count(), "Table pre-sized to one row per input");
        }

        let mut tracker = PageTotals::new(documents, self.config.count_pages_up_front);
        let mut failures: Vec<ItemFailure> = Vec::new();

        info!(total = tracker.total(), "Starting conversion");

        for (doc_index, doc) in documents.iter().enumerate() {
            if !doc.exists {
                tracker.resolve(doc_index, 0);
                let err = PageGridError::MissingFile(doc.path.clone());
                skip(&mut failures, reporter, ItemFailure::for_document(&doc.path, &err));
                continue;
            }

            let mut handle = match self.renderer.open(&doc.path) {
                Ok(handle) => handle,
                Err(err) => {
                    tracker.resolve(doc_index, 0);
                    let err = match err {
                        PageGridError::DocumentOpen { .. } => err,
                        other => PageGridError::DocumentOpen {
                            path: doc.path.clone(),
                            reason: other.to_string(),
                        },
                    };
                    skip(&mut failures, reporter, ItemFailure::for_document(&doc.path, &err));
                    continue;
                }
            };

            tracker.resolve(doc_index, handle.page_count());
            debug!(path = %doc.path.display(), pages = handle.page_count(), "Converting document");

            for (page_index, rendered) in render::pages(handle.as_mut()) {
                let encoded = rendered.and_then(|page| ImageProcessor::from_page(page).encode());

                match encoded {
                    Ok(image) => {
                        let placement = engine.place(sink);
                        if let Err(err) = sink.place_image(placement.cell, image, placement.size) {
                            error!(cell = %placement.cell, %err, "Layout placed an image outside the grid");
                            skip(&mut failures, reporter, ItemFailure::for_page(&doc.path, page_index + 1, &err));
                        } else {
                            tracker.placed += 1;
                        }
                    }
                    Err(err) => {
                        skip(&mut failures, reporter, ItemFailure::for_page(&doc.path, page_index + 1, &err));
                    }
                }

                tracker.attempted += 1;
                reporter.on_progress(ProgressUpdate {
                    current: tracker.attempted,
                    total: tracker.total(),
                });
            }

            // Release the document before the next one is opened.
            drop(handle);
        }

        let saved = match sink.save(output) {
            Ok(()) => Some(output.to_path_buf()),
            Err(err) => {
                error!(%err, "Saving the output failed");
                let failure = match err {
                    PageGridError::Save { path, reason } => ItemFailure::for_save(path, reason),
                    other => ItemFailure::for_save(output, other.to_string()),
                };
                reporter.on_error(&failure);
                failures.push(failure);
                None
            }
        };

        let result = BatchResult {
            started_at,
            finished_at: Utc::now(),
            documents: documents.len(),
            pages_attempted: tracker.attempted,
            pages_placed: tracker.placed,
            failures,
            output: saved,
        };

        info!(
            attempted = result.pages_attempted,
            placed = result.pages_placed,
            failures = result.failures.len(),
            saved = result.is_saved(),
            "Conversion finished"
        );
        reporter.on_complete(&result);
        Ok(result)
    }
}

fn skip(failures: &mut Vec<ItemFailure>, reporter: &mut dyn ProgressReporter, failure: ItemFailure) {
    warn!(%failure, "Skipped");
    reporter.on_error(&failure);
    failures.push(failure);
}

/// Page counters plus the running estimate of how many pages the batch holds.
struct PageTotals {
    attempted: usize,
    placed: usize,
    /// Known page count per document; `None` until the document is opened
    /// when it could not be counted up front.
    per_document: Vec<Option<usize>>,
}

impl PageTotals {
    fn new(documents: &[SourceDocument], count_up_front: bool) -> Self {
        let per_document = if count_up_front {
            count_pages(documents)
        } else {
            documents
                .iter()
                .map(|doc| if doc.exists { None } else { Some(0) })
                .collect()
        };
        Self {
            attempted: 0,
            placed: 0,
            per_document,
        }
    }

    fn resolve(&mut self, doc_index: usize, pages: usize) {
        self.per_document[doc_index] = Some(pages);
    }

    /// Uncounted documents are assumed to hold one page. Never below the
    /// number of pages already attempted.
    fn total(&self) -> usize {
        let estimate: usize = self
            .per_document
            .iter()
            .map(|pages| pages.unwrap_or(1))
            .sum();
        estimate.max(self.attempted)
    }
}
