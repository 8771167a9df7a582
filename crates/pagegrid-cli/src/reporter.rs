// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal progress — an indicatif bar plus one alert line per skipped item.

use indicatif::{ProgressBar, ProgressStyle};
use pagegrid_core::human_errors::humanize_failure;
use pagegrid_core::types::{BatchResult, ItemFailure, ProgressUpdate};
use pagegrid_document::ProgressReporter;

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages";

pub struct TerminalReporter {
    bar: ProgressBar,
    alerts: usize,
}

impl TerminalReporter {
    /// A hidden bar still tracks position; alerts are printed either way.
    pub fn new(show_bar: bool) -> Self {
        let bar = if show_bar {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar, alerts: 0 }
    }

    pub fn alerts(&self) -> usize {
        self.alerts
    }
}

impl ProgressReporter for TerminalReporter {
    fn on_progress(&mut self, update: ProgressUpdate) {
        self.bar.set_length(update.total as u64);
        self.bar.set_position(update.current as u64);
    }

    fn on_error(&mut self, failure: &ItemFailure) {
        self.alerts += 1;
        let human = humanize_failure(failure);
        self.bar.suspend(|| {
            eprintln!("Alert: {}", human.message);
            if !human.suggestion.is_empty() {
                eprintln!("       {}", human.suggestion);
            }
        });
    }

    fn on_complete(&mut self, result: &BatchResult) {
        self.bar.finish_and_clear();
        if result.is_saved() {
            eprintln!("Conversion complete.");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pagegrid_core::error::PageGridError;

    use super::*;

    #[test]
    fn progress_moves_the_bar() {
        let mut reporter = TerminalReporter::new(false);
        reporter.on_progress(ProgressUpdate { current: 1, total: 4 });
        reporter.on_progress(ProgressUpdate { current: 2, total: 5 });
        assert_eq!(reporter.bar.position(), 2);
        assert_eq!(reporter.bar.length(), Some(5));
    }

    #[test]
    fn every_failure_is_one_alert() {
        let mut reporter = TerminalReporter::new(false);
        let missing = PathBuf::from("gone.pdf");
        reporter.on_error(&ItemFailure::for_document(
            &missing,
            &PageGridError::MissingFile(missing.clone()),
        ));
        reporter.on_error(&ItemFailure::for_save("out.docx", "disk full"));
        assert_eq!(reporter.alerts(), 2);
    }
}
