// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagegrid — render every page of a batch of PDFs and pack the images into a
// three-column table inside one DOCX (or PDF) file.
//
// Entry point. Parses arguments, initialises logging, binds PDFium and runs
// the batch with a terminal progress bar.

mod reporter;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use pagegrid_core::config::{ConvertConfig, SizingPolicy};
use pagegrid_core::error::PageGridError;
use pagegrid_core::human_errors::humanize_error;
use pagegrid_document::{BatchConverter, PdfiumRenderer};

use reporter::TerminalReporter;

#[derive(Parser, Debug)]
#[command(name = "pagegrid")]
#[command(version)]
#[command(about = "Convert PDF pages to 300 DPI images packed into a three-column table", long_about = None)]
struct Cli {
    /// PDF files to convert, in order
    #[arg(value_name = "PDF")]
    inputs: Vec<PathBuf>,

    /// Output document (.docx by default, .pdf for a contact sheet)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Directory containing the PDFium shared library
    #[arg(long, value_name = "DIR", env = "PDFIUM_DYNAMIC_LIB_PATH")]
    pdfium_dir: Option<PathBuf>,

    /// Give every picture the same 2.0 x 1.5 in size, including the first row
    #[arg(long)]
    uniform_size: bool,

    /// Create one table row per input document before converting
    #[arg(long)]
    presize_rows: bool,

    /// Skip counting pages up front (the progress total becomes an estimate)
    #[arg(long)]
    no_page_count: bool,

    /// How to report the finished batch on stdout
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors and hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

impl Cli {
    fn config(&self) -> ConvertConfig {
        ConvertConfig {
            sizing: if self.uniform_size {
                SizingPolicy::Uniform
            } else {
                SizingPolicy::Legacy
            },
            presize_rows: self.presize_rows,
            count_pages_up_front: !self.no_page_count,
            ..ConvertConfig::default()
        }
    }

    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<PageGridError>() {
                Some(known) => {
                    let human = humanize_error(known);
                    eprintln!("Error: {}", human.message);
                    if !human.suggestion.is_empty() {
                        eprintln!("       {}", human.suggestion);
                    }
                }
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let inputs = select_inputs(cli.inputs.clone());
    if inputs.is_empty() {
        return Err(PageGridError::NoInputs.into());
    }
    let output = select_output(cli.output.clone()).ok_or(PageGridError::NoOutput)?;

    let renderer = PdfiumRenderer::bind(cli.pdfium_dir.as_deref())?;
    let converter = BatchConverter::new(&renderer, cli.config())?;
    let mut reporter = TerminalReporter::new(!cli.quiet);

    tracing::info!(inputs = inputs.len(), output = %output.display(), "pagegrid starting");
    let result = converter.run(&inputs, &output, &mut reporter)?;

    match cli.report {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        ReportFormat::Text => {
            if let Some(saved) = &result.output {
                println!(
                    "{} of {} pages from {} documents placed in {} ({} skipped)",
                    result.pages_placed,
                    result.pages_attempted,
                    result.documents,
                    saved.display(),
                    reporter.alerts(),
                );
            }
        }
    }

    Ok(if result.is_saved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(feature = "dialogs")]
fn select_inputs(given: Vec<PathBuf>) -> Vec<PathBuf> {
    if !given.is_empty() {
        return given;
    }
    rfd::FileDialog::new()
        .set_title("Select PDF files")
        .add_filter("PDF", &["pdf"])
        .pick_files()
        .unwrap_or_default()
}

#[cfg(not(feature = "dialogs"))]
fn select_inputs(given: Vec<PathBuf>) -> Vec<PathBuf> {
    given
}

#[cfg(feature = "dialogs")]
fn select_output(given: Option<PathBuf>) -> Option<PathBuf> {
    given.or_else(|| {
        rfd::FileDialog::new()
            .set_title("Save output as")
            .add_filter("Word document", &["docx"])
            .add_filter("PDF", &["pdf"])
            .set_file_name("pages.docx")
            .save_file()
    })
}

#[cfg(not(feature = "dialogs"))]
fn select_output(given: Option<PathBuf>) -> Option<PathBuf> {
    given
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_classic_layout() {
        let cli = Cli::try_parse_from(["pagegrid", "a.pdf", "b.pdf", "-o", "out.docx"])
            .expect("parse");
        assert_eq!(cli.inputs, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        assert_eq!(cli.config(), ConvertConfig::default());
        assert_eq!(cli.report, ReportFormat::Text);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "pagegrid",
            "a.pdf",
            "--uniform-size",
            "--presize-rows",
            "--no-page-count",
            "--report",
            "json",
            "-vv",
        ])
        .expect("parse");
        let config = cli.config();
        assert_eq!(config.sizing, SizingPolicy::Uniform);
        assert!(config.presize_rows);
        assert!(!config.count_pages_up_front);
        assert_eq!(config.columns, 3);
        assert_eq!(cli.report, ReportFormat::Json);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["pagegrid", "a.pdf", "-q", "-v"]).is_err());
        let cli = Cli::try_parse_from(["pagegrid", "a.pdf", "-q"]).expect("parse");
        assert_eq!(cli.log_level(), "error");
    }

    #[cfg(not(feature = "dialogs"))]
    #[test]
    fn missing_output_is_reported_before_binding_pdfium() {
        let cli = Cli::try_parse_from(["pagegrid", "a.pdf"]).expect("parse");
        let err = run(cli).expect_err("no output");
        assert!(matches!(
            err.downcast_ref::<PageGridError>(),
            Some(PageGridError::NoOutput)
        ));
    }

    #[cfg(not(feature = "dialogs"))]
    #[test]
    fn missing_inputs_are_reported_first() {
        let cli = Cli::try_parse_from(["pagegrid"]).expect("parse");
        let err = run(cli).expect_err("no inputs");
        assert!(matches!(
            err.downcast_ref::<PageGridError>(),
            Some(PageGridError::NoInputs)
        ));
    }
}
