//! Extract command - extract fields from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ucto_core::invoice::PatternInvoiceParser;

use super::{OutputFormat, format_invoice, load_config, read_document_text};

/// Characters of document text shown by `--raw`.
const RAW_PREVIEW_CHARS: usize = 2000;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also print the beginning of the extracted document text
    #[arg(long)]
    raw: bool,

    /// List fields no rule matched
    #[arg(long)]
    show_missing: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading document...");
    pb.set_position(10);
    let text = match read_document_text(&args.input, &config.pdf) {
        Ok(text) => text,
        Err(e) => {
            pb.abandon_with_message("Failed");
            return Err(e);
        }
    };

    pb.set_message("Extracting invoice data...");
    pb.set_position(60);
    let parser = PatternInvoiceParser::new()
        .with_default_project_name(config.extraction.default_project_name.clone());
    let result = match parser.parse_document(&text) {
        Ok(result) => result,
        Err(e) => {
            pb.abandon_with_message("Failed");
            return Err(e).with_context(|| {
                format!("No text could be extracted from {}", args.input.display())
            });
        }
    };

    pb.set_position(100);
    pb.finish_with_message("Done");

    if args.raw {
        let preview: String = text.chars().take(RAW_PREVIEW_CHARS).collect();
        eprintln!("{}", style("Extracted text:").bold());
        eprintln!("{}", preview);
        eprintln!();
    }

    let output = format_invoice(&result.invoice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_missing {
        if result.missing_fields.is_empty() {
            eprintln!("{} All fields extracted", style("ℹ").blue());
        } else {
            eprintln!(
                "{} Not found: {}",
                style("ℹ").blue(),
                result.missing_fields.join(", ")
            );
        }
    }

    debug!(
        "Extraction took {}ms, total {:?}",
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}
