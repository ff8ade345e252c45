//! Batch command - extract the text of multiple PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use licita_core::classify::classify;
use licita_core::{ExtractionPipeline, ExtractionResult};
use tracing::{debug, error, warn};

use super::extract::{OutputFormat, format_result};
use super::{load_config, mime_type_for};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one file.
struct FileOutcome {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error_code: Option<String>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = ExtractionPipeline::new(&config);
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = pipeline.process_file(&path, mime_type_for(&path));
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(result) => outcomes.push(FileOutcome {
                path,
                result: Some(result),
                error_code: None,
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let report = classify(&e);
                if !args.continue_on_error {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), e);
                    anyhow::bail!("{}: {} [{}]", path.display(), report.message, report.error_code);
                }
                warn!("Failed to process {}: {}", path.display(), e);
                outcomes.push(FileOutcome {
                    path,
                    result: None,
                    error_code: Some(report.error_code),
                    error: Some(report.message),
                    processing_time_ms,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for outcome in &outcomes {
            let Some(result) = &outcome.result else {
                continue;
            };
            let stem = outcome
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));
            fs::write(&output_path, format_result(result, None, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_none()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(outcomes.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "characters",
        "words",
        "lines",
        "pages",
        "size",
        "processing_time_ms",
        "error_code",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = outcome.processing_time_ms.to_string();

        match &outcome.result {
            Some(result) => {
                let m = &result.metadata;
                wtr.write_record([
                    filename,
                    "success",
                    &m.characters.to_string(),
                    &m.words.to_string(),
                    &m.lines.to_string(),
                    &m.pages.to_string(),
                    &m.size.to_string(),
                    &time,
                    "",
                    "",
                ])?;
            }
            None => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    &time,
                    outcome.error_code.as_deref().unwrap_or(""),
                    outcome.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
