//! Extract command - text of a single PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use licita_analysis::{backend_from_config, AnalysisBackend, TenderAnalysis};
use licita_core::{ExtractionPipeline, ExtractionResult};
use serde::Serialize;
use tracing::{debug, info};

use super::{load_config, mime_type_for, print_failure};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// MIME type to validate against (default: from the extension)
    #[arg(long)]
    mime_type: Option<String>,

    /// Also run the language-model analysis on the text
    #[arg(long)]
    analyze: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Text, metadata and analysis as JSON
    Json,
    /// Cleaned text only
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    #[serde(flatten)]
    result: &'a ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a TenderAnalysis>,
}

/// Render an extraction in `format`.
pub fn format_result(
    result: &ExtractionResult,
    analysis: Option<&TenderAnalysis>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&ExtractOutput { result, analysis })?,
        OutputFormat::Text => result.text.clone(),
    })
}

pub async fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mime_type = args
        .mime_type
        .clone()
        .unwrap_or_else(|| mime_type_for(&args.input).to_string());

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Extracting text...");

    let pipeline = ExtractionPipeline::new(&config);
    let result = match pipeline.process_file(&args.input, &mime_type) {
        Ok(result) => result,
        Err(e) => {
            pb.finish_and_clear();
            print_failure(&args.input, &e);
            return Err(e.into());
        }
    };

    let analysis = if args.analyze {
        pb.set_message("Analyzing text...");
        let backend = backend_from_config(&config.analysis);
        Some(backend.analyze(&result.text).await?)
    } else {
        None
    };

    pb.finish_and_clear();

    let output = format_result(&result, analysis.as_ref(), args.format)?;

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

    eprintln!(
        "{} {} words, {} lines, {} pages",
        style("ℹ").blue(),
        result.metadata.words,
        result.metadata.lines,
        result.metadata.pages
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
