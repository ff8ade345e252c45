//! Analyze command - structured fields from tender text.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use licita_analysis::{backend_from_config, AnalysisBackend};
use licita_core::ExtractionPipeline;
use licita_core::validate::PDF_MIME_TYPE;
use tracing::info;

use super::{load_config, mime_type_for, print_failure};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// A PDF, or a plain-text file with already extracted text
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(model) = args.model {
        config.analysis.model = model;
    }

    let text = if mime_type_for(&args.input) == PDF_MIME_TYPE {
        let pipeline = ExtractionPipeline::new(&config);
        match pipeline.process_file(&args.input, PDF_MIME_TYPE) {
            Ok(result) => result.text,
            Err(e) => {
                print_failure(&args.input, &e);
                return Err(e.into());
            }
        }
    } else {
        fs::read_to_string(&args.input)?
    };

    let backend = backend_from_config(&config.analysis);
    info!(
        "Analyzing {} characters with {}",
        text.chars().count(),
        backend.name()
    );

    let analysis = backend.analyze(&text).await?;
    let output = serde_json::to_string_pretty(&analysis)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Analysis written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
