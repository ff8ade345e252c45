pub mod analyze;
pub mod batch;
pub mod config;
pub mod extract;
pub mod serve;

use std::path::Path;

use console::style;
use licita_core::classify::classify;
use licita_core::validate::PDF_MIME_TYPE;
use licita_core::{LicitaConfig, LicitaError};

/// Load the config from `--config`, else from the default location if it
/// exists, else defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LicitaConfig> {
    let default_path = config::default_config_path();
    let path = path.or_else(|| default_path.exists().then_some(default_path.as_path()));
    Ok(LicitaConfig::load_or_default(path)?)
}

/// MIME type of a local file, from its extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        PDF_MIME_TYPE
    } else {
        "application/octet-stream"
    }
}

/// Print the user-facing report for a pipeline failure.
pub fn print_failure(path: &Path, err: &LicitaError) {
    let report = classify(err);
    eprintln!(
        "{} {}: {} [{}]",
        style("✗").red(),
        path.display(),
        report.message,
        report.error_code
    );
    if let Some(suggestion) = &report.suggestion {
        eprintln!("  {}", style(suggestion).dim());
    }
    if let Some(details) = &report.technical_details {
        eprintln!("  {}", style(details).dim());
    }
}
