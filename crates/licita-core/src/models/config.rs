//! Configuration structures for the extraction pipeline.

use std::path::{Path, PathBuf};

use licita_analysis::OpenAiConfig;
use serde::{Deserialize, Serialize};

use crate::error::LicitaError;
use crate::Result;

/// Largest accepted upload: 50 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Smallest byte length that can hold a meaningful PDF.
pub const DEFAULT_MIN_SIZE_BYTES: u64 = 100;

/// Main configuration for licita.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LicitaConfig {
    /// Upload reception.
    pub upload: UploadConfig,

    /// Integrity validation.
    pub validation: ValidationConfig,

    /// Text extraction.
    pub extraction: ExtractionConfig,

    /// Analysis service.
    pub analysis: OpenAiConfig,

    /// HTTP server.
    pub server: ServerConfig,
}

/// Upload reception configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory where uploads are written while they are processed.
    pub dir: PathBuf,

    /// Bytes accepted before the stream is cut off.
    pub max_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("licita-uploads"),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

/// Integrity validation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum byte length.
    pub min_size_bytes: u64,

    /// Maximum byte length.
    pub max_size_bytes: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_size_bytes: DEFAULT_MIN_SIZE_BYTES,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

/// How `pages` in the extraction metadata is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCountMode {
    /// Page count reported by the PDF parser.
    #[default]
    Parsed,
    /// `ceil(lines / 50)`, as older metadata consumers expect.
    LineEstimate,
}

/// Text extraction configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Page count policy for the metadata.
    pub page_count: PageCountMode,

    /// Maximum pages to read (0 = unlimited).
    pub max_pages: u32,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Per-request timeout in seconds, analysis calls included.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            timeout_secs: 300,
        }
    }
}

impl LicitaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LicitaError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| LicitaError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| LicitaError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| LicitaError::Config(format!("cannot write {}: {}", path.display(), e)))
    }

    /// Load from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
