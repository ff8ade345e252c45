//! Streaming reception of uploads into the temporary directory.

use std::fmt::Display;
use std::path::PathBuf;

use chrono::Utc;
use futures_util::{Stream, StreamExt};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::error::UploadError;
use crate::models::config::UploadConfig;
use crate::models::document::UploadedDocument;
use crate::reaper::TempUpload;

/// Writes uploaded files to uniquely named temporary files.
#[derive(Debug, Clone)]
pub struct UploadReceiver {
    dir: PathBuf,
    max_size: u64,
}

impl UploadReceiver {
    /// Receiver writing into `dir`, accepting at most `max_size` bytes.
    pub fn new(dir: impl Into<PathBuf>, max_size: u64) -> Self {
        Self {
            dir: dir.into(),
            max_size,
        }
    }

    /// Receiver configured from [`UploadConfig`].
    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.dir.clone(), config.max_size_bytes)
    }

    /// Largest accepted upload in bytes.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// A fresh path: `upload-<millis>-<uuid>.pdf`, unique across requests.
    pub fn unique_path(&self) -> PathBuf {
        self.dir.join(format!(
            "upload-{}-{}.pdf",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        ))
    }

    /// Stream `chunks` to a new temporary file.
    ///
    /// The returned guard owns the file. On any failure, and if the
    /// returned future is dropped before completion, the partial file is
    /// removed.
    pub async fn receive<S, B, E>(
        &self,
        chunks: S,
        mime_type: &str,
        original_name: Option<String>,
    ) -> Result<(TempUpload, UploadedDocument), UploadError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        fs::create_dir_all(&self.dir).await?;

        let upload = TempUpload::new(self.unique_path());
        let mut file = File::create(upload.path()).await?;
        let mut chunks = std::pin::pin!(chunks);
        let mut size: u64 = 0;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| UploadError::Stream(e.to_string()))?;
            let bytes = chunk.as_ref();

            size += bytes.len() as u64;
            if size > self.max_size {
                debug!("Upload cut off after {} bytes", size);
                return Err(UploadError::TooLarge { max: self.max_size });
            }
            file.write_all(bytes).await?;
        }

        file.flush().await?;
        drop(file);

        debug!(
            "Received {} bytes ({}) into {}",
            size,
            original_name.as_deref().unwrap_or("unnamed"),
            upload.path().display()
        );

        let document = UploadedDocument {
            path: upload.path().to_path_buf(),
            mime_type: mime_type.to_string(),
            size,
            original_name,
        };
        Ok((upload, document))
    }
}
