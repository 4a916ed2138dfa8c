use crate::{Error, Result};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const BASE64_MARKER: &str = ";base64,";

/// `data:` URI for a base64 encoded `.docx`. The payload is not checked.
pub fn data_uri(base64_content: &str) -> String {
    format!("data:{DOCX_MIME_TYPE}{BASE64_MARKER}{base64_content}")
}

/// A throwaway download link: where the bytes are and what to call the file.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadLink {
    href: String,
    filename: String,
}

impl DownloadLink {
    pub fn new(base64_content: &str, filename: impl Into<String>) -> Self {
        Self {
            href: data_uri(base64_content),
            filename: filename.into(),
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn payload(&self) -> Option<&str> {
        self.href
            .split_once(BASE64_MARKER)
            .map(|(_, payload)| payload)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        let payload = self
            .payload()
            .ok_or_else(|| Error::download("link is not a base64 data URI"))?;
        Ok(STANDARD.decode(payload.trim())?)
    }
}

/// Materializes a [`DownloadLink`] as a file for the user.
#[async_trait]
pub trait DownloadTrigger: Send + Sync {
    async fn trigger(&self, link: &DownloadLink) -> Result<()>;
}

/// Saves downloads into a directory, the way a browser drops them into its
/// downloads folder.
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Only the last path component of `filename` is kept.
    pub fn target_path(&self, filename: &str) -> Result<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| Error::download(format!("invalid download filename: {filename:?}")))?;
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl DownloadTrigger for DirectoryDownloader {
    async fn trigger(&self, link: &DownloadLink) -> Result<()> {
        let bytes = link.decode()?;
        let path = self.target_path(link.filename())?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &bytes).await?;

        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}
