use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use lte_core::Document;

/// Tracks the file backing the document and moves its content to and from
/// disk.
pub struct FileManager {
    current_path: Option<PathBuf>,
}

impl FileManager {
    pub fn new() -> Self {
        Self { current_path: None }
    }

    pub fn get_current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn set_current_path(&mut self, path: PathBuf) {
        self.current_path = Some(path);
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    /// Name used for syntax selection and the status bar.
    pub fn file_name(&self) -> Option<String> {
        self.current_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
    }

    /// Reads `path` and remembers it as the current file.
    pub async fn open_file(&mut self, path: PathBuf) -> Result<String> {
        if let Ok(metadata) = fs::metadata(&path).await {
            // Warn about large files (>10MB)
            const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;
            if metadata.len() > LARGE_FILE_THRESHOLD {
                log::warn!(
                    "Large file detected ({} bytes): {}",
                    metadata.len(),
                    path.display()
                );
            }
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        log::info!("Successfully opened file: {}", path.display());
        self.current_path = Some(path);
        Ok(content)
    }

    /// Writes the document to the current file and marks it clean. Returns
    /// the number of bytes written. On failure the document is untouched.
    pub async fn save_file(&self, document: &mut Document) -> Result<usize> {
        let path = self
            .current_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no file name set"))?;

        let content = document.to_text();
        fs::write(path, content.as_bytes())
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        document.mark_clean();
        log::info!("Saved {} bytes to {}", content.len(), path.display());
        Ok(content.len())
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}
