//! services/api/src/adapters/file_store.rs
//!
//! Issue store backed by a single JSON document, `{"issues": [...]}`. Reads
//! never write: a missing file is an empty collection, and the file and its
//! directory are created by the first save. Every read goes to disk so
//! external edits are picked up.

use async_trait::async_trait;
use chrono::Utc;
use newsroom_core::archive;
use newsroom_core::domain::GeneratedContent;
use newsroom_core::ports::{IssueRepository, PortError, PortResult};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct IssueFile {
    #[serde(default)]
    issues: Vec<GeneratedContent>,
}

pub struct FileIssueStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileIssueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> PortResult<Vec<GeneratedContent>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PortError::Storage(format!(
                    "Cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let file: IssueFile = serde_json::from_str(&raw)
            .map_err(|e| PortError::Storage(format!("Corrupt issue file {}: {}", self.path.display(), e)))?;
        Ok(file.issues)
    }

    /// Replaces the file atomically: write a uniquely named sibling temp file,
    /// then rename it over. Callers hold `write_lock`.
    async fn write(&self, issues: &[GeneratedContent]) -> PortResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| PortError::Storage(format!("Cannot create {}: {}", dir.display(), e)))?;
        }
        let body = serde_json::to_vec_pretty(&serde_json::json!({ "issues": issues }))
            .map_err(|e| PortError::Storage(e.to_string()))?;
        let tmp = self
            .path
            .with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&tmp, body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(PortError::Storage(format!("Cannot write {}: {}", tmp.display(), e)));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(PortError::Storage(format!(
                "Cannot replace {}: {}",
                self.path.display(),
                e
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl IssueRepository for FileIssueStore {
    async fn list(&self) -> PortResult<Vec<GeneratedContent>> {
        self.read().await
    }

    async fn save(&self, content: GeneratedContent) -> PortResult<GeneratedContent> {
        let _guard = self.write_lock.lock().await;
        let mut issues = self.read().await?;
        if issues.is_empty() {
            info!(path = %self.path.display(), "Writing first issue file");
        }
        let saved = archive::save_into(&mut issues, content, Utc::now());
        self.write(&issues).await?;
        debug!(id = ?saved.id, total = issues.len(), "Issue file updated");
        Ok(saved)
    }
}
