use async_trait::async_trait;
use casebrief_common::{CaseBriefError, Result};
use std::path::PathBuf;
use tracing::info;

use crate::extract::html_to_text;
use crate::kanoon::{KanoonClient, SearchHit};
use crate::types::Document;

/// Anything that can hand over one case document
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self) -> Result<Document>;
}

/// Case text stored on local disk (.txt, .html, .htm, and .pdf with the `pdf` feature)
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Err(CaseBriefError::not_found(format!(
                "File not found: {}",
                self.path.display()
            )));
        }

        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let text = match extension.as_str() {
            "html" | "htm" => html_to_text(&tokio::fs::read_to_string(&self.path).await?)?,
            #[cfg(feature = "pdf")]
            "pdf" => crate::extract::pdf_to_text(&tokio::fs::read(&self.path).await?)?,
            _ => tokio::fs::read_to_string(&self.path).await?,
        };

        let title = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        info!("Loaded {} characters from {}", text.chars().count(), self.path.display());
        Ok(Document::new(self.path.display().to_string(), title, text))
    }
}

/// What to pull from Indian Kanoon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KanoonTarget {
    /// Search and take the first hit
    Query(String),
    /// Fetch a known document id
    DocId(u64),
}

/// Indian Kanoon as a document source
pub struct KanoonSource {
    client: KanoonClient,
    target: KanoonTarget,
}

impl KanoonSource {
    pub fn new(client: KanoonClient, target: KanoonTarget) -> Self {
        Self { client, target }
    }
}

#[async_trait]
impl DocumentSource for KanoonSource {
    async fn load(&self) -> Result<Document> {
        let tid = match &self.target {
            KanoonTarget::DocId(tid) => *tid,
            KanoonTarget::Query(query) => {
                let hits = self.client.search(query).await?;
                first_hit(query, hits)?
            }
        };

        self.client.fetch_document(tid).await
    }
}

/// Pick the top search result; an empty result page is `NotFound`
fn first_hit(query: &str, hits: Vec<SearchHit>) -> Result<u64> {
    let first = hits.into_iter().next().ok_or_else(|| {
        CaseBriefError::not_found(format!("No documents returned for query '{}'", query))
    })?;
    info!("Found case {}: {}", first.tid, first.title);
    Ok(first.tid)
}
