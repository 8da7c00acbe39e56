use casebrief_common::{AppConfig, CaseBriefError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::extract::html_to_text;
use crate::types::Document;

/// Search result from Indian Kanoon
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// Document id
    pub tid: u64,

    #[serde(default)]
    pub title: String,

    /// Court / source name
    #[serde(default, rename = "docsource")]
    pub source: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct DocResponse {
    #[serde(default)]
    tid: Option<u64>,

    #[serde(default)]
    title: String,

    /// Judgment body as HTML
    #[serde(default)]
    doc: String,

    #[serde(default)]
    pdf_url: Option<String>,
}

/// Decode a search response body; a body without `docs` means no hits
pub(crate) fn parse_search(body: &str) -> Result<Vec<SearchHit>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.docs)
}

/// Indian Kanoon API client
#[derive(Debug, Clone)]
pub struct KanoonClient {
    base_url: String,
    token: String,
    client: Client,
}

impl KanoonClient {
    /// Create new Indian Kanoon client
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(CaseBriefError::config(
                "Kanoon API key is missing. Set KANOON_API_KEY or kanoon_api_key in config.",
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Create client from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.kanoon_base_url,
            &config.kanoon_api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Search for documents matching a query (first result page only)
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search/", self.base_url);
        debug!("Searching Kanoon: {}", query);

        let body = self
            .post(&url, &[("formInput", query), ("pagenum", "0")])
            .await?;
        let hits = parse_search(&body)?;

        info!("Kanoon search returned {} documents", hits.len());
        Ok(hits)
    }

    /// Fetch a document and extract its text
    pub async fn fetch_document(&self, tid: u64) -> Result<Document> {
        let url = format!("{}/doc/{}/", self.base_url, tid);
        debug!("Fetching Kanoon document {}", tid);

        let body = self.post(&url, &[]).await?;
        let response: DocResponse = serde_json::from_str(&body)?;

        let text = match response.pdf_url.as_deref() {
            Some(pdf_url) => self.pdf_text(pdf_url, &response.doc).await?,
            None => html_to_text(&response.doc)?,
        };

        info!("Extracted {} characters from document {}", text.chars().count(), tid);
        Ok(Document {
            id: response.tid.unwrap_or(tid).to_string(),
            title: response.title,
            text,
        })
    }

    #[cfg(feature = "pdf")]
    async fn pdf_text(&self, pdf_url: &str, _html: &str) -> Result<String> {
        let bytes = self
            .client
            .get(pdf_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CaseBriefError::source(format!("Failed to download PDF: {}", e)))?
            .bytes()
            .await
            .map_err(|e| CaseBriefError::source(format!("Failed to read PDF body: {}", e)))?;

        crate::extract::pdf_to_text(&bytes)
    }

    #[cfg(not(feature = "pdf"))]
    async fn pdf_text(&self, pdf_url: &str, html: &str) -> Result<String> {
        tracing::warn!("PDF support not compiled in, using HTML body instead of {}", pdf_url);
        html_to_text(html)
    }

    async fn post(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| CaseBriefError::source(format!("Failed to send request: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CaseBriefError::source(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(CaseBriefError::source(format!(
                "Kanoon API error ({}): {}",
                status.as_u16(),
                body.trim()
            )));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_token() {
        let err = KanoonClient::new("https://api.indiankanoon.org", "", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, CaseBriefError::Config(_)));
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{"found":"1 - 10 of 2345","docs":[
            {"tid":1766147,"title":"Maneka Gandhi vs Union Of India on 25 January, 1978","docsource":"Supreme Court of India"},
            {"tid":1199182,"title":"Francis Coralie Mullin vs The Administrator"}
        ]}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.docs.len(), 2);
        assert_eq!(response.docs[0].tid, 1766147);
        assert_eq!(response.docs[0].source, "Supreme Court of India");
        assert_eq!(response.docs[1].source, "");
    }

    #[test]
    fn test_parse_search_response_without_docs() {
        let hits = parse_search(r#"{"errmsg":"no results"}"#).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parse_doc_response() {
        let body = r#"{"tid":1766147,"title":"Maneka Gandhi vs Union Of India","doc":"<p>Held.</p>"}"#;
        let response: DocResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.tid, Some(1766147));
        assert_eq!(response.doc, "<p>Held.</p>");
        assert!(response.pdf_url.is_none());
    }
}
