//! HTTP plumbing: the vocabulary archive, the reference translation, and the
//! companion TSV services.
//!
//! All awaits live here and in the CLI driver; the core pipeline never does
//! I/O. Endpoints are plain fields so tests and alternate deployments can
//! point anywhere.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

use crate::books::Book;
use crate::error::{ArchiveError, Result, ServiceError, UsfmError};
use crate::pipeline::QuoteServices;

/// Default endpoints for the published vocabulary and translation.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://git.door43.org/unfoldingWord/en_tw/archive/master.zip";
pub const DEFAULT_STRONGS_LIST_URL: &str =
    "https://git.door43.org/unfoldingWord/en_tw/raw/branch/master/tw_strongs_list.json";
pub const DEFAULT_CONTENT_BASE: &str =
    "https://git.door43.org/api/v1/repos/unfoldingWord/en_ult/contents";

/// The content endpoint's payload shape.
#[derive(Debug, Deserialize)]
struct ContentPayload {
    content: String,
}

/// Decode a `{ "content": "<base64>" }` payload into USFM text.
pub(crate) fn decode_content(payload: &[u8], book: &Book) -> Result<String> {
    let payload: ContentPayload =
        serde_json::from_slice(payload).map_err(|e| UsfmError::MalformedPayload {
            book: book.code().to_string(),
            reason: e.to_string(),
        })?;
    // The endpoint wraps base64 lines; strip whitespace before decoding.
    let compact: String = payload
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|e| UsfmError::MalformedPayload {
            book: book.code().to_string(),
            reason: format!("invalid base64: {e}"),
        })?;
    String::from_utf8(bytes).map_err(|e| {
        UsfmError::MalformedPayload {
            book: book.code().to_string(),
            reason: format!("USFM is not UTF-8: {e}"),
        }
        .into()
    })
}

/// Fetcher for the vocabulary archive and per-book USFM.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    pub archive_url: String,
    pub strongs_list_url: String,
    pub content_base: String,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            strongs_list_url: DEFAULT_STRONGS_LIST_URL.to_string(),
            content_base: DEFAULT_CONTENT_BASE.to_string(),
        }
    }

    /// Download the vocabulary archive.
    pub async fn fetch_archive(&self) -> Result<Vec<u8>> {
        tracing::info!(url = %self.archive_url, "Fetching vocabulary archive");
        let response = self
            .client
            .get(&self.archive_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ArchiveError::FetchFailed {
                reason: e.to_string(),
            })?;
        let bytes = response.bytes().await.map_err(|e| ArchiveError::FetchFailed {
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    /// Download the `tw_strongs_list` companion JSON.
    pub async fn fetch_strongs_list(&self) -> Result<Vec<u8>> {
        tracing::info!(url = %self.strongs_list_url, "Fetching Strong's list");
        let response = self
            .client
            .get(&self.strongs_list_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ArchiveError::FetchFailed {
                reason: e.to_string(),
            })?;
        let bytes = response.bytes().await.map_err(|e| ArchiveError::FetchFailed {
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    /// Download and decode one book of the reference translation.
    pub async fn fetch_book(&self, book: &Book) -> Result<String> {
        let url = format!("{}/{}", self.content_base, book.usfm_file());
        tracing::info!(book = book.code(), %url, "Fetching USFM");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| UsfmError::FetchFailed {
                book: book.code().to_string(),
                reason: e.to_string(),
            })?;
        let payload = response.bytes().await.map_err(|e| UsfmError::FetchFailed {
            book: book.code().to_string(),
            reason: e.to_string(),
        })?;
        decode_content(&payload, book)
    }
}

/// HTTP-backed companion services: each POSTs a TSV body and returns the
/// transformed TSV.
#[derive(Debug, Clone)]
pub struct HttpQuoteServices {
    client: reqwest::Client,
    pub add_gl_url: String,
    pub convert_url: String,
}

impl HttpQuoteServices {
    pub fn new(add_gl_url: impl Into<String>, convert_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            add_gl_url: add_gl_url.into(),
            convert_url: convert_url.into(),
        }
    }

    async fn post_tsv(&self, service: &'static str, url: &str, tsv: &str) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/tab-separated-values")
            .body(tsv.to_string())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ServiceError::RequestFailed {
                service: service.to_string(),
                reason: e.to_string(),
            })?;
        response.text().await.map_err(|e| {
            ServiceError::MalformedResponse {
                service: service.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl QuoteServices for HttpQuoteServices {
    async fn add_gl_quotes(&self, tsv: &str) -> Result<String> {
        self.post_tsv("add-GL-quote", &self.add_gl_url, tsv).await
    }

    async fn convert_to_origin(&self, tsv: &str) -> Result<String> {
        self.post_tsv("GL→OL", &self.convert_url, tsv).await
    }
}
