//! Article bodies: addressing, loading, and Markdown → HTML.
//!
//! A body lives at `{base}/{category}/{name}.{ext}`, where `base` is either an
//! http(s) URL or a local directory.

use super::transport::{self, TransportFailure};
use super::types::Article;
use pulldown_cmark::{html, Options, Parser};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound for a single article body.
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Body too large (exceeds {0} bytes)")]
    TooLarge(usize),
    #[error("Invalid UTF-8 in body")]
    InvalidUtf8,
    #[error("Article body not found: {0}")]
    NotFound(String),
    #[error("Failed to read body: {0}")]
    Io(#[from] std::io::Error),
    /// Category or slug would escape the content base
    #[error("Invalid article path segment: {0:?}")]
    InvalidSegment(String),
    #[error("Invalid content base: {0}")]
    InvalidBase(String),
}

impl From<TransportFailure> for BodyError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Network(e) => Self::Network(e),
            TransportFailure::Timeout(d) => Self::Timeout(d.as_secs()),
            TransportFailure::HttpStatus(s) => Self::HttpStatus(s),
            TransportFailure::TooLarge(limit) => Self::TooLarge(limit),
            TransportFailure::InvalidUtf8 => Self::InvalidUtf8,
        }
    }
}

/// Where article bodies are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    Remote(Url),
    Directory(PathBuf),
}

impl BodySource {
    /// `http://` / `https://` bases are remote, anything else is a directory.
    pub fn parse(base: &str) -> Result<Self, BodyError> {
        let trimmed = base.trim();
        if trimmed.is_empty() {
            return Err(BodyError::InvalidBase("empty".to_string()));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|e| BodyError::InvalidBase(e.to_string()))?;
            if url.cannot_be_a_base() {
                return Err(BodyError::InvalidBase(trimmed.to_string()));
            }
            return Ok(Self::Remote(url));
        }
        Ok(Self::Directory(PathBuf::from(trimmed)))
    }
}

/// Resolved location of one article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyAddress {
    Remote(Url),
    File(PathBuf),
}

impl fmt::Display for BodyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn check_segment(segment: &str) -> Result<&str, BodyError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
    {
        return Err(BodyError::InvalidSegment(segment.to_string()));
    }
    Ok(segment)
}

/// Loads article bodies from a [`BodySource`].
#[derive(Debug, Clone)]
pub struct BodyLoader {
    client: reqwest::Client,
    source: BodySource,
    extension: String,
    timeout: Duration,
}

impl BodyLoader {
    pub fn new(
        client: reqwest::Client,
        source: BodySource,
        extension: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            source,
            extension: extension.trim_start_matches('.').to_string(),
            timeout,
        }
    }

    /// `{base}/{category}/{name}.{ext}` for `article`.
    pub fn address(&self, article: &Article) -> Result<BodyAddress, BodyError> {
        let category = check_segment(&article.category)?;
        let slug = article.slug();
        let file_name = format!("{}.{}", check_segment(&slug)?, self.extension);

        match &self.source {
            BodySource::Remote(base) => {
                let mut url = base.clone();
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().push(category).push(&file_name);
                }
                Ok(BodyAddress::Remote(url))
            }
            BodySource::Directory(dir) => Ok(BodyAddress::File(dir.join(category).join(file_name))),
        }
    }

    /// Fetch the raw (Markdown) body for `article`.
    pub async fn load(&self, article: &Article) -> Result<String, BodyError> {
        let address = self.address(article)?;
        tracing::debug!(address = %address, "Loading article body");

        match address {
            BodyAddress::Remote(url) => {
                let display = url.to_string();
                let response = match transport::get(self.client.get(url), self.timeout).await {
                    Err(TransportFailure::HttpStatus(404)) => {
                        return Err(BodyError::NotFound(display))
                    }
                    other => other?,
                };
                Ok(transport::read_limited_text(response, MAX_BODY_SIZE).await?)
            }
            BodyAddress::File(path) => {
                let metadata = match tokio::fs::metadata(&path).await {
                    Ok(m) => m,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return Err(BodyError::NotFound(path.display().to_string()))
                    }
                    Err(e) => return Err(BodyError::Io(e)),
                };
                if metadata.len() > MAX_BODY_SIZE as u64 {
                    return Err(BodyError::TooLarge(MAX_BODY_SIZE));
                }
                let bytes = tokio::fs::read(&path).await?;
                String::from_utf8(bytes).map_err(|_| BodyError::InvalidUtf8)
            }
        }
    }
}

/// Render Markdown to an HTML fragment.
///
/// No sanitization is applied; raw HTML in the source passes through.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

// ============================================================================
// Tests
// ============================================================================
