//! Shared HTTP plumbing for the gateway and the body loader.

use futures::StreamExt;
use std::time::Duration;

/// Failure while sending a request or draining its body.
#[derive(Debug)]
pub(crate) enum TransportFailure {
    Network(reqwest::Error),
    Timeout(Duration),
    HttpStatus(u16),
    TooLarge(usize),
    InvalidUtf8,
}

/// Send a GET request, enforcing `timeout` and a 2xx status.
pub(crate) async fn get(
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<reqwest::Response, TransportFailure> {
    let response = tokio::time::timeout(timeout, request.send())
        .await
        .map_err(|_| TransportFailure::Timeout(timeout))?
        .map_err(TransportFailure::Network)?;

    if !response.status().is_success() {
        return Err(TransportFailure::HttpStatus(response.status().as_u16()));
    }

    Ok(response)
}

/// Read a response body as UTF-8, refusing anything larger than `limit`.
pub(crate) async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, TransportFailure> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(TransportFailure::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(TransportFailure::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(TransportFailure::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| TransportFailure::InvalidUtf8)
}
