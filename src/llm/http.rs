//! Shared HTTP plumbing for the provider adapters.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::GenerationError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Longest provider error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Build the HTTP client every adapter uses.
pub(crate) fn build_http_client() -> Result<Client, GenerationError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GenerationError::ClientBuild(e.to_string()))
}

/// Map a transport-level failure (no HTTP status) to a generation error.
pub(crate) fn map_transport_error(provider: &str, error: reqwest::Error) -> GenerationError {
    let message = if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("connection error: {}", error)
    } else {
        error.to_string()
    };

    GenerationError::Network {
        provider: provider.to_string(),
        message,
    }
}

/// Turn a non-success response into a categorized error, pass others through.
pub(crate) async fn check_status(
    provider: &str,
    response: Response,
) -> Result<Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(provider, status, &body))
}

/// Decode a successful JSON response body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, GenerationError> {
    response
        .json::<T>()
        .await
        .map_err(|e| GenerationError::InvalidResponse {
            provider: provider.to_string(),
            message: format!("failed to parse response: {}", e),
        })
}

fn status_error(provider: &str, status: StatusCode, body: &str) -> GenerationError {
    let provider = provider.to_string();
    let message = error_message(body);

    match status.as_u16() {
        401 | 403 => GenerationError::AuthFailed { provider, message },
        429 => GenerationError::RateLimited { provider, message },
        code => GenerationError::RequestFailed {
            provider,
            status: code,
            message,
        },
    }
}

/// Pull a human-readable message out of a provider error body.
///
/// All supported providers nest it under `error.message`; anything else is
/// returned as (truncated) raw text.
pub(crate) fn error_message(body: &str) -> String {
    let nested = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    match nested {
        Some(message) => message,
        None if body.trim().is_empty() => "no error details".to_string(),
        None => body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}
