//! Shared HTTP response checks for the Gemini endpoints.

use super::error::GeminiError;

/// Longest error body kept in a [`GeminiError::Api`] message.
const MAX_ERROR_BODY: usize = 512;

/// Return the response unchanged on success, otherwise a [`GeminiError::Api`]
/// carrying the status code and (truncated) response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, GeminiError> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(GeminiError::Api {
            status,
            message: truncate(&body, MAX_ERROR_BODY).to_string(),
        });
    }
    Ok(resp)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
