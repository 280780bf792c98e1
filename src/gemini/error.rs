//! Gemini client error types.

use thiserror::Error;

/// Errors from a single Gemini request.
///
/// These never reach the player; the collaborators log them and substitute
/// fallback content.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP transport error (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response parsed but carried no usable content.
    #[error("empty response: {0}")]
    Empty(&'static str),
}
