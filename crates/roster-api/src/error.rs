// ── API error types ──
//
// Transport-layer failures from the directory endpoint. Translated into
// `roster_core::CoreError` at the gateway boundary, where only the
// human-readable description survives.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("directory returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {message}")]
    Deserialization { message: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// ── Conversion into the core error surface ──────────────────────────

impl From<Error> for roster_core::CoreError {
    fn from(err: Error) -> Self {
        // The error view state shows this text verbatim -- keep it short.
        match err {
            Error::Transport(e) if e.is_timeout() => roster_core::CoreError::fetch("timeout"),
            Error::Transport(e) if e.is_connect() => {
                roster_core::CoreError::fetch(format!("cannot reach directory: {e}"))
            }
            other => roster_core::CoreError::fetch(other.to_string()),
        }
    }
}
