// ── Core error types ──
//
// User-facing errors from roster-core. Gateway implementations translate
// their transport errors into these -- consumers never see HTTP status
// codes or JSON parse failures directly.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A page fetch failed. The message is the human-readable description
    /// surfaced verbatim in the error view state.
    #[error("{message}")]
    Fetch { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }
}
