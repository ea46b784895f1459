//! Removal error types.

/// Why a single package removal is considered failed.
///
/// Every variant is non-fatal to a run: it is logged with the app/package
/// pair and the run moves on.
#[derive(Debug, thiserror::Error)]
pub enum RemovalError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("endpoint returned status {status}")]
    Status { status: u16 },

    #[error("endpoint returned non-JSON content type {content_type:?}")]
    NotJson { content_type: Option<String> },

    #[error("invalid response body: {0}")]
    Body(String),

    #[error("endpoint reported failure (success = {0})")]
    Rejected(String),
}
