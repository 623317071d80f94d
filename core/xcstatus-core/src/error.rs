//! Error types for xcstatus-core operations.
//!
//! The core parsing paths (build-root resolver, manifest reader, log
//! extractor) are deliberately total: they return defaults or `None`
//! instead of errors, because a status line must always render something.
//! This type covers the ambient surfaces where a caller can meaningfully
//! react, chiefly persistence of the status file.

#[derive(Debug, thiserror::Error)]
pub enum XcStatusError {
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using XcStatusError.
pub type Result<T> = std::result::Result<T, XcStatusError>;
