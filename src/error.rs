//! Crate-level error type.

use std::path::PathBuf;

/// Errors that stop a run before or after analysis. Nothing inside the
/// extraction/resolution pipeline is fatal: per-file read failures become
/// skipped-file entries in the report instead of propagating.
#[allow(clippy::error_impl_error, reason = "crate-level error type shared by lib and binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A corpus document could not be read (permissions, invalid UTF-8).
    #[error("cannot read {}: {source}", path.display())]
    CorpusRead {
        /// Corpus-relative path of the unreadable document.
        path: PathBuf,
        /// The underlying read failure.
        source: std::io::Error,
    },

    /// A built-in matcher pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The pattern source text.
        pattern: String,
        /// Compiler message from the regex engine.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Report serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// The corpus root does not exist or is not a directory.
    #[error("corpus root not found: {}", path.display())]
    RootNotFound {
        /// The root path as given.
        path: PathBuf,
    },

    /// `.linkheal.toml` exists but cannot be parsed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
