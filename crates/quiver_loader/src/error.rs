//! Error types for source ingestion.

use std::path::PathBuf;

use quiver_common::Namespace;

/// Failure reported by a [`Transformer`](crate::Transformer).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The source is not syntactically valid for the transformer.
    #[error("syntax error at byte {offset}: {reason}")]
    Syntax {
        /// Byte offset of the problem in the raw source.
        offset: usize,
        /// Description of the problem.
        reason: String,
    },

    /// The source contains no code.
    #[error("source is empty")]
    Empty,
}

/// Errors that abort ingestion of a single source unit.
///
/// None of these affect other units or the registry entry a failed unit
/// would have replaced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// An I/O error occurred while reading a source file or directory.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A source file is not valid UTF-8.
    #[error("source file {path} is not valid UTF-8")]
    NotUtf8 {
        /// The offending file.
        path: PathBuf,
    },

    /// The transformer rejected a declaring source unit.
    #[error("failed to transform {namespace} ({path}): {source}")]
    Transform {
        /// The source file.
        path: PathBuf,
        /// The namespace the unit declares.
        namespace: Namespace,
        /// The transformer's error.
        source: TransformError,
    },

    /// A version directory name is not a usable version label.
    #[error("directory {path} cannot be used as a version label")]
    InvalidVersion {
        /// The version directory.
        path: PathBuf,
    },
}
