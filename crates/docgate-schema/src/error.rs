//! # Error Hierarchy
//!
//! Structured error types for schema loading, reference resolution,
//! compilation, document loading and file discovery, built with
//! `thiserror`. Each variant carries the path, URI or pattern involved so
//! the CLI can report it verbatim.
//!
//! Structural validation failures are deliberately absent: a document that
//! does not satisfy the schema is a [`crate::Verdict::Invalid`], not an
//! error.

use thiserror::Error;

/// Errors raised while preparing or running a validation pass.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The main schema, or a referenced schema, could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoad {
        /// Path of the schema file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A `$ref` target does not exist on disk.
    #[error("Referenced schema not found: {path}")]
    ReferenceNotFound {
        /// The resolved filesystem path that was looked up.
        path: String,
    },

    /// A `$ref` URI cannot be mapped onto the local filesystem.
    #[error("unsupported schema reference: {uri}")]
    UnsupportedReference {
        /// The fully resolved reference URI.
        uri: String,
    },

    /// The schema could not be compiled into a validator.
    #[error("failed to compile schema: {reason}")]
    SchemaCompile {
        /// Human-readable reason reported by the validation engine.
        reason: String,
    },

    /// A data document could not be read or parsed.
    #[error("failed to load document {path}: {reason}")]
    DocumentLoad {
        /// Path of the data file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The glob pattern is syntactically invalid.
    #[error("invalid glob pattern {pattern}: {reason}")]
    InvalidPattern {
        /// The pattern as given on the command line.
        pattern: String,
        /// Human-readable reason reported by the glob engine.
        reason: String,
    },

    /// The glob pattern matched nothing.
    #[error("No files matched the pattern: {pattern}")]
    NoMatches {
        /// The pattern as given on the command line.
        pattern: String,
    },
}
