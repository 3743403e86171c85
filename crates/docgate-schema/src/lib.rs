//! # docgate-schema — Schema Loading & Validation
//!
//! Everything `docgate` needs between "a schema path and a glob pattern"
//! and "a verdict per file". Schema semantics, `$ref` mechanics and format
//! checks are delegated to the `jsonschema` crate; this crate wires the
//! filesystem into it.
//!
//! ## Modules
//!
//! - [`discovery`] — expands a glob pattern into candidate data files.
//! - [`loader`] — reads the main schema and lazily loads externally
//!   referenced schemas through the [`SchemaLoader`] capability.
//! - [`compiler`] — compiles a schema into a [`CompiledValidator`] with
//!   format checkers enabled.
//! - [`document`] — recognises and parses YAML data documents.
//! - [`error`] — the [`CheckError`] hierarchy.
//!
//! ## Crate Policy
//!
//! - Schema and data documents are plain `serde_json::Value` trees.
//! - Every failure is a structured [`CheckError`]; nothing here exits the
//!   process or prints to stdout.

pub mod compiler;
pub mod discovery;
pub mod document;
pub mod error;
pub mod loader;

pub use compiler::{compile, CompileOptions, CompiledValidator, SchemaDraft, Verdict, Violation};
pub use discovery::resolve_pattern;
pub use document::{is_data_file, load_document, DATA_EXTENSIONS};
pub use error::CheckError;
pub use loader::{load_schema, FsSchemaLoader, SchemaLoader};
