//! # docgate-cli — The `validate` Command
//!
//! Validates every YAML file matched by a glob pattern against one JSON
//! Schema and reports a verdict per file:
//!
//! ```bash
//! validate schemas/service.schema.json 'config/**/*.yaml'
//! ```
//!
//! Exit code 0 means every matched data file was valid. Exit code 1 means
//! a usage error, an empty match set, a fatal load/compile/reference
//! error, or at least one invalid file.
//!
//! ## Layout
//!
//! - [`args`] — command-line surface.
//! - [`run`] — the linear validation pass.
//! - [`report`] — per-file stdout lines.
//!
//! Argument parsing is kept apart from the pass itself so the whole
//! pipeline runs in-process against any `Write` sink.

pub mod args;
pub mod report;
pub mod run;

pub use args::{Cli, Invocation, USAGE};
pub use report::Reporter;
pub use run::{run, validate_files, RunOutcome};
