//! # Validation Pass
//!
//! A single linear pass: resolve files, load and compile the schema, then
//! validate each data file in resolution order. Structural failures are
//! recorded and the pass continues; every other error aborts it at once
//! and is returned to `main`, which alone decides the exit code.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use docgate_schema::{
    compile, is_data_file, load_document, load_schema, resolve_pattern, CompiledValidator,
    FsSchemaLoader, Verdict,
};

use crate::args::Invocation;
use crate::report::Reporter;

/// Tally of one validation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Data files that were validated.
    pub validated: usize,
    /// Validated files that failed the schema.
    pub invalid: usize,
    /// Matched files ignored for lacking a data-file extension.
    pub skipped: usize,
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        if self.invalid == 0 {
            0
        } else {
            1
        }
    }
}

/// Execute a full validation pass, writing report lines to `out`.
pub fn run<W: Write>(invocation: &Invocation, out: W) -> Result<RunOutcome> {
    let files = resolve_pattern(&invocation.pattern)?;

    let schema = load_schema(&invocation.schema_path)?;
    let loader = FsSchemaLoader::for_schema(&invocation.schema_path);
    tracing::debug!(
        schema = %invocation.schema_path.display(),
        base_dir = %loader.base_dir().display(),
        "loaded schema"
    );

    let validator = compile(&schema, Arc::new(loader), invocation.options)
        .with_context(|| format!("while compiling {}", invocation.schema_path.display()))?;
    tracing::info!(draft = %validator.draft(), "compiled schema");

    let mut reporter = Reporter::new(out);
    let outcome = validate_files(&validator, &files, &mut reporter)?;

    tracing::info!(
        validated = outcome.validated,
        invalid = outcome.invalid,
        skipped = outcome.skipped,
        "validation pass complete"
    );
    Ok(outcome)
}

/// Validate each recognised data file in `files`, in order.
///
/// Stops at the first document that cannot be loaded.
pub fn validate_files<W: Write>(
    validator: &CompiledValidator,
    files: &[PathBuf],
    reporter: &mut Reporter<W>,
) -> Result<RunOutcome> {
    let mut outcome = RunOutcome::default();

    for path in files {
        if !is_data_file(path) {
            tracing::debug!(path = %path.display(), "skipping non-data file");
            outcome.skipped += 1;
            continue;
        }

        let document = load_document(path)?;
        outcome.validated += 1;

        let written = match validator.validate(&document) {
            Verdict::Valid => reporter.valid(path),
            Verdict::Invalid(violations) => {
                outcome.invalid += 1;
                tracing::debug!(
                    path = %path.display(),
                    violations = violations.len(),
                    "document failed validation"
                );
                reporter.invalid(path, &violations)
            }
        };
        written.context("failed to write report")?;
    }

    Ok(outcome)
}
