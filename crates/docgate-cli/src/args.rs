//! # Command-Line Arguments
//!
//! Both positionals are optional at the clap level so that a missing one
//! is reported with our own usage line and exit code 1, not clap's
//! exit code 2. The schema path is taken as a raw `OsString` because
//! clap's `PathBuf` parser rejects empty values before we see them.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use docgate_schema::{CompileOptions, SchemaDraft};

/// Printed to stderr when a positional argument is missing or empty.
pub const USAGE: &str = "Usage: validate <schema.json> <data-glob>";

/// Validate YAML data files against a JSON Schema.
///
/// Every file matched by DATA_GLOB with a .yaml or .yml extension is
/// parsed and checked against SCHEMA; other files are ignored.
#[derive(Parser, Debug)]
#[command(name = "validate", version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON Schema file.
    #[arg(value_name = "SCHEMA", value_parser = clap::value_parser!(OsString))]
    pub schema: Option<OsString>,

    /// Glob pattern selecting the data files (quote it to keep the shell
    /// from expanding it).
    #[arg(value_name = "DATA_GLOB")]
    pub pattern: Option<String>,

    /// Enable verbose logging on stderr. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Force a schema draft (4, 6, 7, 2019-09, 2020-12) instead of
    /// detecting it from `$schema`.
    #[arg(long, value_name = "DRAFT")]
    pub draft: Option<SchemaDraft>,

    /// Treat `format` as an annotation instead of asserting it.
    #[arg(long)]
    pub no_formats: bool,
}

/// A complete, validated request for one validation pass.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub schema_path: PathBuf,
    pub pattern: String,
    pub options: CompileOptions,
}

impl Cli {
    /// Build the [`Invocation`], or `None` if either positional is missing
    /// or empty.
    pub fn invocation(&self) -> Option<Invocation> {
        let schema_path = self.schema.as_ref().filter(|p| !p.is_empty())?;
        let pattern = self.pattern.as_ref().filter(|p| !p.is_empty())?;

        Some(Invocation {
            schema_path: PathBuf::from(schema_path),
            pattern: pattern.clone(),
            options: CompileOptions {
                draft: self.draft,
                validate_formats: !self.no_formats,
            },
        })
    }

    /// Log filter directive for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
