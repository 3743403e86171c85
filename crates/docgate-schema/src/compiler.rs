//! # Validator Compilation
//!
//! Compiles a loaded schema into a [`CompiledValidator`] using the
//! `jsonschema` crate. Format assertions (date, date-time, email, uri,
//! uuid, ipv4, ...) are enabled by default; unknown keywords and unknown
//! formats are tolerated rather than rejected.
//!
//! External `$ref` targets are fetched on demand through a
//! [`SchemaLoader`]. When a reference cannot be loaded, the loader's error
//! is returned as-is so the caller sees the unresolved path rather than
//! the engine's generic "unretrievable resource" wrapper.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::CheckError;
use crate::loader::{id_base, ReferenceRetriever, SchemaLoader};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// JSON Schema dialects understood by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDraft {
    /// Draft 4.
    Draft4,
    /// Draft 6.
    Draft6,
    /// Draft 7, the default when `$schema` is absent.
    Draft7,
    /// Draft 2019-09.
    Draft201909,
    /// Draft 2020-12.
    Draft202012,
}

impl SchemaDraft {
    /// Detect the draft from the schema's `$schema` keyword.
    ///
    /// Absent or unrecognised meta-schema URIs fall back to draft 7.
    pub fn detect(schema: &Value) -> Self {
        let Some(meta) = schema.get("$schema").and_then(Value::as_str) else {
            return Self::Draft7;
        };
        if meta.contains("draft-04") {
            Self::Draft4
        } else if meta.contains("draft-06") {
            Self::Draft6
        } else if meta.contains("draft-07") {
            Self::Draft7
        } else if meta.contains("2019-09") {
            Self::Draft201909
        } else if meta.contains("2020-12") {
            Self::Draft202012
        } else {
            Self::Draft7
        }
    }

    fn engine_draft(self) -> jsonschema::Draft {
        match self {
            Self::Draft4 => jsonschema::Draft::Draft4,
            Self::Draft6 => jsonschema::Draft::Draft6,
            Self::Draft7 => jsonschema::Draft::Draft7,
            Self::Draft201909 => jsonschema::Draft::Draft201909,
            Self::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

impl fmt::Display for SchemaDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft4 => "4",
            Self::Draft6 => "6",
            Self::Draft7 => "7",
            Self::Draft201909 => "2019-09",
            Self::Draft202012 => "2020-12",
        };
        f.write_str(name)
    }
}

impl FromStr for SchemaDraft {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches("draft").trim_start_matches('-') {
            "4" | "04" => Ok(Self::Draft4),
            "6" | "06" => Ok(Self::Draft6),
            "7" | "07" => Ok(Self::Draft7),
            "2019-09" => Ok(Self::Draft201909),
            "2020-12" => Ok(Self::Draft202012),
            other => Err(format!(
                "unknown draft '{other}' (expected 4, 6, 7, 2019-09 or 2020-12)"
            )),
        }
    }
}

/// Knobs for [`compile`].
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    /// Force a draft; `None` detects it from `$schema`.
    pub draft: Option<SchemaDraft>,
    /// Assert the `format` keyword instead of treating it as an annotation.
    pub validate_formats: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            draft: None,
            validate_formats: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// One structural validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending value in the data document.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// The instance path, with the document root shown as `/`.
    pub fn location(&self) -> &str {
        if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.message)
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The document satisfies the schema.
    Valid,
    /// All violations, in the order the engine reported them. Never empty.
    Invalid(Vec<Violation>),
}

impl Verdict {
    /// Whether the document passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// A schema compiled into an executable check.
pub struct CompiledValidator {
    inner: jsonschema::Validator,
    draft: SchemaDraft,
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("draft", &self.draft)
            .finish()
    }
}

impl CompiledValidator {
    /// The draft the schema was compiled under.
    pub fn draft(&self) -> SchemaDraft {
        self.draft
    }

    /// Validate a data document, collecting every violation.
    pub fn validate(&self, document: &Value) -> Verdict {
        let violations: Vec<Violation> = self
            .inner
            .iter_errors(document)
            .map(|err| Violation {
                instance_path: err.instance_path.to_string(),
                schema_path: err.schema_path.to_string(),
                message: err.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Verdict::Valid
        } else {
            Verdict::Invalid(violations)
        }
    }
}

/// Compile `schema` into a [`CompiledValidator`].
///
/// External references are loaded lazily through `loader`.
///
/// # Errors
///
/// - The loader's error (e.g. [`CheckError::ReferenceNotFound`]) if a
///   referenced schema cannot be loaded.
/// - [`CheckError::SchemaCompile`] if the schema is malformed.
pub fn compile(
    schema: &Value,
    loader: Arc<dyn SchemaLoader>,
    options: CompileOptions,
) -> Result<CompiledValidator, CheckError> {
    let draft = options.draft.unwrap_or_else(|| SchemaDraft::detect(schema));
    tracing::debug!(
        %draft,
        validate_formats = options.validate_formats,
        "compiling schema"
    );

    let failure = Arc::new(Mutex::new(None));
    let retriever = ReferenceRetriever::new(loader, id_base(schema), Arc::clone(&failure));

    let built = jsonschema::options()
        .with_draft(draft.engine_draft())
        .should_validate_formats(options.validate_formats)
        .should_ignore_unknown_formats(true)
        .with_retriever(retriever)
        .build(schema);

    match built {
        Ok(inner) => Ok(CompiledValidator { inner, draft }),
        Err(e) => {
            if let Some(reference_error) = failure.lock().take() {
                return Err(reference_error);
            }
            Err(CheckError::SchemaCompile {
                reason: e.to_string(),
            })
        }
    }
}
