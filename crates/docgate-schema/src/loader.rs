//! # Schema Loading
//!
//! Reads the main schema from disk and provides the [`SchemaLoader`]
//! capability the compiler uses to fetch externally referenced schemas.
//!
//! ## Reference Resolution
//!
//! The validation engine resolves every `$ref` against the base URI of the
//! schema it appears in and hands the resulting absolute URI to a
//! retriever. [`ReferenceRetriever`] maps that URI back onto a reference
//! string relative to the main schema's directory and asks the loader for
//! it:
//!
//! - `json-schema:///sub.json` (schemas without `$id`) → `sub.json`
//! - `file:///abs/sub.json` → `/abs/sub.json`
//! - `<$id directory>/sub.json` → `sub.json`
//!
//! Each distinct reference is loaded at most once per compilation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::CheckError;

/// Base URI the validation engine assigns to schemas without an `$id`.
const DEFAULT_BASE_URI: &str = "json-schema:///";

const FILE_URI_PREFIX: &str = "file://";

// ---------------------------------------------------------------------------
// Loader capability
// ---------------------------------------------------------------------------

/// Loads a schema document for a reference encountered during compilation.
///
/// Implementations receive the reference as a path-like string relative to
/// the main schema's directory (or an absolute path) and return the parsed
/// document, or fail with a [`CheckError`] naming what could not be found.
pub trait SchemaLoader: Send + Sync {
    /// Load the schema document identified by `reference`.
    fn load(&self, reference: &str) -> Result<Value, CheckError>;
}

/// Filesystem-backed [`SchemaLoader`] rooted at the main schema's directory.
#[derive(Debug, Clone)]
pub struct FsSchemaLoader {
    base_dir: PathBuf,
}

impl FsSchemaLoader {
    /// Create a loader that resolves references against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Create a loader rooted at the directory containing `schema_path`.
    ///
    /// The directory is canonicalised when possible so that error messages
    /// name an absolute path.
    pub fn for_schema(schema_path: &Path) -> Self {
        let dir = match schema_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = std::fs::canonicalize(&dir).unwrap_or(dir);
        Self::new(dir)
    }

    /// The directory references are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a reference string to a filesystem path.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl SchemaLoader for FsSchemaLoader {
    fn load(&self, reference: &str) -> Result<Value, CheckError> {
        let path = self.resolve(reference);
        if !path.exists() {
            return Err(CheckError::ReferenceNotFound {
                path: path.display().to_string(),
            });
        }
        tracing::debug!(reference, path = %path.display(), "loading referenced schema");
        read_json(&path)
    }
}

/// Read and parse the main schema file.
///
/// # Errors
///
/// Returns [`CheckError::SchemaLoad`] if the file cannot be read or is not
/// valid JSON.
pub fn load_schema(path: &Path) -> Result<Value, CheckError> {
    read_json(path)
}

fn read_json(path: &Path) -> Result<Value, CheckError> {
    let content = std::fs::read_to_string(path).map_err(|e| CheckError::SchemaLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| CheckError::SchemaLoad {
        path: path.display().to_string(),
        reason: format!("JSON parse error: {e}"),
    })
}

// ---------------------------------------------------------------------------
// URI → reference mapping
// ---------------------------------------------------------------------------

/// The directory part of a schema's `$id`, including the trailing slash.
pub(crate) fn id_base(schema: &Value) -> Option<String> {
    let id = schema.get("$id")?.as_str()?;
    let id = id.split('#').next().unwrap_or(id);
    let cut = id.rfind('/')?;
    Some(id[..=cut].to_string())
}

/// Map a resolved reference URI onto a loader reference string.
pub(crate) fn reference_for(uri: &str, id_base: Option<&str>) -> Result<String, CheckError> {
    let without_fragment = uri.split('#').next().unwrap_or(uri);

    let reference = if let Some(rest) = without_fragment.strip_prefix(DEFAULT_BASE_URI) {
        Some(rest.to_string())
    } else if let Some(rest) = without_fragment.strip_prefix(FILE_URI_PREFIX) {
        // file:///abs/path and file://localhost/abs/path both name /abs/path.
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        Some(rest.to_string())
    } else {
        id_base
            .and_then(|base| without_fragment.strip_prefix(base))
            .map(str::to_string)
    };

    match reference {
        Some(r) if !r.is_empty() => Ok(r),
        _ => Err(CheckError::UnsupportedReference {
            uri: uri.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Retriever bridge
// ---------------------------------------------------------------------------

/// Bridges the validation engine's retriever hook to a [`SchemaLoader`].
///
/// Loaded documents are memoised per reference. The first loader failure
/// is kept in a shared slot so the compiler can surface it in place of the
/// engine's wrapped error.
pub(crate) struct ReferenceRetriever {
    loader: Arc<dyn SchemaLoader>,
    id_base: Option<String>,
    cache: Mutex<HashMap<String, Value>>,
    failure: Arc<Mutex<Option<CheckError>>>,
}

impl ReferenceRetriever {
    pub(crate) fn new(
        loader: Arc<dyn SchemaLoader>,
        id_base: Option<String>,
        failure: Arc<Mutex<Option<CheckError>>>,
    ) -> Self {
        Self {
            loader,
            id_base,
            cache: Mutex::new(HashMap::new()),
            failure,
        }
    }

    pub(crate) fn fetch(&self, uri: &str) -> Result<Value, CheckError> {
        let reference = reference_for(uri, self.id_base.as_deref())?;

        if let Some(doc) = self.cache.lock().get(&reference) {
            return Ok(doc.clone());
        }

        let doc = self.loader.load(&reference)?;
        self.cache.lock().insert(reference, doc.clone());
        Ok(doc)
    }
}

impl jsonschema::Retrieve for ReferenceRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        tracing::trace!(uri = uri_str, "retrieving external reference");
        self.fetch(uri_str).map_err(|e| {
            let message = e.to_string();
            let mut slot = self.failure.lock();
            if slot.is_none() {
                *slot = Some(e);
            }
            message.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: AtomicUsize,
    }

    impl SchemaLoader for CountingLoader {
        fn load(&self, reference: &str) -> Result<Value, CheckError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "title": reference }))
        }
    }

    fn retriever(loader: Arc<dyn SchemaLoader>, id_base: Option<&str>) -> ReferenceRetriever {
        ReferenceRetriever::new(
            loader,
            id_base.map(str::to_string),
            Arc::new(Mutex::new(None)),
        )
    }

    #[test]
    fn load_schema_parses_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("schema.json");
        std::fs::write(&path, r#"{"type": "object"}"#).unwrap();
        assert_eq!(load_schema(&path).unwrap(), json!({"type": "object"}));
    }

    #[test]
    fn load_schema_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.json");
        match load_schema(&path) {
            Err(CheckError::SchemaLoad { path, .. }) => assert!(path.contains("absent.json")),
            other => panic!("expected SchemaLoad, got: {other:?}"),
        }
    }

    #[test]
    fn load_schema_malformed_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        match load_schema(&path) {
            Err(CheckError::SchemaLoad { reason, .. }) => assert!(reason.contains("JSON")),
            other => panic!("expected SchemaLoad, got: {other:?}"),
        }
    }

    #[test]
    fn fs_loader_resolves_relative_to_schema_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let defs = tmp.path().join("defs");
        std::fs::create_dir_all(&defs).unwrap();
        std::fs::write(defs.join("name.json"), r#"{"type": "string"}"#).unwrap();
        let main = tmp.path().join("main.json");
        std::fs::write(&main, "{}").unwrap();

        let loader = FsSchemaLoader::for_schema(&main);
        let doc = loader.load("defs/name.json").unwrap();
        assert_eq!(doc, json!({"type": "string"}));
    }

    #[test]
    fn fs_loader_missing_reference_names_resolved_path() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = FsSchemaLoader::new(tmp.path());
        let err = loader.load("sub.json").unwrap_err();
        match &err {
            CheckError::ReferenceNotFound { path } => {
                assert!(path.ends_with("sub.json"));
                assert!(path.starts_with(&tmp.path().display().to_string()));
            }
            other => panic!("expected ReferenceNotFound, got: {other:?}"),
        }
        assert!(err.to_string().starts_with("Referenced schema not found: "));
    }

    #[test]
    fn fs_loader_absolute_reference_ignores_base() {
        let tmp = tempfile::tempdir().unwrap();
        let abs = tmp.path().join("abs.json");
        std::fs::write(&abs, r#"{"minimum": 1}"#).unwrap();
        let loader = FsSchemaLoader::new("/definitely/not/here");
        assert_eq!(loader.resolve(&abs.display().to_string()), abs);
        assert_eq!(
            loader.load(&abs.display().to_string()).unwrap(),
            json!({"minimum": 1})
        );
    }

    #[test]
    fn for_schema_without_parent_uses_current_dir() {
        let loader = FsSchemaLoader::for_schema(Path::new("schema.json"));
        let cwd = std::fs::canonicalize(".").unwrap();
        assert_eq!(loader.base_dir(), cwd.as_path());
    }

    #[test]
    fn reference_mapping() {
        assert_eq!(
            reference_for("json-schema:///sub.json", None).unwrap(),
            "sub.json"
        );
        assert_eq!(
            reference_for("json-schema:///defs/a.json#/definitions/x", None).unwrap(),
            "defs/a.json"
        );
        assert_eq!(
            reference_for("file:///tmp/schemas/a.json", None).unwrap(),
            "/tmp/schemas/a.json"
        );
        assert_eq!(
            reference_for(
                "https://example.com/schemas/common/addr.json",
                Some("https://example.com/schemas/")
            )
            .unwrap(),
            "common/addr.json"
        );
    }

    #[test]
    fn reference_mapping_rejects_foreign_uris() {
        let err = reference_for("https://elsewhere.example/x.json", None).unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedReference { .. }));

        let err = reference_for(
            "https://elsewhere.example/x.json",
            Some("https://example.com/schemas/"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("elsewhere.example"));
    }

    #[test]
    fn id_base_takes_directory_of_id() {
        assert_eq!(
            id_base(&json!({"$id": "https://example.com/schemas/main.json"})).as_deref(),
            Some("https://example.com/schemas/")
        );
        assert_eq!(id_base(&json!({"type": "object"})), None);
        assert_eq!(id_base(&json!({"$id": "main.json"})), None);
    }

    #[test]
    fn retriever_loads_each_reference_once() {
        let loader = Arc::new(CountingLoader {
            calls: AtomicUsize::new(0),
        });
        let r = retriever(loader.clone(), None);

        let first = r.fetch("json-schema:///sub.json").unwrap();
        let second = r.fetch("json-schema:///sub.json#/definitions/a").unwrap();
        r.fetch("json-schema:///other.json").unwrap();

        assert_eq!(first, second);
        assert_eq!(first, json!({"title": "sub.json"}));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }
}
