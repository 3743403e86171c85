//! # Data Documents
//!
//! Recognises YAML data files by extension and parses them into
//! `serde_json::Value` trees for validation.

use std::path::Path;

use serde_json::Value;

use crate::error::CheckError;

/// File extensions (compared case-insensitively) treated as data documents.
pub const DATA_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Whether `path` carries a recognised data-file extension.
pub fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DATA_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Read and parse a YAML data document.
///
/// An empty (or whitespace-only) file parses as `null`.
///
/// # Errors
///
/// Returns [`CheckError::DocumentLoad`] if the file cannot be read or is
/// not valid YAML.
pub fn load_document(path: &Path) -> Result<Value, CheckError> {
    let content = std::fs::read_to_string(path).map_err(|e| CheckError::DocumentLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_yaml::from_str(&content).map_err(|e| CheckError::DocumentLoad {
        path: path.display().to_string(),
        reason: format!("YAML parse error: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recognises_yaml_extensions_case_insensitively() {
        assert!(is_data_file(Path::new("a.yaml")));
        assert!(is_data_file(Path::new("dir/b.yml")));
        assert!(is_data_file(Path::new("C.YAML")));
        assert!(is_data_file(Path::new("d.Yml")));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_data_file(Path::new("a.json")));
        assert!(!is_data_file(Path::new("a.txt")));
        assert!(!is_data_file(Path::new("yaml")));
        assert!(!is_data_file(Path::new("a.yaml.bak")));
        assert!(!is_data_file(Path::new(".yaml")));
    }

    #[test]
    fn parses_yaml_mapping() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.yaml");
        std::fs::write(&path, "name: Alice\ntags:\n  - admin\n  - ops\nage: 30\n").unwrap();
        assert_eq!(
            load_document(&path).unwrap(),
            json!({"name": "Alice", "tags": ["admin", "ops"], "age": 30})
        );
    }

    #[test]
    fn empty_file_is_null() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.yml");
        std::fs::write(&path, "\n  \n").unwrap();
        assert_eq!(load_document(&path).unwrap(), Value::Null);
    }

    #[test]
    fn malformed_yaml_is_document_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.yaml");
        std::fs::write(&path, "{{invalid yaml: [unbalanced").unwrap();
        match load_document(&path) {
            Err(CheckError::DocumentLoad { path, reason }) => {
                assert!(path.ends_with("bad.yaml"));
                assert!(reason.contains("YAML"));
            }
            other => panic!("expected DocumentLoad, got: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_document_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = load_document(&tmp.path().join("gone.yaml"));
        assert!(matches!(result, Err(CheckError::DocumentLoad { .. })));
    }
}
