use crate::document::types::{ConfigDocument, value_kind};
use crate::error::{EnvzError, Result};
use crate::fs::FileStore;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Load the document at `path`, failing if the file does not exist.
pub fn load_document(files: &impl FileStore, path: &Path) -> Result<ConfigDocument> {
	if !files.exists(path) {
		return Err(EnvzError::FileNotFound {
			path: path.to_path_buf(),
		});
	}

	let content = files
		.read_to_string(path)
		.map_err(|source| EnvzError::ReadError {
			path: path.to_path_buf(),
			source,
		})?;

	parse_document_str(&content, path)
}

/// Parse a document from a string (useful for testing).
pub fn parse_document_str(content: &str, path: &Path) -> Result<ConfigDocument> {
	if content.trim().is_empty() {
		return ConfigDocument::from_value(Value::Null, path);
	}

	let mut value: Value = serde_yaml::from_str(content).map_err(|source| EnvzError::ParseError {
		path: path.to_path_buf(),
		source,
	})?;
	// `<<: *anchor` merge keys are resolved before sections are read.
	value.apply_merge().map_err(|source| EnvzError::ParseError {
		path: path.to_path_buf(),
		source,
	})?;

	ConfigDocument::from_value(value, path)
}

/// Serialize a document mapping back to YAML text.
///
/// Comments and formatting from the original file are not preserved.
pub fn serialize_document(document: &Mapping) -> Result<String> {
	serde_yaml::to_string(document).map_err(|source| EnvzError::SerializeError { source })
}

/// Parse an inline YAML update such as `production: {PORT: 8080}`.
///
/// An empty string is an empty update.
pub fn parse_fragment_str(content: &str) -> Result<Mapping> {
	if content.trim().is_empty() {
		return Ok(Mapping::new());
	}

	let invalid = |e: serde_yaml::Error| EnvzError::InvalidOption {
		name: "data".to_string(),
		detail: e.to_string(),
	};
	let mut value: Value = serde_yaml::from_str(content).map_err(invalid)?;
	value.apply_merge().map_err(invalid)?;

	match value {
		Value::Null => Ok(Mapping::new()),
		Value::Mapping(fragment) => Ok(fragment),
		other => Err(EnvzError::InvalidOption {
			name: "data".to_string(),
			detail: format!("expected a mapping, found {}", value_kind(&other)),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fs::LocalFiles;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_document() {
		let path = PathBuf::from("env.yaml");
		let doc = parse_document_str("", &path).unwrap();

		assert!(doc.is_empty());
		assert_eq!(doc.path(), path.as_path());
	}

	#[test]
	fn test_parse_basic_document() {
		let content = r#"
base:
  config:
    default: test
development:
  DATABASE: dev
production:
  DATABASE: prod
  PORT: 80
"#;
		let path = PathBuf::from("env.yaml");
		let doc = parse_document_str(content, &path).unwrap();

		assert_eq!(
			doc.environment_names(),
			vec!["base", "development", "production"]
		);
	}

	#[test]
	fn test_parse_malformed_document() {
		let path = PathBuf::from("env.yaml");
		let result = parse_document_str("development: [unclosed", &path);

		match result.unwrap_err() {
			EnvzError::ParseError { path: err_path, .. } => assert_eq!(err_path, path),
			other => panic!("Expected ParseError, got {other:?}"),
		}
	}

	#[test]
	fn test_load_missing_document() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("nope.yaml");

		let err = load_document(&LocalFiles, &path).unwrap_err();

		assert!(matches!(err, EnvzError::FileNotFound { .. }));
		assert_eq!(err.to_string(), "Env yaml file does not exist");
	}

	#[test]
	fn test_serialize_round_trip_is_semantic() {
		let path = PathBuf::from("env.yaml");
		let doc = parse_document_str(
			"production: {PORT: 80, allowed: [a, b], debug: true}\n",
			&path,
		)
		.unwrap();

		let text = serialize_document(doc.as_mapping()).unwrap();
		let reparsed = parse_document_str(&text, &path).unwrap();

		assert_eq!(reparsed, doc);
	}

	#[test]
	fn test_parse_fragment() {
		let fragment = parse_fragment_str("production: {PORT: 8080}").unwrap();
		let port = fragment.get("production").and_then(|env| env.get("PORT"));
		assert_eq!(port, Some(&Value::from(8080)));

		assert!(parse_fragment_str("").unwrap().is_empty());
		assert!(parse_fragment_str("- a").is_err());
	}

	#[test]
	fn test_merge_keys_resolved_in_document() {
		let content = r#"
base: &base
  HOST: h
  PORT: 80
development:
  <<: *base
  PORT: 3000
"#;
		let path = PathBuf::from("env.yaml");
		let doc = parse_document_str(content, &path).unwrap();

		let development = doc.as_mapping().get("development").unwrap();
		assert_eq!(development.get("<<"), None);
		assert_eq!(development.get("HOST"), Some(&Value::from("h")));
		assert_eq!(development.get("PORT"), Some(&Value::from(3000)));
	}

	#[test]
	fn test_merge_keys_resolved_in_fragment() {
		let fragment =
			parse_fragment_str("shared: &shared {DEBUG: true}\nstaging: {<<: *shared}").unwrap();
		let staging = fragment.get("staging").unwrap();

		assert_eq!(staging.get("<<"), None);
		assert_eq!(staging.get("DEBUG"), Some(&Value::Bool(true)));
	}
}
