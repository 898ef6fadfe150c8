use crate::error::{EnvzError, Result};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// Parsed contents of an env file: environment name to configuration subtree.
///
/// Entries keep the order they are declared in the file. Resolution relies on
/// that order, since only environments declared up to the active one cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
	entries: Mapping,

	/// The file this document was parsed from.
	path: PathBuf,
}

impl ConfigDocument {
	/// Build a document from a parsed YAML value.
	///
	/// An empty file parses as null and becomes an empty document. Any other
	/// top-level value that is not a mapping is rejected.
	pub fn from_value(value: Value, path: &Path) -> Result<Self> {
		let entries = match value {
			Value::Null => Mapping::new(),
			Value::Mapping(entries) => entries,
			other => {
				return Err(EnvzError::InvalidDocument {
					path: path.to_path_buf(),
					detail: format!(
						"expected a mapping of environment names, found {}",
						value_kind(&other)
					),
				});
			}
		};

		Ok(ConfigDocument {
			entries,
			path: path.to_path_buf(),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn as_mapping(&self) -> &Mapping {
		&self.entries
	}

	pub fn into_mapping(self) -> Mapping {
		self.entries
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Environment names in declaration order.
	///
	/// Keys with no textual form (sequences, mappings) are skipped.
	pub fn environment_names(&self) -> Vec<String> {
		self.entries.keys().filter_map(environment_name).collect()
	}

	pub fn contains_environment(&self, name: &str) -> bool {
		self.entries
			.keys()
			.any(|key| environment_name(key).as_deref() == Some(name))
	}

	/// Iterate environments in declaration order, validating each subtree.
	///
	/// A null subtree (`staging:` with no body) yields an empty mapping.
	pub fn environments(&self) -> impl Iterator<Item = Result<Environment>> + '_ {
		self.entries.iter().map(move |(key, value)| {
			let name = environment_name(key);
			let subtree = match value {
				Value::Null => Mapping::new(),
				Value::Mapping(subtree) => subtree.clone(),
				other => {
					let label = match &name {
						Some(name) => format!("environment '{name}'"),
						None => format!("environment keyed by {}", value_kind(key)),
					};
					return Err(EnvzError::InvalidDocument {
						path: self.path.clone(),
						detail: format!("{label} must be a mapping, found {}", value_kind(other)),
					});
				}
			};
			Ok(Environment { name, subtree })
		})
	}
}

/// One environment section of a document.
#[derive(Debug, Clone)]
pub struct Environment {
	/// Textual form of the key, used to match the active environment.
	pub name: Option<String>,

	/// The configuration subtree.
	pub subtree: Mapping,
}

impl Environment {
	pub fn is_named(&self, name: &str) -> bool {
		self.name.as_deref() == Some(name)
	}
}

/// Textual form of an environment key.
///
/// `production:` and `2024:` both have one; a sequence key does not.
pub fn environment_name(key: &Value) -> Option<String> {
	match key {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Sequence(_) => "a sequence",
		Value::Mapping(_) => "a mapping",
		Value::Tagged(_) => "a tagged value",
	}
}
