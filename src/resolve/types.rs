use crate::document::path::lookup_path;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// The merged configuration for the active environment.
///
/// Always carries `env` and `cwd`, plus `envFilePath` whenever the options
/// fragment took part in the merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig(Mapping);

impl ResolvedConfig {
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Look up a dotted path such as `config.database.host`.
	pub fn get_path(&self, path: &str) -> Option<&Value> {
		lookup_path(&self.0, path)
	}

	/// String value of a top-level key, if it is a string.
	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(Value::as_str)
	}

	/// The active environment name.
	pub fn env(&self) -> Option<&str> {
		self.get_str("env")
	}

	/// The working directory the env file was resolved against.
	pub fn cwd(&self) -> Option<&str> {
		self.get_str("cwd")
	}

	/// Absolute path of the env file, when the options fragment was merged.
	pub fn env_file_path(&self) -> Option<&str> {
		self.get_str("envFilePath")
	}

	pub fn as_mapping(&self) -> &Mapping {
		&self.0
	}

	pub fn into_mapping(self) -> Mapping {
		self.0
	}
}

impl From<Mapping> for ResolvedConfig {
	fn from(mapping: Mapping) -> Self {
		ResolvedConfig(mapping)
	}
}

impl From<ResolvedConfig> for Mapping {
	fn from(config: ResolvedConfig) -> Self {
		config.0
	}
}
