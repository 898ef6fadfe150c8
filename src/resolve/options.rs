use crate::document::types::value_kind;
use crate::error::{EnvzError, Result};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Variable naming the active environment when none is passed explicitly.
pub const ENVIRONMENT_VAR: &str = "NODE_ENV";

/// Environment used when neither the options nor the variable name one.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Which side wins when the env file and environment variables share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrideDirection {
	/// File values override environment variables.
	FileOverrides,

	/// Environment variables override file values (explicitly requested).
	EnvOverrides,

	/// Environment variables override file values (nothing requested).
	#[default]
	EnvOverridesDefault,
}

impl OverrideDirection {
	/// Decode a loosely typed `yamlFileOverride` value.
	///
	/// `true`/`"true"` and `false`/`"false"` are accepted; null means unset.
	pub fn from_value(value: &Value) -> Result<Self> {
		match value {
			Value::Null => Ok(OverrideDirection::EnvOverridesDefault),
			Value::Bool(true) => Ok(OverrideDirection::FileOverrides),
			Value::Bool(false) => Ok(OverrideDirection::EnvOverrides),
			Value::String(s) if s == "true" => Ok(OverrideDirection::FileOverrides),
			Value::String(s) if s == "false" => Ok(OverrideDirection::EnvOverrides),
			other => Err(EnvzError::InvalidOption {
				name: "yamlFileOverride".to_string(),
				detail: format!("expected true or false, found {}", value_kind(other)),
			}),
		}
	}

	/// Map an optional CLI flag onto a direction.
	pub fn from_flag(file_overrides: Option<bool>) -> Self {
		match file_overrides {
			Some(true) => OverrideDirection::FileOverrides,
			Some(false) => OverrideDirection::EnvOverrides,
			None => OverrideDirection::EnvOverridesDefault,
		}
	}

	pub fn file_wins(self) -> bool {
		self == OverrideDirection::FileOverrides
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			OverrideDirection::FileOverrides => "file-overrides",
			OverrideDirection::EnvOverrides => "env-overrides",
			OverrideDirection::EnvOverridesDefault => "env-overrides (default)",
		}
	}
}

/// Options for a single resolution.
///
/// Built once per call and only ever read by the resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionOptions {
	/// Base directory for relative file paths. Defaults to the working directory.
	pub cwd: Option<PathBuf>,

	/// Active environment. Overrides `NODE_ENV` when non-empty.
	pub environment: Option<String>,

	/// Precedence between the env file and environment variables.
	pub override_direction: OverrideDirection,

	/// Any other options, passed through into the resolved config.
	pub extra: Mapping,
}

impl ResolutionOptions {
	/// Split a loosely typed option mapping into known options and pass-through keys.
	///
	/// Recognizes `cwd`, `environment` and `yamlFileOverride` (also spelled
	/// `fileOverridesEnv`). Everything else lands in `extra`.
	pub fn from_mapping(options: Mapping) -> Result<Self> {
		let mut resolved = ResolutionOptions::default();

		for (key, value) in options {
			match key.as_str() {
				Some("cwd") => {
					resolved.cwd = optional_string("cwd", &value)?.map(PathBuf::from);
				}
				Some("environment") => {
					resolved.environment = optional_string("environment", &value)?;
				}
				Some("yamlFileOverride" | "fileOverridesEnv") => {
					resolved.override_direction = OverrideDirection::from_value(&value)?;
				}
				_ => {
					resolved.extra.insert(key, value);
				}
			}
		}

		Ok(resolved)
	}

	/// Add a pass-through option.
	pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(Value::from(key.into()), value.into());
		self
	}
}

fn optional_string(name: &str, value: &Value) -> Result<Option<String>> {
	match value {
		Value::Null => Ok(None),
		Value::String(s) => Ok(Some(s.clone())),
		other => Err(EnvzError::InvalidOption {
			name: name.to_string(),
			detail: format!("expected a string, found {}", value_kind(other)),
		}),
	}
}

/// Host context read by the resolver: environment variables and working directory.
///
/// `capture` snapshots the real process; tests build one directly so
/// resolution never depends on process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ambient {
	vars: BTreeMap<String, String>,
	cwd: PathBuf,
}

impl Ambient {
	pub fn new<I, K, V>(vars: I, cwd: impl Into<PathBuf>) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Ambient {
			vars: vars
				.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
			cwd: cwd.into(),
		}
	}

	/// Snapshot the current process environment and working directory.
	///
	/// Variables whose name or value is not valid UTF-8 are skipped.
	pub fn capture() -> Result<Self> {
		let cwd =
			std::env::current_dir().map_err(|source| EnvzError::WorkingDirectory { source })?;
		let vars = std::env::vars_os().filter_map(|(key, value)| {
			Some((key.into_string().ok()?, value.into_string().ok()?))
		});

		Ok(Ambient::new(vars, cwd))
	}

	pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.vars.insert(key.into(), value.into());
		self
	}

	pub fn var(&self, key: &str) -> Option<&str> {
		self.vars.get(key).map(String::as_str)
	}

	pub fn vars(&self) -> &BTreeMap<String, String> {
		&self.vars
	}

	pub fn cwd(&self) -> &Path {
		&self.cwd
	}
}
