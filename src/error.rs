use std::path::PathBuf;

/// Library-level structured errors for envz.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum EnvzError {
	/// The message is fixed; callers match on it, so the path stays a field.
	#[error("Env yaml file does not exist")]
	FileNotFound { path: PathBuf },

	#[error("Failed to read env file: {path}")]
	ReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse env file: {path}")]
	ParseError {
		path: PathBuf,
		#[source]
		source: serde_yaml::Error,
	},

	#[error("Invalid env file {path}: {detail}")]
	InvalidDocument { path: PathBuf, detail: String },

	#[error("Failed to serialize env document")]
	SerializeError {
		#[source]
		source: serde_yaml::Error,
	},

	#[error("Invalid option '{name}': {detail}")]
	InvalidOption { name: String, detail: String },

	#[error("Failed to determine the current working directory")]
	WorkingDirectory {
		#[source]
		source: std::io::Error,
	},
}

/// Result type alias using EnvzError.
pub type Result<T> = std::result::Result<T, EnvzError>;
