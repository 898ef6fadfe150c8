//! Persisting updates back to an env file.
//!
//! The update is deep-merged into the current document and the result is
//! written back as YAML. Nothing here looks at environment variables or the
//! environment cascade.

use crate::document::parser::{load_document, serialize_document};
use crate::error::{EnvzError, Result};
use crate::fs::{FileStore, LocalFiles, resolve_env_file};
use crate::merge::deep_merge_all;
use serde_yaml::Mapping;
use std::path::Path;
use tracing::{debug, warn};

/// Message reported in [`SaveOutcome::error`] when the write fails.
pub const SAVE_FAILED_MESSAGE: &str = "Failure to save the file";

/// Result of a save.
///
/// A failed write does not raise: `error` is set and `data` still holds the
/// merged document, so the caller can retry the write. When `error` is
/// non-empty the file on disk may hold the previous or a partial document.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
	/// The merged document.
	pub data: Mapping,

	/// Empty on success.
	pub error: String,
}

impl SaveOutcome {
	pub fn is_saved(&self) -> bool {
		self.error.is_empty()
	}
}

/// Merge `update` into the env file at `file_path` and write it back.
///
/// The path is resolved against the process working directory and defaults
/// to `env.yaml`.
pub fn persist(file_path: Option<&Path>, update: &Mapping) -> Result<SaveOutcome> {
	let cwd = std::env::current_dir().map_err(|source| EnvzError::WorkingDirectory { source })?;
	persist_with(&LocalFiles, &cwd, file_path, update)
}

/// Persist through an explicit file store, resolving `file_path` against `base_dir`.
pub fn persist_with(
	files: &impl FileStore,
	base_dir: &Path,
	file_path: Option<&Path>,
	update: &Mapping,
) -> Result<SaveOutcome> {
	let env_file = resolve_env_file(base_dir, file_path);
	let document = load_document(files, &env_file)?;

	let data = deep_merge_all([document.into_mapping(), update.clone()]);
	let contents = serialize_document(&data)?;

	debug!(path = %env_file.display(), bytes = contents.len(), "writing env file");

	let error = match files.write(&env_file, &contents) {
		Ok(()) => String::new(),
		Err(e) => {
			warn!(path = %env_file.display(), error = %e, "failed to write env file");
			SAVE_FAILED_MESSAGE.to_string()
		}
	};

	Ok(SaveOutcome { data, error })
}
