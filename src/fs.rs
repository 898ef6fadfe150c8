//! Filesystem access used by the resolver and persister.

use std::io;
use std::path::{Path, PathBuf};

/// File resolved when no path is given.
pub const DEFAULT_FILE_NAME: &str = "env.yaml";

/// Resolve an env file path against `base_dir`, defaulting to `env.yaml`.
///
/// Absolute paths are returned unchanged.
pub fn resolve_env_file(base_dir: &Path, file_path: Option<&Path>) -> PathBuf {
	let file_path = file_path
		.filter(|path| !path.as_os_str().is_empty())
		.unwrap_or(Path::new(DEFAULT_FILE_NAME));

	base_dir.join(file_path)
}

/// File operations scoped to a single path per call.
///
/// `LocalFiles` talks to the real filesystem.
pub trait FileStore {
	/// Whether a file exists at `path`.
	fn exists(&self, path: &Path) -> bool;

	/// Read the whole file as UTF-8.
	fn read_to_string(&self, path: &Path) -> io::Result<String>;

	/// Replace the file contents.
	fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// `FileStore` backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileStore for LocalFiles {
	fn exists(&self, path: &Path) -> bool {
		path.exists()
	}

	fn read_to_string(&self, path: &Path) -> io::Result<String> {
		std::fs::read_to_string(path)
	}

	fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
		std::fs::write(path, contents)
	}
}
