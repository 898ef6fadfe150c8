use crate::document::parser::load_document;
use crate::document::types::ConfigDocument;
use crate::error::Result;
use crate::fs::{FileStore, LocalFiles, resolve_env_file};
use crate::merge::deep_merge_all;
use crate::resolve::options::{
	Ambient, DEFAULT_ENVIRONMENT, ENVIRONMENT_VAR, OverrideDirection, ResolutionOptions,
};
use crate::resolve::types::ResolvedConfig;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::{debug, trace};

/// Resolve the configuration for the active environment.
///
/// Reads the process environment and working directory at call time and
/// resolves `file_path` (default `env.yaml`) against them.
pub fn resolve(file_path: Option<&Path>, options: &ResolutionOptions) -> Result<ResolvedConfig> {
	let ambient = Ambient::capture()?;
	resolve_with(&LocalFiles, &ambient, file_path, options)
}

/// Resolve against an explicit file store and host context.
///
/// The merge order is:
/// 1. The options fragment, when the file overrides the environment
/// 2. Environment sections in declaration order, up to and including the
///    active one (none if the active environment is not declared)
/// 3. The options fragment, when the environment overrides the file
pub fn resolve_with(
	files: &impl FileStore,
	ambient: &Ambient,
	file_path: Option<&Path>,
	options: &ResolutionOptions,
) -> Result<ResolvedConfig> {
	let cwd = match &options.cwd {
		Some(cwd) => ambient.cwd().join(cwd),
		None => ambient.cwd().to_path_buf(),
	};
	let env = active_environment(options, ambient);
	let env_file = resolve_env_file(&cwd, file_path);

	debug!(
		path = %env_file.display(),
		env = %env,
		direction = options.override_direction.as_str(),
		"resolving env file"
	);

	let document = load_document(files, &env_file)?;
	let options_fragment = effective_options(ambient, options, &cwd, &env, &env_file);
	let fragments = build_fragments(
		&document,
		&env,
		options_fragment,
		options.override_direction,
	)?;

	debug!(fragments = fragments.len(), "merging fragments");

	Ok(ResolvedConfig::from(deep_merge_all(fragments)))
}

/// Pick the active environment: explicit option, then `NODE_ENV`, then `development`.
///
/// Empty values count as unset.
pub fn active_environment(options: &ResolutionOptions, ambient: &Ambient) -> String {
	options
		.environment
		.as_deref()
		.filter(|env| !env.is_empty())
		.or_else(|| ambient.var(ENVIRONMENT_VAR).filter(|env| !env.is_empty()))
		.unwrap_or(DEFAULT_ENVIRONMENT)
		.to_string()
}

/// Build the options fragment: environment variables, then caller options,
/// then the computed `cwd`, `env` and `envFilePath` keys.
fn effective_options(
	ambient: &Ambient,
	options: &ResolutionOptions,
	cwd: &Path,
	env: &str,
	env_file: &Path,
) -> Mapping {
	let mut fragment: Mapping = ambient
		.vars()
		.iter()
		.map(|(key, value)| (Value::from(key.as_str()), Value::from(value.as_str())))
		.collect();

	for (key, value) in &options.extra {
		fragment.insert(key.clone(), value.clone());
	}

	fragment.insert(
		Value::from("cwd"),
		Value::from(cwd.to_string_lossy().into_owned()),
	);
	fragment.insert(Value::from("env"), Value::from(env));
	fragment.insert(
		Value::from("envFilePath"),
		Value::from(env_file.to_string_lossy().into_owned()),
	);

	fragment
}

/// Order the fragments to merge for `env`.
///
/// Environment sections cascade in declaration order and stop at the
/// active one; sections declared after it are never merged. When `env` is
/// not declared at all, only the options fragment is returned.
pub fn build_fragments(
	document: &ConfigDocument,
	env: &str,
	options_fragment: Mapping,
	direction: OverrideDirection,
) -> Result<Vec<Mapping>> {
	let (leading, trailing) = if direction.file_wins() {
		(Some(options_fragment), None)
	} else {
		(None, Some(options_fragment))
	};

	let mut fragments: Vec<Mapping> = leading.into_iter().collect();

	if document.contains_environment(env) {
		for environment in document.environments() {
			let environment = environment?;
			let is_active = environment.is_named(env);

			trace!(
				environment = environment.name.as_deref().unwrap_or("?"),
				"cascading environment"
			);
			fragments.push(environment.subtree);

			if is_active {
				break;
			}
		}
	} else {
		debug!(env = %env, "environment not declared in env file");
	}

	fragments.extend(trailing);
	Ok(fragments)
}
