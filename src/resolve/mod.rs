//! Configuration resolution for envz.
//!
//! This module handles:
//! - Active environment selection
//! - Environment cascade in declaration order
//! - Precedence between the env file and environment variables

pub mod options;
pub mod resolver;
pub mod types;

pub use options::{
	Ambient, DEFAULT_ENVIRONMENT, ENVIRONMENT_VAR, OverrideDirection, ResolutionOptions,
};
pub use resolver::{active_environment, build_fragments, resolve, resolve_with};
pub use types::ResolvedConfig;
