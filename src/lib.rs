//! envz - environment-scoped YAML configuration merged with environment variables.
//!
//! This library provides the core functionality for envz, including:
//! - Env file parsing with environment sections in declaration order
//! - Environment cascade and override-direction resolution
//! - Deep merging of YAML mappings
//! - Persisting updates back to the env file
//!
//! # Example
//!
//! ```no_run
//! use envz::resolve::{ResolutionOptions, resolve};
//! use std::path::Path;
//!
//! let options = ResolutionOptions {
//!     environment: Some("production".to_string()),
//!     ..Default::default()
//! };
//! let config = resolve(Some(Path::new("env.yaml")), &options).unwrap();
//!
//! println!("env: {:?}", config.env());
//! println!("port: {:?}", config.get("PORT"));
//! ```

pub mod document;
pub mod error;
pub mod fs;
pub mod merge;
pub mod persist;
pub mod resolve;

pub use error::{EnvzError, Result};
pub use persist::{SaveOutcome, persist, persist_with};
pub use resolve::{ResolutionOptions, ResolvedConfig, resolve, resolve_with};
