//! Env file documents for envz.
//!
//! This module handles:
//! - YAML parsing and serialization of env files
//! - Environment sections in declaration order
//! - Dotted key paths and `KEY=VALUE` assignments

pub mod parser;
pub mod path;
pub mod types;

pub use parser::{load_document, parse_document_str, parse_fragment_str, serialize_document};
pub use path::{insert_path, lookup_path, parse_assignment};
pub use types::{ConfigDocument, Environment, environment_name};
