//! Dotted key paths (`config.database.host`) into YAML mappings.

use crate::error::{EnvzError, Result};
use serde_yaml::{Mapping, Value};

/// Look up a dotted path. Numeric segments index into sequences.
pub fn lookup_path<'a>(mapping: &'a Mapping, path: &str) -> Option<&'a Value> {
	let mut parts = path.split('.');
	let mut current = mapping.get(parts.next()?)?;

	for part in parts {
		current = match current {
			Value::Mapping(map) => map.get(part)?,
			Value::Sequence(items) => items.get(part.parse::<usize>().ok()?)?,
			_ => return None,
		};
	}

	Some(current)
}

/// Set the value at a dotted path, creating intermediate mappings.
///
/// An intermediate value that is not a mapping is replaced by one.
pub fn insert_path(mapping: &mut Mapping, path: &str, value: Value) -> Result<()> {
	let parts: Vec<&str> = path.split('.').collect();
	if parts.iter().any(|part| part.is_empty()) {
		return Err(EnvzError::InvalidOption {
			name: path.to_string(),
			detail: "key path has an empty segment".to_string(),
		});
	}

	insert_parts(mapping, &parts, value);
	Ok(())
}

fn insert_parts(mapping: &mut Mapping, parts: &[&str], value: Value) {
	match parts {
		[] => {}
		[last] => {
			mapping.insert(Value::from(*last), value);
		}
		[first, rest @ ..] => {
			let key = Value::from(*first);
			match mapping.get_mut(&key) {
				Some(Value::Mapping(child)) => insert_parts(child, rest, value),
				_ => {
					let mut child = Mapping::new();
					insert_parts(&mut child, rest, value);
					mapping.insert(key, Value::Mapping(child));
				}
			}
		}
	}
}

/// Parse `KEY=VALUE`, reading the value as a YAML scalar.
///
/// `PORT=8080` yields a number, `DEBUG=true` a boolean. Anything that isn't
/// a plain boolean, number or string (`A=a: b`, `A=~`, `A=[1]`, empty) is
/// kept as the raw string.
pub fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
	let (key, raw) = assignment
		.split_once('=')
		.ok_or_else(|| EnvzError::InvalidOption {
			name: assignment.to_string(),
			detail: "expected KEY=VALUE".to_string(),
		})?;

	let key = key.trim();
	if key.is_empty() {
		return Err(EnvzError::InvalidOption {
			name: assignment.to_string(),
			detail: "key is empty".to_string(),
		});
	}

	let value = match serde_yaml::from_str(raw) {
		Ok(scalar @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => scalar,
		_ => Value::from(raw),
	};

	Ok((key.to_string(), value))
}
