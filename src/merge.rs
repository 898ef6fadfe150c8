//! Deep merge for YAML mappings.
//!
//! Later values win. Mappings merge recursively, everything else (scalars,
//! sequences, nulls) is replaced wholesale. Sequences are never concatenated.

use serde_yaml::{Mapping, Value};

/// Deep merge two YAML values, with `overlay` taking precedence over `base`.
///
/// # Example
/// ```
/// use envz::merge::deep_merge;
/// use serde_yaml::Value;
///
/// let base: Value = serde_yaml::from_str("server: {port: 8080, host: localhost}").unwrap();
/// let overlay: Value = serde_yaml::from_str("server: {port: 9000}").unwrap();
/// let merged = deep_merge(base, overlay);
///
/// assert_eq!(merged["server"]["port"], Value::from(9000));
/// assert_eq!(merged["server"]["host"], Value::from("localhost"));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
	match (base, overlay) {
		(Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
			Value::Mapping(merge_mappings(base_map, overlay_map))
		}
		(_, overlay) => overlay,
	}
}

/// Merge `overlay` into `base` key by key.
///
/// Keys already present in `base` keep their position; new keys are appended
/// in the order `overlay` declares them.
pub fn merge_mappings(mut base: Mapping, overlay: Mapping) -> Mapping {
	for (key, overlay_value) in overlay {
		match base.get_mut(&key) {
			Some(slot) => {
				let base_value = std::mem::replace(slot, Value::Null);
				*slot = deep_merge(base_value, overlay_value);
			}
			None => {
				base.insert(key, overlay_value);
			}
		}
	}
	base
}

/// Merge fragments left to right, later fragments winning on collision.
pub fn deep_merge_all(fragments: impl IntoIterator<Item = Mapping>) -> Mapping {
	fragments.into_iter().fold(Mapping::new(), merge_mappings)
}
