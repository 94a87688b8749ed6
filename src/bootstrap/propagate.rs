use crate::config::parser::Properties;
use crate::config::types::PROPAGATION_PREFIX;
use crate::diagnostics::Diagnostics;
use crate::store::SettingsStore;
use tracing::debug;

/// Copy every `system.property.<name>` entry into the settings store as `<name>`.
///
/// Entries are visited in insertion order and written with plain
/// last-write-wins assignments, overwriting values already in the store.
/// Entries with nothing after the prefix are skipped. Returns the number of
/// writes.
pub fn propagate_properties(
	config: &Properties,
	store: &dyn SettingsStore,
	diagnostics: &Diagnostics,
) -> usize {
	diagnostics.emit("Checking for system properties in application configuration");

	let mut written = 0;
	for (key, value) in config.iter() {
		let Some(name) = key.strip_prefix(PROPAGATION_PREFIX) else {
			continue;
		};
		if name.is_empty() {
			continue;
		}

		diagnostics.emit(format!(
			"Setting system property {} to the following value: {}",
			name, value
		));
		store.set(name, value);
		written += 1;
	}

	debug!(written, "Propagated configuration entries");
	written
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parser::parse_properties_str;
	use crate::diagnostics::CaptureBuffer;
	use crate::store::MemoryStore;

	#[test]
	fn test_propagates_prefixed_entries_only() {
		let config = parse_properties_str(
			"system.property.foo=bar\nsystem.property.=ignored\nplain=value\n",
		)
		.unwrap();
		let store = MemoryStore::new();
		let buffer = CaptureBuffer::default();

		let written = propagate_properties(&config, &store, &buffer.diagnostics("test"));

		assert_eq!(written, 1);
		assert_eq!(
			store.entries(),
			vec![("foo".to_string(), "bar".to_string())]
		);
		assert!(buffer.contents().contains("Setting system property foo"));
	}

	#[test]
	fn test_repeated_key_in_file_last_value_wins() {
		let config = parse_properties_str(
			"system.property.mode=first\nother=x\nsystem.property.mode=second\n",
		)
		.unwrap();
		let store = MemoryStore::new();

		let written =
			propagate_properties(&config, &store, &CaptureBuffer::default().diagnostics("test"));

		assert_eq!(written, 1);
		assert_eq!(store.get("mode"), Some("second".to_string()));
	}

	#[test]
	fn test_overwrites_existing_store_values() {
		let config = parse_properties_str("system.property.region=eu\n").unwrap();
		let store = MemoryStore::with_entries([("region", "us")]);

		propagate_properties(&config, &store, &CaptureBuffer::default().diagnostics("test"));

		assert_eq!(store.get("region"), Some("eu".to_string()));
	}
}
