//! Process-wide settings store.
//!
//! The store is created once by the host and shared by handle. It receives
//! the resolved configuration location and every propagated entry, and is
//! read for the rest of the process lifetime.

use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A key/value store shared across the process.
///
/// Writes are plain last-write-wins assignments.
pub trait SettingsStore: Send + Sync {
	fn get(&self, key: &str) -> Option<String>;

	fn set(&self, key: &str, value: &str);

	/// All entries, sorted by key.
	fn entries(&self) -> Vec<(String, String)>;
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a store preloaded with the given entries.
	pub fn with_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let map = entries
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();
		Self {
			entries: RwLock::new(map),
		}
	}
}

impl SettingsStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.read().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) {
		self.entries
			.write()
			.insert(key.to_string(), value.to_string());
	}

	fn entries(&self) -> Vec<(String, String)> {
		self.entries
			.read()
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}
}
