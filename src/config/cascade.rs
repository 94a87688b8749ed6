use crate::config::location::Location;
use crate::config::types::ConfigSettings;
use crate::diagnostics::Diagnostics;
use crate::host::{Environment, HostContext, non_blank};
use crate::store::SettingsStore;
use tracing::debug;

/// Which source supplied the configuration location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
	Store,
	Environment,
	HostParameter,
	Fallback,
}

/// Outcome of resolving the configuration location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
	/// Normalized location, as written to the settings store.
	pub location: Location,

	/// The source that supplied it.
	pub source: LocationSource,

	/// True when the `file:` scheme had to be assumed.
	pub scheme_assumed: bool,
}

/// Runs the location cascade for one startup.
pub struct LocationResolver<'a> {
	settings: &'a ConfigSettings,
	diagnostics: &'a Diagnostics,
}

impl<'a> LocationResolver<'a> {
	pub fn new(settings: &'a ConfigSettings, diagnostics: &'a Diagnostics) -> Self {
		Self {
			settings,
			diagnostics,
		}
	}

	/// Resolve the configuration location.
	///
	/// The cascade order is:
	/// 1. The settings store, keyed by the config location key
	/// 2. Environment variables, same key
	/// 3. Host parameters, same key
	/// 4. The fallback location
	///
	/// The first non-blank value wins. It is normalized and written back to
	/// the store under the config location key. This never fails.
	pub fn resolve(
		&self,
		store: &dyn SettingsStore,
		env: &dyn Environment,
		host: &dyn HostContext,
	) -> ResolvedLocation {
		let key = self.settings.config_location_key.as_str();
		let (raw, source) = self.select(key, store, env, host);

		let (location, scheme_assumed) = Location::normalize(&raw);
		if scheme_assumed {
			self.diagnostics.emit(format!(
				"The application config location neither starts with classpath: nor file:, assuming {}",
				location
			));
		}

		let normalized = location.to_string();
		self.diagnostics.emit(format!(
			"Setting system property {} to the following value: {}",
			key, normalized
		));
		store.set(key, &normalized);
		debug!(key, location = %normalized, ?source, "Resolved configuration location");

		ResolvedLocation {
			location,
			source,
			scheme_assumed,
		}
	}

	fn select(
		&self,
		key: &str,
		store: &dyn SettingsStore,
		env: &dyn Environment,
		host: &dyn HostContext,
	) -> (String, LocationSource) {
		self.diagnostics
			.emit("Checking for configuration location parameters...");

		self.diagnostics
			.emit(format!("Checking for system property {}", key));
		if let Some(value) = non_blank(store.get(key)) {
			self.diagnostics
				.emit(format!("Found system property {}: {}", key, value));
			return (value, LocationSource::Store);
		}

		self.diagnostics.emit(format!(
			"Didn't find system property {} holding application configuration location, checking environment variable {}",
			key, key
		));
		let env_value = match env.var(key) {
			Ok(value) => value,
			Err(raw) => {
				self.diagnostics.emit(format!(
					"Environment variable {} is not valid unicode, ignoring its value: {}",
					key,
					raw.to_string_lossy()
				));
				None
			}
		};
		if let Some(value) = non_blank(env_value) {
			self.diagnostics
				.emit(format!("Found environment variable {}: {}", key, value));
			return (value, LocationSource::Environment);
		}

		self.diagnostics.emit(format!(
			"Didn't find environment variable {} holding application configuration location, checking host parameter {}",
			key, key
		));
		if let Some(value) = non_blank(host.parameter(key)) {
			self.diagnostics
				.emit(format!("Found host parameter {}: {}", key, value));
			return (value, LocationSource::HostParameter);
		}

		self.diagnostics.emit(format!(
			"Didn't find host parameter {} holding application configuration location, using fallback configuration location: {}",
			key, self.settings.fallback_location
		));
		(
			self.settings.fallback_location.clone(),
			LocationSource::Fallback,
		)
	}
}
