use crate::config::location::Location;
use crate::config::parser::{Properties, parse_properties};
use crate::config::types::DEFAULT_CONFIG_LOCATION_KEY;
use crate::diagnostics::Diagnostics;
use crate::error::{BootError, Result};
use crate::resource::{ResourceLocator, Scoped, open_file, open_resource};
use crate::store::SettingsStore;
use tracing::warn;

/// Load the properties at a location.
///
/// The opened stream is released before returning, whether parsing
/// succeeded or not.
pub fn load(
	location: &Location,
	locator: &dyn ResourceLocator,
	diagnostics: &Diagnostics,
) -> Result<Properties> {
	let stream = match location {
		Location::Classpath(name) => open_resource(locator, name)?,
		Location::File(path) => open_file(path)?,
	};

	let mut scoped = Scoped::new(stream, diagnostics);
	parse_properties(scoped.reader(), &location.to_string())
}

/// Load the properties at a location, reporting failure as `None`.
pub fn load_config(
	location: &Location,
	locator: &dyn ResourceLocator,
	diagnostics: &Diagnostics,
) -> Option<Properties> {
	match load(location, locator, diagnostics) {
		Ok(properties) => Some(properties),
		Err(e) => {
			report_failure(&location.to_string(), &e, diagnostics);
			None
		}
	}
}

/// Re-read the application configuration after startup.
///
/// The location is taken from the settings store under `key`, or under
/// `application.config.location` when no key is given.
pub fn read_application_configuration(
	store: &dyn SettingsStore,
	key: Option<&str>,
	locator: &dyn ResourceLocator,
	diagnostics: &Diagnostics,
) -> Option<Properties> {
	let key = key
		.map(str::trim)
		.filter(|k| !k.is_empty())
		.unwrap_or(DEFAULT_CONFIG_LOCATION_KEY);

	let Some(raw) = store.get(key) else {
		diagnostics.emit(format!(
			"No application configuration location recorded under {}",
			key
		));
		return None;
	};

	match Location::parse(&raw) {
		Ok(location) => load_config(&location, locator, diagnostics),
		Err(e) => {
			report_failure(&raw, &e, diagnostics);
			None
		}
	}
}

fn report_failure(location: &str, error: &BootError, diagnostics: &Diagnostics) {
	warn!(location, error = %error.detail(), "Failed to read application configuration");
	diagnostics.emit(format!(
		"There was a problem reading the application configuration at location: {}\nError: {}\nMessage: {}",
		location,
		error.kind(),
		error.detail()
	));
}
