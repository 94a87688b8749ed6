use crate::host::{HostContext, non_blank};

/// Default value for [`ConfigSettings::config_location_key`].
pub const DEFAULT_CONFIG_LOCATION_KEY: &str = "application.config.location";

/// Default value for [`ConfigSettings::log_config_location_key`].
pub const DEFAULT_LOG_CONFIG_LOCATION_KEY: &str = "application.log4j.config.location";

/// Default value for [`ConfigSettings::fallback_location`].
pub const DEFAULT_FALLBACK_LOCATION: &str = "classpath:application.properties";

/// Default value for [`ConfigSettings::application_name`].
pub const DEFAULT_APPLICATION_NAME: &str = "ConfigServletContextListener";

/// Host parameter overriding the application name.
pub const APPLICATION_NAME_PARAM: &str = "configServletContextListener.applicationName";

/// Host parameter overriding the config location key.
pub const CONFIG_LOCATION_KEY_PARAM: &str =
	"configServletContextListener.configLocationPropertyKey";

/// Host parameter overriding the logging config location key.
pub const LOG_CONFIG_LOCATION_KEY_PARAM: &str =
	"configServletContextListener.log4jConfigLocationPropertyKey";

/// Host parameter overriding the fallback location.
pub const FALLBACK_LOCATION_PARAM: &str = "configServletContextListener.fallbackConfigLocation";

/// Prefix marking a loaded entry for propagation into the settings store.
pub const PROPAGATION_PREFIX: &str = "system.property.";

/// Keys and defaults in effect for one startup.
///
/// Built once from the host context, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSettings {
	/// Key under which the configuration location is looked up and recorded.
	pub config_location_key: String,

	/// Key in the loaded configuration naming the logging configuration file.
	pub log_config_location_key: String,

	/// Location used when no source provides one.
	pub fallback_location: String,

	/// Name printed on every diagnostic line.
	pub application_name: String,
}

impl Default for ConfigSettings {
	fn default() -> Self {
		Self {
			config_location_key: DEFAULT_CONFIG_LOCATION_KEY.to_string(),
			log_config_location_key: DEFAULT_LOG_CONFIG_LOCATION_KEY.to_string(),
			fallback_location: DEFAULT_FALLBACK_LOCATION.to_string(),
			application_name: DEFAULT_APPLICATION_NAME.to_string(),
		}
	}
}

impl ConfigSettings {
	/// Apply host overrides on top of the defaults. Blank overrides are ignored.
	///
	/// The application name falls back to the host display name before the default.
	pub fn from_host(host: &dyn HostContext) -> Self {
		let defaults = Self::default();
		let application_name = non_blank(host.parameter(APPLICATION_NAME_PARAM))
			.or_else(|| non_blank(host.display_name()))
			.unwrap_or(defaults.application_name);

		Self {
			config_location_key: non_blank(host.parameter(CONFIG_LOCATION_KEY_PARAM))
				.unwrap_or(defaults.config_location_key),
			log_config_location_key: non_blank(host.parameter(LOG_CONFIG_LOCATION_KEY_PARAM))
				.unwrap_or(defaults.log_config_location_key),
			fallback_location: non_blank(host.parameter(FALLBACK_LOCATION_PARAM))
				.unwrap_or(defaults.fallback_location),
			application_name,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::host::HostParams;

	#[test]
	fn test_defaults() {
		let settings = ConfigSettings::from_host(&HostParams::new());

		assert_eq!(settings, ConfigSettings::default());
		assert_eq!(settings.config_location_key, "application.config.location");
		assert_eq!(
			settings.log_config_location_key,
			"application.log4j.config.location"
		);
		assert_eq!(settings.fallback_location, "classpath:application.properties");
		assert_eq!(settings.application_name, "ConfigServletContextListener");
	}

	#[test]
	fn test_overrides() {
		let host = HostParams::new()
			.with_param(APPLICATION_NAME_PARAM, "Shop")
			.with_param(CONFIG_LOCATION_KEY_PARAM, "shop.config")
			.with_param(LOG_CONFIG_LOCATION_KEY_PARAM, "shop.logging")
			.with_param(FALLBACK_LOCATION_PARAM, "classpath:shop.properties");
		let settings = ConfigSettings::from_host(&host);

		assert_eq!(settings.application_name, "Shop");
		assert_eq!(settings.config_location_key, "shop.config");
		assert_eq!(settings.log_config_location_key, "shop.logging");
		assert_eq!(settings.fallback_location, "classpath:shop.properties");
	}

	#[test]
	fn test_override_parameter_names() {
		let host = HostParams::new()
			.with_param("configServletContextListener.applicationName", "Shop")
			.with_param(
				"configServletContextListener.configLocationPropertyKey",
				"shop.config",
			)
			.with_param(
				"configServletContextListener.log4jConfigLocationPropertyKey",
				"shop.logging",
			)
			.with_param(
				"configServletContextListener.fallbackConfigLocation",
				"file:/etc/shop.properties",
			);
		let settings = ConfigSettings::from_host(&host);

		assert_eq!(settings.application_name, "Shop");
		assert_eq!(settings.config_location_key, "shop.config");
		assert_eq!(settings.log_config_location_key, "shop.logging");
		assert_eq!(settings.fallback_location, "file:/etc/shop.properties");
	}

	#[test]
	fn test_blank_overrides_ignored() {
		let host = HostParams::new()
			.with_param(CONFIG_LOCATION_KEY_PARAM, "   ")
			.with_param(FALLBACK_LOCATION_PARAM, "");
		let settings = ConfigSettings::from_host(&host);

		assert_eq!(settings.config_location_key, DEFAULT_CONFIG_LOCATION_KEY);
		assert_eq!(settings.fallback_location, DEFAULT_FALLBACK_LOCATION);
	}

	#[test]
	fn test_application_name_from_display_name() {
		let host = HostParams::new().with_display_name("Storefront");
		assert_eq!(ConfigSettings::from_host(&host).application_name, "Storefront");

		let host = HostParams::new()
			.with_display_name("Storefront")
			.with_param(APPLICATION_NAME_PARAM, "Override");
		assert_eq!(ConfigSettings::from_host(&host).application_name, "Override");
	}
}
