use crate::config::location::{LogConfigLocation, LogSource};
use crate::config::parser::Properties;
use crate::diagnostics::Diagnostics;
use crate::logging::LogBackend;
use crate::resource::{ResourceLocator, Scoped, open_resource};
use tracing::debug;

/// How logging ended up configured after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingOutcome {
	/// Configured from a file named in the application configuration.
	Explicit {
		location: LogConfigLocation,
		watching: bool,
	},

	/// Left to the backend's default discovery.
	Default,

	/// Not attempted because no application configuration was loaded.
	Skipped,
}

/// Configure the logging backend from the location named in `config` under `key`.
///
/// Every failure falls back to the backend's default discovery.
pub fn configure_logging(
	config: &Properties,
	key: &str,
	locator: &dyn ResourceLocator,
	backend: &mut dyn LogBackend,
	diagnostics: &Diagnostics,
) -> LoggingOutcome {
	diagnostics.emit("Finding logging configuration location in application configuration...");

	let raw = match config.get(key) {
		Ok(value) => value.trim(),
		Err(_) => {
			diagnostics.emit(format!(
				"No logging configuration location was found for property {} in the application configuration.",
				key
			));
			""
		}
	};

	if raw.is_empty() {
		diagnostics.emit(
			"Didn't find logging configuration location in application configuration. \
			 Falling back to the default logging configuration mechanism.",
		);
		return LoggingOutcome::Default;
	}

	backend.reset();
	diagnostics.emit(format!(
		"Found logging configuration location in the application configuration. \
		 Configuring logger using file: {}",
		raw
	));

	let location = LogConfigLocation::parse(raw);
	let Some(configurator) = location.format.configurator() else {
		diagnostics.emit(
			"The logging configuration file location must end with .xml or .properties.\n\
			 Falling back to the default logging configuration mechanism.",
		);
		return LoggingOutcome::Default;
	};

	let (result, watching) = match &location.source {
		LogSource::Classpath(name) => {
			let result = open_resource(locator, name).and_then(|stream| {
				let mut scoped = Scoped::new(stream, diagnostics);
				backend.configure(configurator, scoped.reader())
			});
			(result, false)
		}
		LogSource::File(path) => (backend.configure_and_watch(configurator, path), true),
	};

	match result {
		Ok(()) => {
			debug!(?location, watching, "Logging configured explicitly");
			LoggingOutcome::Explicit { location, watching }
		}
		Err(e) => {
			diagnostics.emit(format!(
				"There was a problem configuring logging from {}\nError: {}\nMessage: {}\n\
				 Falling back to the default logging configuration mechanism.",
				raw,
				e.kind(),
				e.detail()
			));
			backend.reset();
			LoggingOutcome::Default
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::location::LogFormat;
	use crate::config::parser::parse_properties_str;
	use crate::diagnostics::CaptureBuffer;
	use crate::logging::Configurator;
	use crate::logging::testing::{BackendCall, RecordingBackend};
	use crate::resource::testing::MemoryLocator;
	use std::path::PathBuf;

	const KEY: &str = "application.log4j.config.location";

	fn run(
		config: &str,
		locator: &MemoryLocator,
		backend: &mut RecordingBackend,
	) -> (LoggingOutcome, String) {
		let config = parse_properties_str(config).unwrap();
		let buffer = CaptureBuffer::default();
		let diagnostics = buffer.diagnostics("test");
		let outcome = configure_logging(&config, KEY, locator, backend, &diagnostics);
		(outcome, buffer.contents())
	}

	#[test]
	fn test_missing_key_defers_to_default() {
		let mut backend = RecordingBackend::default();

		let (outcome, diagnostics) = run("a=1\n", &MemoryLocator::default(), &mut backend);

		assert_eq!(outcome, LoggingOutcome::Default);
		assert!(backend.calls.is_empty());
		assert!(diagnostics.contains("No logging configuration location was found"));
	}

	#[test]
	fn test_blank_value_defers_to_default() {
		let mut backend = RecordingBackend::default();

		let (outcome, _) = run(
			"application.log4j.config.location=   \n",
			&MemoryLocator::default(),
			&mut backend,
		);

		assert_eq!(outcome, LoggingOutcome::Default);
		assert!(!backend.configured());
	}

	#[test]
	fn test_classpath_properties_configures_once_without_watch() {
		let locator = MemoryLocator::default().with("custom.properties", b"level=debug\n");
		let mut backend = RecordingBackend::default();

		let (outcome, _) = run(
			"application.log4j.config.location=classpath:custom.properties\n",
			&locator,
			&mut backend,
		);

		assert_eq!(
			backend.calls,
			vec![
				BackendCall::Reset,
				BackendCall::Configure {
					configurator: Configurator::Properties,
					content: "level=debug\n".to_string(),
				},
			]
		);
		assert!(matches!(
			outcome,
			LoggingOutcome::Explicit {
				watching: false,
				..
			}
		));
		assert_eq!(locator.release_count(), 1);
	}

	#[test]
	fn test_file_xml_configures_with_watch() {
		let mut backend = RecordingBackend::default();

		let (outcome, _) = run(
			"application.log4j.config.location=file:/etc/app/logging.xml\n",
			&MemoryLocator::default(),
			&mut backend,
		);

		assert_eq!(
			backend.calls,
			vec![
				BackendCall::Reset,
				BackendCall::ConfigureAndWatch {
					configurator: Configurator::Xml,
					path: PathBuf::from("/etc/app/logging.xml"),
				},
			]
		);
		match outcome {
			LoggingOutcome::Explicit { location, watching } => {
				assert!(watching);
				assert_eq!(location.format, LogFormat::Xml);
			}
			other => panic!("Expected explicit configuration, got {:?}", other),
		}
	}

	#[test]
	fn test_plain_path_needs_no_prefix() {
		let mut backend = RecordingBackend::default();

		run(
			"application.log4j.config.location=/etc/app/logging.properties\n",
			&MemoryLocator::default(),
			&mut backend,
		);

		assert_eq!(
			backend.calls[1],
			BackendCall::ConfigureAndWatch {
				configurator: Configurator::Properties,
				path: PathBuf::from("/etc/app/logging.properties"),
			}
		);
	}

	#[test]
	fn test_unsupported_suffix_does_not_configure() {
		let mut backend = RecordingBackend::default();

		let (outcome, diagnostics) = run(
			"application.log4j.config.location=/etc/app/logging.yaml\n",
			&MemoryLocator::default(),
			&mut backend,
		);

		assert_eq!(outcome, LoggingOutcome::Default);
		assert!(!backend.configured());
		assert!(diagnostics.contains("must end with .xml or .properties"));
	}

	#[test]
	fn test_missing_classpath_resource_falls_back() {
		let mut backend = RecordingBackend::default();

		let (outcome, diagnostics) = run(
			"application.log4j.config.location=classpath:missing.xml\n",
			&MemoryLocator::default(),
			&mut backend,
		);

		assert_eq!(outcome, LoggingOutcome::Default);
		assert!(!backend.configured());
		assert!(diagnostics.contains("Error: ResourceNotFound"));
	}

	#[test]
	fn test_backend_failure_falls_back() {
		let mut backend = RecordingBackend {
			fail_configure: true,
			..RecordingBackend::default()
		};

		let (outcome, diagnostics) = run(
			"application.log4j.config.location=/etc/app/logging.xml\n",
			&MemoryLocator::default(),
			&mut backend,
		);

		assert_eq!(outcome, LoggingOutcome::Default);
		assert_eq!(backend.calls.last(), Some(&BackendCall::Reset));
		assert!(diagnostics.contains("Falling back to the default logging configuration mechanism"));
	}
}
