use crate::bootstrap::logging::{LoggingOutcome, configure_logging};
use crate::bootstrap::propagate::propagate_properties;
use crate::config::cascade::{LocationResolver, ResolvedLocation};
use crate::config::loader::load_config;
use crate::config::parser::Properties;
use crate::config::types::{ConfigSettings, DEFAULT_APPLICATION_NAME};
use crate::diagnostics::Diagnostics;
use crate::host::{Environment, HostContext, ProcessEnvironment};
use crate::logging::LogBackend;
use crate::resource::ResourceLocator;
use crate::store::SettingsStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Lifecycle phase. Moves forward only, once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
	Uninitialized,
	LocationResolved,
	ConfigLoaded { present: bool },
	LoggingConfigured(LoggingOutcome),
	Running,
	ShuttingDown,
	Stopped,
}

/// What startup decided.
#[derive(Debug, Clone)]
pub struct StartupReport {
	pub settings: ConfigSettings,
	pub resolved: ResolvedLocation,
	/// The loaded configuration, absent when it could not be read.
	pub config: Option<Properties>,
	/// Number of entries propagated into the settings store.
	pub propagated: usize,
	pub logging: LoggingOutcome,
}

/// Drives startup and shutdown for a hosted application.
pub struct Bootstrap<B: LogBackend> {
	store: Arc<dyn SettingsStore>,
	env: Box<dyn Environment>,
	locator: Box<dyn ResourceLocator>,
	backend: B,
	diagnostics: Diagnostics,
	phase: Phase,
	report: Option<StartupReport>,
}

impl<B: LogBackend> Bootstrap<B> {
	/// Create a bootstrap reading the real process environment.
	pub fn new(
		store: Arc<dyn SettingsStore>,
		locator: impl ResourceLocator + 'static,
		backend: B,
		diagnostics: Diagnostics,
	) -> Self {
		Self {
			store,
			env: Box::new(ProcessEnvironment),
			locator: Box::new(locator),
			backend,
			diagnostics: diagnostics.with_name(DEFAULT_APPLICATION_NAME),
			phase: Phase::Uninitialized,
			report: None,
		}
	}

	/// Replace the environment variable source.
	pub fn with_environment(mut self, env: impl Environment + 'static) -> Self {
		self.env = Box::new(env);
		self
	}

	pub fn phase(&self) -> &Phase {
		&self.phase
	}

	pub fn report(&self) -> Option<&StartupReport> {
		self.report.as_ref()
	}

	pub fn store(&self) -> &Arc<dyn SettingsStore> {
		&self.store
	}

	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Diagnostics tagged with the application name in effect.
	pub fn diagnostics(&self) -> &Diagnostics {
		&self.diagnostics
	}

	pub fn locator(&self) -> &dyn ResourceLocator {
		self.locator.as_ref()
	}

	fn transition(&mut self, next: Phase) {
		debug!(from = ?self.phase, to = ?next, "Bootstrap phase change");
		self.phase = next;
	}

	/// Resolve, load, propagate and configure logging. Never fails.
	///
	/// Runs once; later calls are reported and ignored.
	pub fn on_start(&mut self, host: &dyn HostContext) {
		if self.phase != Phase::Uninitialized {
			self.diagnostics
				.emit("Startup has already run, ignoring repeated start request.");
			return;
		}

		let settings = ConfigSettings::from_host(host);
		self.diagnostics = self.diagnostics.with_name(&settings.application_name);
		self.diagnostics.emit("Application starting...");

		let resolved = LocationResolver::new(&settings, &self.diagnostics).resolve(
			self.store.as_ref(),
			self.env.as_ref(),
			host,
		);
		self.transition(Phase::LocationResolved);

		let config = load_config(&resolved.location, self.locator.as_ref(), &self.diagnostics);
		self.transition(Phase::ConfigLoaded {
			present: config.is_some(),
		});

		let (propagated, logging) = match &config {
			Some(config) => {
				let propagated =
					propagate_properties(config, self.store.as_ref(), &self.diagnostics);
				let logging = configure_logging(
					config,
					&settings.log_config_location_key,
					self.locator.as_ref(),
					&mut self.backend,
					&self.diagnostics,
				);
				(propagated, logging)
			}
			None => (0, LoggingOutcome::Skipped),
		};
		self.transition(Phase::LoggingConfigured(logging.clone()));

		info!(
			application = %settings.application_name,
			"Logging was configured, see the diagnostic output for initialization information."
		);

		self.report = Some(StartupReport {
			settings,
			resolved,
			config,
			propagated,
			logging,
		});
		self.transition(Phase::Running);
	}

	/// Shut the logging backend down. Safe without a prior start.
	pub fn on_stop(&mut self) {
		if self.phase == Phase::Stopped {
			self.diagnostics
				.emit("Shutdown has already run, ignoring repeated stop request.");
			return;
		}

		self.transition(Phase::ShuttingDown);
		debug!("Shutting down logging backend");
		self.diagnostics.emit("Application stopping...");
		self.diagnostics.emit("Shutting down logging backend...");
		self.backend.shutdown();
		self.diagnostics.emit("The logging backend has been shut down.");
		self.diagnostics.emit("The application has been stopped.");
		self.transition(Phase::Stopped);
	}
}
