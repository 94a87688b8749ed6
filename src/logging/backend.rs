use crate::error::{BootError, Result};
use crate::logging::directives::LogDirectives;
use crate::logging::{Configurator, LogBackend};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter used when nothing was configured explicitly: `RUST_LOG`, else `info`.
fn default_filter() -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// `tracing` backend with a reloadable filter.
///
/// Events go to stderr through a `fmt` layer. Explicit configuration only
/// ever swaps the filter.
pub struct TracingBackend {
	handle: FilterHandle,
	watcher: Option<RecommendedWatcher>,
}

impl TracingBackend {
	/// Install the global subscriber and return a backend controlling it.
	///
	/// If a global subscriber already exists the backend still works, but
	/// only on its own detached filter.
	pub fn install() -> Self {
		let (filter, handle) = reload::Layer::new(default_filter());
		let installed = tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().with_target(true).with_writer(std::io::stderr))
			.try_init();

		if let Err(e) = installed {
			debug!(error = %e, "Global subscriber already installed");
		}

		Self {
			handle,
			watcher: None,
		}
	}

	/// Whether a file watcher is running.
	pub fn is_watching(&self) -> bool {
		self.watcher.is_some()
	}

	fn apply(&self, filter: EnvFilter) {
		if let Err(e) = self.handle.reload(filter) {
			debug!(error = %e, "Logging filter not reloaded");
		}
	}

	fn watch(&self, configurator: Configurator, path: &Path) -> Result<RecommendedWatcher> {
		let watched = path.to_path_buf();
		let handle = self.handle.clone();

		let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
			match res {
				Ok(event) => {
					if (event.kind.is_modify() || event.kind.is_create())
						&& event
							.paths
							.iter()
							.any(|p| p.file_name() == watched.file_name())
					{
						reload_from_file(&handle, configurator, &watched);
					}
				}
				Err(e) => warn!(error = %e, "Logging configuration watch error"),
			}
		})
		.map_err(|source| BootError::WatchFailed {
			path: path.to_path_buf(),
			source,
		})?;

		// Watch the directory so editors that replace the file are still seen.
		let directory = watch_directory(path);
		watcher
			.watch(&directory, RecursiveMode::NonRecursive)
			.map_err(|source| BootError::WatchFailed {
				path: path.to_path_buf(),
				source,
			})?;

		Ok(watcher)
	}
}

fn watch_directory(path: &Path) -> PathBuf {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
		_ => PathBuf::from("."),
	}
}

fn reload_from_file(handle: &FilterHandle, configurator: Configurator, path: &Path) {
	let filter = LogDirectives::read(configurator, path).and_then(|d| d.to_filter());
	match filter {
		Ok(filter) => match handle.reload(filter) {
			Ok(()) => info!(path = %path.display(), "Logging configuration reloaded"),
			Err(e) => debug!(error = %e, "Logging filter not reloaded"),
		},
		Err(e) => warn!(
			path = %path.display(),
			error = %e.detail(),
			"Failed to reload logging configuration, keeping the current one"
		),
	}
}

impl LogBackend for TracingBackend {
	fn reset(&mut self) {
		self.watcher = None;
		self.apply(default_filter());
	}

	fn configure(&mut self, configurator: Configurator, reader: &mut dyn Read) -> Result<()> {
		let mut content = String::new();
		reader
			.read_to_string(&mut content)
			.map_err(|source| BootError::LogConfigRead {
				path: PathBuf::from("<stream>"),
				source,
			})?;

		let filter = LogDirectives::parse(configurator, &content)?.to_filter()?;
		self.apply(filter);
		Ok(())
	}

	fn configure_and_watch(&mut self, configurator: Configurator, path: &Path) -> Result<()> {
		let filter = LogDirectives::read(configurator, path)?.to_filter()?;
		self.apply(filter);
		self.watcher = Some(self.watch(configurator, path)?);
		Ok(())
	}

	fn shutdown(&mut self) {
		self.watcher = None;
		self.apply(EnvFilter::new("off"));
		let _ = std::io::stderr().flush();
	}
}
