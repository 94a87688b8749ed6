//! Logging backend for cfgboot.
//!
//! This module handles:
//! - The backend capability used by the bootstrap (reset, configure, watch, shutdown)
//! - Reading filter directives from `.properties` and `.xml` logging files
//! - The `tracing` implementation with a reloadable filter

pub mod backend;
pub mod directives;

pub use backend::TracingBackend;
pub use directives::LogDirectives;

use crate::config::location::LogFormat;
use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// Which reader applies to a logging configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Configurator {
	Xml,
	Properties,
}

impl LogFormat {
	/// The configurator for this format, or `None` when unsupported.
	pub fn configurator(&self) -> Option<Configurator> {
		match self {
			LogFormat::Xml => Some(Configurator::Xml),
			LogFormat::Properties => Some(Configurator::Properties),
			LogFormat::Unsupported(_) => None,
		}
	}
}

/// A logging subsystem that the bootstrap can configure.
pub trait LogBackend {
	/// Drop any explicit configuration and return to default discovery.
	fn reset(&mut self);

	/// Configure once from a stream. No watching.
	fn configure(&mut self, configurator: Configurator, reader: &mut dyn Read) -> Result<()>;

	/// Configure from a file and re-read it whenever it changes.
	fn configure_and_watch(&mut self, configurator: Configurator, path: &Path) -> Result<()>;

	/// Flush and release background resources such as file watchers.
	fn shutdown(&mut self);
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_configurator_by_format() {
		assert_eq!(LogFormat::Xml.configurator(), Some(Configurator::Xml));
		assert_eq!(
			LogFormat::Properties.configurator(),
			Some(Configurator::Properties)
		);
		assert_eq!(
			LogFormat::Unsupported("log.yaml".to_string()).configurator(),
			None
		);
	}
}
