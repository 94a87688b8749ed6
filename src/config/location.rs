use crate::error::{BootError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

pub const CLASSPATH_PREFIX: &str = "classpath:";
pub const FILE_PREFIX: &str = "file:";

/// A configuration location with exactly one recognized scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
	/// A resource looked up on the classpath roots.
	Classpath(String),

	/// A path on the filesystem.
	File(PathBuf),
}

impl Location {
	/// Normalize a raw location string.
	///
	/// A value with neither `classpath:` nor `file:` is taken as a filesystem
	/// path. The returned flag is true when the `file:` scheme was assumed.
	pub fn normalize(raw: &str) -> (Self, bool) {
		match Self::parse(raw) {
			Ok(location) => (location, false),
			Err(_) => (Location::File(PathBuf::from(raw)), true),
		}
	}

	/// Parse a location that must already carry a scheme.
	pub fn parse(raw: &str) -> Result<Self> {
		if let Some(name) = raw.strip_prefix(CLASSPATH_PREFIX) {
			Ok(Location::Classpath(name.to_string()))
		} else if let Some(path) = raw.strip_prefix(FILE_PREFIX) {
			Ok(Location::File(PathBuf::from(path)))
		} else {
			Err(BootError::UnsupportedScheme {
				location: raw.to_string(),
			})
		}
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Location::Classpath(name) => write!(f, "{}{}", CLASSPATH_PREFIX, name),
			Location::File(path) => write!(f, "{}{}", FILE_PREFIX, path.display()),
		}
	}
}

/// Where a logging configuration file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
	Classpath(String),
	File(PathBuf),
}

/// Format of a logging configuration file, chosen by suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
	Xml,
	Properties,
	/// Any other suffix; carries the offending location.
	Unsupported(String),
}

impl LogFormat {
	pub fn from_name(name: &str) -> Self {
		if name.ends_with(".xml") {
			LogFormat::Xml
		} else if name.ends_with(".properties") {
			LogFormat::Properties
		} else {
			LogFormat::Unsupported(name.to_string())
		}
	}
}

/// A logging configuration location, parsed once from the loaded config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfigLocation {
	pub source: LogSource,
	pub format: LogFormat,
}

impl LogConfigLocation {
	/// Parse a logging location value.
	///
	/// A leading `file:` is optional and stripped. What remains is either a
	/// `classpath:` resource or a plain filesystem path.
	pub fn parse(raw: &str) -> Self {
		let raw = raw.trim();
		let rest = raw.strip_prefix(FILE_PREFIX).unwrap_or(raw);
		let format = LogFormat::from_name(rest);

		let source = match rest.strip_prefix(CLASSPATH_PREFIX) {
			Some(name) => LogSource::Classpath(name.to_string()),
			None => LogSource::File(PathBuf::from(rest)),
		};

		Self { source, format }
	}

	/// Filesystem path, when the source is not a classpath resource.
	pub fn path(&self) -> Option<&Path> {
		match &self.source {
			LogSource::File(path) => Some(path),
			LogSource::Classpath(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_normalize_keeps_known_schemes() {
		let (location, assumed) = Location::normalize("classpath:application.properties");
		assert_eq!(
			location,
			Location::Classpath("application.properties".to_string())
		);
		assert!(!assumed);

		let (location, assumed) = Location::normalize("file:/etc/app.properties");
		assert_eq!(location, Location::File(PathBuf::from("/etc/app.properties")));
		assert!(!assumed);
	}

	#[test]
	fn test_normalize_assumes_file() {
		let (location, assumed) = Location::normalize("/etc/app.properties");
		assert!(assumed);
		assert_eq!(location.to_string(), "file:/etc/app.properties");
	}

	#[test]
	fn test_parse_rejects_missing_scheme() {
		match Location::parse("http://example.com/app.properties") {
			Err(BootError::UnsupportedScheme { location }) => {
				assert_eq!(location, "http://example.com/app.properties");
			}
			other => panic!("Expected UnsupportedScheme, got {:?}", other),
		}
	}

	#[test]
	fn test_display_round_trips_scheme() {
		assert_eq!(
			Location::Classpath("a/b.properties".to_string()).to_string(),
			"classpath:a/b.properties"
		);
	}

	#[test]
	fn test_log_location_classpath() {
		let parsed = LogConfigLocation::parse("classpath:custom.properties");
		assert_eq!(
			parsed.source,
			LogSource::Classpath("custom.properties".to_string())
		);
		assert_eq!(parsed.format, LogFormat::Properties);
		assert!(parsed.path().is_none());
	}

	#[test]
	fn test_log_location_file_prefix_optional() {
		let with_prefix = LogConfigLocation::parse("file:/etc/log.xml");
		let without_prefix = LogConfigLocation::parse("/etc/log.xml");

		assert_eq!(with_prefix, without_prefix);
		assert_eq!(with_prefix.format, LogFormat::Xml);
		assert_eq!(with_prefix.path(), Some(Path::new("/etc/log.xml")));
	}

	#[test]
	fn test_log_location_unsupported_suffix() {
		let parsed = LogConfigLocation::parse("/etc/log.yaml");
		assert_eq!(parsed.format, LogFormat::Unsupported("/etc/log.yaml".to_string()));
	}
}
