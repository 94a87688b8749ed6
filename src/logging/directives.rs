use crate::config::parser::parse_properties_str;
use crate::error::{BootError, Result};
use crate::logging::Configurator;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Key holding the default level in a `.properties` logging file.
const LEVEL_KEY: &str = "level";

/// Prefix of per-target levels in a `.properties` logging file.
const LOGGER_PREFIX: &str = "logger.";

/// Level used when a logging file does not name one.
const DEFAULT_LEVEL: &str = "info";

static XML_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static XML_ROOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<logging\b([^>]*)>").unwrap());
static XML_LOGGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<logger\b([^>]*)>").unwrap());
static XML_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"\bname\s*=\s*["']([^"']*)["']"#).unwrap());
static XML_LEVEL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"\blevel\s*=\s*["']([^"']*)["']"#).unwrap());

/// Filter directives read from a logging configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogDirectives {
	/// Default level for all targets.
	pub level: Option<String>,

	/// Per-target levels, in file order.
	pub targets: Vec<(String, String)>,
}

impl LogDirectives {
	/// Parse a logging file's content with the given configurator.
	pub fn parse(configurator: Configurator, content: &str) -> Result<Self> {
		match configurator {
			Configurator::Properties => Self::from_properties(content),
			Configurator::Xml => Ok(Self::from_xml(content)),
		}
	}

	/// Read and parse a logging file from disk.
	pub fn read(configurator: Configurator, path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).map_err(|source| BootError::LogConfigRead {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(configurator, &content)
	}

	/// `level=<lvl>` and `logger.<target>=<lvl>` entries.
	///
	/// Colons in target paths must be escaped (`logger.app\:\:db=debug`).
	pub fn from_properties(content: &str) -> Result<Self> {
		let properties = parse_properties_str(content)?;
		let mut directives = LogDirectives::default();

		for (key, value) in properties.iter() {
			if key == LEVEL_KEY {
				directives.level = Some(value.trim().to_string());
			} else if let Some(target) = key.strip_prefix(LOGGER_PREFIX)
				&& !target.is_empty()
			{
				directives
					.targets
					.push((target.to_string(), value.trim().to_string()));
			}
		}

		Ok(directives)
	}

	/// `<logging level="..">` with nested `<logger name=".." level=".."/>` elements.
	pub fn from_xml(content: &str) -> Self {
		let content = XML_COMMENT.replace_all(content, "");
		let mut directives = LogDirectives::default();

		if let Some(root) = XML_ROOT.captures(&content) {
			directives.level = XML_LEVEL
				.captures(&root[1])
				.map(|c| c[1].trim().to_string());
		}

		for logger in XML_LOGGER.captures_iter(&content) {
			let attributes = &logger[1];
			let name = XML_NAME.captures(attributes).map(|c| c[1].trim().to_string());
			let level = XML_LEVEL.captures(attributes).map(|c| c[1].trim().to_string());
			if let (Some(name), Some(level)) = (name, level)
				&& !name.is_empty()
			{
				directives.targets.push((name, level));
			}
		}

		directives
	}

	/// Render as an `EnvFilter` directive string.
	pub fn to_filter_string(&self) -> String {
		let mut parts = vec![self.level.as_deref().unwrap_or(DEFAULT_LEVEL).to_string()];
		parts.extend(
			self.targets
				.iter()
				.map(|(target, level)| format!("{}={}", target, level)),
		);
		parts.join(",")
	}

	/// Build the filter, rejecting unknown levels and malformed directives.
	pub fn to_filter(&self) -> Result<EnvFilter> {
		let levels = self
			.level
			.iter()
			.chain(self.targets.iter().map(|(_, level)| level));
		for level in levels {
			level
				.parse::<LevelFilter>()
				.map_err(|_| BootError::InvalidLogLevel {
					level: level.clone(),
				})?;
		}

		let directive = self.to_filter_string();
		EnvFilter::builder()
			.parse(&directive)
			.map_err(|source| BootError::InvalidLogDirective { directive, source })
	}
}
