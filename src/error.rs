use std::path::PathBuf;

/// Library-level structured errors for cfgboot.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
	#[error("Resource not found on the classpath: {name}")]
	ResourceNotFound { name: String },

	#[error("Failed to read configuration: {location}")]
	ConfigRead {
		location: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse properties at line {line}: {message}")]
	PropertiesParse { line: usize, message: String },

	#[error("No entry for key: {key}")]
	MissingKey { key: String },

	#[error("Location must start with file: or classpath: ({location})")]
	UnsupportedScheme { location: String },

	#[error("Failed to read logging configuration: {path}")]
	LogConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid log level: {level}")]
	InvalidLogLevel { level: String },

	#[error("Invalid log directive: {directive}")]
	InvalidLogDirective {
		directive: String,
		#[source]
		source: tracing_subscriber::filter::ParseError,
	},

	#[error("Failed to watch logging configuration: {path}")]
	WatchFailed {
		path: PathBuf,
		#[source]
		source: notify::Error,
	},

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },
}

impl BootError {
	/// Short name of the failure kind, used in diagnostic lines.
	pub fn kind(&self) -> &'static str {
		match self {
			BootError::ResourceNotFound { .. } => "ResourceNotFound",
			BootError::ConfigRead { .. } => "ConfigRead",
			BootError::PropertiesParse { .. } => "PropertiesParse",
			BootError::MissingKey { .. } => "MissingKey",
			BootError::UnsupportedScheme { .. } => "UnsupportedScheme",
			BootError::LogConfigRead { .. } => "LogConfigRead",
			BootError::InvalidLogLevel { .. } => "InvalidLogLevel",
			BootError::InvalidLogDirective { .. } => "InvalidLogDirective",
			BootError::WatchFailed { .. } => "WatchFailed",
			BootError::CommandFailed { .. } => "CommandFailed",
			BootError::CommandNotFound { .. } => "CommandNotFound",
		}
	}

	/// Full message including the source chain.
	pub fn detail(&self) -> String {
		let mut message = self.to_string();
		let mut source = std::error::Error::source(self);
		while let Some(cause) = source {
			message.push_str(": ");
			message.push_str(&cause.to_string());
			source = cause.source();
		}
		message
	}
}

/// Result type alias using BootError.
pub type Result<T> = std::result::Result<T, BootError>;
