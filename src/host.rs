//! Host-provided inputs: named parameters and the process environment.

use std::collections::HashMap;
use std::ffi::OsString;

/// Context handed to startup by the hosting process.
pub trait HostContext {
	/// Look up a named host parameter.
	fn parameter(&self, name: &str) -> Option<String>;

	/// Display name of the hosted application, if the host has one.
	fn display_name(&self) -> Option<String> {
		None
	}
}

/// Host context backed by a map of parameters.
#[derive(Debug, Clone, Default)]
pub struct HostParams {
	pub params: HashMap<String, String>,
	pub display_name: Option<String>,
}

impl HostParams {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_param(mut self, name: &str, value: &str) -> Self {
		self.params.insert(name.to_string(), value.to_string());
		self
	}

	pub fn with_display_name(mut self, name: &str) -> Self {
		self.display_name = Some(name.to_string());
		self
	}
}

impl HostContext for HostParams {
	fn parameter(&self, name: &str) -> Option<String> {
		self.params.get(name).cloned()
	}

	fn display_name(&self) -> Option<String> {
		self.display_name.clone()
	}
}

/// Source of environment variables.
pub trait Environment {
	/// Look up a variable. `Err` carries a value that is not valid Unicode.
	fn var(&self, name: &str) -> std::result::Result<Option<String>, OsString>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
	fn var(&self, name: &str) -> std::result::Result<Option<String>, OsString> {
		std::env::var_os(name).map(OsString::into_string).transpose()
	}
}

impl Environment for HashMap<String, String> {
	fn var(&self, name: &str) -> std::result::Result<Option<String>, OsString> {
		Ok(self.get(name).cloned())
	}
}

/// True when the value is missing or only whitespace.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
	value.is_none_or(|v| v.trim().is_empty())
}

/// Drop blank values.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
	if is_blank(value.as_deref()) {
		None
	} else {
		value
	}
}
