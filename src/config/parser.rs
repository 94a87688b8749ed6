use crate::error::{BootError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::str::Chars;

/// An insertion-ordered mapping of property keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
	entries: Vec<(String, String)>,
	index: HashMap<String, usize>,
}

impl Properties {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert an entry. A repeated key keeps its first position and takes the new value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		match self.index.get(&key) {
			Some(&position) => self.entries[position].1 = value,
			None => {
				self.index.insert(key.clone(), self.entries.len());
				self.entries.push((key, value));
			}
		}
	}

	/// Look up a key, failing with [`BootError::MissingKey`] when absent.
	pub fn get(&self, key: &str) -> Result<&str> {
		self.index
			.get(key)
			.map(|&position| self.entries[position].1.as_str())
			.ok_or_else(|| BootError::MissingKey {
				key: key.to_string(),
			})
	}

	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut properties = Properties::new();
		for (k, v) in iter {
			properties.insert(k, v);
		}
		properties
	}
}

/// Read and parse properties from a stream. `location` is only used in errors.
pub fn parse_properties(reader: &mut dyn Read, location: &str) -> Result<Properties> {
	let mut content = String::new();
	reader
		.read_to_string(&mut content)
		.map_err(|source| BootError::ConfigRead {
			location: location.to_string(),
			source,
		})?;

	parse_properties_str(&content)
}

/// Parse properties from a string (useful for testing).
pub fn parse_properties_str(content: &str) -> Result<Properties> {
	let mut properties = Properties::new();
	let mut lines = content.lines().enumerate();

	while let Some((index, raw)) = lines.next() {
		let line_number = index + 1;
		let trimmed = trim_leading(raw);

		if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
			continue;
		}

		let mut logical = trimmed.to_string();
		while ends_with_continuation(&logical) {
			logical.pop();
			match lines.next() {
				Some((_, next)) => logical.push_str(trim_leading(next)),
				None => break,
			}
		}

		let (raw_key, raw_value) = split_key_value(&logical);
		let key = unescape(raw_key, line_number)?;
		let value = unescape(raw_value, line_number)?;
		properties.insert(key, value);
	}

	Ok(properties)
}

fn is_whitespace(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\x0c')
}

fn trim_leading(line: &str) -> &str {
	line.trim_start_matches(is_whitespace)
}

/// A line continues when it ends in an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
	line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line at the first unescaped separator.
fn split_key_value(line: &str) -> (&str, &str) {
	let mut escaped = false;
	let mut key_end = line.len();

	for (i, c) in line.char_indices() {
		if escaped {
			escaped = false;
			continue;
		}
		if c == '\\' {
			escaped = true;
		} else if c == '=' || c == ':' || is_whitespace(c) {
			key_end = i;
			break;
		}
	}

	let key = &line[..key_end];
	let mut rest = trim_leading(&line[key_end..]);
	if let Some(stripped) = rest.strip_prefix(['=', ':']) {
		rest = trim_leading(stripped);
	}

	(key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String> {
	let mut out = String::with_capacity(raw.len());
	let mut chars = raw.chars();

	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}

		match chars.next() {
			Some('t') => out.push('\t'),
			Some('n') => out.push('\n'),
			Some('r') => out.push('\r'),
			Some('f') => out.push('\x0c'),
			Some('u') => {
				let unit = code_unit(&mut chars, line)?;
				// A high surrogate pairs with an immediately following \uXXXX escape.
				let pairs = (0xD800..=0xDBFF).contains(&unit) && chars.as_str().starts_with("\\u");
				let low = if pairs {
					chars.nth(1);
					Some(code_unit(&mut chars, line)?)
				} else {
					None
				};

				for decoded in char::decode_utf16(std::iter::once(unit).chain(low)) {
					let decoded = decoded.map_err(|e| BootError::PropertiesParse {
						line,
						message: format!(
							"Unpaired surrogate in \\uxxxx encoding: \\u{:04X}",
							e.unpaired_surrogate()
						),
					})?;
					out.push(decoded);
				}
			}
			Some(other) => out.push(other),
			None => {}
		}
	}

	Ok(out)
}

/// Read the four hex digits of a `\uXXXX` escape as one UTF-16 code unit.
fn code_unit(chars: &mut Chars<'_>, line: usize) -> Result<u16> {
	let hex: String = chars.by_ref().take(4).collect();
	let unit = (hex.len() == 4 && hex.chars().all(|c| c.is_ascii_hexdigit()))
		.then(|| u16::from_str_radix(&hex, 16).ok())
		.flatten();

	unit.ok_or_else(|| BootError::PropertiesParse {
		line,
		message: format!("Malformed \\uxxxx encoding: \\u{}", hex),
	})
}
