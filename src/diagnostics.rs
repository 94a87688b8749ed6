//! Always-on diagnostic channel.
//!
//! Lines written here never pass through the logging backend, so they are
//! visible before logging is configured and after it has been shut down.

use chrono::Local;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Timestamp format for diagnostic lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Handle to the diagnostic output, tagged with an application name.
///
/// Clones share the same underlying writer.
#[derive(Clone)]
pub struct Diagnostics {
	application_name: String,
	sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Diagnostics {
	/// Diagnostics written to the given writer.
	pub fn to_writer(application_name: &str, writer: Box<dyn Write + Send>) -> Self {
		Self {
			application_name: application_name.to_string(),
			sink: Arc::new(Mutex::new(writer)),
		}
	}

	/// Diagnostics written to stderr.
	pub fn stderr(application_name: &str) -> Self {
		Self::to_writer(application_name, Box::new(std::io::stderr()))
	}

	/// Same sink, different application tag.
	pub fn with_name(&self, application_name: &str) -> Self {
		Self {
			application_name: application_name.to_string(),
			sink: Arc::clone(&self.sink),
		}
	}

	pub fn application_name(&self) -> &str {
		&self.application_name
	}

	/// Write one timestamped line. Write failures are swallowed.
	pub fn emit(&self, message: impl AsRef<str>) {
		let line = format_line(&self.application_name, message.as_ref());
		let mut sink = self.sink.lock();
		let _ = writeln!(sink, "{}", line);
		let _ = sink.flush();
	}
}

impl std::fmt::Debug for Diagnostics {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Diagnostics")
			.field("application_name", &self.application_name)
			.finish()
	}
}

fn format_line(application_name: &str, message: &str) -> String {
	format!(
		"{} [{}] {}",
		Local::now().format(TIMESTAMP_FORMAT),
		application_name,
		message
	)
}

/// In-memory writer for capturing diagnostics in tests.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CaptureBuffer {
	pub(crate) fn diagnostics(&self, application_name: &str) -> Diagnostics {
		Diagnostics::to_writer(application_name, Box::new(self.clone()))
	}

	pub(crate) fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock()).to_string()
	}
}

#[cfg(test)]
impl Write for CaptureBuffer {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.0.lock().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}
