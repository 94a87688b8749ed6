//! Classpath-style resource lookup and scoped stream handling.

use crate::diagnostics::Diagnostics;
use crate::error::{BootError, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// A readable resource that must be released after use.
pub trait ConfigStream: Read {
	/// Release the underlying handle. Called exactly once by [`Scoped`].
	fn release(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl ConfigStream for File {}

/// Resolves resource names against some search path.
pub trait ResourceLocator {
	/// Open a named resource. `Ok(None)` means it does not exist anywhere.
	fn open(&self, name: &str) -> Result<Option<Box<dyn ConfigStream>>>;
}

/// Ordered list of root directories searched for resources.
#[derive(Debug, Clone, Default)]
pub struct ClassPath {
	roots: Vec<PathBuf>,
}

impl ClassPath {
	pub fn new(roots: Vec<PathBuf>) -> Self {
		Self { roots }
	}

	pub fn roots(&self) -> &[PathBuf] {
		&self.roots
	}

	/// Find the first root containing `name`.
	pub fn find(&self, name: &str) -> Option<PathBuf> {
		let name = name.trim_start_matches('/');
		self.roots
			.iter()
			.map(|root| root.join(name))
			.find(|candidate| candidate.is_file())
	}
}

impl ResourceLocator for ClassPath {
	fn open(&self, name: &str) -> Result<Option<Box<dyn ConfigStream>>> {
		let Some(path) = self.find(name) else {
			return Ok(None);
		};

		let file = File::open(&path).map_err(|source| BootError::ConfigRead {
			location: path.display().to_string(),
			source,
		})?;
		Ok(Some(Box::new(file)))
	}
}

/// Open a classpath resource, treating absence as an error.
pub fn open_resource(locator: &dyn ResourceLocator, name: &str) -> Result<Box<dyn ConfigStream>> {
	locator
		.open(name)?
		.ok_or_else(|| BootError::ResourceNotFound {
			name: name.to_string(),
		})
}

/// Open a file on disk as a stream.
pub fn open_file(path: &Path) -> Result<Box<dyn ConfigStream>> {
	let file = File::open(path).map_err(|source| BootError::ConfigRead {
		location: path.display().to_string(),
		source,
	})?;
	Ok(Box::new(file))
}

/// An open stream that is released when dropped.
///
/// A failing release is reported on the diagnostic channel and otherwise ignored.
pub struct Scoped<'a> {
	stream: Box<dyn ConfigStream>,
	diagnostics: &'a Diagnostics,
}

impl<'a> Scoped<'a> {
	pub fn new(stream: Box<dyn ConfigStream>, diagnostics: &'a Diagnostics) -> Self {
		Self {
			stream,
			diagnostics,
		}
	}

	pub fn reader(&mut self) -> &mut dyn Read {
		&mut *self.stream
	}
}

impl Drop for Scoped<'_> {
	fn drop(&mut self) {
		if let Err(e) = self.stream.release() {
			self.diagnostics.emit(format!(
				"WARNING! Failed to release configuration resource.\nError: {:?}\nMessage: {}",
				e.kind(),
				e
			));
		}
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use super::*;
	use std::collections::HashMap;
	use std::io::Cursor;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// Stream over fixed bytes that counts releases and can fail them.
	pub(crate) struct TrackedStream {
		pub(crate) data: Cursor<Vec<u8>>,
		pub(crate) releases: Arc<AtomicUsize>,
		pub(crate) fail_release: bool,
	}

	impl Read for TrackedStream {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			self.data.read(buf)
		}
	}

	impl ConfigStream for TrackedStream {
		fn release(&mut self) -> io::Result<()> {
			self.releases.fetch_add(1, Ordering::SeqCst);
			if self.fail_release {
				Err(io::Error::other("release refused"))
			} else {
				Ok(())
			}
		}
	}

	/// Locator serving in-memory resources.
	#[derive(Default)]
	pub(crate) struct MemoryLocator {
		pub(crate) resources: HashMap<String, Vec<u8>>,
		pub(crate) releases: Arc<AtomicUsize>,
		pub(crate) fail_release: bool,
	}

	impl MemoryLocator {
		pub(crate) fn with(mut self, name: &str, content: &[u8]) -> Self {
			self.resources.insert(name.to_string(), content.to_vec());
			self
		}

		pub(crate) fn release_count(&self) -> usize {
			self.releases.load(Ordering::SeqCst)
		}
	}

	impl ResourceLocator for MemoryLocator {
		fn open(&self, name: &str) -> Result<Option<Box<dyn ConfigStream>>> {
			Ok(self.resources.get(name).map(|data| {
				Box::new(TrackedStream {
					data: Cursor::new(data.clone()),
					releases: Arc::clone(&self.releases),
					fail_release: self.fail_release,
				}) as Box<dyn ConfigStream>
			}))
		}
	}
}
