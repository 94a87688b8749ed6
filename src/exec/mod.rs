//! Command execution for cfgboot.
//!
//! This module handles:
//! - Executing the hosted command with inherited stdio
//! - Exporting settings store entries into the child environment
//! - Resolving command names against PATH

use crate::error::{BootError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Whether `key` can be exported as an environment variable name.
pub fn is_exportable(key: &str) -> bool {
	!key.is_empty() && !key.contains('=') && !key.contains('\0')
}

/// Execute a command with inherited stdio and extra environment variables.
///
/// Entries whose key cannot name an environment variable are skipped.
pub fn execute_command(
	binary: &Path,
	args: &[String],
	cwd: &Path,
	envs: &[(String, String)],
) -> Result<ExitStatus> {
	let mut cmd = Command::new(binary);
	cmd.args(args)
		.current_dir(cwd)
		.stdin(Stdio::inherit())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit());

	for (key, value) in envs {
		if is_exportable(key) && !value.contains('\0') {
			cmd.env(key, value);
		} else {
			debug!(key, "Skipping entry that cannot be exported");
		}
	}

	let status = cmd.status().map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			BootError::CommandNotFound {
				command: binary.to_string_lossy().to_string(),
			}
		} else {
			BootError::CommandFailed {
				command: binary.to_string_lossy().to_string(),
				source,
			}
		}
	})?;

	debug!(command = %binary.display(), ?status, "Command finished");
	Ok(status)
}

/// Resolve a command name to its full path.
///
/// Names containing a path separator are checked as given. Bare names are
/// searched for in PATH.
pub fn resolve_command(command: &str) -> Option<PathBuf> {
	let path = Path::new(command);

	if path.is_absolute() || command.contains(std::path::MAIN_SEPARATOR) {
		return path.is_file().then(|| path.to_path_buf());
	}

	let path_var = std::env::var_os("PATH")?;
	std::env::split_paths(&path_var)
		.map(|dir| dir.join(command))
		.find(|candidate| candidate.is_file())
}
