// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG Base Directory compliant config file locations.

use std::path::{Path, PathBuf};

use crate::ConfigError;

const APP_DIR: &str = "retrace";
const CONFIG_FILE: &str = "config.toml";
const WORKSPACE_DIR: &str = ".retrace";

/// Where retrace looks for configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
	/// User config file: ~/.config/retrace/config.toml
	pub user_config_file: PathBuf,
	/// Workspace config file: ./.retrace/config.toml
	pub workspace_config_file: PathBuf,
}

impl ConfigLocations {
	/// Locations rooted at explicit directories.
	pub fn new(config_home: &Path, workspace: &Path) -> Self {
		Self {
			user_config_file: config_home.join(APP_DIR).join(CONFIG_FILE),
			workspace_config_file: workspace.join(WORKSPACE_DIR).join(CONFIG_FILE),
		}
	}
}

/// Resolve config locations from `XDG_CONFIG_HOME` (or `~/.config`) and the
/// current directory.
pub fn resolve_config_locations() -> Result<ConfigLocations, ConfigError> {
	let config_home = match std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
		Some(dir) => PathBuf::from(dir),
		None => dirs::home_dir()
			.ok_or(ConfigError::HomeDirNotFound)?
			.join(".config"),
	};
	let cwd = std::env::current_dir()?;

	tracing::debug!(
		config_home = %config_home.display(),
		workspace = %cwd.display(),
		"resolved config locations"
	);

	Ok(ConfigLocations::new(&config_home, &cwd))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_locations_from_explicit_dirs() {
		let locations = ConfigLocations::new(Path::new("/home/dev/.config"), Path::new("/work/app"));

		assert_eq!(
			locations.user_config_file,
			PathBuf::from("/home/dev/.config/retrace/config.toml")
		);
		assert_eq!(
			locations.workspace_config_file,
			PathBuf::from("/work/app/.retrace/config.toml")
		);
	}

	#[test]
	fn test_resolve_config_locations_succeeds() {
		let locations = resolve_config_locations().unwrap();
		assert!(locations
			.user_config_file
			.to_string_lossy()
			.ends_with("retrace/config.toml"));
		assert!(locations
			.workspace_config_file
			.to_string_lossy()
			.contains(".retrace"));
	}
}
