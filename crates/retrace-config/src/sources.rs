// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: files, environment, CLI, defaults.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::layer::ConfigLayer;
use crate::paths::ConfigLocations;
use crate::ConfigError;

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	UserFile = 20,
	WorkspaceFile = 30,
	ExplicitFile = 40,
	Environment = 50,
	Cli = 60,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	/// Precedence level
	fn precedence(&self) -> Precedence;

	/// Load configuration layer from this source
	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading defaults");
		// Defaults are applied during finalization
		Ok(ConfigLayer::default())
	}
}

/// File-based configuration source (TOML).
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// User config: ~/.config/retrace/config.toml
	pub fn user(locations: &ConfigLocations) -> Self {
		Self {
			path: locations.user_config_file.clone(),
			precedence: Precedence::UserFile,
			name: "user-config",
			required: false,
		}
	}

	/// Workspace config: .retrace/config.toml
	pub fn workspace(locations: &ConfigLocations) -> Self {
		Self {
			path: locations.workspace_config_file.clone(),
			precedence: Precedence::WorkspaceFile,
			name: "workspace-config",
			required: false,
		}
	}

	/// A file named on the command line; it must exist.
	pub fn explicit(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			precedence: Precedence::ExplicitFile,
			name: "explicit-config",
			required: true,
		}
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.required && !self.path.exists() {
			debug!(path = %self.path.display(), source = self.name, "config file not found, skipping");
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");

		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;
		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Recognized: `RETRACE_LOG_LEVEL`, `RETRACE_LOG_FORMAT`, `RETRACE_ROOT_MARKER`,
/// `RETRACE_SCRIPT_ALIAS`, `RETRACE_CONTEXT_LINES`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_env(|key| std::env::var(key).ok())
	}
}

/// Build a layer from an environment lookup. Blank values count as unset.
pub fn layer_from_env<F>(lookup: F) -> Result<ConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let var = |key: &str| {
		lookup(key)
			.map(|v| v.trim().to_string())
			.filter(|v| !v.is_empty())
	};

	let mut layer = ConfigLayer::default();

	if let Some(level) = var("RETRACE_LOG_LEVEL") {
		layer.logging_mut().level = Some(level);
	}
	if let Some(format) = var("RETRACE_LOG_FORMAT") {
		layer.logging_mut().format = Some(format);
	}
	if let Some(marker) = var("RETRACE_ROOT_MARKER") {
		layer.paths_mut().root_marker = Some(marker);
	}
	if let Some(alias) = var("RETRACE_SCRIPT_ALIAS") {
		layer.paths_mut().script_alias = Some(alias);
	}
	if let Some(lines) = var("RETRACE_CONTEXT_LINES") {
		let parsed = lines.parse().map_err(|_| {
			ConfigError::invalid_value(
				"RETRACE_CONTEXT_LINES",
				format!("expected a non-negative integer, got '{lines}'"),
			)
		})?;
		layer.resolve_mut().context_lines = Some(parsed);
	}

	Ok(layer)
}

/// CLI override source.
pub struct CliSource {
	overrides: CliOverrides,
}

/// CLI argument overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub log_level: Option<String>,
	pub log_format: Option<String>,
	pub context_lines: Option<usize>,
	pub exact_lookup: Option<bool>,
	pub config_file: Option<PathBuf>,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}
	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading CLI overrides");
		let mut layer = ConfigLayer::default();

		if let Some(ref level) = self.overrides.log_level {
			layer.logging_mut().level = Some(level.clone());
		}
		if let Some(ref format) = self.overrides.log_format {
			layer.logging_mut().format = Some(format.clone());
		}
		if let Some(lines) = self.overrides.context_lines {
			layer.resolve_mut().context_lines = Some(lines);
		}
		if let Some(exact) = self.overrides.exact_lookup {
			layer.resolve_mut().exact_lookup = Some(exact);
		}

		Ok(layer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Cli > Precedence::Environment);
		assert!(Precedence::Environment > Precedence::ExplicitFile);
		assert!(Precedence::ExplicitFile > Precedence::WorkspaceFile);
		assert!(Precedence::WorkspaceFile > Precedence::UserFile);
		assert!(Precedence::UserFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert_eq!(layer, ConfigLayer::default());
	}

	#[test]
	fn test_optional_file_missing_returns_empty() {
		let dir = tempfile::tempdir().unwrap();
		let locations = ConfigLocations::new(dir.path(), dir.path());

		let layer = FileSource::user(&locations).load().unwrap();
		assert_eq!(layer, ConfigLayer::default());
	}

	#[test]
	fn test_explicit_file_missing_is_error() {
		let dir = tempfile::tempdir().unwrap();
		let source = FileSource::explicit(dir.path().join("missing.toml"));

		assert!(matches!(source.load(), Err(ConfigError::FileRead { .. })));
	}

	#[test]
	fn test_file_source_parses_toml() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[resolve]\ncontext_lines = 2").unwrap();

		let layer = FileSource::explicit(file.path()).load().unwrap();
		assert_eq!(layer.resolve.unwrap().context_lines, Some(2));
	}

	#[test]
	fn test_file_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[resolve\ncontext_lines = ").unwrap();

		let err = FileSource::explicit(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_layer_from_env() {
		let vars: HashMap<&str, &str> = [
			("RETRACE_LOG_LEVEL", "debug"),
			("RETRACE_ROOT_MARKER", "app"),
			("RETRACE_SCRIPT_ALIAS", "  "),
			("RETRACE_CONTEXT_LINES", "2"),
		]
		.into_iter()
		.collect();

		let layer = layer_from_env(|k| vars.get(k).map(|v| v.to_string())).unwrap();

		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
		let paths = layer.paths.unwrap();
		assert_eq!(paths.root_marker.as_deref(), Some("app"));
		assert_eq!(paths.script_alias, None);
		assert_eq!(layer.resolve.unwrap().context_lines, Some(2));
	}

	#[test]
	fn test_layer_from_env_rejects_bad_number() {
		let err = layer_from_env(|k| (k == "RETRACE_CONTEXT_LINES").then(|| "many".to_string()))
			.unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { .. }));
	}

	#[test]
	fn test_cli_source() {
		let source = CliSource::new(CliOverrides {
			exact_lookup: Some(true),
			log_format: Some("json".to_string()),
			..Default::default()
		});

		let layer = source.load().unwrap();
		assert_eq!(layer.resolve.unwrap().exact_lookup, Some(true));
		assert_eq!(layer.logging.unwrap().format.as_deref(), Some("json"));
		assert!(layer.paths.is_none());
	}
}
