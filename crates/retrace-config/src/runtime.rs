// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use std::fmt;
use std::str::FromStr;

use retrace_symbolicate::normalize::{DEFAULT_ROOT_MARKER, DEFAULT_SCRIPT_ALIAS, DEFAULT_STRIP_PREFIXES};
use retrace_symbolicate::{LookupBias, PathRules, ResolveOptions, VlqDecoder, DEFAULT_CONTEXT_LINES};

use crate::layer::{ConfigLayer, LoggingLayer, PathsLayer, ResolveLayer};
use crate::ConfigError;

/// The final, validated configuration for retrace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetraceConfig {
	pub paths: PathsConfig,
	pub resolve: ResolveConfig,
	pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
	/// Extra prefixes, stripped after the built-in ones.
	pub strip_prefixes: Vec<String>,
	pub script_alias: String,
	pub root_marker: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveConfig {
	/// Lines of context around a resolved line; 0 disables snippets.
	pub context_lines: usize,
	pub exact_lookup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
	Error,
	#[default]
	Warn,
	Info,
	Debug,
	Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
	Pretty,
	Json,
	#[default]
	Compact,
}

impl LogLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
			LogLevel::Trace => "trace",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"error" => Ok(LogLevel::Error),
			"warn" | "warning" => Ok(LogLevel::Warn),
			"info" => Ok(LogLevel::Info),
			"debug" => Ok(LogLevel::Debug),
			"trace" => Ok(LogLevel::Trace),
			other => Err(ConfigError::invalid_value(
				"logging.level",
				format!("unknown level '{other}', expected error|warn|info|debug|trace"),
			)),
		}
	}
}

impl FromStr for LogFormat {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"pretty" => Ok(LogFormat::Pretty),
			"json" => Ok(LogFormat::Json),
			"compact" => Ok(LogFormat::Compact),
			other => Err(ConfigError::invalid_value(
				"logging.format",
				format!("unknown format '{other}', expected pretty|compact|json"),
			)),
		}
	}
}

impl Default for RetraceConfig {
	fn default() -> Self {
		Self {
			paths: build_paths_config(None),
			resolve: build_resolve_config(None),
			logging: LoggingConfig {
				level: LogLevel::default(),
				format: LogFormat::default(),
			},
		}
	}
}

impl RetraceConfig {
	/// Apply defaults to a merged layer.
	pub fn from_layer(layer: ConfigLayer) -> Result<Self, ConfigError> {
		Ok(Self {
			paths: build_paths_config(layer.paths),
			resolve: build_resolve_config(layer.resolve),
			logging: build_logging_config(layer.logging)?,
		})
	}

	/// Path rules for matching and display.
	pub fn path_rules(&self) -> PathRules {
		let strip_prefixes = DEFAULT_STRIP_PREFIXES
			.iter()
			.map(|p| p.to_string())
			.chain(self.paths.strip_prefixes.iter().cloned())
			.collect();

		PathRules {
			strip_prefixes,
			script_alias: self.paths.script_alias.clone(),
			root_marker: self.paths.root_marker.clone(),
		}
	}

	pub fn lookup_bias(&self) -> LookupBias {
		if self.resolve.exact_lookup {
			LookupBias::Exact
		} else {
			LookupBias::GreatestLowerBound
		}
	}

	pub fn decoder(&self) -> VlqDecoder {
		VlqDecoder::new(self.lookup_bias())
	}

	pub fn resolve_options(&self) -> ResolveOptions {
		ResolveOptions {
			path_rules: self.path_rules(),
			context_lines: (self.resolve.context_lines > 0).then_some(self.resolve.context_lines),
		}
	}
}

fn build_paths_config(layer: Option<PathsLayer>) -> PathsConfig {
	let layer = layer.unwrap_or_default();
	PathsConfig {
		strip_prefixes: layer.strip_prefixes.unwrap_or_default(),
		script_alias: layer
			.script_alias
			.unwrap_or_else(|| DEFAULT_SCRIPT_ALIAS.to_string()),
		root_marker: layer
			.root_marker
			.unwrap_or_else(|| DEFAULT_ROOT_MARKER.to_string()),
	}
}

fn build_resolve_config(layer: Option<ResolveLayer>) -> ResolveConfig {
	let layer = layer.unwrap_or_default();
	ResolveConfig {
		context_lines: layer.context_lines.unwrap_or(DEFAULT_CONTEXT_LINES),
		exact_lookup: layer.exact_lookup.unwrap_or(false),
	}
}

fn build_logging_config(layer: Option<LoggingLayer>) -> Result<LoggingConfig, ConfigError> {
	let layer = layer.unwrap_or_default();
	Ok(LoggingConfig {
		level: layer
			.level
			.as_deref()
			.map(str::parse::<LogLevel>)
			.transpose()?
			.unwrap_or_default(),
		format: layer
			.format
			.as_deref()
			.map(str::parse::<LogFormat>)
			.transpose()?
			.unwrap_or_default(),
	})
}
