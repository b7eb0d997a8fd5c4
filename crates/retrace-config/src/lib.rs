// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for retrace.
//!
//! This crate provides:
//! - XDG Base Directory compliant config file locations
//! - Layered configuration from multiple sources
//! - TOML configuration file parsing
//! - Environment variable overrides
//! - Configuration validation

pub mod error;
pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod sources;
pub mod validation;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::{resolve_config_locations, ConfigLocations};
pub use registry::ConfigRegistry;
pub use runtime::{LogFormat, LogLevel, LoggingConfig, PathsConfig, ResolveConfig, RetraceConfig};
pub use sources::{CliOverrides, ConfigSource, Precedence};

/// Load configuration from all sources with CLI overrides on top.
///
/// Precedence (lowest to highest): defaults, user file, workspace file,
/// `cli.config_file`, `RETRACE_*` environment variables, CLI flags.
pub fn load_config(cli: CliOverrides) -> Result<RetraceConfig, ConfigError> {
	let locations = resolve_config_locations()?;

	let mut registry = ConfigRegistry::new();

	registry.register(Box::new(sources::DefaultsSource));
	registry.register(Box::new(sources::FileSource::user(&locations)));
	registry.register(Box::new(sources::FileSource::workspace(&locations)));
	if let Some(ref path) = cli.config_file {
		registry.register(Box::new(sources::FileSource::explicit(path)));
	}
	registry.register(Box::new(sources::EnvSource));
	registry.register(Box::new(sources::CliSource::new(cli)));

	registry.load()
}
