// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration validation rules.

use tracing::warn;

use crate::runtime::RetraceConfig;
use crate::ConfigError;

/// Upper bound for `resolve.context_lines`.
pub const MAX_CONTEXT_LINES: usize = 100;

/// Validate the configuration.
///
/// Returns Ok(()) if valid, or a ConfigError with details.
pub fn validate_config(config: &RetraceConfig) -> Result<(), ConfigError> {
	validate_paths(config)?;
	validate_resolve(config)?;

	Ok(())
}

fn validate_paths(config: &RetraceConfig) -> Result<(), ConfigError> {
	if config.paths.root_marker.trim_matches('/').trim().is_empty() {
		return Err(ConfigError::invalid_value(
			"paths.root_marker",
			"root_marker cannot be empty",
		));
	}

	if config.paths.root_marker.trim_matches('/').contains('/') {
		return Err(ConfigError::invalid_value(
			"paths.root_marker",
			format!(
				"root_marker must be a single directory name, got '{}'",
				config.paths.root_marker
			),
		));
	}

	if config.paths.strip_prefixes.iter().any(|p| p.is_empty()) {
		// Ignored by the path rules, but most likely a typo
		warn!("paths.strip_prefixes contains an empty entry");
	}

	Ok(())
}

fn validate_resolve(config: &RetraceConfig) -> Result<(), ConfigError> {
	if config.resolve.context_lines > MAX_CONTEXT_LINES {
		return Err(ConfigError::invalid_value(
			"resolve.context_lines",
			format!(
				"{} exceeds the maximum of {MAX_CONTEXT_LINES}",
				config.resolve.context_lines
			),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_marker(marker: &str) -> RetraceConfig {
		let mut config = RetraceConfig::default();
		config.paths.root_marker = marker.to_string();
		config
	}

	#[test]
	fn test_default_config_is_valid() {
		assert!(validate_config(&RetraceConfig::default()).is_ok());
	}

	#[test]
	fn test_empty_root_marker_rejected() {
		for marker in ["", "/", "  "] {
			let err = validate_config(&with_marker(marker)).unwrap_err();
			assert!(
				matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "paths.root_marker")
			);
		}
	}

	#[test]
	fn test_nested_root_marker_rejected() {
		assert!(validate_config(&with_marker("src/app")).is_err());
		assert!(validate_config(&with_marker("/app/")).is_ok());
	}

	#[test]
	fn test_context_lines_bounded() {
		let mut config = RetraceConfig::default();
		config.resolve.context_lines = MAX_CONTEXT_LINES + 1;
		assert!(validate_config(&config).is_err());

		config.resolve.context_lines = MAX_CONTEXT_LINES;
		assert!(validate_config(&config).is_ok());
	}
}
