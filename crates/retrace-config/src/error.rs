// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Errors raised while assembling a [`RetraceConfig`](crate::RetraceConfig).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// Working directory lookup failed.
	#[error("cannot determine working directory: {0}")]
	Io(#[from] std::io::Error),

	#[error("cannot read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("malformed config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// `field` uses the dotted TOML key, or the environment variable name.
	#[error("invalid value for {field}: {message}")]
	InvalidValue { field: String, message: String },

	#[error("no home directory and XDG_CONFIG_HOME is unset")]
	HomeDirNotFound,
}

impl ConfigError {
	pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			message: message.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_value_message_names_field() {
		let err = ConfigError::invalid_value("paths.root_marker", "root_marker cannot be empty");
		assert_eq!(
			err.to_string(),
			"invalid value for paths.root_marker: root_marker cannot be empty"
		);
	}

	#[test]
	fn test_parse_error_names_file() {
		let source = toml::from_str::<toml::Value>("[broken").unwrap_err();
		let err = ConfigError::TomlParse {
			path: PathBuf::from("/work/.retrace/config.toml"),
			source,
		};
		assert!(err
			.to_string()
			.starts_with("malformed config file /work/.retrace/config.toml"));
	}
}
