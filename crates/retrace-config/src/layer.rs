// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer for merging from multiple sources.

use serde::Deserialize;

/// Partial configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
	#[serde(default)]
	pub paths: Option<PathsLayer>,
	#[serde(default)]
	pub resolve: Option<ResolveLayer>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
}

/// `[paths]`: conventions of the build that produced the source maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PathsLayer {
	/// Extra prefixes stripped in addition to the built-in ones.
	#[serde(default)]
	pub strip_prefixes: Option<Vec<String>>,
	#[serde(default)]
	pub script_alias: Option<String>,
	#[serde(default)]
	pub root_marker: Option<String>,
}

/// `[resolve]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResolveLayer {
	#[serde(default)]
	pub context_lines: Option<usize>,
	#[serde(default)]
	pub exact_lookup: Option<bool>,
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
}

impl ConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_option(&mut self.paths, other.paths, PathsLayer::merge);
		merge_option(&mut self.resolve, other.resolve, ResolveLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingLayer::merge);
	}

	pub(crate) fn paths_mut(&mut self) -> &mut PathsLayer {
		self.paths.get_or_insert_with(PathsLayer::default)
	}

	pub(crate) fn resolve_mut(&mut self) -> &mut ResolveLayer {
		self.resolve.get_or_insert_with(ResolveLayer::default)
	}

	pub(crate) fn logging_mut(&mut self) -> &mut LoggingLayer {
		self.logging.get_or_insert_with(LoggingLayer::default)
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

impl PathsLayer {
	fn merge(&mut self, other: PathsLayer) {
		if other.strip_prefixes.is_some() {
			self.strip_prefixes = other.strip_prefixes;
		}
		if other.script_alias.is_some() {
			self.script_alias = other.script_alias;
		}
		if other.root_marker.is_some() {
			self.root_marker = other.root_marker;
		}
	}
}

impl ResolveLayer {
	fn merge(&mut self, other: ResolveLayer) {
		if other.context_lines.is_some() {
			self.context_lines = other.context_lines;
		}
		if other.exact_lookup.is_some() {
			self.exact_lookup = other.exact_lookup;
		}
	}
}

impl LoggingLayer {
	fn merge(&mut self, other: LoggingLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}
}
