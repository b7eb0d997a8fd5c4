// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Path rules shared by the matcher and the display normalizer.

/// Prefixes removed from the front of a path before matching or display.
pub const DEFAULT_STRIP_PREFIXES: &[&str] = &["webpack:///", "webpack://", "../", "./"];
/// Alias bundlers use for the script root, e.g. `@/components/App.vue`.
pub const DEFAULT_SCRIPT_ALIAS: &str = "@/";
/// Directory segment marking the project root in displayed paths.
pub const DEFAULT_ROOT_MARKER: &str = "src";

/// Configurable path conventions of the build that produced the maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRules {
	pub strip_prefixes: Vec<String>,
	pub script_alias: String,
	pub root_marker: String,
}

impl Default for PathRules {
	fn default() -> Self {
		Self {
			strip_prefixes: DEFAULT_STRIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
			script_alias: DEFAULT_SCRIPT_ALIAS.to_string(),
			root_marker: DEFAULT_ROOT_MARKER.to_string(),
		}
	}
}

impl PathRules {
	/// Repeatedly strip relative prefixes and the script alias from the front of `path`.
	pub fn strip_relative<'a>(&self, path: &'a str) -> &'a str {
		let mut rest = path;
		'outer: loop {
			let prefixes = self
				.strip_prefixes
				.iter()
				.map(String::as_str)
				.chain(std::iter::once(self.script_alias.as_str()))
				.filter(|p| !p.is_empty());

			for prefix in prefixes {
				if let Some(stripped) = rest.strip_prefix(prefix) {
					rest = stripped;
					continue 'outer;
				}
			}
			return rest;
		}
	}
}

/// Canonicalize a resolved source path for display or export.
///
/// Relative markers are stripped; when the root marker directory occurs the
/// path is cut to start at it, otherwise it gets exactly one leading slash.
/// Applying this twice yields the same result as applying it once.
pub fn normalize_display_path(path: &str, rules: &PathRules) -> String {
	let stripped = rules.strip_relative(path);
	let marker = rules.root_marker.trim_matches('/');

	if !marker.is_empty() {
		let inner = format!("/{marker}/");
		if let Some(idx) = stripped.find(&inner) {
			return stripped[idx..].to_string();
		}

		let leading = format!("{marker}/");
		if stripped.starts_with(&leading) {
			return format!("/{stripped}");
		}
	}

	format!("/{}", stripped.trim_start_matches('/'))
}
