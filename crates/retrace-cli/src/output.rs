// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rendering of resolved frames for the terminal or for export.

use std::fmt::Write as _;

use serde::Serialize;

use retrace_core::ResolvedFrame;
use retrace_symbolicate::{normalize_display_path, PathRules};

const ANONYMOUS: &str = "<anonymous>";

/// A resolved frame plus its display path, as exported in JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport<'a> {
	#[serde(flatten)]
	pub frame: &'a ResolvedFrame,
	pub display_path: String,
}

impl<'a> FrameReport<'a> {
	pub fn new(frame: &'a ResolvedFrame, rules: &PathRules) -> Self {
		Self {
			frame,
			display_path: display_path(frame, rules),
		}
	}
}

/// Resolved sources are normalized; unmapped frames keep the compiled filename.
pub fn display_path(frame: &ResolvedFrame, rules: &PathRules) -> String {
	if frame.has_mapping() {
		normalize_display_path(frame.source(), rules)
	} else {
		frame.source().to_string()
	}
}

pub fn render_json(frames: &[ResolvedFrame], rules: &PathRules) -> serde_json::Result<String> {
	let reports: Vec<FrameReport<'_>> = frames.iter().map(|f| FrameReport::new(f, rules)).collect();
	serde_json::to_string_pretty(&reports)
}

/// One line per frame, followed by the source snippet when there is one.
pub fn render_text(frames: &[ResolvedFrame], rules: &PathRules) -> String {
	let mut out = String::new();

	for frame in frames {
		let function = frame.function_name().unwrap_or(ANONYMOUS);
		let location = format!(
			"{}:{}:{}",
			display_path(frame, rules),
			frame.display_line(),
			frame.display_column()
		);

		if frame.has_mapping() {
			let _ = writeln!(out, "  at {function} ({location})");
		} else {
			let _ = writeln!(out, "  at {function} ({location}) [unmapped]");
		}

		if let (Some(snippet), Some(line)) = (frame.snippet(), frame.original_line()) {
			render_snippet(&mut out, snippet, line as usize);
		}
	}

	out
}

fn render_snippet(out: &mut String, snippet: &retrace_core::SourceSnippet, line: usize) {
	let first = line.saturating_sub(snippet.pre_context.len());
	let last = line + snippet.post_context.len();
	let width = last.to_string().len();

	for (offset, text) in snippet.pre_context.iter().enumerate() {
		let _ = writeln!(out, "      {:>width$} | {text}", first + offset);
	}
	let _ = writeln!(out, "    > {line:>width$} | {}", snippet.context_line);
	for (offset, text) in snippet.post_context.iter().enumerate() {
		let _ = writeln!(out, "      {:>width$} | {text}", line + 1 + offset);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use retrace_core::SourceMapDocument;
	use retrace_symbolicate::resolve_stack;
	use serde_json::json;

	fn frames() -> Vec<ResolvedFrame> {
		let document = SourceMapDocument::new(
			"main.js.map",
			json!({
				"version": 3,
				"file": "main.js",
				"sources": ["webpack:///./src/app.ts"],
				"sourcesContent": ["const a = 1;\nthrow new Error(a);\n"],
				"names": [],
				"mappings": ";AACA"
			}),
		);
		resolve_stack(&[document], "at boom (main.js:2:1)\nat other.js:9:3").unwrap()
	}

	#[test]
	fn test_render_text() {
		let text = render_text(&frames(), &PathRules::default());
		let lines: Vec<&str> = text.lines().collect();

		assert_eq!(lines[0], "  at boom (/src/app.ts:2:1)");
		assert_eq!(lines[1], "      1 | const a = 1;");
		assert_eq!(lines[2], "    > 2 | throw new Error(a);");
		assert_eq!(lines.last(), Some(&"  at <anonymous> (other.js:9:3) [unmapped]"));
	}

	#[test]
	fn test_render_json_uses_camel_case_and_display_path() {
		let rendered = render_json(&frames(), &PathRules::default()).unwrap();
		let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

		assert_eq!(value[0]["displayPath"], "/src/app.ts");
		assert_eq!(value[0]["source"], "webpack:///./src/app.ts");
		assert_eq!(value[0]["originalLine"], 2);
		assert_eq!(value[0]["hasMapping"], true);
		assert_eq!(value[0]["snippet"]["contextLine"], "throw new Error(a);");

		assert_eq!(value[1]["displayPath"], "other.js");
		assert_eq!(value[1]["hasMapping"], false);
		assert!(value[1]["originalLine"].is_null());
		assert!(value[1].get("snippet").is_none());
	}
}
