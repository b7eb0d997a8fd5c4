// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map parsing and position lookup.
//!
//! Implements the Source Map v3 format for JavaScript/TypeScript stack
//! trace symbolication.

use serde::Deserialize;

use retrace_core::{SourceMapDocument, SourceSnippet};

use crate::error::{Result, SymbolicateError};
use crate::vlq::{decode_vlq_mappings, DecodedMappings, LookupBias};

/// Raw source map JSON structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
	version: u32,
	#[serde(default)]
	source_root: Option<String>,
	sources: Vec<Option<String>>,
	#[serde(default)]
	sources_content: Option<Vec<Option<String>>>,
	#[serde(default)]
	names: Vec<String>,
	mappings: String,
}

/// Parsed source map ready for lookups.
#[derive(Debug, Clone)]
pub struct ParsedSourceMap {
	/// Original source paths with `sourceRoot` applied; null entries are empty.
	sources: Vec<String>,
	sources_content: Vec<Option<String>>,
	names: Vec<String>,
	mappings: DecodedMappings,
	bias: LookupBias,
}

/// Original position information from a source map lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition<'a> {
	/// Original source file path; empty when the segment maps to no source.
	pub source: &'a str,
	/// Line in the original source (1-indexed).
	pub line: u32,
	/// Column in the original source (0-indexed).
	pub column: u32,
	/// Original identifier name if available.
	pub name: Option<&'a str>,
	/// Original source content if embedded.
	pub source_content: Option<&'a str>,
}

impl ParsedSourceMap {
	/// Decode a loaded document.
	pub fn from_document(document: &SourceMapDocument) -> Result<Self> {
		let raw = RawSourceMap::deserialize(document.content())?;
		Self::from_raw(raw)
	}

	/// Parse a source map from JSON bytes.
	pub fn from_bytes(data: &[u8]) -> Result<Self> {
		let raw: RawSourceMap = serde_json::from_slice(data)?;
		Self::from_raw(raw)
	}

	fn from_raw(raw: RawSourceMap) -> Result<Self> {
		if raw.version != 3 {
			return Err(SymbolicateError::InvalidSourceMapVersion(raw.version));
		}

		let mappings = decode_vlq_mappings(&raw.mappings)?;
		let root = raw.source_root.as_deref().unwrap_or_default();
		let sources = raw
			.sources
			.into_iter()
			.map(|s| s.map(|s| join_source_root(root, &s)).unwrap_or_default())
			.collect();

		Ok(Self {
			sources,
			sources_content: raw.sources_content.unwrap_or_default(),
			names: raw.names,
			mappings,
			bias: LookupBias::default(),
		})
	}

	/// Select how column queries pick a segment.
	pub fn with_bias(mut self, bias: LookupBias) -> Self {
		self.bias = bias;
		self
	}

	/// Lookup the original position for a generated line and column.
	///
	/// Lines are 1-indexed (as displayed in stack traces), columns are 0-indexed.
	/// Returns `None` if no segment covers this position.
	pub fn lookup(&self, line: u32, column: u32) -> Result<Option<OriginalPosition<'_>>> {
		let Some(line_0indexed) = line.checked_sub(1) else {
			return Ok(None);
		};

		let Some(mapping) = self.mappings.find(line_0indexed, column, self.bias) else {
			return Ok(None);
		};

		let Some(original) = mapping.original else {
			return Ok(Some(OriginalPosition {
				source: "",
				line: 0,
				column: 0,
				name: None,
				source_content: None,
			}));
		};

		let index = original.source_index as usize;
		let source = self
			.sources
			.get(index)
			.ok_or(SymbolicateError::InvalidSourceIndex(original.source_index))?;

		let source_content = self
			.sources_content
			.get(index)
			.and_then(|c| c.as_deref());

		let name = original
			.name_index
			.and_then(|idx| self.names.get(idx as usize))
			.map(String::as_str);

		let line = original
			.original_line
			.checked_add(1)
			.ok_or(SymbolicateError::MappingValueOutOfRange {
				field: "original line",
				line: line_0indexed,
			})?;

		Ok(Some(OriginalPosition {
			source,
			line,
			column: original.original_column,
			name,
			source_content,
		}))
	}
}

fn join_source_root(root: &str, source: &str) -> String {
	if root.is_empty() {
		return source.to_string();
	}
	format!("{}/{}", root.trim_end_matches('/'), source)
}

/// Extract source context lines around a given line number.
///
/// Returns `None` when the line lies outside the content.
pub fn extract_context(
	source_content: &str,
	line: usize,
	context_lines: usize,
) -> Option<SourceSnippet> {
	let lines: Vec<&str> = source_content.lines().collect();

	// Line is 1-indexed
	let line_idx = line.checked_sub(1)?;
	let context_line = lines.get(line_idx)?.to_string();

	let pre_start = line_idx.saturating_sub(context_lines);
	let post_end = line_idx
		.saturating_add(1)
		.saturating_add(context_lines)
		.min(lines.len());

	Some(SourceSnippet {
		pre_context: lines[pre_start..line_idx].iter().map(|s| s.to_string()).collect(),
		context_line,
		post_context: lines[(line_idx + 1)..post_end]
			.iter()
			.map(|s| s.to_string())
			.collect(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn sample_source_map() -> &'static str {
		r#"{
			"version": 3,
			"file": "bundle.js",
			"sourceRoot": "",
			"sources": ["src/app.ts"],
			"sourcesContent": ["function greet(name: string) {\n  console.log('Hello, ' + name);\n}\n\ngreet('World');\n"],
			"names": ["greet", "name", "console", "log"],
			"mappings": "AAAA,SAASA,MAAMC,IAAY;AACzBC,QAAQ,CAACC,GAAG,CAAC,UAAU,GAAGF,IAAI,CAAC,CAAC;AAClC,CAAC;AAEDD,MAAM,CAAC,OAAO,CAAC,CAAC"
		}"#
	}

	#[test]
	fn test_parse_source_map() {
		let sm = ParsedSourceMap::from_bytes(sample_source_map().as_bytes()).unwrap();

		assert_eq!(sm.sources, vec!["src/app.ts"]);
		assert_eq!(sm.names.len(), 4);
		assert!(sm.sources_content[0].is_some());
	}

	#[test]
	fn test_lookup_position() {
		let sm = ParsedSourceMap::from_bytes(sample_source_map().as_bytes()).unwrap();

		let pos = sm.lookup(1, 0).unwrap().unwrap();
		assert_eq!(pos.source, "src/app.ts");
		assert_eq!(pos.line, 1);
		assert_eq!(pos.column, 0);
		assert!(pos.source_content.unwrap().starts_with("function greet"));
	}

	#[test]
	fn test_lookup_resolves_name() {
		// Segment at column 9 carries name index 0 ("greet").
		let sm = ParsedSourceMap::from_bytes(sample_source_map().as_bytes()).unwrap();

		let pos = sm.lookup(1, 9).unwrap().unwrap();
		assert_eq!(pos.name, Some("greet"));

		// Line 4 "greet('World')" starts with name index 0 again.
		let pos = sm.lookup(4, 2).unwrap().unwrap();
		assert_eq!(pos.line, 5);
		assert_eq!(pos.name, Some("greet"));
	}

	#[test]
	fn test_lookup_line_zero_is_none() {
		let sm = ParsedSourceMap::from_bytes(sample_source_map().as_bytes()).unwrap();
		assert!(sm.lookup(0, 0).unwrap().is_none());
	}

	#[test]
	fn test_exact_bias_misses_between_segments() {
		let sm = ParsedSourceMap::from_bytes(sample_source_map().as_bytes())
			.unwrap()
			.with_bias(LookupBias::Exact);

		assert!(sm.lookup(1, 3).unwrap().is_none());
		assert!(sm.lookup(1, 0).unwrap().is_some());
	}

	#[test]
	fn test_from_document() {
		let doc = SourceMapDocument::new(
			"app.js.map",
			json!({"version": 3, "sources": ["a.ts"], "mappings": "AAAA"}),
		);
		let sm = ParsedSourceMap::from_document(&doc).unwrap();
		assert_eq!(sm.lookup(1, 0).unwrap().unwrap().source, "a.ts");
	}

	#[test]
	fn test_missing_mappings_field_fails() {
		let doc = SourceMapDocument::new("app.js.map", json!({"version": 3, "sources": []}));
		assert!(matches!(
			ParsedSourceMap::from_document(&doc),
			Err(SymbolicateError::InvalidSourceMapJson(_))
		));
	}

	#[test]
	fn test_out_of_range_source_index_errors() {
		// "ACAA" points at source 1 but only one source is declared.
		let doc = SourceMapDocument::new(
			"app.js.map",
			json!({"version": 3, "sources": ["a.ts"], "mappings": "ACAA"}),
		);
		let sm = ParsedSourceMap::from_document(&doc).unwrap();
		assert!(matches!(
			sm.lookup(1, 0),
			Err(SymbolicateError::InvalidSourceIndex(1))
		));
	}

	#[test]
	fn test_null_source_resolves_empty() {
		let doc = SourceMapDocument::new(
			"app.js.map",
			json!({"version": 3, "sources": [null], "mappings": "AAAA"}),
		);
		let sm = ParsedSourceMap::from_document(&doc).unwrap();
		assert_eq!(sm.lookup(1, 0).unwrap().unwrap().source, "");
	}

	#[test]
	fn test_extract_context() {
		let source = "line 1\nline 2\nline 3\nline 4\nline 5\nline 6\nline 7";

		let snippet = extract_context(source, 4, 2).unwrap();

		assert_eq!(snippet.pre_context, vec!["line 2", "line 3"]);
		assert_eq!(snippet.context_line, "line 4");
		assert_eq!(snippet.post_context, vec!["line 5", "line 6"]);
	}

	#[test]
	fn test_extract_context_at_edges() {
		let source = "line 1\nline 2\nline 3";

		let start = extract_context(source, 1, 2).unwrap();
		assert!(start.pre_context.is_empty());
		assert_eq!(start.post_context, vec!["line 2", "line 3"]);

		let end = extract_context(source, 3, 2).unwrap();
		assert_eq!(end.pre_context, vec!["line 1", "line 2"]);
		assert!(end.post_context.is_empty());
	}

	#[test]
	fn test_extract_context_unbounded_window() {
		let source = "line 1\nline 2\nline 3";

		let snippet = extract_context(source, 2, usize::MAX).unwrap();
		assert_eq!(snippet.pre_context, vec!["line 1"]);
		assert_eq!(snippet.post_context, vec!["line 3"]);
	}

	#[test]
	fn test_extract_context_out_of_range() {
		assert!(extract_context("one line", 5, 2).is_none());
		assert!(extract_context("one line", 0, 2).is_none());
	}

	#[test]
	fn test_invalid_version() {
		let json = r#"{"version": 2, "sources": [], "names": [], "mappings": ""}"#;
		let result = ParsedSourceMap::from_bytes(json.as_bytes());
		assert!(matches!(
			result,
			Err(SymbolicateError::InvalidSourceMapVersion(2))
		));
	}

	#[test]
	fn test_source_root_resolution() {
		let json = r#"{
			"version": 3,
			"sourceRoot": "src/",
			"sources": ["index.ts"],
			"names": [],
			"mappings": "AAAA"
		}"#;
		let sm = ParsedSourceMap::from_bytes(json.as_bytes()).unwrap();

		let pos = sm.lookup(1, 0).unwrap().unwrap();
		assert_eq!(pos.source, "src/index.ts");
	}
}
