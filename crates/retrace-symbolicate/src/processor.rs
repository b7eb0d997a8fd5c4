// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack resolution pipeline.
//!
//! This module provides the high-level API: parse the raw error text, pick
//! a source map per frame, and resolve each frame to its original location.

use tracing::{debug, info, instrument, warn};

use retrace_core::{InputError, ResolvedFrame, SourceMapDocument, StackFrame};

use crate::cache::DecodeCache;
use crate::decoder::{SourceMapDecoder, VlqDecoder};
use crate::matcher::find_document;
use crate::normalize::PathRules;
use crate::parser::parse_stack;
use crate::resolver::resolve_position;
use crate::sourcemap::extract_context;

/// Number of context lines to include before and after the error line.
pub const DEFAULT_CONTEXT_LINES: usize = 5;

/// Tunables for a [`StackResolver`].
#[derive(Debug, Clone)]
pub struct ResolveOptions {
	pub path_rules: PathRules,
	/// Lines of embedded source around each resolved line; `None` disables snippets.
	pub context_lines: Option<usize>,
}

impl Default for ResolveOptions {
	fn default() -> Self {
		Self {
			path_rules: PathRules::default(),
			context_lines: Some(DEFAULT_CONTEXT_LINES),
		}
	}
}

/// Resolves minified stack traces against uploaded source maps.
#[derive(Debug, Clone)]
pub struct StackResolver<D: SourceMapDecoder = VlqDecoder> {
	decoder: D,
	options: ResolveOptions,
}

impl StackResolver<VlqDecoder> {
	pub fn new(options: ResolveOptions) -> Self {
		Self::with_decoder(VlqDecoder::default(), options)
	}
}

impl<D: SourceMapDecoder> StackResolver<D> {
	pub fn with_decoder(decoder: D, options: ResolveOptions) -> Self {
		Self { decoder, options }
	}

	pub fn options(&self) -> &ResolveOptions {
		&self.options
	}

	/// Resolve every frame of `raw_error_text` against `documents`.
	///
	/// Documents are considered in the order given. Output frames follow the
	/// input frame order, one per parsed frame. Only input problems fail the
	/// call; frames that cannot be resolved come back with `has_mapping() == false`.
	#[instrument(skip_all, fields(document_count = documents.len()))]
	pub fn resolve_stack(
		&self,
		documents: &[SourceMapDocument],
		raw_error_text: &str,
	) -> Result<Vec<ResolvedFrame>, InputError> {
		if documents.is_empty() {
			return Err(InputError::NoDocuments);
		}

		let parsed = parse_stack(raw_error_text)?;
		let mut cache = DecodeCache::new(&self.decoder);

		let resolved: Vec<ResolvedFrame> = parsed
			.frames
			.iter()
			.map(|frame| self.resolve_frame(frame, documents, &mut cache))
			.collect();

		info!(
			dialect = ?parsed.dialect,
			frame_count = resolved.len(),
			mapped = resolved.iter().filter(|f| f.has_mapping()).count(),
			decodes = cache.decode_count(),
			"Resolved stack"
		);

		Ok(resolved)
	}

	fn resolve_frame(
		&self,
		frame: &StackFrame,
		documents: &[SourceMapDocument],
		cache: &mut DecodeCache<'_, D>,
	) -> ResolvedFrame {
		let Some(matched) = find_document(frame.filename(), documents, &self.options.path_rules) else {
			debug!(filename = %frame.filename(), "No source map matches frame");
			return ResolvedFrame::unmapped(frame, None);
		};

		let name = matched.document.name();
		debug!(
			filename = %frame.filename(),
			document = %name,
			rule = ?matched.rule,
			"Matched source map"
		);

		let Some(index) = cache.get(matched.document) else {
			return ResolvedFrame::unmapped(frame, Some(name.to_string()));
		};

		match resolve_position(index, frame.line(), frame.column()) {
			Ok(Some(position)) => {
				debug!(
					filename = %frame.filename(),
					lineno = frame.line(),
					colno = frame.column(),
					original_source = %position.location.source,
					original_line = position.location.line,
					"Symbolicated frame"
				);

				let snippet = match (self.options.context_lines, position.source_content) {
					(Some(lines), Some(content)) => {
						extract_context(content, position.location.line as usize, lines)
					}
					_ => None,
				};

				ResolvedFrame::mapped(frame, position.location, snippet, name)
			}
			Ok(None) => {
				debug!(
					filename = %frame.filename(),
					lineno = frame.line(),
					colno = frame.column(),
					"No mapping found in source map"
				);
				ResolvedFrame::unmapped(frame, Some(name.to_string()))
			}
			Err(e) => {
				warn!(error = %e, document = %name, "Source map lookup failed");
				ResolvedFrame::unmapped(frame, Some(name.to_string()))
			}
		}
	}
}

/// Resolve a stack trace with default options and the built-in VLQ decoder.
pub fn resolve_stack(
	documents: &[SourceMapDocument],
	raw_error_text: &str,
) -> Result<Vec<ResolvedFrame>, InputError> {
	StackResolver::new(ResolveOptions::default()).resolve_stack(documents, raw_error_text)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn create_test_source_map() -> SourceMapDocument {
		SourceMapDocument::from_slice(
			"bundle.js.map",
			r#"{
				"version": 3,
				"file": "bundle.js",
				"sources": ["src/app.ts"],
				"sourcesContent": ["function greet(name: string) {\n  console.log('Hello, ' + name);\n}\n\ngreet('World');\n"],
				"names": ["greet", "name", "console", "log"],
				"mappings": "AAAA,SAASA,MAAMC,IAAY;AACzBC,QAAQ,CAACC,GAAG,CAAC,UAAU,GAAGF,IAAI,CAAC,CAAC;AAClC,CAAC;AAEDD,MAAM,CAAC,OAAO,CAAC,CAAC"
			}"#
			.as_bytes(),
		)
		.unwrap()
	}

	#[test]
	fn test_resolve_js_frame() {
		let frames = resolve_stack(
			&[create_test_source_map()],
			"Error: boom\n    at a (https://example.com/bundle.js:1:1)",
		)
		.unwrap();

		assert_eq!(frames.len(), 1);
		let frame = &frames[0];

		assert!(frame.has_mapping());
		assert_eq!(frame.source(), "src/app.ts");
		assert_eq!(frame.original_line(), Some(1));
		assert_eq!(frame.original_column(), Some(1));
		assert_eq!(frame.document(), Some("bundle.js.map"));

		let snippet = frame.snippet().unwrap();
		assert_eq!(snippet.context_line, "function greet(name: string) {");
		assert!(snippet.pre_context.is_empty());
	}

	#[test]
	fn test_resolved_name_replaces_minified_function() {
		// Line 1, column 10 (1-indexed) lands on the segment naming "greet".
		let frames = resolve_stack(&[create_test_source_map()], "at a (bundle.js:1:10)").unwrap();
		assert_eq!(frames[0].function_name(), Some("greet"));
	}

	#[test]
	fn test_snippets_can_be_disabled() {
		let resolver = StackResolver::new(ResolveOptions {
			context_lines: None,
			..ResolveOptions::default()
		});

		let frames = resolver
			.resolve_stack(&[create_test_source_map()], "bundle.js:1:1")
			.unwrap();
		assert!(frames[0].snippet().is_none());
	}

	#[test]
	fn test_no_documents_is_input_error() {
		assert!(matches!(
			resolve_stack(&[], "at a (bundle.js:1:1)"),
			Err(InputError::NoDocuments)
		));
	}

	#[test]
	fn test_empty_text_is_input_error() {
		assert!(matches!(
			resolve_stack(&[create_test_source_map()], ""),
			Err(InputError::EmptyInput)
		));
	}

	#[test]
	fn test_broken_document_downgrades_frames() {
		let broken = SourceMapDocument::new(
			"bundle.js.map",
			json!({"version": 3, "file": "bundle.js", "sources": ["src/app.ts"], "mappings": "@@"}),
		);

		let frames = resolve_stack(&[broken], "bundle.js:1:1\nbundle.js:2:1").unwrap();
		assert_eq!(frames.len(), 2);
		assert!(frames.iter().all(|f| !f.has_mapping()));
		assert_eq!(frames[0].document(), Some("bundle.js.map"));
	}

	#[test]
	fn test_lookup_error_only_affects_its_frame() {
		// Line 1 points at source index 1, which does not exist; line 2 is fine.
		let doc = SourceMapDocument::new(
			"bundle.js.map",
			json!({"version": 3, "file": "bundle.js", "sources": ["src/app.ts"], "mappings": "ACAA;ADAA"}),
		);

		let frames = resolve_stack(&[doc], "bundle.js:1:1\nbundle.js:2:1").unwrap();
		assert!(!frames[0].has_mapping());
		assert!(frames[1].has_mapping());
		assert_eq!(frames[1].source(), "src/app.ts");
	}
}
