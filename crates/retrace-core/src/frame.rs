// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack frame types: parsed input frames and their resolved counterparts.

use serde::Serialize;

/// A single entry of a minified call stack.
///
/// Frames are immutable once produced. The constructor enforces a non-empty
/// filename and a positive (1-based) line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
	filename: String,
	function: Option<String>,
	line: u32,
	column: u32,
}

impl StackFrame {
	/// Build a frame, returning `None` when the filename is blank or the line is zero.
	pub fn new(
		filename: impl Into<String>,
		function: Option<String>,
		line: u32,
		column: u32,
	) -> Option<Self> {
		let filename = filename.into();
		if filename.trim().is_empty() || line == 0 {
			return None;
		}

		let function = function.filter(|f| !f.trim().is_empty());

		Some(Self {
			filename,
			function,
			line,
			column,
		})
	}

	pub fn filename(&self) -> &str {
		&self.filename
	}

	pub fn function(&self) -> Option<&str> {
		self.function.as_deref()
	}

	/// Compiled line (1-indexed).
	pub fn line(&self) -> u32 {
		self.line
	}

	/// Compiled column (1-indexed, 0 when the trace omitted it).
	pub fn column(&self) -> u32 {
		self.column
	}
}

/// Original source location found for a compiled position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalLocation {
	/// Original source path as declared by the source map.
	pub source: String,
	/// Line in the original source (1-indexed).
	pub line: u32,
	/// Column in the original source (1-indexed).
	pub column: u32,
	/// Original identifier name if the mapping carries one.
	pub name: Option<String>,
}

/// Lines of embedded source surrounding a resolved position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSnippet {
	pub pre_context: Vec<String>,
	pub context_line: String,
	pub post_context: Vec<String>,
}

/// Result of resolving one [`StackFrame`].
///
/// Exactly one is produced per input frame. An unresolved frame keeps its
/// compiled location and reports `has_mapping == false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFrame {
	function_name: Option<String>,
	source: String,
	original_line: Option<u32>,
	original_column: Option<u32>,
	compiled_line: u32,
	compiled_column: u32,
	has_mapping: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	snippet: Option<SourceSnippet>,
	#[serde(skip_serializing_if = "Option::is_none")]
	document: Option<String>,
}

impl ResolvedFrame {
	/// A frame that was mapped back to its original source.
	///
	/// The original identifier name wins over the minified function name.
	pub fn mapped(
		frame: &StackFrame,
		location: OriginalLocation,
		snippet: Option<SourceSnippet>,
		document: impl Into<String>,
	) -> Self {
		let function_name = location.name.or_else(|| frame.function.clone());

		Self {
			function_name,
			source: location.source,
			original_line: Some(location.line),
			original_column: Some(location.column),
			compiled_line: frame.line,
			compiled_column: frame.column,
			has_mapping: true,
			snippet,
			document: Some(document.into()),
		}
	}

	/// A frame for which no mapping was found.
	///
	/// `document` names the matched source map, if any matched at all.
	pub fn unmapped(frame: &StackFrame, document: Option<String>) -> Self {
		Self {
			function_name: frame.function.clone(),
			source: frame.filename.clone(),
			original_line: None,
			original_column: None,
			compiled_line: frame.line,
			compiled_column: frame.column,
			has_mapping: false,
			snippet: None,
			document,
		}
	}

	pub fn function_name(&self) -> Option<&str> {
		self.function_name.as_deref()
	}

	/// Original source path, or the compiled filename when unmapped.
	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn original_line(&self) -> Option<u32> {
		self.original_line
	}

	pub fn original_column(&self) -> Option<u32> {
		self.original_column
	}

	pub fn compiled_line(&self) -> u32 {
		self.compiled_line
	}

	pub fn compiled_column(&self) -> u32 {
		self.compiled_column
	}

	pub fn has_mapping(&self) -> bool {
		self.has_mapping
	}

	pub fn snippet(&self) -> Option<&SourceSnippet> {
		self.snippet.as_ref()
	}

	/// Name of the source map document this frame was matched against.
	pub fn document(&self) -> Option<&str> {
		self.document.as_deref()
	}

	/// Line to display: original when mapped, compiled otherwise.
	pub fn display_line(&self) -> u32 {
		self.original_line.unwrap_or(self.compiled_line)
	}

	/// Column to display: original when mapped, compiled otherwise.
	pub fn display_column(&self) -> u32 {
		self.original_column.unwrap_or(self.compiled_column)
	}
}
