// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack trace parsing.
//!
//! Raw error text is read in one of two dialects, tried in order:
//!
//! - **JSON**: an array of frame objects, a single frame object, or an
//!   envelope carrying `frames` / `stacktrace.frames`
//! - **Text**: V8 (`at fn (file:line:col)`), Firefox/Safari
//!   (`fn@file:line:col`) and bare `file:line:col` lines

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use retrace_core::{InputError, StackFrame};

/// Column assumed for JSON frames that omit one.
pub const JSON_DEFAULT_COLUMN: u32 = 1;
/// Column assumed for text lines that only carry a line number.
pub const TEXT_DEFAULT_COLUMN: u32 = 0;

const FILENAME_KEYS: &[&str] = &["filename", "source"];
const LINE_KEYS: &[&str] = &["lineno", "line"];
const COLUMN_KEYS: &[&str] = &["colno", "column"];
const FUNCTION_KEYS: &[&str] = &["function", "functionName"];

/// Text frame patterns, most specific first. Each has `file` and `line`
/// groups, optionally `func` and `col`.
static FRAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	[
		r"^at\s+(?P<func>.+?)\s+\((?P<file>.+):(?P<line>\d+):(?P<col>\d+)\)$",
		r"^at\s+(?P<file>.+):(?P<line>\d+):(?P<col>\d+)$",
		r"^(?P<func>[^@\s]*)@(?P<file>.+):(?P<line>\d+):(?P<col>\d+)$",
		r"^(?P<file>\S+):(?P<line>\d+):(?P<col>\d+)$",
		r"^at\s+(?P<func>.+?)\s+\((?P<file>.+):(?P<line>\d+)\)$",
		r"^at\s+(?P<file>.+):(?P<line>\d+)$",
		r"^(?P<func>[^@\s]*)@(?P<file>.+):(?P<line>\d+)$",
		r"^(?P<file>\S+):(?P<line>\d+)$",
	]
	.iter()
	.map(|pattern| Regex::new(pattern).unwrap())
	.collect()
});

/// Input format a stack trace was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDialect {
	Json,
	Text,
}

/// Frames recognized in a raw stack trace, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStack {
	pub dialect: StackDialect,
	pub frames: Vec<StackFrame>,
}

/// Parse raw error text into frames.
///
/// Fails with [`InputError::EmptyInput`] for blank text and with
/// [`InputError::UnparseableStack`] when neither dialect yields a frame.
pub fn parse_stack(text: &str) -> Result<ParsedStack, InputError> {
	if text.trim().is_empty() {
		return Err(InputError::EmptyInput);
	}

	if let Some(frames) = parse_json_frames(text).filter(|frames| !frames.is_empty()) {
		debug!(frame_count = frames.len(), "Parsed JSON stack");
		return Ok(ParsedStack {
			dialect: StackDialect::Json,
			frames,
		});
	}

	let frames = parse_text_frames(text);
	if frames.is_empty() {
		return Err(InputError::unparseable(text));
	}

	debug!(frame_count = frames.len(), "Parsed text stack");
	Ok(ParsedStack {
		dialect: StackDialect::Text,
		frames,
	})
}

/// Read the JSON dialect.
///
/// Returns `None` when the text is not JSON, or is a single object that is
/// not a well-formed frame, so the caller falls back to the text dialect.
/// Malformed entries of an array are dropped.
pub fn parse_json_frames(text: &str) -> Option<Vec<StackFrame>> {
	let value: Value = serde_json::from_str(text.trim()).ok()?;

	match value {
		Value::Array(entries) => Some(frames_from_entries(&entries)),
		Value::Object(object) => {
			if let Some(entries) = envelope_frames(&object) {
				return Some(frames_from_entries(entries));
			}
			frame_from_object(&object).map(|frame| vec![frame])
		}
		_ => None,
	}
}

/// Frames nested in a crash-report envelope.
fn envelope_frames(object: &Map<String, Value>) -> Option<&Vec<Value>> {
	object
		.get("frames")
		.or_else(|| object.get("stacktrace").and_then(|s| s.get("frames")))
		.and_then(Value::as_array)
}

fn frames_from_entries(entries: &[Value]) -> Vec<StackFrame> {
	entries
		.iter()
		.filter_map(Value::as_object)
		.filter_map(frame_from_object)
		.collect()
}

fn frame_from_object(object: &Map<String, Value>) -> Option<StackFrame> {
	let filename = first_string(object, FILENAME_KEYS)?;
	let line = first_number(object, LINE_KEYS)?;
	let column = first_number(object, COLUMN_KEYS).unwrap_or(JSON_DEFAULT_COLUMN);
	let function = first_string(object, FUNCTION_KEYS);

	StackFrame::new(filename, function, line, column)
}

/// First non-blank string among `keys`.
fn first_string(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
	keys.iter()
		.filter_map(|key| object.get(*key))
		.filter_map(Value::as_str)
		.find(|s| !s.trim().is_empty())
		.map(str::to_string)
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn first_number(object: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
	keys.iter()
		.filter_map(|key| object.get(*key))
		.find_map(|value| match value {
			Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
			Value::String(s) => s.trim().parse().ok(),
			_ => None,
		})
}

/// Read the text dialect; lines matching no pattern are skipped.
pub fn parse_text_frames(text: &str) -> Vec<StackFrame> {
	text.lines().filter_map(parse_frame_line).collect()
}

/// Parse a single stack line with the first matching pattern.
pub fn parse_frame_line(line: &str) -> Option<StackFrame> {
	let line = line.trim();
	if line.is_empty() {
		return None;
	}

	let caps = FRAME_PATTERNS.iter().find_map(|re| re.captures(line))?;

	let file = caps.name("file")?.as_str();
	let line_no = saturating_number(caps.name("line")?.as_str());
	let column = caps
		.name("col")
		.map_or(TEXT_DEFAULT_COLUMN, |col| saturating_number(col.as_str()));
	let function = caps.name("func").map(|f| f.as_str().to_string());

	StackFrame::new(file, function, line_no, column)
}

/// Digit runs too long for `u32` clamp to `u32::MAX`.
fn saturating_number(digits: &str) -> u32 {
	digits.parse().unwrap_or(u32::MAX)
}
