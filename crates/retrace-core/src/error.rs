// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types shared across retrace crates.

use thiserror::Error;

/// Example invocation included in input error messages.
pub const USAGE_EXAMPLE: &str = "retrace --map dist/main.js.map --stack error.txt";

/// Longest excerpt of unparseable input echoed back in an error message.
const EXCERPT_CHARS: usize = 200;

/// Errors that abort a whole resolution before any frame is processed.
#[derive(Debug, Error)]
pub enum InputError {
	#[error("no source maps supplied; pass at least one, e.g. `{}`", USAGE_EXAMPLE)]
	NoDocuments,

	#[error(
		"error text is empty; supply a stack trace such as \"at render (main.js:1:2048)\", e.g. `{}`",
		USAGE_EXAMPLE
	)]
	EmptyInput,

	#[error(
		"no stack frames recognized in input {:?}; expected lines like \"at render (main.js:1:2048)\" or JSON like [{{\"filename\":\"main.js\",\"lineno\":1,\"colno\":2048}}]",
		excerpt(.text)
	)]
	UnparseableStack { text: String },
}

impl InputError {
	/// Create an unparseable stack error carrying the offending text.
	pub fn unparseable(text: impl Into<String>) -> Self {
		Self::UnparseableStack { text: text.into() }
	}
}

/// Errors raised while loading a source map document from raw bytes.
#[derive(Debug, Error)]
pub enum DocumentError {
	#[error("invalid source map JSON in {name}: {source}")]
	InvalidJson {
		name: String,
		#[source]
		source: serde_json::Error,
	},
}

fn excerpt(text: &str) -> String {
	let trimmed = text.trim();
	if trimmed.chars().count() <= EXCERPT_CHARS {
		return trimmed.to_string();
	}
	let mut cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
	cut.push('…');
	cut
}
