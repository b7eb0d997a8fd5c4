// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pluggable mapping decoders.
//!
//! The pipeline only needs two capabilities from a decoder: turn a document
//! into a queryable index once, then answer `(line, column)` queries against
//! it. [`VlqDecoder`] is the built-in implementation.

use retrace_core::SourceMapDocument;

use crate::error::Result;
use crate::sourcemap::{OriginalPosition, ParsedSourceMap};
use crate::vlq::LookupBias;

/// A decoded mapping table that answers generated-position queries.
pub trait MappingIndex {
	/// Query by generated line (1-indexed) and column (0-indexed).
	fn query(&self, line: u32, column: u32) -> Result<Option<OriginalPosition<'_>>>;
}

/// Decodes source map documents into a [`MappingIndex`].
pub trait SourceMapDecoder {
	type Index: MappingIndex;

	fn decode(&self, document: &SourceMapDocument) -> Result<Self::Index>;
}

impl MappingIndex for ParsedSourceMap {
	fn query(&self, line: u32, column: u32) -> Result<Option<OriginalPosition<'_>>> {
		self.lookup(line, column)
	}
}

/// Base64 VLQ decoder producing a [`ParsedSourceMap`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VlqDecoder {
	bias: LookupBias,
}

impl VlqDecoder {
	pub fn new(bias: LookupBias) -> Self {
		Self { bias }
	}
}

impl SourceMapDecoder for VlqDecoder {
	type Index = ParsedSourceMap;

	fn decode(&self, document: &SourceMapDocument) -> Result<ParsedSourceMap> {
		Ok(ParsedSourceMap::from_document(document)?.with_bias(self.bias))
	}
}
