// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-invocation memoization of decoded source maps.

use std::collections::HashMap;

use tracing::{debug, warn};

use retrace_core::SourceMapDocument;

use crate::decoder::SourceMapDecoder;

/// Decoded indexes keyed by document content digest.
///
/// Owned by a single resolution so that separate calls never share state.
/// Failed decodes are remembered too: a malformed document is decoded (and
/// reported) once, and every later frame that needs it is treated as a miss.
pub struct DecodeCache<'d, D: SourceMapDecoder> {
	decoder: &'d D,
	entries: HashMap<String, Option<D::Index>>,
	decodes: usize,
}

impl<'d, D: SourceMapDecoder> DecodeCache<'d, D> {
	pub fn new(decoder: &'d D) -> Self {
		Self {
			decoder,
			entries: HashMap::new(),
			decodes: 0,
		}
	}

	/// Decoded index for `document`, decoding on first access.
	pub fn get(&mut self, document: &SourceMapDocument) -> Option<&D::Index> {
		let decoder = self.decoder;
		let decodes = &mut self.decodes;

		self.entries
			.entry(document.digest().to_string())
			.or_insert_with(|| {
				*decodes += 1;
				match decoder.decode(document) {
					Ok(index) => {
						debug!(document = %document.name(), "Decoded source map");
						Some(index)
					}
					Err(e) => {
						warn!(error = %e, document = %document.name(), "Failed to decode source map");
						None
					}
				}
			})
			.as_ref()
	}

	/// Number of decode attempts made so far.
	pub fn decode_count(&self) -> usize {
		self.decodes
	}
}
