// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Uploaded source map documents.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::DocumentError;

/// A source map as handed over by the caller: an artifact name plus its
/// parsed JSON content.
///
/// Documents are read-only once loaded. Schema validation and mapping
/// decoding happen later, on first use by the resolver, so a malformed
/// document only affects the frames that depend on it.
#[derive(Debug, Clone)]
pub struct SourceMapDocument {
	name: String,
	content: Value,
	/// SHA256 of the canonical JSON content, for deduplication.
	digest: String,
}

impl SourceMapDocument {
	pub fn new(name: impl Into<String>, content: Value) -> Self {
		let mut hasher = Sha256::new();
		// Value maps are ordered, so the serialization is canonical.
		hasher.update(serde_json::to_vec(&content).unwrap_or_default());

		Self {
			name: name.into(),
			content,
			digest: hex::encode(hasher.finalize()),
		}
	}

	/// Parse a document from raw JSON bytes.
	pub fn from_slice(name: impl Into<String>, data: &[u8]) -> Result<Self, DocumentError> {
		let name = name.into();
		match serde_json::from_slice(data) {
			Ok(content) => Ok(Self::new(name, content)),
			Err(source) => Err(DocumentError::InvalidJson { name, source }),
		}
	}

	/// Artifact identifier, e.g. `main.3f2a.js.map`.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn content(&self) -> &Value {
		&self.content
	}

	pub fn digest(&self) -> &str {
		&self.digest
	}

	/// The `file` field: name of the compiled artifact this map describes.
	pub fn compiled_file(&self) -> Option<&str> {
		self.content.get("file").and_then(Value::as_str)
	}

	/// Declared `sources` entries in order; non-string entries are skipped.
	pub fn sources(&self) -> impl Iterator<Item = &str> {
		self.content
			.get("sources")
			.and_then(Value::as_array)
			.into_iter()
			.flatten()
			.filter_map(Value::as_str)
	}
}
