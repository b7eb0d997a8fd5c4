// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source map decoding and lookup.

use thiserror::Error;

/// Errors raised while decoding a source map or querying its index.
///
/// None of these abort a resolution: the pipeline downgrades every frame
/// that depends on a failing document to an unmapped frame.
#[derive(Debug, Error)]
pub enum SymbolicateError {
	#[error("Invalid source map: {0}")]
	InvalidSourceMapJson(#[from] serde_json::Error),

	#[error("Invalid source map version: expected 3, got {0}")]
	InvalidSourceMapVersion(u32),

	#[error("Invalid VLQ character: {0:?}")]
	InvalidVlqChar(char),

	#[error("VLQ value overflows 32 bits")]
	VlqOverflow,

	#[error("VLQ segment ends mid-value: {0}")]
	TruncatedVlq(String),

	#[error("Invalid mapping segment with {0} fields (expected 1, 4 or 5)")]
	InvalidSegmentLength(usize),

	#[error("Mapping {field} became negative on generated line {line}")]
	NegativeMappingValue { field: &'static str, line: u32 },

	#[error("Mapping {field} exceeds 32 bits on generated line {line}")]
	MappingValueOutOfRange { field: &'static str, line: u32 },

	#[error("Invalid source index: {0}")]
	InvalidSourceIndex(u32),
}

pub type Result<T> = std::result::Result<T, SymbolicateError>;
