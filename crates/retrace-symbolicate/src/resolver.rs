// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Original-position lookup with a column fallback search.
//!
//! Minifiers frequently emit a single segment per generated line, so a
//! query at the exact reported column often finds nothing useful. The
//! resolver therefore probes a short list of nearby columns, closest first,
//! and finally column 0.

use retrace_core::OriginalLocation;
use tracing::{debug, trace};

use crate::decoder::MappingIndex;
use crate::error::Result;
use crate::sourcemap::OriginalPosition;

/// Columns probed after the requested one, relative to it.
const NEARBY_OFFSETS: [i64; 4] = [-1, -2, 1, 2];

/// Candidate 0-indexed columns for a 1-indexed compiled column.
///
/// Order: the column itself, column 0, then one and two columns either side,
/// deduplicated and stably sorted by distance from the requested column.
pub fn candidate_columns(column: u32) -> Vec<u32> {
	let col0 = column.saturating_sub(1);

	let mut candidates = vec![col0];
	if col0 > 0 {
		candidates.push(0);
	}
	for offset in NEARBY_OFFSETS {
		if let Ok(candidate) = u32::try_from(i64::from(col0) + offset) {
			candidates.push(candidate);
		}
	}

	let mut unique = Vec::with_capacity(candidates.len());
	for candidate in candidates {
		if !unique.contains(&candidate) {
			unique.push(candidate);
		}
	}
	unique.sort_by_key(|candidate: &u32| candidate.abs_diff(col0));
	unique
}

/// A successful lookup, with the original column converted to 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPosition<'a> {
	pub location: OriginalLocation,
	/// Generated column (0-indexed) that produced the hit.
	pub matched_column: u32,
	pub source_content: Option<&'a str>,
}

/// Resolve a compiled position (line and column both 1-indexed).
///
/// A failing query counts as a miss for that candidate only. Returns
/// `Ok(None)` when no candidate maps to a source, or the first query error
/// when nothing maps and some query failed.
pub fn resolve_position<I: MappingIndex>(
	index: &I,
	line: u32,
	column: u32,
) -> Result<Option<ResolvedPosition<'_>>> {
	let mut first_error = None;

	// Last resort: the start of the line.
	let candidates = candidate_columns(column).into_iter().chain([0]);
	for candidate in candidates {
		match index.query(line, candidate) {
			Ok(position) => {
				if let Some(position) = accept(position) {
					trace!(line, column, candidate, "Column candidate hit");
					return Ok(Some(resolved(position, candidate)));
				}
			}
			Err(e) => {
				debug!(line, candidate, error = %e, "Column candidate query failed");
				first_error.get_or_insert(e);
			}
		}
	}

	match first_error {
		Some(e) => Err(e),
		None => Ok(None),
	}
}

fn accept(position: Option<OriginalPosition<'_>>) -> Option<OriginalPosition<'_>> {
	position.filter(|p| !p.source.is_empty())
}

fn resolved(position: OriginalPosition<'_>, matched_column: u32) -> ResolvedPosition<'_> {
	ResolvedPosition {
		location: OriginalLocation {
			source: position.source.to_string(),
			line: position.line,
			column: position.column.saturating_add(1),
			name: position.name.map(str::to_string),
		},
		matched_column,
		source_content: position.source_content,
	}
}
