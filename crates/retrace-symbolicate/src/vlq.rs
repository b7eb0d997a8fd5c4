// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! VLQ (Variable-Length Quantity) decoder for source map mappings.
//!
//! Source maps use Base64 VLQ encoding for compact storage of line/column mappings.
//! This module decodes the `mappings` field into a sorted, queryable table
//! following the source map v3 format.

use crate::error::{Result, SymbolicateError};

/// Continuation flag of a Base64 VLQ digit.
const VLQ_CONTINUATION: i64 = 0b100000;
/// Payload bits of a Base64 VLQ digit.
const VLQ_MASK: i64 = 0b011111;

/// Decode a Base64 character to its 6-bit value.
fn decode_char(ch: u8) -> Result<i64> {
	let value = match ch {
		b'A'..=b'Z' => ch - b'A',
		b'a'..=b'z' => ch - b'a' + 26,
		b'0'..=b'9' => ch - b'0' + 52,
		b'+' => 62,
		b'/' => 63,
		_ => return Err(SymbolicateError::InvalidVlqChar(ch as char)),
	};
	Ok(i64::from(value))
}

/// Decode a VLQ-encoded segment into its signed values.
///
/// A segment holds 1, 4 or 5 values: generated column, then optionally
/// source index, original line, original column and name index. All values
/// are deltas against the previous segment.
pub fn decode_vlq_segment(segment: &str) -> Result<Vec<i64>> {
	let mut values = Vec::with_capacity(5);
	let mut value = 0i64;
	let mut shift = 0u32;

	for ch in segment.bytes() {
		let digit = decode_char(ch)?;

		if shift > 30 {
			return Err(SymbolicateError::VlqOverflow);
		}
		value += (digit & VLQ_MASK) << shift;
		shift += 5;

		if digit & VLQ_CONTINUATION == 0 {
			// Lowest bit carries the sign.
			let negative = value & 1 != 0;
			value >>= 1;
			values.push(if negative { -value } else { value });
			value = 0;
			shift = 0;
		}
	}

	if shift != 0 {
		return Err(SymbolicateError::TruncatedVlq(segment.to_string()));
	}

	Ok(values)
}

/// Where a generated position points in the original sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalRef {
	/// Index into the sources array.
	pub source_index: u32,
	/// Line in the original file (0-indexed).
	pub original_line: u32,
	/// Column in the original file (0-indexed).
	pub original_column: u32,
	/// Optional index into the names array.
	pub name_index: Option<u32>,
}

/// A single segment of the decoded mappings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
	/// Line in the generated file (0-indexed).
	pub generated_line: u32,
	/// Column in the generated file (0-indexed).
	pub generated_column: u32,
	/// `None` for single-field segments that map to no source.
	pub original: Option<OriginalRef>,
}

/// How a column query selects a segment on the requested line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupBias {
	/// The closest segment starting at or before the column.
	#[default]
	GreatestLowerBound,
	/// Only a segment starting exactly at the column.
	Exact,
}

/// Decoded mappings sorted by generated line, then generated column.
#[derive(Debug, Clone, Default)]
pub struct DecodedMappings {
	mappings: Vec<Mapping>,
}

impl DecodedMappings {
	/// Build from segments in any order.
	pub fn from_unsorted(mut mappings: Vec<Mapping>) -> Self {
		mappings.sort_by_key(|m| (m.generated_line, m.generated_column));
		Self { mappings }
	}

	/// Find the segment for a generated line and column (both 0-indexed).
	pub fn find(&self, line: u32, column: u32, bias: LookupBias) -> Option<&Mapping> {
		let line_start = self
			.mappings
			.partition_point(|m| m.generated_line < line);
		let line_end = self
			.mappings
			.partition_point(|m| m.generated_line <= line);

		let line_mappings = &self.mappings[line_start..line_end];
		let idx = line_mappings.partition_point(|m| m.generated_column <= column);
		if idx == 0 {
			return None;
		}

		let found = &line_mappings[idx - 1];
		match bias {
			LookupBias::GreatestLowerBound => Some(found),
			LookupBias::Exact if found.generated_column == column => Some(found),
			LookupBias::Exact => None,
		}
	}

}

/// Running totals for the delta-encoded fields.
#[derive(Default)]
struct DeltaState {
	source: i64,
	original_line: i64,
	original_column: i64,
	name: i64,
}

/// Mapping fields are signed 32-bit in the format, so a running total is
/// accepted only within `0..=i32::MAX`.
fn non_negative(value: i64, field: &'static str, line: u32) -> Result<u32> {
	if value < 0 {
		return Err(SymbolicateError::NegativeMappingValue { field, line });
	}
	if value > i64::from(i32::MAX) {
		return Err(SymbolicateError::MappingValueOutOfRange { field, line });
	}
	Ok(value as u32)
}

/// Decode a VLQ `mappings` string into structured form.
///
/// Lines are separated by `;`, segments within a line by `,`. The generated
/// column resets on every line; every other field carries over.
pub fn decode_vlq_mappings(mappings: &str) -> Result<DecodedMappings> {
	let mut decoded = Vec::new();
	let mut state = DeltaState::default();

	for (generated_line, line) in (0u32..).zip(mappings.split(';')) {
		let mut generated_column = 0i64;

		for segment in line.split(',').filter(|s| !s.is_empty()) {
			let values = decode_vlq_segment(segment)?;

			generated_column += values[0];
			let column = non_negative(generated_column, "generated column", generated_line)?;

			let original = match values.len() {
				1 => None,
				4 | 5 => {
					state.source += values[1];
					state.original_line += values[2];
					state.original_column += values[3];

					// Out-of-range names only lose the name, not the position.
					let name_index = if values.len() == 5 {
						state.name += values[4];
						u32::try_from(state.name).ok()
					} else {
						None
					};

					Some(OriginalRef {
						source_index: non_negative(state.source, "source index", generated_line)?,
						original_line: non_negative(state.original_line, "original line", generated_line)?,
						original_column: non_negative(
							state.original_column,
							"original column",
							generated_line,
						)?,
						name_index,
					})
				}
				other => return Err(SymbolicateError::InvalidSegmentLength(other)),
			};

			decoded.push(Mapping {
				generated_line,
				generated_column: column,
				original,
			});
		}
	}

	Ok(DecodedMappings::from_unsorted(decoded))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_decode_vlq_segment_simple() {
		assert_eq!(decode_vlq_segment("A").unwrap(), vec![0]);
		assert_eq!(decode_vlq_segment("C").unwrap(), vec![1]);
		assert_eq!(decode_vlq_segment("D").unwrap(), vec![-1]);
	}

	#[test]
	fn test_decode_vlq_segment_continuation() {
		// 'g' = 32 | 0 (continuation), 'B' = 1 -> 1 << 5 = 32 -> 16 after sign bit
		assert_eq!(decode_vlq_segment("gB").unwrap(), vec![16]);
		// 100 encodes as "oG"
		assert_eq!(decode_vlq_segment("oG").unwrap(), vec![100]);
	}

	#[test]
	fn test_truncated_segment_is_rejected() {
		assert!(matches!(
			decode_vlq_segment("g"),
			Err(SymbolicateError::TruncatedVlq(_))
		));
	}

	#[test]
	fn test_overlong_segment_overflows() {
		assert!(matches!(
			decode_vlq_segment("gggggggB"),
			Err(SymbolicateError::VlqOverflow)
		));
	}

	#[test]
	fn test_invalid_vlq_char() {
		assert!(matches!(
			decode_vlq_segment("!"),
			Err(SymbolicateError::InvalidVlqChar('!'))
		));
	}

	#[test]
	fn test_decode_mappings_multi_line() {
		let result = decode_vlq_mappings("AAAA;AACA").unwrap();
		assert_eq!(result.mappings.len(), 2);

		let second = result.find(1, 0, LookupBias::GreatestLowerBound).unwrap();
		assert_eq!(second.generated_line, 1);
		// Original line is relative, so 0 + 1 = 1
		assert_eq!(second.original.unwrap().original_line, 1);
	}

	#[test]
	fn test_single_field_segment_has_no_source() {
		// "AAAA,EAAE" would carry a source; "K" is a bare column-5 segment.
		let result = decode_vlq_mappings("AAAA,K").unwrap();
		assert_eq!(result.mappings.len(), 2);

		let bare = result.find(0, 7, LookupBias::GreatestLowerBound).unwrap();
		assert_eq!(bare.generated_column, 5);
		assert!(bare.original.is_none());
	}

	#[test]
	fn test_empty_lines_advance_generated_line() {
		let result = decode_vlq_mappings(";;AAAA").unwrap();
		let only = &result.mappings[0];
		assert_eq!(only.generated_line, 2);
	}

	#[test]
	fn test_two_field_segment_is_rejected() {
		assert!(matches!(
			decode_vlq_mappings("AA"),
			Err(SymbolicateError::InvalidSegmentLength(2))
		));
	}

	#[test]
	fn test_negative_column_is_rejected() {
		assert!(matches!(
			decode_vlq_mappings("D"),
			Err(SymbolicateError::NegativeMappingValue { .. })
		));
	}

	#[test]
	fn test_huge_original_values_are_rejected() {
		// Original line, then original column, decode to u32::MAX.
		for mappings in ["AA+/////HA;AAAA", "AAA+/////H"] {
			assert!(matches!(
				decode_vlq_mappings(mappings),
				Err(SymbolicateError::MappingValueOutOfRange { .. })
			));
		}
	}

	#[test]
	fn test_largest_signed_value_is_accepted() {
		// 2^31 - 1 as the original line.
		let result = decode_vlq_mappings("AA+/////DA").unwrap();
		let found = result.find(0, 0, LookupBias::Exact).unwrap();
		assert_eq!(found.original.unwrap().original_line, i32::MAX as u32);
	}

	fn sample_line() -> DecodedMappings {
		let at = |column, original_line| Mapping {
			generated_line: 0,
			generated_column: column,
			original: Some(OriginalRef {
				source_index: 0,
				original_line,
				original_column: 0,
				name_index: None,
			}),
		};
		DecodedMappings::from_unsorted(vec![at(20, 2), at(0, 0), at(10, 1)])
	}

	#[test]
	fn test_find_greatest_lower_bound() {
		let mappings = sample_line();

		let found = mappings.find(0, 5, LookupBias::GreatestLowerBound).unwrap();
		assert_eq!(found.generated_column, 0);

		let found = mappings.find(0, 15, LookupBias::GreatestLowerBound).unwrap();
		assert_eq!(found.generated_column, 10);

		let found = mappings.find(0, 25, LookupBias::GreatestLowerBound).unwrap();
		assert_eq!(found.generated_column, 20);

		assert!(mappings.find(1, 0, LookupBias::GreatestLowerBound).is_none());
	}

	#[test]
	fn test_find_exact() {
		let mappings = sample_line();

		assert!(mappings.find(0, 5, LookupBias::Exact).is_none());
		assert_eq!(
			mappings.find(0, 10, LookupBias::Exact).unwrap().generated_column,
			10
		);
	}

	proptest! {
		#[test]
		fn decoding_never_panics(input in "[A-Za-z0-9+/;,]{0,64}") {
			let _ = decode_vlq_mappings(&input);
		}

		#[test]
		fn decoded_mappings_are_sorted(input in "([A-Za-f]{1}|[A-Za-f]{4}){1,4}(;([A-Za-f]{1}|[A-Za-f]{4}){0,4}){0,4}") {
			if let Ok(decoded) = decode_vlq_mappings(&input) {
				let keys: Vec<_> = decoded.mappings.iter().map(|m| (m.generated_line, m.generated_column)).collect();
				let mut sorted = keys.clone();
				sorted.sort();
				prop_assert_eq!(keys, sorted);
			}
		}
	}
}
