// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Selection of the source map document that describes a frame's file.
//!
//! Rules are tried in priority order and each rule scans every document in
//! upload order before the next rule is considered:
//!
//! 1. [`MatchRule::Exact`]: the normalized filename equals the document's
//!    compiled file name or one of its sources
//! 2. [`MatchRule::Contains`]: one normalized path contains the other
//! 3. [`MatchRule::TrailingSegment`]: the filename's last path segment
//!    occurs inside one of the document's sources
//!
//! Rule 3 can pick an unrelated map whose sources share a suffix with the
//! target; the first such document in upload order wins.

use retrace_core::SourceMapDocument;

use crate::normalize::PathRules;

/// Which rule selected a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
	Exact,
	Contains,
	TrailingSegment,
}

/// A document chosen for a frame.
#[derive(Debug, Clone, Copy)]
pub struct DocumentMatch<'a> {
	/// Position of the document in upload order.
	pub index: usize,
	pub document: &'a SourceMapDocument,
	pub rule: MatchRule,
}

/// Normalize a path for matching: no query or fragment, no relative prefix
/// or script alias, no trailing `.js`, lower case.
pub fn match_key(path: &str, rules: &PathRules) -> String {
	let path = path.split(['?', '#']).next().unwrap_or_default();
	let path = rules.strip_relative(path);
	let path = path.strip_suffix(".js").unwrap_or(path);
	path.to_lowercase()
}

/// Normalized names a document answers to.
struct DocumentKeys {
	/// `file`, or the artifact name without `.map` when `file` is absent.
	compiled: Option<String>,
	sources: Vec<String>,
}

impl DocumentKeys {
	fn new(document: &SourceMapDocument, rules: &PathRules) -> Self {
		let compiled = document
			.compiled_file()
			.or_else(|| document.name().strip_suffix(".map"))
			.map(|name| match_key(name, rules))
			.filter(|key| !key.is_empty());

		let sources = document
			.sources()
			.map(|source| match_key(source, rules))
			.filter(|key| !key.is_empty())
			.collect();

		Self { compiled, sources }
	}

	fn all(&self) -> impl Iterator<Item = &str> {
		self.compiled
			.as_deref()
			.into_iter()
			.chain(self.sources.iter().map(String::as_str))
	}
}

/// Pick the document relevant to `filename`, if any.
pub fn find_document<'a>(
	filename: &str,
	documents: &'a [SourceMapDocument],
	rules: &PathRules,
) -> Option<DocumentMatch<'a>> {
	let target = match_key(filename, rules);
	if target.is_empty() {
		return None;
	}

	let keys: Vec<DocumentKeys> = documents
		.iter()
		.map(|document| DocumentKeys::new(document, rules))
		.collect();

	let segment = target.rsplit('/').next().unwrap_or_default();

	[MatchRule::Exact, MatchRule::Contains, MatchRule::TrailingSegment]
		.into_iter()
		.find_map(|rule| {
			keys.iter()
				.position(|k| rule_matches(rule, k, &target, segment))
				.map(|index| DocumentMatch {
					index,
					document: &documents[index],
					rule,
				})
		})
}

fn rule_matches(rule: MatchRule, keys: &DocumentKeys, target: &str, segment: &str) -> bool {
	match rule {
		MatchRule::Exact => keys.all().any(|key| key == target),
		MatchRule::Contains => keys
			.all()
			.any(|key| key.contains(target) || target.contains(key)),
		MatchRule::TrailingSegment => {
			!segment.is_empty() && keys.sources.iter().any(|source| source.contains(segment))
		}
	}
}
