// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map symbolication pipeline for minified JavaScript stack traces.
//!
//! This crate provides functionality for:
//! - Parsing stack traces (V8, Firefox/Safari, bare and JSON frame lists)
//! - Choosing the relevant source map among many uploaded ones
//! - Decoding source map v3 mappings and resolving original positions,
//!   with a column fallback search for sparse minifier output
//! - Normalizing resolved paths for display
//!
//! # Example
//!
//! ```
//! use retrace_core::SourceMapDocument;
//! use retrace_symbolicate::resolve_stack;
//!
//! let source_map_json = r#"{
//!     "version": 3,
//!     "file": "bundle.js",
//!     "sources": ["src/app.ts"],
//!     "names": [],
//!     "mappings": "AASI"
//! }"#;
//! let document = SourceMapDocument::from_slice("bundle.js.map", source_map_json.as_bytes()).unwrap();
//!
//! let frames = resolve_stack(&[document], "at render (bundle.js:1:50)").unwrap();
//!
//! assert!(frames[0].has_mapping());
//! assert_eq!(frames[0].source(), "src/app.ts");
//! assert_eq!(frames[0].original_line(), Some(10));
//! assert_eq!(frames[0].original_column(), Some(5));
//! ```

pub mod cache;
pub mod decoder;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod processor;
pub mod resolver;
pub mod sourcemap;
pub mod vlq;

// Re-export main types
pub use cache::DecodeCache;
pub use decoder::{MappingIndex, SourceMapDecoder, VlqDecoder};
pub use error::{Result, SymbolicateError};
pub use matcher::{find_document, match_key, DocumentMatch, MatchRule};
pub use normalize::{normalize_display_path, PathRules};
pub use parser::{parse_stack, ParsedStack, StackDialect};
pub use processor::{resolve_stack, ResolveOptions, StackResolver, DEFAULT_CONTEXT_LINES};
pub use resolver::{candidate_columns, resolve_position, ResolvedPosition};
pub use sourcemap::{extract_context, OriginalPosition, ParsedSourceMap};
pub use vlq::{decode_vlq_mappings, decode_vlq_segment, DecodedMappings, LookupBias, Mapping};
