// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for retrace stack trace symbolication.
//!
//! This crate provides the shared data model used by the resolution pipeline
//! (`retrace-symbolicate`) and the `retrace` binary:
//!
//! - [`StackFrame`]: one parsed call-stack entry from a minified error
//! - [`SourceMapDocument`]: an uploaded source map, loaded once and read-only
//! - [`ResolvedFrame`]: the original-source location computed for a frame
//! - [`InputError`]: errors that abort a resolution before any frame work

pub mod document;
pub mod error;
pub mod frame;

pub use document::SourceMapDocument;
pub use error::{DocumentError, InputError, USAGE_EXAMPLE};
pub use frame::{OriginalLocation, ResolvedFrame, SourceSnippet, StackFrame};
