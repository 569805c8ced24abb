//! Report file management, span tracking, and line iteration for diagnostics.
//!
//! This crate provides the [`SourceDb`] for loading the toolchain reports,
//! [`FileId`] and [`Span`] types for tracking locations inside them, and
//! [`ResolvedSpan`] for converting byte offsets to line/column coordinates.
//! The line-oriented report parsers walk their input through [`lines`].

#![warn(missing_docs)]

pub mod error;
pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use error::LoadError;
pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::{lines, SourceFile};
pub use span::Span;
