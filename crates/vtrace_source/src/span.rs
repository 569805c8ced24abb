//! Byte-offset ranges within report files.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// A byte offset range within a loaded file.
///
/// The line-oriented parsers attach the span of the offending line to every
/// diagnostic they emit. The `start` is inclusive and `end` is exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The file this span belongs to.
    pub file: FileId,
    /// Byte offset of the start of the span (inclusive).
    pub start: u32,
    /// Byte offset of the end of the span (exclusive).
    pub end: u32,
}

impl Span {
    /// A dummy span used when no source location is available.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// Creates a new span in the given file with the given byte range.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// Returns a sub-span starting `offset` bytes into this span and covering
    /// `len` bytes, clamped to this span's end.
    pub fn slice(self, offset: usize, len: usize) -> Span {
        let start = (self.start as usize + offset).min(self.end as usize) as u32;
        let end = (start as usize + len).min(self.end as usize) as u32;
        Span {
            file: self.file,
            start,
            end,
        }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if this span has zero length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if this is the dummy span.
    pub fn is_dummy(&self) -> bool {
        self.file == FileId::DUMMY
    }
}
