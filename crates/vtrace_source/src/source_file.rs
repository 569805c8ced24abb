//! Loaded report files with line-start indexing, and the per-line iterator
//! shared by the line-oriented parsers.

use crate::file_id::FileId;
use crate::span::Span;
use std::path::PathBuf;

/// A report file loaded into the analysis session.
///
/// Stores the file's content along with precomputed line-start offsets for
/// efficient line/column resolution during diagnostic rendering.
pub struct SourceFile {
    /// The unique identifier for this file within the [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the number of lines in the file.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns a substring of the file content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }

    /// Iterates over the lines of this file with their spans.
    pub fn lines(&self) -> impl Iterator<Item = (Span, &str)> {
        lines(self.id, &self.content)
    }
}

/// Iterates over `content` line by line, yielding each line (without its
/// terminator and trailing whitespace) with the span it covers in `file`.
pub fn lines(file: FileId, content: &str) -> impl Iterator<Item = (Span, &str)> {
    let mut offset = 0usize;
    content.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = raw.trim_end();
        let span = Span::new(file, start as u32, (start + line.len()) as u32);
        (span, line)
    })
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new(
            FileId::from_raw(0),
            PathBuf::from("report_timing.setup.rpt"),
            content.to_string(),
        )
    }

    #[test]
    fn line_starts_computation() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_starts, vec![0, 4, 8]);
        assert_eq!(f.line_count(), 3);
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(4), (2, 1));
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn lines_carry_spans() {
        let f = make_file(".model top  \r\n.end\n");
        let collected: Vec<_> = f.lines().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].1, ".model top");
        assert_eq!(collected[0].0, Span::new(f.id, 0, 10));
        assert_eq!(collected[1].1, ".end");
        assert_eq!(f.snippet(collected[1].0.start, collected[1].0.end), ".end");
    }

    #[test]
    fn lines_without_trailing_newline() {
        let collected: Vec<_> = lines(FileId::from_raw(3), "a\nb").collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[1].0, Span::new(FileId::from_raw(3), 2, 3));
    }

    #[test]
    fn empty_file() {
        let f = make_file("");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.lines().count(), 0);
    }
}
