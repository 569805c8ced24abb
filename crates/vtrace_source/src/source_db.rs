//! Central database of all report files in an analysis session.

use crate::error::LoadError;
use crate::file_id::FileId;
use crate::resolved_span::ResolvedSpan;
use crate::source_file::SourceFile;
use crate::span::Span;
use std::io;
use std::path::{Path, PathBuf};

/// The source database, owning all loaded report text and resolving
/// [`FileId`] + byte offsets to line/column coordinates for diagnostics.
#[derive(Default)]
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Loads a file from the filesystem and returns its [`FileId`].
    ///
    /// A missing file is reported as [`LoadError::NotFound`] so callers can
    /// skip that one input and keep going.
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Ok(self.add_source(path, content))
    }

    /// Adds a file from an in-memory string (useful for tests).
    ///
    /// The `name` parameter is used as the file path in diagnostics.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        let file = SourceFile::new(id, name.into(), content);
        self.files.push(file);
        id
    }

    /// Returns the [`SourceFile`] for the given [`FileId`].
    ///
    /// # Panics
    ///
    /// Panics if the `FileId` is invalid.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Returns the number of loaded files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file has been loaded.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolves a [`Span`] to human-readable line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (start_line, start_col) = file.line_col(span.start);
        let (end_line, end_col) = file.line_col(span.end.saturating_sub(1).max(span.start));
        ResolvedSpan {
            file_path: file.path.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Returns the text corresponding to a [`Span`].
    pub fn snippet(&self, span: Span) -> &str {
        let file = self.get_file(span.file);
        file.snippet(span.start, span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get() {
        let mut db = SourceDb::new();
        let id = db.add_source("top.place", "hello world".to_string());
        assert_eq!(db.get_file(id).content, "hello world");
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn resolve_span() {
        let mut db = SourceDb::new();
        let id = db.add_source("top.blif", "abc\ndef\nghi".to_string());
        let resolved = db.resolve_span(Span::new(id, 4, 7));
        assert_eq!(resolved.file_path, PathBuf::from("top.blif"));
        assert_eq!(resolved.start_line, 2);
        assert_eq!(resolved.start_col, 1);
        assert_eq!(resolved.end_line, 2);
        assert_eq!(resolved.end_col, 3);
    }

    #[test]
    fn snippet() {
        let mut db = SourceDb::new();
        let id = db.add_source("top.net", "hello world".to_string());
        assert_eq!(db.snippet(Span::new(id, 0, 5)), "hello");
    }

    #[test]
    fn load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.place");
        std::fs::write(&path, "Array size: 4 x 4 logic blocks\n").unwrap();

        let mut db = SourceDb::new();
        let id = db.load_file(&path).unwrap();
        assert!(db.get_file(id).content.starts_with("Array size"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let mut db = SourceDb::new();
        let err = db
            .load_file(Path::new("/nonexistent/dir/report_timing.setup.rpt"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(db.is_empty());
    }
}
