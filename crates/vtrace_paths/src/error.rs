//! Errors of path fusion.

use vtrace_diagnostics::{Category, Diagnostic, DiagnosticCode};
use vtrace_source::Span;

/// Why a path could not be enriched.
///
/// A failure only affects the path it names; the rest of a batch is still
/// processed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FusionError {
    /// A point whose object is not inside any placed physical block.
    #[error("path {path_id}: point `{point}` is not in any placed block")]
    UnresolvedPoint {
        /// `#Path` id of the failing path.
        path_id: u32,
        /// The point name that could not be resolved.
        point: String,
    },
}

impl FusionError {
    /// Returns the id of the path that failed.
    pub fn path_id(&self) -> u32 {
        match self {
            FusionError::UnresolvedPoint { path_id, .. } => *path_id,
        }
    }

    /// Converts the error into a diagnostic for the terminal renderer.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            FusionError::UnresolvedPoint { .. } => Diagnostic::error(
                DiagnosticCode::new(Category::Fusion, 1),
                self.to_string(),
                Span::DUMMY,
            )
            .with_help("check that the packed netlist and placement belong to this report"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_path_and_point() {
        let err = FusionError::UnresolvedPoint {
            path_id: 7,
            point: "n3.out[0]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "path 7: point `n3.out[0]` is not in any placed block"
        );
        assert_eq!(err.path_id(), 7);
    }

    #[test]
    fn diagnostic_is_a_fusion_error() {
        let err = FusionError::UnresolvedPoint {
            path_id: 1,
            point: "x".to_string(),
        };
        let diag = err.to_diagnostic();
        assert!(diag.severity.is_error());
        assert_eq!(diag.code.to_string(), "F001");
        assert_eq!(diag.help.len(), 1);
    }
}
