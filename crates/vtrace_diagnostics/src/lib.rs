//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Parsers and the fusion engine report problems with the analyzed reports as
//! structured [`Diagnostic`] messages. The thread-safe [`DiagnosticSink`]
//! accumulates them while the parse stages and fusion workers run in
//! parallel, and [`TerminalRenderer`] formats them for the user.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
