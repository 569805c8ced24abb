//! Timing report parsing.
//!
//! [`parse_report`] reads the textual path report written by the placer's
//! timing analyzer (`report_timing.setup.rpt`) into ordered [`Path`]s of
//! [`Point`]s, together with file-level [`ReportInfo`], [`ReportStats`] and
//! [`PathGroups`] keyed by startpoint.

#![warn(missing_docs)]

pub mod parser;
pub mod point;
pub mod rules;
pub mod stats;

pub use parser::{parse_report, ReportOptions, TimingReport};
pub use point::{NodeType, Path, PathType, Point, RoutingKind};
pub use rules::{HeaderField, HeaderMatch};
pub use stats::{PathGroup, PathGroups, ReportInfo, ReportStats};
