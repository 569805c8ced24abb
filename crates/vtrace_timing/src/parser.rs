//! Timing report parser.
//!
//! The report is scanned once, line by line. Header lines fill the fields of
//! the path being read; a `slack` line closes it. Between the startpoint line
//! and the endpoint line of the body, every point line becomes a [`Point`].
//! Net lines are not kept: their delay is carried into the next point line,
//! whose increment is raised to the carried delay when it is smaller.

use crate::point::{NodeType, Path, PathType, Point};
use crate::rules::{match_end, match_header, match_net, match_point, HeaderField, PointMatch};
use crate::stats::{PathGroups, ReportInfo, ReportStats};
use serde::Serialize;
use std::mem;
use std::ops::ControlFlow;
use vtrace_common::GridCoord;
use vtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use vtrace_source::{FileId, Span};

/// A numeric field that does not parse.
const INVALID_NUMBER: u16 = 1;
/// A report without a single complete path.
const NO_PATHS: u16 = 2;
/// A path closed by `slack` without the fields or points it needs.
const INCOMPLETE_PATH: u16 = 3;

/// Caller controls for [`parse_report`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    /// Stop after the path whose id reaches this value.
    pub max_paths: Option<u32>,
    /// Decimal places used for carried delays when the report header has no
    /// `# Output precision:` line.
    pub default_precision: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_paths: None,
            default_precision: 3,
        }
    }
}

/// A parsed timing report.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TimingReport {
    /// File header values.
    pub info: ReportInfo,
    /// Complete paths in report order.
    pub paths: Vec<Path>,
    /// Paths grouped by startpoint.
    pub groups: PathGroups,
    /// Arrival time statistics.
    pub stats: ReportStats,
}

impl TimingReport {
    /// Returns the path with the given `#Path` id.
    pub fn path(&self, id: u32) -> Option<&Path> {
        self.paths.iter().find(|p| p.id == id)
    }

    /// Returns the number of paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if the report holds no path.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Parses a timing report.
///
/// Paths missing their id, startpoint or endpoint, with fewer than two
/// points, or whose body does not run from the declared startpoint to the
/// declared endpoint are reported and left out. Unparsable numbers are
/// reported and the field or point is skipped.
pub fn parse_report(
    source: &str,
    file: FileId,
    options: &ReportOptions,
    sink: &DiagnosticSink,
) -> TimingReport {
    let mut parser = ReportParser {
        sink,
        options,
        info: ReportInfo::default(),
        paths: Vec::new(),
        pending: PendingPath::default(),
        in_body: false,
        carry: 0.0,
    };
    for (span, line) in vtrace_source::lines(file, source) {
        if parser.line(span, line).is_break() {
            break;
        }
    }

    if parser.paths.is_empty() {
        sink.emit(Diagnostic::warning(
            DiagnosticCode::new(Category::Timing, NO_PATHS),
            "timing report contains no complete path",
            Span::new(file, 0, 0),
        ));
    }

    let groups = PathGroups::from_paths(&parser.paths);
    let stats = ReportStats::compute(&parser.paths);
    TimingReport {
        info: parser.info,
        paths: parser.paths,
        groups,
        stats,
    }
}

/// The path being read; every field is optional until `slack` closes it.
#[derive(Debug, Default)]
struct PendingPath {
    id: Option<u32>,
    startpoint: Option<String>,
    endpoint: Option<String>,
    path_type: Option<PathType>,
    arrival_time: Option<f64>,
    required_time: Option<f64>,
    constraint: Option<String>,
    slack_time: Option<f64>,
    points: Vec<Point>,
}

impl PendingPath {
    fn into_path(self) -> Result<Path, String> {
        let id = self.id.ok_or("no `#Path` line")?;
        let startpoint = self.startpoint.ok_or("no `Startpoint:` line")?;
        let endpoint = self.endpoint.ok_or("no `Endpoint :` line")?;
        if self.points.len() < 2 {
            return Err(format!("{} point(s), at least 2 expected", self.points.len()));
        }
        if self.points[0].name != startpoint {
            return Err(format!("first point is not the startpoint `{startpoint}`"));
        }
        if self.points[self.points.len() - 1].name != endpoint {
            return Err(format!("last point is not the endpoint `{endpoint}`"));
        }
        Ok(Path {
            id,
            startpoint,
            endpoint,
            path_type: self.path_type,
            arrival_time: self.arrival_time,
            required_time: self.required_time,
            constraint: self.constraint,
            slack_time: self.slack_time,
            points: self.points,
        })
    }
}

struct ReportParser<'s> {
    sink: &'s DiagnosticSink,
    options: &'s ReportOptions,
    info: ReportInfo,
    paths: Vec<Path>,
    pending: PendingPath,
    /// Set between the startpoint and endpoint lines of the body.
    in_body: bool,
    /// Net delay accumulated since the last point line.
    carry: f64,
}

impl ReportParser<'_> {
    fn precision(&self) -> u32 {
        self.info.precision.unwrap_or(self.options.default_precision)
    }

    fn line(&mut self, span: Span, line: &str) -> ControlFlow<()> {
        if let Some(header) = match_header(line) {
            return self.header(span, line, header.field, header.value, header.constraint);
        }

        let (Some(start), Some(end)) = (&self.pending.startpoint, &self.pending.endpoint) else {
            return ControlFlow::Continue(());
        };
        let point = match_point(line);
        let opens_body = point.as_ref().is_some_and(|m| m.name == start.as_str());
        let closes_body = match_end(line).is_some_and(|name| name == end.as_str());

        if opens_body && !self.in_body {
            self.in_body = true;
        }
        if let Some(m) = point {
            if self.in_body {
                if let Some(point) = self.point(span, line, &m) {
                    self.pending.points.push(point);
                }
            }
            self.carry = 0.0;
        } else if let Some(incr) = match_net(line) {
            if let Some(incr) = self.number(span, line, incr, "net delay") {
                self.carry += incr;
            }
        }
        if closes_body && self.in_body {
            self.in_body = false;
        }
        ControlFlow::Continue(())
    }

    fn header(
        &mut self,
        span: Span,
        line: &str,
        field: HeaderField,
        value: &str,
        constraint: Option<&str>,
    ) -> ControlFlow<()> {
        match field {
            HeaderField::UnitScale => {
                self.info.unit_scale = self.number(span, line, value, "unit scale");
            }
            HeaderField::Precision => match value.parse() {
                Ok(precision) => self.info.precision = Some(precision),
                Err(_) => self.invalid(span, line, value, "output precision"),
            },
            HeaderField::PathId if self.pending.id.is_none() => match value.parse() {
                Ok(id) => self.pending.id = Some(id),
                Err(_) => self.invalid(span, line, value, "path id"),
            },
            HeaderField::Startpoint if self.pending.startpoint.is_none() => {
                self.pending.startpoint = Some(value.to_string());
            }
            HeaderField::Endpoint if self.pending.endpoint.is_none() => {
                self.pending.endpoint = Some(value.to_string());
            }
            HeaderField::PathType if self.pending.path_type.is_none() => {
                self.pending.path_type = Some(PathType::from_name(value));
            }
            HeaderField::ArrivalTime if self.pending.arrival_time.is_none() => {
                self.pending.arrival_time = self.number(span, line, value, "arrival time");
            }
            HeaderField::RequiredTime if self.pending.required_time.is_none() => {
                self.pending.required_time = self.number(span, line, value, "required time");
            }
            HeaderField::Slack => {
                if self.pending.slack_time.is_none() {
                    self.pending.slack_time = self.number(span, line, value, "slack");
                    self.pending.constraint = constraint.map(str::to_string);
                }
                return self.finish_path(span);
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn finish_path(&mut self, span: Span) -> ControlFlow<()> {
        let pending = mem::take(&mut self.pending);
        self.in_body = false;
        let id = pending.id;

        match pending.into_path() {
            Ok(path) => self.paths.push(path),
            Err(reason) => {
                let name = id.map_or_else(|| "unnumbered path".to_string(), |id| format!("path {id}"));
                self.sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Timing, INCOMPLETE_PATH),
                        format!("incomplete {name} is skipped"),
                        span,
                    )
                    .with_note(reason),
                );
            }
        }

        match (self.options.max_paths, id) {
            (Some(max), Some(id)) if id >= max => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }

    fn point(&self, span: Span, line: &str, m: &PointMatch<'_>) -> Option<Point> {
        let mut t_incr = self.number(span, line, m.incr, "incremental delay")?;
        let t_sum = self.number(span, line, m.sum, "path delay")?;
        if t_incr < self.carry {
            let rounded = format!("{:.*}", self.precision() as usize, self.carry);
            t_incr = rounded.parse().unwrap_or(self.carry);
        }
        let coord = match m.coord {
            Some((x, y)) => match (x.parse(), y.parse()) {
                (Ok(x), Ok(y)) => Some(GridCoord::new(x, y)),
                _ => {
                    self.invalid(span, line, x, "grid coordinate");
                    None
                }
            },
            None => None,
        };
        Some(Point {
            name: m.name.to_string(),
            node_type: NodeType::from_tag(m.node_type),
            t_incr,
            t_sum,
            edge_clock: m.edge_clock.map(str::to_string),
            coord,
        })
    }

    fn number(&self, span: Span, line: &str, text: &str, what: &str) -> Option<f64> {
        match text.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.invalid(span, line, text, what);
                None
            }
        }
    }

    fn invalid(&self, span: Span, line: &str, text: &str, what: &str) {
        let at = match line.find(text) {
            Some(offset) => span.slice(offset, text.len()),
            None => span,
        };
        self.sink.emit(
            Diagnostic::warning(
                DiagnosticCode::new(Category::Timing, INVALID_NUMBER),
                format!("invalid {what} `{text}`"),
                span,
            )
            .with_label(Label::primary(at, "not a number")),
        );
    }
}
