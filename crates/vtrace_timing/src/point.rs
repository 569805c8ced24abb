//! Paths, points and node types of a timing report.

use serde::{Deserialize, Serialize};
use std::fmt;
use vtrace_common::GridCoord;

/// Routing resource kinds that appear as node types once paths are fused
/// with routing data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoutingKind {
    /// Horizontal channel wire.
    ChanX,
    /// Vertical channel wire.
    ChanY,
    /// Block input pin.
    Ipin,
    /// Block output pin.
    Opin,
    /// Net source.
    Source,
    /// Net sink.
    Sink,
}

impl RoutingKind {
    /// Returns the routing graph spelling (`CHANX`, `IPIN`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingKind::ChanX => "CHANX",
            RoutingKind::ChanY => "CHANY",
            RoutingKind::Ipin => "IPIN",
            RoutingKind::Opin => "OPIN",
            RoutingKind::Source => "SOURCE",
            RoutingKind::Sink => "SINK",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "CHANX" => Some(RoutingKind::ChanX),
            "CHANY" => Some(RoutingKind::ChanY),
            "IPIN" => Some(RoutingKind::Ipin),
            "OPIN" => Some(RoutingKind::Opin),
            "SOURCE" => Some(RoutingKind::Source),
            "SINK" => Some(RoutingKind::Sink),
            _ => None,
        }
    }
}

/// The node type written in parentheses after a point name.
///
/// Every tag the report can contain maps to exactly one variant; tags that are
/// not a primitive or a routing resource name a sub-circuit model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    /// `.names`
    LogicFunction,
    /// `.latch`
    Latch,
    /// `.input`
    InputPad,
    /// `.output`
    OutputPad,
    /// A `.subckt` model such as `dual_port_ram` or `multiply`.
    Subcircuit(String),
    /// A routing resource.
    RoutingSegment(RoutingKind),
}

impl NodeType {
    /// Classifies a report tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            ".names" => NodeType::LogicFunction,
            ".latch" => NodeType::Latch,
            ".input" => NodeType::InputPad,
            ".output" => NodeType::OutputPad,
            other => match RoutingKind::from_tag(other) {
                Some(kind) => NodeType::RoutingSegment(kind),
                None => NodeType::Subcircuit(other.to_string()),
            },
        }
    }

    /// Returns the tag as written in the report.
    pub fn tag(&self) -> &str {
        match self {
            NodeType::LogicFunction => ".names",
            NodeType::Latch => ".latch",
            NodeType::InputPad => ".input",
            NodeType::OutputPad => ".output",
            NodeType::Subcircuit(model) => model,
            NodeType::RoutingSegment(kind) => kind.as_str(),
        }
    }

    /// Returns the short label used in block descriptions: `lut`, `ff`,
    /// `in`, `out`, or the tag itself for sub-circuits and routing.
    pub fn short_label(&self) -> &str {
        match self {
            NodeType::LogicFunction => "lut",
            NodeType::Latch => "ff",
            NodeType::InputPad => "in",
            NodeType::OutputPad => "out",
            NodeType::Subcircuit(model) => model,
            NodeType::RoutingSegment(kind) => kind.as_str(),
        }
    }

    /// Returns `true` for primary input and output pads.
    pub fn is_pad(&self) -> bool {
        matches!(self, NodeType::InputPad | NodeType::OutputPad)
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        NodeType::from_tag(&tag)
    }
}

impl From<NodeType> for String {
    fn from(node: NodeType) -> Self {
        node.tag().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One point line of a path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Point name, `<object>.<pin>`.
    pub name: String,
    /// Node type in parentheses.
    pub node_type: NodeType,
    /// Incremental delay, after carry clamping.
    pub t_incr: f64,
    /// Cumulative delay.
    pub t_sum: f64,
    /// Tag in square brackets, such as `clock-to-output`.
    pub edge_clock: Option<String>,
    /// Grid location printed by the analyzer as `at (x,y)`.
    pub coord: Option<GridCoord>,
}

/// The analysis a path belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    /// Max-delay check.
    Setup,
    /// Min-delay check.
    Hold,
    /// Any other check name, kept verbatim.
    Other(String),
}

impl PathType {
    /// Classifies the `Path Type :` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "setup" => PathType::Setup,
            "hold" => PathType::Hold,
            other => PathType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathType::Setup => write!(f, "setup"),
            PathType::Hold => write!(f, "hold"),
            PathType::Other(name) => f.write_str(name),
        }
    }
}

/// A complete timing path.
///
/// The first point is the declared startpoint and the last one the declared
/// endpoint; the parser drops paths for which that does not hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// `#Path` number.
    pub id: u32,
    /// `Startpoint:` name.
    pub startpoint: String,
    /// `Endpoint :` name.
    pub endpoint: String,
    /// `Path Type :` value.
    pub path_type: Option<PathType>,
    /// `data arrival time`.
    pub arrival_time: Option<f64>,
    /// `data required time`.
    pub required_time: Option<f64>,
    /// Constraint named on the `slack (...)` line, e.g. `MET` or `VIOLATED`.
    pub constraint: Option<String>,
    /// Slack; negative when the check fails.
    pub slack_time: Option<f64>,
    /// Points from startpoint to endpoint.
    pub points: Vec<Point>,
}

impl Path {
    /// Returns the startpoint line.
    pub fn first(&self) -> &Point {
        &self.points[0]
    }

    /// Returns the endpoint line.
    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    /// Returns `true` if the path has a negative slack.
    pub fn is_violated(&self) -> bool {
        self.slack_time.is_some_and(|s| s < 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_type_classification() {
        assert_eq!(NodeType::from_tag(".names"), NodeType::LogicFunction);
        assert_eq!(NodeType::from_tag(".latch"), NodeType::Latch);
        assert_eq!(NodeType::from_tag(".input"), NodeType::InputPad);
        assert_eq!(NodeType::from_tag(".output"), NodeType::OutputPad);
        assert_eq!(
            NodeType::from_tag("CHANY"),
            NodeType::RoutingSegment(RoutingKind::ChanY)
        );
        assert_eq!(
            NodeType::from_tag("dual_port_ram"),
            NodeType::Subcircuit("dual_port_ram".to_string())
        );
    }

    #[test]
    fn tags_round_trip_through_classification() {
        for tag in [".names", ".latch", ".input", ".output", "IPIN", "multiply"] {
            assert_eq!(NodeType::from_tag(tag).tag(), tag);
        }
    }

    #[test]
    fn short_labels() {
        assert_eq!(NodeType::LogicFunction.short_label(), "lut");
        assert_eq!(NodeType::Latch.short_label(), "ff");
        assert_eq!(NodeType::InputPad.short_label(), "in");
        assert_eq!(NodeType::OutputPad.short_label(), "out");
        assert_eq!(
            NodeType::Subcircuit("adder".to_string()).short_label(),
            "adder"
        );
        assert!(NodeType::OutputPad.is_pad());
        assert!(!NodeType::Latch.is_pad());
    }

    #[test]
    fn node_type_serializes_as_tag() {
        let json = serde_json::to_string(&NodeType::Latch).unwrap();
        assert_eq!(json, "\".latch\"");
        let back: NodeType = serde_json::from_str("\"SINK\"").unwrap();
        assert_eq!(back, NodeType::RoutingSegment(RoutingKind::Sink));
    }

    #[test]
    fn path_type_names() {
        assert_eq!(PathType::from_name("setup"), PathType::Setup);
        assert_eq!(PathType::from_name("hold").to_string(), "hold");
        assert_eq!(
            PathType::from_name("recovery"),
            PathType::Other("recovery".to_string())
        );
    }
}
