//! Readable instance names for report points.
//!
//! Report point names are netlist signal names, often decorated by the
//! synthesis flow. With the netlist at hand a point is mapped back to the
//! signal or HDL instance it belongs to, then cleaned of the fragments the
//! optimizer injected.

use regex::Regex;
use std::sync::LazyLock;
use vtrace_netlist::{Netlist, PinKind};
use vtrace_place::object_name;
use vtrace_timing::{NodeType, Point};

/// Literal fragments removed from names, in this order.
const LITERAL_ARTIFACTS: [&str; 3] = ["$flatten\\", "$techmap\\", "\\"];

/// Word, bit and port indices appended to memory instance names.
static MEMORY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\.\d+\.\d+\.\d+$").unwrap());

/// Generate-block scopes.
static GENERATE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.genblk\d+").unwrap());

/// Removes optimizer-injected fragments from a name.
pub fn strip_artifacts(name: &str) -> String {
    let mut name = name.to_string();
    for literal in LITERAL_ARTIFACTS {
        if name.contains(literal) {
            name = name.replace(literal, "");
        }
    }
    let name = MEMORY_SUFFIX.replace(&name, "$1");
    GENERATE_BLOCK.replace_all(&name, "").into_owned()
}

/// Returns the readable instance name of `point`.
///
/// Without a netlist the point name is used as is. Otherwise pads drop their
/// pin suffix, logic and latch points map to the signal on their pin, and
/// sub-circuit points map to the HDL instance name, or to the sub-circuit
/// model when the netlist carries none. Whatever a lookup cannot answer
/// falls back to the point name.
pub fn resolve_instance(point: &Point, netlist: Option<&Netlist>) -> String {
    let Some(netlist) = netlist else {
        return strip_artifacts(&point.name);
    };
    let raw = point.name.as_str();
    let resolved = match &point.node_type {
        NodeType::InputPad | NodeType::OutputPad => object_name(raw),
        NodeType::LogicFunction => netlist.get_pin(raw, Some(PinKind::Logic)).unwrap_or(raw),
        NodeType::Latch => netlist.get_pin(raw, Some(PinKind::Latch)).unwrap_or(raw),
        NodeType::Subcircuit(model) => netlist.get_instance(raw).unwrap_or(model),
        NodeType::RoutingSegment(_) => raw,
    };
    strip_artifacts(resolved)
}
