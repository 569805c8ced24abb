//! The packed netlist: how netlist blocks nest inside physical blocks.
//!
//! The root `<block>` is the whole design (`instance="FPGA_packed_netlist[0]"`).
//! Its child blocks are the physical blocks (`clb[3]`, `memory[0]`, `io[12]`),
//! each containing the primitives packed into it, down to the LUTs and
//! flip-flops whose names appear in the timing report. Unused slots are
//! written as `name="open"`.

use crate::xml::{self, Element, XmlError};
use serde::{Deserialize, Serialize};
use std::fmt;
use vtrace_common::PbId;
use vtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use vtrace_source::{FileId, Span};

/// A packed netlist that cannot be read at all.
const UNREADABLE_HIERARCHY: u16 = 1;

/// Errors that make a packed netlist unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    /// The file is not well-formed XML.
    #[error("malformed packed netlist: {0}")]
    Xml(#[from] XmlError),

    /// The root element is not a `<block>`.
    #[error("expected a `<block>` root element, found `<{found}>`")]
    UnexpectedRoot {
        /// The tag that was found.
        found: String,
    },

    /// A `<block>` or `<port>` lacks a required attribute.
    #[error("`<{element}>` at byte {offset} has no `{attribute}` attribute")]
    MissingAttribute {
        /// The element's tag.
        element: String,
        /// The missing attribute.
        attribute: &'static str,
        /// Byte offset of the element.
        offset: usize,
    },
}

impl HierarchyError {
    /// Returns the byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            HierarchyError::Xml(err) => err.offset,
            HierarchyError::UnexpectedRoot { .. } => 0,
            HierarchyError::MissingAttribute { offset, .. } => *offset,
        }
    }

    /// Converts the error into a diagnostic pointing at the offending byte
    /// of `file`.
    pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
        let offset = self.offset() as u32;
        let span = Span::new(file, offset, offset);
        Diagnostic::error(
            DiagnosticCode::new(Category::Placement, UNREADABLE_HIERARCHY),
            self.to_string(),
            span,
        )
        .with_label(Label::primary(span, "here"))
        .with_note("no path can be placed without the packed netlist")
    }
}

/// Direction of a block port, from the wrapper element it is listed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Listed under `<inputs>`.
    Input,
    /// Listed under `<outputs>`.
    Output,
    /// Listed under `<clocks>`.
    Clock,
}

impl PortDirection {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "inputs" => Some(PortDirection::Input),
            "outputs" => Some(PortDirection::Output),
            "clocks" => Some(PortDirection::Clock),
            _ => None,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
            PortDirection::Clock => write!(f, "clock"),
        }
    }
}

/// A port of a block and the signals on its pins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port name (`I`, `O`, `clk`, `data_out`, ...).
    pub name: String,
    /// Direction of the port.
    pub direction: PortDirection,
    /// One entry per pin; unconnected pins read `open`.
    pub pins: Vec<String>,
}

/// One `<block>` of the packed netlist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbNode {
    /// Block name; `open` for an unused slot.
    pub name: String,
    /// Instance name, `<pb_type>[<index>]`.
    pub instance: String,
    /// Selected operating mode, when the block has one.
    pub mode: Option<String>,
    /// Ports of all directions, in file order.
    pub ports: Vec<Port>,
    /// Nested blocks, in file order.
    pub children: Vec<PbNode>,
}

impl PbNode {
    /// Returns `true` for an unused slot.
    pub fn is_open(&self) -> bool {
        self.name == "open"
    }

    /// Splits the instance name into its type and index: `clb[3]` gives
    /// `("clb", Some(3))`, a name without a valid index gives `None` for it.
    pub fn instance_parts(&self) -> (&str, Option<u32>) {
        split_instance(&self.instance)
    }

    /// Returns the port with the given name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Returns the input port with the given name.
    pub fn input_port(&self, name: &str) -> Option<&Port> {
        self.ports
            .iter()
            .find(|p| p.name == name && p.direction == PortDirection::Input)
    }

    /// Iterates over the blocks nested in this one that are in use.
    pub fn used_children(&self) -> impl Iterator<Item = &PbNode> {
        self.children.iter().filter(|c| !c.is_open())
    }

    /// Calls `f` with the name of every used block strictly below this one,
    /// depth first.
    pub fn for_each_descendant_name<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        for child in self.used_children() {
            f(&child.name);
            child.for_each_descendant_name(f);
        }
    }
}

/// Splits `type[index]` into its parts.
pub fn split_instance(instance: &str) -> (&str, Option<u32>) {
    match instance.split_once('[') {
        Some((ty, rest)) => {
            let index = rest.strip_suffix(']').and_then(|i| i.parse().ok());
            (ty, index)
        }
        None => (instance, None),
    }
}

/// The parsed packed netlist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementHierarchy {
    /// The design-level block; its children are the physical blocks.
    pub root: PbNode,
}

/// The answer of [`PlacementHierarchy::find_pin`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLookup {
    /// The point that was looked up.
    pub point: String,
    /// The block the point belongs to.
    pub block_name: String,
    /// The port the point names.
    pub port_name: String,
    /// The pin index within the port.
    pub pin_index: usize,
    /// Direction of that port.
    pub direction: PortDirection,
    /// Instance names from the physical block down to the point's block.
    pub hierarchy: Vec<String>,
    /// Type of the physical block (`clb`, `memory`, ...).
    pub pb_type: String,
    /// Index of the physical block.
    pub pb_id: Option<PbId>,
    /// The signal on that pin, as named by the packer.
    pub signal: String,
}

impl PlacementHierarchy {
    /// Returns the physical blocks in file order, unused slots included.
    pub fn physical_blocks(&self) -> &[PbNode] {
        &self.root.children
    }

    /// Finds the block, port and pin a report point such as
    /// `u_alu.sum[3].out[0]` names.
    ///
    /// The search is depth first and checks the deepest levels of each
    /// subtree before its direct children. Memory blocks list input signals on
    /// the enclosing level, and cluster blocks name the pin after the block
    /// itself.
    pub fn find_pin(&self, point: &str) -> Option<PinLookup> {
        let (block_name, port_name, pin_index) = split_pin_point(point)?;
        let mut hierarchy = Vec::new();
        let (parent, block, port) =
            find_block_port(&self.root, block_name, port_name, &mut hierarchy)?;
        hierarchy.push(block.instance.clone());

        let (pb_type, pb_id) = split_instance(&hierarchy[0]);
        let pb_type = pb_type.to_string();
        let pb_id = pb_id.map(PbId::from_raw);

        let pins = if pb_type.starts_with("memory") && port.direction == PortDirection::Input {
            &parent.input_port(port_name)?.pins
        } else {
            &port.pins
        };
        let mut signal = pins.get(pin_index)?.clone();
        if pb_type.starts_with("clb") {
            signal = block.name.clone();
        }

        Some(PinLookup {
            point: point.to_string(),
            block_name: block_name.to_string(),
            port_name: port_name.to_string(),
            pin_index,
            direction: port.direction,
            hierarchy,
            pb_type,
            pb_id,
            signal,
        })
    }
}

/// Splits `name.port[index]` into its parts.
fn split_pin_point(point: &str) -> Option<(&str, &str, usize)> {
    let (block, pin) = point.rsplit_once('.')?;
    let (port, index) = pin.strip_suffix(']')?.split_once('[')?;
    if port.is_empty() {
        return None;
    }
    Some((block, port, index.parse().ok()?))
}

/// Returns `(parent, block, port)` for the first block named `block_name`
/// with a port `port_name`, pushing the instances above it onto `hierarchy`.
fn find_block_port<'a>(
    parent: &'a PbNode,
    block_name: &str,
    port_name: &str,
    hierarchy: &mut Vec<String>,
) -> Option<(&'a PbNode, &'a PbNode, &'a Port)> {
    for child in &parent.children {
        hierarchy.push(child.instance.clone());
        if let Some(found) = find_block_port(child, block_name, port_name, hierarchy) {
            return Some(found);
        }
        hierarchy.pop();
    }
    let block = parent.children.iter().find(|c| c.name == block_name)?;
    let port = block.port(port_name)?;
    Some((parent, block, port))
}

/// Parses a packed netlist file.
pub fn parse_hierarchy(source: &str) -> Result<PlacementHierarchy, HierarchyError> {
    let root = xml::parse_document(source)?;
    if root.name != "block" {
        return Err(HierarchyError::UnexpectedRoot { found: root.name });
    }
    Ok(PlacementHierarchy {
        root: convert_block(&root)?,
    })
}

fn required<'e>(element: &'e Element, attribute: &'static str) -> Result<&'e str, HierarchyError> {
    element
        .attr(attribute)
        .ok_or_else(|| HierarchyError::MissingAttribute {
            element: element.name.clone(),
            attribute,
            offset: element.offset,
        })
}

fn convert_block(element: &Element) -> Result<PbNode, HierarchyError> {
    let mut node = PbNode {
        name: required(element, "name")?.to_string(),
        instance: required(element, "instance")?.to_string(),
        mode: element.attr("mode").map(str::to_string),
        ports: Vec::new(),
        children: Vec::new(),
    };
    for child in &element.children {
        if child.name == "block" {
            node.children.push(convert_block(child)?);
        } else if let Some(direction) = PortDirection::from_tag(&child.name) {
            for port in child.children_named("port") {
                node.ports.push(Port {
                    name: required(port, "name")?.to_string(),
                    direction,
                    pins: port.text.split_whitespace().map(str::to_string).collect(),
                });
            }
        }
    }
    Ok(node)
}
