//! Netlist data model and point-name queries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Splits a point name into `(object, pin)` at its last `.`.
///
/// `u3_q.out[0]` becomes `("u3_q", "out[0]")`. A name without a `.` has an
/// empty object part.
pub fn split_point(point: &str) -> (&str, &str) {
    point.rsplit_once('.').unwrap_or(("", point))
}

/// Debug and attribute annotations attached to a block by `.attr`, `.param`
/// and `.cname`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    /// Source locations from `.attr src "file:line|file:line"`.
    pub provenance: Vec<String>,
    /// Every other `.attr name value` pair, in declaration order.
    pub attributes: IndexMap<String, String>,
    /// `.param name value` pairs, in declaration order.
    pub parameters: IndexMap<String, String>,
    /// The HDL instance name from `.cname`.
    pub instance: Option<String>,
}

/// A logic function from `.names`, keyed in its model by the output signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogicNode {
    /// Input signals in declaration order.
    pub inputs: Vec<String>,
    /// The single output signal.
    pub output: String,
    /// Pin table: `in[k]` for the k-th input and `out[0]` for the output.
    pub pins: IndexMap<String, String>,
    /// Single-output cover rows following the declaration.
    pub cover: Vec<String>,
    /// Attached annotations.
    pub annotations: Annotations,
}

impl LogicNode {
    /// Creates a logic node and its pin table.
    pub fn new(inputs: Vec<String>, output: String) -> Self {
        let mut pins: IndexMap<String, String> = inputs
            .iter()
            .enumerate()
            .map(|(k, signal)| (format!("in[{k}]"), signal.clone()))
            .collect();
        pins.insert("out[0]".to_string(), output.clone());
        Self {
            inputs,
            output,
            pins,
            cover: Vec::new(),
            annotations: Annotations::default(),
        }
    }

    /// Returns `true` for a constant driver (a `.names` with no inputs).
    pub fn is_constant(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// The trigger kind of a `.latch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatchTrigger {
    /// `fe`
    FallingEdge,
    /// `re`
    RisingEdge,
    /// `ah`
    ActiveHigh,
    /// `al`
    ActiveLow,
    /// `as`
    Asynchronous,
}

impl LatchTrigger {
    /// Parses the two-letter BLIF keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "fe" => Some(LatchTrigger::FallingEdge),
            "re" => Some(LatchTrigger::RisingEdge),
            "ah" => Some(LatchTrigger::ActiveHigh),
            "al" => Some(LatchTrigger::ActiveLow),
            "as" => Some(LatchTrigger::Asynchronous),
            _ => None,
        }
    }
}

impl fmt::Display for LatchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LatchTrigger::FallingEdge => "fe",
            LatchTrigger::RisingEdge => "re",
            LatchTrigger::ActiveHigh => "ah",
            LatchTrigger::ActiveLow => "al",
            LatchTrigger::Asynchronous => "as",
        };
        f.write_str(s)
    }
}

/// A generic latch from `.latch`, keyed in its model by the output signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatchNode {
    /// The data input, pin `D[0]`.
    pub input: String,
    /// The data output, pin `Q[0]`.
    pub output: String,
    /// Trigger kind, when given.
    pub trigger: Option<LatchTrigger>,
    /// Clock or control signal, pin `clk[0]`, when given.
    pub clock: Option<String>,
    /// Initial value (0, 1, 2 = don't care, 3 = unknown), when given.
    pub init: Option<u8>,
    /// Attached annotations.
    pub annotations: Annotations,
}

impl LatchNode {
    /// Returns the signal on a latch pin.
    pub fn pin(&self, pin: &str) -> Option<&str> {
        match pin {
            "D[0]" => Some(&self.input),
            "Q[0]" => Some(&self.output),
            "clk[0]" => self.clock.as_deref(),
            _ => None,
        }
    }
}

/// A reference to another model from `.subckt`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubcircuitInstance {
    /// Name of the referenced model (e.g. `dual_port_ram`, `adder`).
    pub model: String,
    /// Port pin to connected signal, single-bit ports normalized to `name[0]`.
    pub pins: IndexMap<String, String>,
    /// Attached annotations, including the optional `.cname` instance name.
    pub annotations: Annotations,
}

impl SubcircuitInstance {
    /// Returns the HDL instance name, present only when the synthesis tool
    /// wrote `.cname` lines.
    pub fn instance_name(&self) -> Option<&str> {
        self.annotations.instance.as_deref()
    }

    /// Returns `true` if `signal` is connected to any pin of this instance.
    pub fn connects(&self, signal: &str) -> bool {
        self.pins.values().any(|s| s == signal)
    }

    /// Returns the signal on `pin`.
    pub fn pin(&self, pin: &str) -> Option<&str> {
        self.pins.get(pin).map(String::as_str)
    }
}

/// Which block table a pin lookup searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinKind {
    /// `.names` logic functions.
    Logic,
    /// `.latch` elements.
    Latch,
    /// `.subckt` instances.
    Subcircuit,
}

impl PinKind {
    /// The order used when no kind is given.
    pub const SEARCH_ORDER: [PinKind; 3] = [PinKind::Logic, PinKind::Latch, PinKind::Subcircuit];
}

/// One `.model` ... `.end` block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// The model name.
    pub name: String,
    /// Primary inputs, in declaration order.
    pub inputs: Vec<String>,
    /// Primary outputs, in declaration order.
    pub outputs: Vec<String>,
    /// Logic functions keyed by output signal.
    pub logic: IndexMap<String, LogicNode>,
    /// Latches keyed by output signal.
    pub latches: IndexMap<String, LatchNode>,
    /// Sub-circuit instances in declaration order.
    pub subcircuits: Vec<SubcircuitInstance>,
    /// Direct connections, output signal to input signal.
    pub connections: IndexMap<String, String>,
    /// Set by `.blackbox`.
    pub blackbox: bool,
}

impl Model {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the signal connected to the pin named by `point`.
    ///
    /// With `kind` set only that table is searched; otherwise logic, latch and
    /// sub-circuit tables are tried in that order. For sub-circuits the object
    /// part of the point is a signal connected to the instance, and the
    /// result is the signal on the instance's pin.
    pub fn get_pin(&self, point: &str, kind: Option<PinKind>) -> Option<&str> {
        let (object, pin) = split_point(point);
        match kind {
            Some(kind) => self.pin_in(kind, object, pin),
            None => PinKind::SEARCH_ORDER
                .iter()
                .find_map(|&kind| self.pin_in(kind, object, pin)),
        }
    }

    fn pin_in(&self, kind: PinKind, object: &str, pin: &str) -> Option<&str> {
        match kind {
            PinKind::Logic => self
                .logic
                .get(object)
                .and_then(|node| node.pins.get(pin))
                .map(String::as_str),
            PinKind::Latch => self.latches.get(object).and_then(|latch| latch.pin(pin)),
            PinKind::Subcircuit => self
                .subcircuits
                .iter()
                .find(|sub| sub.connects(object))
                .and_then(|sub| sub.pin(pin)),
        }
    }

    /// Returns the HDL instance name of the sub-circuit `point` lands on.
    ///
    /// Only instances that carry a `.cname` are considered.
    pub fn get_instance(&self, point: &str) -> Option<&str> {
        let (object, pin) = split_point(point);
        self.subcircuits
            .iter()
            .filter(|sub| sub.instance_name().is_some())
            .find(|sub| sub.connects(object) && sub.pin(pin).is_some())
            .and_then(SubcircuitInstance::instance_name)
    }
}

/// All models of a netlist file, in file order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    /// Models terminated by `.end`.
    pub models: Vec<Model>,
}

impl Netlist {
    /// Returns the number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if no model was parsed.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Returns the model with the given name.
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// [`Model::get_pin`] across all models; the first model with an answer wins.
    pub fn get_pin(&self, point: &str, kind: Option<PinKind>) -> Option<&str> {
        self.models.iter().find_map(|m| m.get_pin(point, kind))
    }

    /// [`Model::get_instance`] across all models; the first model with an answer wins.
    pub fn get_instance(&self, point: &str) -> Option<&str> {
        self.models.iter().find_map(|m| m.get_instance(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> Model {
        let mut model = Model::new("top");
        model.logic.insert(
            "n5".to_string(),
            LogicNode::new(vec!["a".to_string(), "b".to_string()], "n5".to_string()),
        );
        model.latches.insert(
            "q".to_string(),
            LatchNode {
                input: "n5".to_string(),
                output: "q".to_string(),
                trigger: Some(LatchTrigger::RisingEdge),
                clock: Some("clk".to_string()),
                init: Some(0),
                annotations: Annotations::default(),
            },
        );
        let mut ram = SubcircuitInstance {
            model: "dpram".to_string(),
            pins: IndexMap::new(),
            annotations: Annotations::default(),
        };
        ram.pins.insert("addr[0]".to_string(), "q".to_string());
        ram.pins.insert("dout[0]".to_string(), "rd0".to_string());
        model.subcircuits.push(ram.clone());
        ram.annotations.instance = Some("u_ram".to_string());
        ram.pins.insert("we[0]".to_string(), "wen".to_string());
        model.subcircuits.push(ram);
        model
    }

    #[test]
    fn split_point_at_last_dot() {
        assert_eq!(split_point("u1.u2.out[0]"), ("u1.u2", "out[0]"));
        assert_eq!(split_point("clk"), ("", "clk"));
    }

    #[test]
    fn logic_pins() {
        let model = sample_model();
        assert_eq!(model.get_pin("n5.in[1]", None), Some("b"));
        assert_eq!(model.get_pin("n5.out[0]", Some(PinKind::Logic)), Some("n5"));
        assert_eq!(model.get_pin("n5.in[2]", Some(PinKind::Logic)), None);
    }

    #[test]
    fn latch_pins() {
        let model = sample_model();
        assert_eq!(model.get_pin("q.D[0]", None), Some("n5"));
        assert_eq!(model.get_pin("q.clk[0]", Some(PinKind::Latch)), Some("clk"));
        assert_eq!(model.get_pin("q.Q[0]", Some(PinKind::Logic)), None);
    }

    #[test]
    fn subcircuit_pin_through_connected_signal() {
        let model = sample_model();
        // `rd0` is not a logic or latch output, so the subckt table answers.
        assert_eq!(model.get_pin("rd0.addr[0]", None), Some("q"));
        assert_eq!(
            model.get_pin("rd0.dout[0]", Some(PinKind::Subcircuit)),
            Some("rd0")
        );
    }

    #[test]
    fn logic_wins_over_subcircuit() {
        let mut model = sample_model();
        model.logic.insert(
            "rd0".to_string(),
            LogicNode::new(vec!["x".to_string()], "rd0".to_string()),
        );
        assert_eq!(model.get_pin("rd0.out[0]", None), Some("rd0"));
        assert_eq!(model.get_pin("rd0.addr[0]", None), Some("q"));
    }

    #[test]
    fn instance_requires_cname() {
        let model = sample_model();
        // The first instance also connects `rd0` but has no `.cname`.
        assert_eq!(model.get_instance("rd0.dout[0]"), Some("u_ram"));
        assert_eq!(model.get_instance("rd0.bogus[0]"), None);
        assert_eq!(model.get_instance("nowhere.dout[0]"), None);
    }

    #[test]
    fn netlist_first_hit_wins() {
        let mut other = Model::new("other");
        other.logic.insert(
            "n5".to_string(),
            LogicNode::new(vec!["z".to_string()], "n5".to_string()),
        );
        let netlist = Netlist {
            models: vec![sample_model(), other],
        };
        assert_eq!(netlist.get_pin("n5.in[0]", None), Some("a"));
        assert_eq!(netlist.get_instance("rd0.we[0]"), Some("u_ram"));
        assert!(netlist.model("other").is_some());
        assert_eq!(netlist.len(), 2);
    }

    #[test]
    fn unknown_point_is_none() {
        let netlist = Netlist::default();
        assert!(netlist.is_empty());
        assert_eq!(netlist.get_pin("x.out[0]", None), None);
    }

    #[test]
    fn trigger_keywords() {
        assert_eq!(LatchTrigger::from_keyword("re"), Some(LatchTrigger::RisingEdge));
        assert_eq!(LatchTrigger::from_keyword("xx"), None);
        assert_eq!(LatchTrigger::Asynchronous.to_string(), "as");
    }

    #[test]
    fn constant_node() {
        assert!(LogicNode::new(Vec::new(), "vcc".to_string()).is_constant());
    }
}
