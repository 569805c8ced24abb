//! Line-based BLIF / extended BLIF parser.
//!
//! Recognized directives: `.model`, `.inputs`, `.outputs`, `.names` (with
//! its cover rows), `.latch`, `.subckt`, `.conn`, `.cname`, `.attr`,
//! `.param`, `.blackbox` and `.end`. Other directives (`.gate`, `.mlatch`,
//! `.clock`, `.area`, `.delay`, `.exdc`, ...) are skipped silently.
//!
//! A model only becomes part of the result when its `.end` is seen. `#`
//! starts a comment and a trailing `\` continues a line.

use crate::model::{
    Annotations, LatchNode, LatchTrigger, LogicNode, Model, Netlist, SubcircuitInstance,
};
use indexmap::IndexMap;
use vtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use vtrace_source::{FileId, Span};

/// A directive with missing or extra operands.
const MALFORMED_DIRECTIVE: u16 = 1;
/// A `.subckt` connection that is not `port=signal`.
const MALFORMED_CONNECTION: u16 = 2;
/// `.attr`, `.param` or `.cname` with no block to annotate.
const DANGLING_ANNOTATION: u16 = 3;
/// A model dropped because it was never terminated.
const UNTERMINATED_MODEL: u16 = 4;
/// `.end` outside of any model.
const STRAY_END: u16 = 5;
/// A `.latch` trigger keyword outside `fe re ah al as`.
const UNKNOWN_TRIGGER: u16 = 6;

/// Parses netlist text into a [`Netlist`].
///
/// Malformed lines are reported to `sink` as warnings and skipped; parsing
/// never fails as a whole.
pub fn parse_netlist(source: &str, file: FileId, sink: &DiagnosticSink) -> Netlist {
    let mut parser = NetlistParser {
        sink,
        netlist: Netlist::default(),
        model: None,
        block: None,
    };
    for (span, line) in logical_lines(file, source) {
        parser.line(span, &line);
    }
    if let Some((model, span)) = parser.model.take() {
        parser.warn(
            UNTERMINATED_MODEL,
            format!("model `{}` has no `.end` and is dropped", model.name),
            span,
        );
    }
    parser.netlist
}

/// The most recently opened block, which annotations attach to.
#[derive(Clone, Debug)]
enum Block {
    Logic(String),
    Latch(String),
    Subcircuit(usize),
}

struct NetlistParser<'s> {
    sink: &'s DiagnosticSink,
    netlist: Netlist,
    /// The open model and the span of its `.model` line.
    model: Option<(Model, Span)>,
    block: Option<Block>,
}

impl NetlistParser<'_> {
    fn warn(&self, number: u16, message: String, span: Span) {
        self.sink.emit(Diagnostic::warning(
            DiagnosticCode::new(Category::Netlist, number),
            message,
            span,
        ));
    }

    fn line(&mut self, span: Span, line: &str) {
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return;
        };
        let args: Vec<&str> = tokens.collect();

        match head {
            ".model" => self.open_model(span, &args),
            ".end" => self.close_model(span),
            _ if self.model.is_none() => {}
            ".inputs" => self.current().inputs.extend(owned(&args)),
            ".outputs" => self.current().outputs.extend(owned(&args)),
            ".names" => self.names(span, &args),
            ".latch" => self.latch(span, &args),
            ".subckt" => self.subckt(span, &args),
            ".conn" => self.conn(span, &args),
            ".cname" => self.cname(span, &args),
            ".attr" => self.attr(span, line),
            ".param" => self.param(span, line),
            ".blackbox" => self.current().blackbox = true,
            directive if directive.starts_with('.') => {}
            _ => self.cover_row(line),
        }
    }

    fn current(&mut self) -> &mut Model {
        // `line` only dispatches here while a model is open.
        &mut self.model.get_or_insert_with(|| (Model::default(), Span::DUMMY)).0
    }

    fn open_model(&mut self, span: Span, args: &[&str]) {
        let Some(name) = args.first() else {
            self.warn(MALFORMED_DIRECTIVE, "`.model` without a name".to_string(), span);
            return;
        };
        if let Some((previous, previous_span)) = self.model.take() {
            self.sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Netlist, UNTERMINATED_MODEL),
                    format!("model `{}` has no `.end` and is dropped", previous.name),
                    previous_span,
                )
                .with_label(Label::secondary(span, "next model starts here")),
            );
        }
        self.model = Some((Model::new(*name), span));
        self.block = None;
    }

    fn close_model(&mut self, span: Span) {
        match self.model.take() {
            Some((model, _)) => self.netlist.models.push(model),
            None => self.warn(STRAY_END, "`.end` outside of a model".to_string(), span),
        }
        self.block = None;
    }

    fn names(&mut self, span: Span, args: &[&str]) {
        let Some((output, inputs)) = args.split_last() else {
            self.warn(
                MALFORMED_DIRECTIVE,
                "`.names` needs at least an output signal".to_string(),
                span,
            );
            return;
        };
        let node = LogicNode::new(owned(inputs), output.to_string());
        self.current().logic.insert(output.to_string(), node);
        self.block = Some(Block::Logic(output.to_string()));
    }

    fn cover_row(&mut self, line: &str) {
        let Some(Block::Logic(output)) = &self.block else {
            return;
        };
        let output = output.clone();
        if let Some(node) = self.current().logic.get_mut(&output) {
            node.cover.push(line.trim().to_string());
        }
    }

    fn latch(&mut self, span: Span, args: &[&str]) {
        let (input, output, control, init) = match *args {
            [input, output] => (input, output, None, None),
            [input, output, init] => (input, output, None, Some(init)),
            [input, output, trigger, clock] => (input, output, Some((trigger, clock)), None),
            [input, output, trigger, clock, init] => {
                (input, output, Some((trigger, clock)), Some(init))
            }
            _ => {
                self.warn(
                    MALFORMED_DIRECTIVE,
                    format!(
                        "`.latch` expects 2 to 5 operands, found {}",
                        args.len()
                    ),
                    span,
                );
                return;
            }
        };

        let trigger = control.and_then(|(keyword, _)| {
            let trigger = LatchTrigger::from_keyword(keyword);
            if trigger.is_none() {
                self.warn(
                    UNKNOWN_TRIGGER,
                    format!("unknown latch trigger `{keyword}`"),
                    span,
                );
            }
            trigger
        });
        let init = match init.map(str::parse::<u8>) {
            Some(Ok(value)) if value <= 3 => Some(value),
            Some(_) => {
                self.warn(
                    MALFORMED_DIRECTIVE,
                    "latch init value must be 0, 1, 2 or 3".to_string(),
                    span,
                );
                None
            }
            None => None,
        };

        let node = LatchNode {
            input: input.to_string(),
            output: output.to_string(),
            trigger,
            clock: control
                .map(|(_, clock)| clock.to_string())
                .filter(|clock| clock != "NIL"),
            init,
            annotations: Annotations::default(),
        };
        self.current().latches.insert(output.to_string(), node);
        self.block = Some(Block::Latch(output.to_string()));
    }

    fn subckt(&mut self, span: Span, args: &[&str]) {
        let Some((model, connections)) = args.split_first() else {
            self.warn(MALFORMED_DIRECTIVE, "`.subckt` without a model name".to_string(), span);
            return;
        };
        let mut pins = IndexMap::new();
        for connection in connections {
            let Some((port, signal)) = connection.split_once('=') else {
                self.warn(
                    MALFORMED_CONNECTION,
                    format!("expected `port=signal`, found `{connection}`"),
                    span,
                );
                continue;
            };
            pins.insert(normalize_port(port), signal.to_string());
        }
        let instance = SubcircuitInstance {
            model: model.to_string(),
            pins,
            annotations: Annotations::default(),
        };
        let subcircuits = &mut self.current().subcircuits;
        subcircuits.push(instance);
        let index = subcircuits.len() - 1;
        self.block = Some(Block::Subcircuit(index));
    }

    fn conn(&mut self, span: Span, args: &[&str]) {
        match *args {
            [input, output] => {
                self.current()
                    .connections
                    .insert(output.to_string(), input.to_string());
            }
            _ => self.warn(
                MALFORMED_DIRECTIVE,
                "`.conn` expects an input and an output signal".to_string(),
                span,
            ),
        }
    }

    fn cname(&mut self, span: Span, args: &[&str]) {
        let Some(name) = args.first() else {
            self.warn(MALFORMED_DIRECTIVE, "`.cname` without a name".to_string(), span);
            return;
        };
        if let Some(annotations) = self.annotations(span, ".cname") {
            annotations.instance = Some(name.to_string());
        }
    }

    fn attr(&mut self, span: Span, line: &str) {
        let Some((name, value)) = name_value(line) else {
            self.warn(MALFORMED_DIRECTIVE, "`.attr` expects a name and a value".to_string(), span);
            return;
        };
        if let Some(annotations) = self.annotations(span, ".attr") {
            if name == "src" {
                annotations.provenance = unquote(value).split('|').map(str::to_string).collect();
            } else {
                annotations
                    .attributes
                    .insert(name.to_string(), unquote(value).to_string());
            }
        }
    }

    fn param(&mut self, span: Span, line: &str) {
        let Some((name, value)) = name_value(line) else {
            self.warn(MALFORMED_DIRECTIVE, "`.param` expects a name and a value".to_string(), span);
            return;
        };
        if let Some(annotations) = self.annotations(span, ".param") {
            annotations
                .parameters
                .insert(name.to_string(), unquote(value).to_string());
        }
    }

    /// Returns the annotations of the most recently opened block.
    fn annotations(&mut self, span: Span, directive: &str) -> Option<&mut Annotations> {
        let Some(block) = self.block.clone() else {
            self.warn(
                DANGLING_ANNOTATION,
                format!("`{directive}` does not follow a `.names`, `.latch` or `.subckt`"),
                span,
            );
            return None;
        };
        let model = self.current();
        match block {
            Block::Logic(output) => model.logic.get_mut(&output).map(|n| &mut n.annotations),
            Block::Latch(output) => model.latches.get_mut(&output).map(|n| &mut n.annotations),
            Block::Subcircuit(index) => model.subcircuits.get_mut(index).map(|n| &mut n.annotations),
        }
    }
}

fn owned(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Single-bit ports get an explicit `[0]` so they match report pin names.
fn normalize_port(port: &str) -> String {
    if port.contains('[') {
        port.to_string()
    } else {
        format!("{port}[0]")
    }
}

/// Splits `.attr name value...` / `.param name value...` after the directive.
fn name_value(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().split_once(char::is_whitespace)?.1.trim_start();
    let (name, value) = rest.split_once(char::is_whitespace)?;
    let value = value.trim();
    (!value.is_empty()).then_some((name, value))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Joins `\` continuations and strips `#` comments, yielding one logical
/// line per statement with a span covering all of its physical lines.
fn logical_lines(file: FileId, source: &str) -> Vec<(Span, String)> {
    let mut result = Vec::new();
    let mut pending: Option<(Span, String)> = None;

    for (span, raw) in vtrace_source::lines(file, source) {
        let text = match raw.find('#') {
            Some(pos) => raw[..pos].trim_end(),
            None => raw,
        };
        let (text, continued) = match text.strip_suffix('\\') {
            Some(stripped) => (stripped, true),
            None => (text, false),
        };
        let (span, joined) = match pending.take() {
            Some((start, mut joined)) => {
                joined.push(' ');
                joined.push_str(text);
                (Span::new(file, start.start, span.end), joined)
            }
            None => (span, text.to_string()),
        };
        if continued {
            pending = Some((span, joined));
        } else if !joined.trim().is_empty() {
            result.push((span, joined));
        }
    }
    if let Some((span, joined)) = pending {
        if !joined.trim().is_empty() {
            result.push((span, joined));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PinKind;
    use vtrace_diagnostics::Severity;

    fn parse(source: &str) -> (Netlist, Vec<Diagnostic>) {
        let sink = DiagnosticSink::new();
        let netlist = parse_netlist(source, FileId::from_raw(0), &sink);
        (netlist, sink.take_all())
    }

    #[test]
    fn single_names_model() {
        let (netlist, diags) = parse(".model top\n.inputs a\n.outputs y\n.names a y\n1 1\n.end\n");
        assert!(diags.is_empty());
        assert_eq!(netlist.len(), 1);
        let model = &netlist.models[0];
        assert_eq!(model.name, "top");
        assert_eq!(model.inputs, vec!["a"]);
        assert_eq!(model.outputs, vec!["y"]);
        assert_eq!(model.logic.len(), 1);
        let node = &model.logic["y"];
        assert_eq!(node.pins.len(), 2);
        assert_eq!(node.pins["in[0]"], "a");
        assert_eq!(node.pins["out[0]"], "y");
        assert_eq!(node.cover, vec!["1 1"]);
    }

    #[test]
    fn model_count_matches_end_count() {
        let source = "\
.model a
.names x y
1 1
.end
.model b
.inputs p
.end
";
        let (netlist, _) = parse(source);
        assert_eq!(netlist.len(), source.matches(".end").count());
    }

    #[test]
    fn unterminated_model_is_dropped() {
        let (netlist, diags) = parse(".model a\n.end\n.model b\n.names x y\n");
        assert_eq!(netlist.len(), 1);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "N004");
    }

    #[test]
    fn latch_forms() {
        let source = "\
.model top
.latch d0 q0 re clk 0
.latch d1 q1 2
.latch d2 q2 fe clk2
.latch d3 q3
.end
";
        let (netlist, diags) = parse(source);
        assert!(diags.is_empty());
        let model = &netlist.models[0];
        let q0 = &model.latches["q0"];
        assert_eq!(q0.trigger, Some(LatchTrigger::RisingEdge));
        assert_eq!(q0.clock.as_deref(), Some("clk"));
        assert_eq!(q0.init, Some(0));
        assert_eq!(model.latches["q1"].init, Some(2));
        assert_eq!(model.latches["q2"].trigger, Some(LatchTrigger::FallingEdge));
        assert_eq!(model.latches["q2"].init, None);
        assert!(model.latches["q3"].clock.is_none());
        assert_eq!(model.get_pin("q0.D[0]", Some(PinKind::Latch)), Some("d0"));
        assert_eq!(model.get_pin("q0.clk[0]", None), Some("clk"));
    }

    #[test]
    fn bad_latch_warns() {
        let (netlist, diags) = parse(".model top\n.latch d\n.latch d q xx clk 7\n.end\n");
        let model = &netlist.models[0];
        assert_eq!(model.latches.len(), 1);
        assert_eq!(model.latches["q"].trigger, None);
        assert_eq!(diags.len(), 3);
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn subckt_with_eblif_annotations() {
        let source = r#"
.model top
.subckt dpram addr=a0 ren=r clk=clk dout[3]=d3
.cname u_mem.ram0
.attr src "top.v:12.3-14.5|mem.v:4.1-9.9"
.attr keep 1
.param WIDTH 00000000000000000000000000001000
.end
"#;
        let (netlist, diags) = parse(source);
        assert!(diags.is_empty());
        let sub = &netlist.models[0].subcircuits[0];
        assert_eq!(sub.model, "dpram");
        assert_eq!(sub.pins["addr[0]"], "a0");
        assert_eq!(sub.pins["ren[0]"], "r");
        assert_eq!(sub.pins["dout[3]"], "d3");
        assert_eq!(sub.instance_name(), Some("u_mem.ram0"));
        assert_eq!(
            sub.annotations.provenance,
            vec!["top.v:12.3-14.5", "mem.v:4.1-9.9"]
        );
        assert_eq!(sub.annotations.attributes["keep"], "1");
        assert!(sub.annotations.parameters.contains_key("WIDTH"));
        assert_eq!(netlist.get_instance("d3.dout[3]"), Some("u_mem.ram0"));
        assert_eq!(netlist.get_pin("d3.addr[0]", None), Some("a0"));
    }

    #[test]
    fn malformed_subckt_connection() {
        let (netlist, diags) = parse(".model top\n.subckt adder a=x bogus b=y\n.end\n");
        assert_eq!(netlist.models[0].subcircuits[0].pins.len(), 2);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "N002");
    }

    #[test]
    fn conn_and_blackbox() {
        let (netlist, _) = parse(".model box\n.blackbox\n.conn a b\n.end\n");
        let model = &netlist.models[0];
        assert!(model.blackbox);
        assert_eq!(model.connections["b"], "a");
    }

    #[test]
    fn comments_and_continuations() {
        let source = "\
# header comment
.model top # trailing comment
.inputs a b \\
  c d
.names a b \\
   c y
11- 1
.end
";
        let (netlist, diags) = parse(source);
        assert!(diags.is_empty());
        let model = &netlist.models[0];
        assert_eq!(model.name, "top");
        assert_eq!(model.inputs, vec!["a", "b", "c", "d"]);
        assert_eq!(model.logic["y"].inputs, vec!["a", "b", "c"]);
        assert_eq!(model.logic["y"].cover, vec!["11- 1"]);
    }

    #[test]
    fn continuation_span_covers_all_lines() {
        let lines = logical_lines(FileId::from_raw(0), ".inputs a \\\n b\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Span::new(FileId::from_raw(0), 0, 14));
        assert_eq!(lines[0].1, ".inputs a   b");
    }

    #[test]
    fn unsupported_directives_are_ignored() {
        let (netlist, diags) =
            parse(".model top\n.gate nand2 A=a B=b O=y\n.clock clk\n.area 4\n.end\n");
        assert!(diags.is_empty());
        assert_eq!(netlist.len(), 1);
    }

    #[test]
    fn dangling_annotation_warns() {
        let (_, diags) = parse(".model top\n.cname u0\n.end\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "N003");
    }

    #[test]
    fn stray_end_warns() {
        let (netlist, diags) = parse(".end\n");
        assert!(netlist.is_empty());
        assert_eq!(diags[0].code.to_string(), "N005");
    }

    #[test]
    fn constant_driver() {
        let (netlist, _) = parse(".model top\n.names vcc\n1\n.end\n");
        let node = &netlist.models[0].logic["vcc"];
        assert!(node.is_constant());
        assert_eq!(node.pins["out[0]"], "vcc");
    }

    #[test]
    fn multiple_inputs_lines_extend() {
        let (netlist, _) = parse(".model top\n.inputs a\n.inputs b\n.end\n");
        assert_eq!(netlist.models[0].inputs, vec!["a", "b"]);
    }

    #[test]
    fn attr_on_latch() {
        let (netlist, _) = parse(".model top\n.latch d q re clk 0\n.attr src \"cpu.v:10\"\n.end\n");
        assert_eq!(
            netlist.models[0].latches["q"].annotations.provenance,
            vec!["cpu.v:10"]
        );
    }
}
