//! `vtrace point`: where one report point lives in each input.

use std::error::Error;
use std::fmt::Write;

use vtrace_paths::resolve_instance;
use vtrace_place::object_name;

use crate::pipeline::{load_settings, Analysis, Session};
use crate::{GlobalArgs, PointArgs};

/// Runs the `vtrace point` command.
///
/// Exits with 1 when the point is in no placed block.
pub fn run(args: &PointArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let settings = load_settings(&args.inputs, global)?;
    let mut session = Session::new(global);
    let Some(analysis) = session.analyze(&settings) else {
        return Ok(session.finish(global));
    };

    let (text, placed) = describe_point(&args.name, &analysis);
    print!("{text}");
    let code = session.finish(global);
    Ok(if placed { code } else { 1 })
}

/// Describes `name` as the locator, the packed netlist, the synthesized
/// netlist and the timing report see it. The flag is `true` when the point
/// is in a placed block.
fn describe_point(name: &str, analysis: &Analysis) -> (String, bool) {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Point     : {name}");
    let _ = writeln!(out, "Object    : {}", object_name(name));

    let block = analysis.locator.resolve(name);
    match block {
        Some(block) => {
            let _ = writeln!(
                out,
                "Block     : {block} slot {} (`{}`)",
                block.sub_block, block.name
            );
        }
        None => {
            let _ = writeln!(out, "Block     : not in any placed block");
        }
    }

    match analysis.hierarchy.find_pin(name) {
        Some(pin) => {
            let _ = writeln!(
                out,
                "Pin       : {}[{}] ({}) of `{}`, signal `{}`",
                pin.port_name, pin.pin_index, pin.direction, pin.block_name, pin.signal
            );
            let _ = writeln!(out, "Hierarchy : {}", pin.hierarchy.join(" / "));
        }
        None => {
            let _ = writeln!(out, "Pin       : no such pin in the packed netlist");
        }
    }

    match &analysis.netlist {
        Some(netlist) => {
            let signal = netlist.get_pin(name, None).unwrap_or("-");
            let instance = netlist.get_instance(name).unwrap_or("-");
            let _ = writeln!(out, "Netlist   : signal `{signal}`, instance `{instance}`");
        }
        None => {
            let _ = writeln!(out, "Netlist   : not loaded");
        }
    }

    let mut uses = analysis
        .report
        .paths
        .iter()
        .filter_map(|path| path.points.iter().find(|p| p.name == name).map(|p| (path.id, p)));
    match uses.next() {
        Some((first_id, point)) => {
            let ids: Vec<String> = std::iter::once(first_id)
                .chain(uses.map(|(id, _)| id))
                .map(|id| id.to_string())
                .collect();
            let _ = writeln!(
                out,
                "Report    : {} on path(s) {}",
                point.node_type.tag(),
                ids.join(", ")
            );
            let _ = writeln!(
                out,
                "Instance  : {}",
                resolve_instance(point, analysis.netlist.as_ref())
            );
        }
        None => {
            let _ = writeln!(out, "Report    : not on any path");
        }
    }

    (out, block.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtrace_diagnostics::DiagnosticSink;
    use vtrace_netlist::parse_netlist;
    use vtrace_place::{parse_hierarchy, parse_placement, PhysicalBlockLocator};
    use vtrace_source::FileId;
    use vtrace_timing::{parse_report, ReportOptions};

    const NET: &str = r#"<block name="top.net" instance="FPGA_packed_netlist[0]">
  <block name="q" instance="clb[4]" mode="default">
    <inputs><port name="I">n1 open</port></inputs>
    <outputs><port name="O">q</port></outputs>
    <block name="q" instance="fle[0]" mode="n1_lut4">
      <inputs><port name="in">n1 open</port></inputs>
      <outputs><port name="out">q</port></outputs>
      <block name="q" instance="ff[0]">
        <inputs><port name="D">n1</port></inputs>
        <outputs><port name="Q">q</port></outputs>
      </block>
    </block>
  </block>
</block>"#;

    const BLIF: &str = "\
.model top
.inputs n1 clk
.outputs q
.latch n1 q re clk 0
.end
";

    const REPORT: &str = "\
#Path 4
Startpoint: q.Q[0] (.latch clocked by clk)
Endpoint  : q.D[0] (.latch clocked by clk)
q.Q[0] (.latch at (6,2))      0.100     0.100
q.D[0] (.latch at (6,2))      0.200     0.300
data arrival time                       0.300
slack (MET)                             0.200
";

    fn analysis(with_netlist: bool) -> Analysis {
        let sink = DiagnosticSink::new();
        let hierarchy = parse_hierarchy(NET).unwrap();
        let placement = parse_placement("q 6 2 0 #4\n", FileId::from_raw(0), &sink);
        let locator = PhysicalBlockLocator::build(&hierarchy, &placement, &sink);
        let netlist = with_netlist.then(|| parse_netlist(BLIF, FileId::from_raw(1), &sink));
        let report = parse_report(REPORT, FileId::from_raw(2), &ReportOptions::default(), &sink);
        assert!(sink.take_all().is_empty());
        Analysis {
            netlist,
            hierarchy,
            locator,
            report,
        }
    }

    #[test]
    fn placed_point() {
        let (text, placed) = describe_point("q.Q[0]", &analysis(true));
        assert!(placed);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Point     : q.Q[0]");
        assert_eq!(lines[1], "Object    : q");
        assert_eq!(lines[2], "Block     : clb[4] at ( 6, 2) slot 0 (`q`)");
        assert!(lines[3].starts_with("Pin       : Q[0] (output)"));
        assert_eq!(lines[5], "Netlist   : signal `q`, instance `-`");
        assert_eq!(lines[6], "Report    : .latch on path(s) 4");
        assert_eq!(lines[7], "Instance  : q");
    }

    #[test]
    fn without_netlist() {
        let (text, _) = describe_point("q.D[0]", &analysis(false));
        assert!(text.contains("Netlist   : not loaded\n"));
        assert!(text.contains("Instance  : q.D[0]\n"));
    }

    #[test]
    fn unknown_point() {
        let (text, placed) = describe_point("ghost.out[0]", &analysis(true));
        assert!(!placed);
        assert!(text.contains("Block     : not in any placed block\n"));
        assert!(text.contains("Pin       : no such pin in the packed netlist\n"));
        assert!(text.contains("Report    : not on any path\n"));
    }
}
