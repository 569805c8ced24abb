//! `vtrace paths`: enrich report paths and print them.
//!
//! Each path is printed as a table (see [`render_path`]) or, with `--json`,
//! as one flat record per line. Paths that cannot be placed are reported as
//! diagnostics and do not stop the others.

use std::error::Error;
use std::io::{self, Write};

use vtrace_paths::{enrich_paths, render_path, EnrichedPath, FusionError, PathBuilder};

use crate::pipeline::{load_settings, Session};
use crate::{GlobalArgs, PathsArgs};

/// Runs the `vtrace paths` command.
///
/// Returns exit code 0 if every requested path was enriched, 1 otherwise.
pub fn run(args: &PathsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let settings = load_settings(&args.inputs, global)?;
    if !global.quiet {
        eprintln!("   Analyzing {}", settings.inputs.timing.display());
    }

    let mut session = Session::new(global);
    let Some(analysis) = session.analyze(&settings) else {
        return Ok(session.finish(global));
    };

    let precision = analysis
        .report
        .info
        .precision
        .unwrap_or(settings.config.analysis.precision) as usize;
    let builder = PathBuilder::new(&analysis.locator, analysis.netlist.as_ref());

    let results = match args.id {
        Some(id) => match analysis.report.path(id) {
            Some(path) => vec![builder.build(path)],
            None => {
                session.finish(global);
                eprintln!(
                    "error: no path {id} in {}",
                    settings.inputs.timing.display()
                );
                return Ok(1);
            }
        },
        None => enrich_paths(&builder, &analysis.report.paths, settings.config.analysis.jobs)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let enriched = write_paths(&mut out, &results, args.json, precision)?;
    drop(out);

    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        session.sink.emit(err.to_diagnostic());
    }
    if !global.quiet {
        eprintln!("   Enriched {enriched} of {} path(s)", results.len());
    }
    Ok(session.finish(global))
}

/// Writes every enriched path, skipping failures, and returns how many were
/// written.
fn write_paths(
    out: &mut impl Write,
    results: &[Result<EnrichedPath<'_>, FusionError>],
    json: bool,
    precision: usize,
) -> Result<usize, Box<dyn Error>> {
    let mut written = 0;
    for path in results.iter().filter_map(|r| r.as_ref().ok()) {
        if json {
            writeln!(out, "{}", serde_json::to_string(&path.to_record())?)?;
        } else {
            if written > 0 {
                writeln!(out)?;
            }
            write!(out, "{}", render_path(path, precision))?;
        }
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtrace_diagnostics::DiagnosticSink;
    use vtrace_place::{parse_hierarchy, parse_placement, PhysicalBlockLocator};
    use vtrace_source::FileId;
    use vtrace_timing::{parse_report, ReportOptions, TimingReport};

    const NET: &str = r#"<block name="top.net" instance="FPGA_packed_netlist[0]">
  <block name="a" instance="clb[0]"><block name="a" instance="ff[0]"/></block>
  <block name="b" instance="clb[1]"><block name="b" instance="ff[0]"/></block>
</block>"#;

    const REPORT: &str = "\
#Path 1
Startpoint: a.Q[0] (.latch clocked by clk)
Endpoint  : b.D[0] (.latch clocked by clk)
Path Type : setup
a.Q[0] (.latch at (1,1))      0.100     0.100
| (inter-block routing)       0.300     0.400
b.D[0] (.latch at (3,1))      0.000     0.400
data arrival time                       0.400
slack (MET)                             0.100

#Path 2
Startpoint: a.Q[0] (.latch clocked by clk)
Endpoint  : c.D[0] (.latch clocked by clk)
Path Type : setup
a.Q[0] (.latch at (1,1))      0.100     0.100
c.D[0] (.latch at (5,1))      0.200     0.300
data arrival time                       0.300
slack (MET)                             0.200
";

    fn fixture() -> (PhysicalBlockLocator, TimingReport) {
        let sink = DiagnosticSink::new();
        let hierarchy = parse_hierarchy(NET).unwrap();
        let placement = parse_placement("a 1 1 0 #0\nb 3 1 0 #1\n", FileId::from_raw(0), &sink);
        let locator = PhysicalBlockLocator::build(&hierarchy, &placement, &sink);
        let report = parse_report(REPORT, FileId::from_raw(1), &ReportOptions::default(), &sink);
        assert!(sink.take_all().is_empty());
        (locator, report)
    }

    #[test]
    fn json_lines_skip_failed_paths() {
        let (locator, report) = fixture();
        let builder = PathBuilder::new(&locator, None);
        let results = enrich_paths(&builder, &report.paths, 2).unwrap();
        assert!(results[1].is_err());

        let mut out = Vec::new();
        let written = write_paths(&mut out, &results, true, 3).unwrap();
        assert_eq!(written, 1);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["id"], 1);
        assert_eq!(record["start_pb"], "ff[0]");
        assert_eq!(record["end_pb"], "ff[1]");
        assert_eq!(record["manhattan_dist"], 2);
    }

    #[test]
    fn tables_are_separated_by_a_blank_line() {
        let (locator, report) = fixture();
        let builder = PathBuilder::new(&locator, None);
        let first = builder.build(&report.paths[0]);
        let results = vec![first.clone(), first];

        let mut out = Vec::new();
        let written = write_paths(&mut out, &results, false, 3).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# Path 1\n"));
        assert!(text.contains("\n\n# Path 1\n"));
    }
}
