//! `vtrace stats`: timing report summary.

use std::error::Error;
use std::fmt::Write;

use serde::Serialize;
use vtrace_timing::{PathGroups, ReportInfo, ReportStats, TimingReport};

use crate::pipeline::{load_settings, Session};
use crate::{GlobalArgs, StatsArgs};

/// The `--json` output.
#[derive(Serialize)]
struct StatsDump<'a> {
    info: &'a ReportInfo,
    stats: &'a ReportStats,
    groups: &'a PathGroups,
}

/// Runs the `vtrace stats` command. Only the timing report is read.
pub fn run(args: &StatsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let settings = load_settings(&args.inputs, global)?;
    let mut session = Session::new(global);
    let Some(report) = session.load_report(&settings) else {
        return Ok(session.finish(global));
    };

    if args.json {
        let dump = StatsDump {
            info: &report.info,
            stats: &report.stats,
            groups: &report.groups,
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
    } else {
        let precision = report
            .info
            .precision
            .unwrap_or(settings.config.analysis.precision) as usize;
        print!("{}", render_stats(&report, precision, args.groups));
    }
    Ok(session.finish(global))
}

/// Renders the report header values, the arrival time spread and one line
/// per startpoint group. With `all_endpoints`, every endpoint of a group is
/// listed under it.
fn render_stats(report: &TimingReport, precision: usize, all_endpoints: bool) -> String {
    let time = |t: Option<f64>| t.map_or_else(|| "-".to_string(), |t| format!("{t:.precision$}"));
    let info = &report.info;
    let stats = &report.stats;

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Paths            : {}", stats.path_count);
    let _ = writeln!(
        out,
        "Unit scale       : {}",
        info.unit_scale
            .map_or_else(|| "-".to_string(), |s| format!("{s:e} s"))
    );
    let _ = writeln!(
        out,
        "Output precision : {}",
        info.precision
            .map_or_else(|| "-".to_string(), |p| p.to_string())
    );
    let _ = writeln!(out, "Highest arrival  : {}", time(stats.highest_arrival_time));
    let _ = writeln!(out, "Lowest arrival   : {}", time(stats.lowest_arrival_time));
    let _ = writeln!(out, "Deviation        : {}", time(stats.arrival_time_deviation));
    let _ = writeln!(out, "Startpoints      : {}", report.groups.len());

    if report.groups.is_empty() {
        return out;
    }
    let _ = writeln!(out);
    let width = report.groups.iter().map(|(start, _)| start.len()).max().unwrap_or(0);
    for (start, group) in report.groups.iter() {
        let _ = writeln!(
            out,
            "{start:<width$}  -> {} ({} path{})",
            group.first_endpoint(),
            group.total,
            if group.total == 1 { "" } else { "s" }
        );
        if all_endpoints {
            for end in &group.endpoints {
                let _ = writeln!(out, "    {end}");
            }
        }
    }
    out
}
