//! Text table of one enriched path.

use crate::builder::EnrichedPath;
use std::fmt::Write;

const HEADERS: [&str; 7] = ["Point", "Incr", "Path", "PB Type", "Block", "Coords", "Instance"];
const SEPARATOR: &str = "  ";

/// A cell and whether it is right-aligned.
struct Cell {
    text: String,
    numeric: bool,
}

impl Cell {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            numeric: false,
        }
    }

    fn number(text: String) -> Self {
        Self {
            text,
            numeric: true,
        }
    }
}

/// Renders the path header, one row per point and the path statistics.
///
/// Delays are printed with `precision` decimals.
pub fn render_path(path: &EnrichedPath<'_>, precision: usize) -> String {
    let rows: Vec<[Cell; 7]> = path
        .points
        .iter()
        .map(|p| {
            [
                Cell::text(p.point.name.as_str()),
                Cell::number(format!("{:.precision$}", p.point.t_incr)),
                Cell::number(format!("{:.precision$}", p.point.t_sum)),
                Cell::text(p.point.node_type.tag()),
                Cell::number(p.block.id.to_string()),
                Cell::text(p.block.coord.to_string()),
                Cell::text(p.instance.as_str()),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.text.len());
        }
    }

    let report = path.path;
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "# Path {}", report.id);
    let _ = writeln!(out, "Startpoint: {}", report.startpoint);
    let _ = writeln!(out, "Endpoint  : {}", report.endpoint);
    let _ = writeln!(
        out,
        "Path Type : {}\n",
        report
            .path_type
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string)
    );

    let header = join_row(HEADERS.iter().map(|h| Cell::text(*h)), &widths);
    let rule = "-".repeat(header.len());
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{rule}");
    for row in rows {
        let _ = writeln!(out, "{}", join_row(row.into_iter(), &widths));
    }
    let _ = writeln!(out, "{rule}");

    let m = &path.metrics;
    let _ = writeln!(
        out,
        "Path PB-to-PB : {} -> {} (inter-PB: {})",
        path.start_block, path.end_block, m.inter_block_count
    );
    let _ = writeln!(
        out,
        "Arrival time  : {}",
        report
            .arrival_time
            .map_or_else(|| "-".to_string(), |t| format!("{t:.precision$}"))
    );
    let _ = writeln!(
        out,
        "Path time     : {:.p$} (net: {:.p$}, pb: {:.p$})",
        m.path_time,
        m.net_time,
        m.pb_time,
        p = precision
    );
    let _ = writeln!(
        out,
        "Distances     : {} (Manhattan), {} (PB-to-PB), ratio {:.2}",
        m.manhattan_dist, m.pb2pb_dist, m.ratio_dist
    );
    if !path.subcircuits.is_empty() {
        let _ = writeln!(out, "Sub-circuits  : {}", path.subcircuits.join(", "));
    }
    out
}

fn join_row(cells: impl Iterator<Item = Cell>, widths: &[usize; 7]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| {
            if cell.numeric {
                format!("{:>width$}", cell.text)
            } else {
                format!("{:<width$}", cell.text)
            }
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    line.trim_end().to_string()
}
