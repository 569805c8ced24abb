//! Placement file (`.place`) parser.
//!
//! ```text
//! Netlist_File: top.net Netlist_ID: SHA256:5e1d...
//! Array size: 12 x 12 logic blocks
//!
//! #block name x   y   subblk  layer   block number
//! #---------- --  --  ------  -----   ------------
//! y           4   5   0       0       #3
//! ```
//!
//! The `layer` column is absent in older files and the `#id` column in some
//! hand-written ones; both are optional.

use std::collections::HashMap;
use vtrace_common::{GridCoord, PbId};
use vtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use vtrace_source::{FileId, Span};

/// A placement line that is not `name x y subblk [layer] [#id]`.
const MALFORMED_LINE: u16 = 3;
/// A second line for an already placed block.
const DUPLICATE_BLOCK: u16 = 5;

/// The location of one placed block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedBlock {
    /// Block name as written in the packed netlist.
    pub name: String,
    /// Grid tile.
    pub coord: GridCoord,
    /// Slot within the tile.
    pub sub_block: u32,
    /// Die layer; 0 for single-layer devices.
    pub layer: u32,
    /// Block number, when the file lists one.
    pub id: Option<PbId>,
}

/// All placed blocks, indexed by name and by block number.
#[derive(Clone, Debug, Default)]
pub struct PlacementTable {
    /// The packed netlist this placement was made for.
    pub netlist_file: Option<String>,
    /// Device grid width and height.
    pub array_size: Option<(u32, u32)>,
    blocks: Vec<PlacedBlock>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<PbId, usize>,
}

impl PlacementTable {
    /// Looks a block up by name.
    pub fn by_name(&self, name: &str) -> Option<&PlacedBlock> {
        self.by_name.get(name).map(|&i| &self.blocks[i])
    }

    /// Looks a block up by block number.
    pub fn by_id(&self, id: PbId) -> Option<&PlacedBlock> {
        self.by_id.get(&id).map(|&i| &self.blocks[i])
    }

    /// Returns all blocks in file order.
    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    /// Returns the number of placed blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no block was placed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn insert(&mut self, block: PlacedBlock) -> bool {
        if self.by_name.contains_key(&block.name) {
            return false;
        }
        let index = self.blocks.len();
        self.by_name.insert(block.name.clone(), index);
        if let Some(id) = block.id {
            self.by_id.entry(id).or_insert(index);
        }
        self.blocks.push(block);
        true
    }
}

/// Parses a placement file. Malformed lines are reported and skipped.
pub fn parse_placement(source: &str, file: FileId, sink: &DiagnosticSink) -> PlacementTable {
    let mut table = PlacementTable::default();

    for (span, line) in vtrace_source::lines(file, source) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("Netlist_File:") {
            table.netlist_file = rest.split_whitespace().next().map(str::to_string);
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("Array size:") {
            table.array_size = parse_array_size(rest);
            continue;
        }

        match parse_block_line(trimmed) {
            Ok(block) => {
                let name = block.name.clone();
                if !table.insert(block) {
                    sink.emit(Diagnostic::warning(
                        DiagnosticCode::new(Category::Placement, DUPLICATE_BLOCK),
                        format!("block `{name}` is placed twice; keeping the first location"),
                        span,
                    ));
                }
            }
            Err(problem) => {
                let at = match problem.token {
                    Some(token) => token_span(span, line, token),
                    None => span,
                };
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Placement, MALFORMED_LINE),
                        "malformed placement line",
                        span,
                    )
                    .with_label(Label::primary(at, problem.message)),
                );
            }
        }
    }

    table
}

/// `12 x 12 logic blocks`
fn parse_array_size(rest: &str) -> Option<(u32, u32)> {
    let mut tokens = rest.split_whitespace();
    let width = tokens.next()?.parse().ok()?;
    if tokens.next()? != "x" {
        return None;
    }
    let height = tokens.next()?.parse().ok()?;
    Some((width, height))
}

/// Why a block line was rejected, and the offending column if there is one.
struct LineProblem<'l> {
    message: String,
    token: Option<&'l str>,
}

fn parse_block_line(line: &str) -> Result<PlacedBlock, LineProblem<'_>> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let id = match tokens.last() {
        Some(last) if last.starts_with('#') => {
            let raw = &last[1..];
            let id = raw.parse().map_err(|_| LineProblem {
                message: "block number is not an integer".to_string(),
                token: Some(*last),
            })?;
            tokens.pop();
            Some(PbId::from_raw(id))
        }
        _ => None,
    };

    let (name, numbers) = match tokens.split_first() {
        Some((name, numbers)) if (3..=4).contains(&numbers.len()) => (*name, numbers),
        _ => {
            return Err(LineProblem {
                message: "expected `name x y subblk [layer] [#id]`".to_string(),
                token: None,
            });
        }
    };
    let mut values = [0u32; 4];
    for (slot, token) in values.iter_mut().zip(numbers) {
        *slot = token.parse().map_err(|_| LineProblem {
            message: "expected a non-negative integer".to_string(),
            token: Some(*token),
        })?;
    }
    let [x, y, sub_block, layer] = values;

    Ok(PlacedBlock {
        name: name.to_string(),
        coord: GridCoord::new(x, y),
        sub_block,
        layer,
        id,
    })
}

/// Returns the span of `token` within `line`.
fn token_span(line_span: Span, line: &str, token: &str) -> Span {
    match line.find(token) {
        Some(offset) => line_span.slice(offset, token.len()),
        None => line_span,
    }
}
