//! Point name to physical block resolution.

use crate::coords::PlacementTable;
use crate::hierarchy::PlacementHierarchy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use vtrace_common::{GridCoord, PbId};
use vtrace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use vtrace_source::Span;

/// A physical block whose instance name has no `[index]`.
const UNNUMBERED_BLOCK: u16 = 2;
/// A physical block missing from the placement file.
const UNPLACED_BLOCK: u16 = 4;

/// A placed physical block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalBlock {
    /// Index from the block's instance name.
    pub id: PbId,
    /// Block name in the packed netlist.
    pub name: String,
    /// Grid tile.
    pub coord: GridCoord,
    /// Slot within the tile.
    pub sub_block: u32,
    /// Type from the instance name (`clb`, `memory`, `dsp`, `io`, ...).
    pub pb_type: String,
}

impl fmt::Display for PhysicalBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] at {}", self.pb_type, self.id, self.coord)
    }
}

/// Returns the object part of a point name: everything before the last `.`,
/// or the whole name when it has none.
pub fn object_name(point: &str) -> &str {
    point.rsplit_once('.').map_or(point, |(object, _)| object)
}

/// Flat index from every block name inside a physical block to that block.
///
/// Built once; there is no way to modify it afterwards, so it can be shared
/// by reference between fusion workers.
#[derive(Clone, Debug, Default)]
pub struct PhysicalBlockLocator {
    blocks: Vec<PhysicalBlock>,
    index: HashMap<String, usize>,
}

impl PhysicalBlockLocator {
    /// Builds the index from the packed netlist and the placement.
    ///
    /// Each used physical block contributes its own name and the names of all
    /// used blocks nested in it. When two physical blocks claim the same name
    /// the first one in file order keeps it. Blocks without an instance index
    /// or without a placement line are reported and left out.
    pub fn build(
        hierarchy: &PlacementHierarchy,
        placement: &PlacementTable,
        sink: &DiagnosticSink,
    ) -> Self {
        let mut locator = Self::default();

        for node in hierarchy.physical_blocks().iter().filter(|b| !b.is_open()) {
            let (pb_type, index) = node.instance_parts();
            let Some(index) = index else {
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::new(Category::Placement, UNNUMBERED_BLOCK),
                    format!(
                        "physical block `{}` has no index in instance `{}`",
                        node.name, node.instance
                    ),
                    Span::DUMMY,
                ));
                continue;
            };
            let id = PbId::from_raw(index);

            let Some(placed) = placement
                .by_id(id)
                .or_else(|| placement.by_name(&node.name))
            else {
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Placement, UNPLACED_BLOCK),
                        format!("physical block `{}` ({}) is not placed", node.name, node.instance),
                        Span::DUMMY,
                    )
                    .with_note("points inside it cannot be resolved"),
                );
                continue;
            };

            let slot = locator.blocks.len();
            locator.blocks.push(PhysicalBlock {
                id,
                name: node.name.clone(),
                coord: placed.coord,
                sub_block: placed.sub_block,
                pb_type: pb_type.to_string(),
            });

            let index = &mut locator.index;
            index.entry(node.name.clone()).or_insert(slot);
            node.for_each_descendant_name(&mut |name| {
                index.entry(name.to_string()).or_insert(slot);
            });
        }

        locator
    }

    /// Returns the physical block holding the object of `point`.
    pub fn resolve(&self, point: &str) -> Option<&PhysicalBlock> {
        self.index
            .get(object_name(point))
            .map(|&slot| &self.blocks[slot])
    }

    /// Returns the physical block with the given id.
    pub fn get(&self, id: PbId) -> Option<&PhysicalBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Returns all indexed physical blocks in file order.
    pub fn blocks(&self) -> &[PhysicalBlock] {
        &self.blocks
    }

    /// Returns the number of indexed names.
    pub fn name_count(&self) -> usize {
        self.index.len()
    }
}
