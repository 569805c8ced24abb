//! Packed netlist and placement parsing, and point-to-physical-block lookup.
//!
//! [`parse_hierarchy`] reads the packer's XML block tree, [`parse_placement`]
//! reads the placer's coordinate table, and [`PhysicalBlockLocator`] joins the
//! two into a flat name index so every timing-report point can be mapped to
//! the physical block and grid tile it was placed on.

#![warn(missing_docs)]

pub mod coords;
pub mod hierarchy;
pub mod locator;
pub mod xml;

pub use coords::{parse_placement, PlacedBlock, PlacementTable};
pub use hierarchy::{
    parse_hierarchy, HierarchyError, PbNode, PinLookup, PlacementHierarchy, Port, PortDirection,
};
pub use locator::{object_name, PhysicalBlock, PhysicalBlockLocator};
