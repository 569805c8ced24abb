//! BLIF / extended BLIF netlist model and parser.
//!
//! The synthesized netlist is the only place the report-timing point names
//! (`<output>.<pin>`) can be mapped back to the signals and instance names of
//! the original design. [`parse_netlist`] builds a [`Netlist`] of [`Model`]s;
//! [`Netlist::get_pin`] and [`Netlist::get_instance`] answer those lookups.

#![warn(missing_docs)]

pub mod model;
pub mod parser;

pub use model::{
    split_point, Annotations, LatchNode, LatchTrigger, LogicNode, Model, Netlist, PinKind,
    SubcircuitInstance,
};
pub use parser::parse_netlist;
