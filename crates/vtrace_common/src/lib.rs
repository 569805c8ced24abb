//! Shared foundational types used across the vtrace report analysis crates.
//!
//! This crate provides the physical-block identifier, grid coordinates with
//! their distance metrics, and the common internal result type.

#![warn(missing_docs)]

pub mod coords;
pub mod ids;
pub mod result;

pub use coords::GridCoord;
pub use ids::PbId;
pub use result::{InternalError, VtraceResult};
