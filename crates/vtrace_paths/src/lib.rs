//! Path fusion: timing report paths joined with placement and netlist data.
//!
//! [`PathBuilder`] turns one report [`Path`](vtrace_timing::Path) into an
//! [`EnrichedPath`] whose points know the physical block they were placed in
//! and the readable instance name they come from, together with the path's
//! [`PathMetrics`]. [`enrich_paths`] does this for a whole report on a
//! worker pool; [`trace_routes`] follows each inter-block hop through a
//! [`RouteSource`].

#![warn(missing_docs)]

pub mod batch;
pub mod builder;
pub mod error;
pub mod metrics;
pub mod naming;
pub mod record;
pub mod route;
pub mod table;

pub use batch::enrich_paths;
pub use builder::{EnrichedPath, EnrichedPoint, PathBuilder};
pub use error::FusionError;
pub use metrics::PathMetrics;
pub use naming::{resolve_instance, strip_artifacts};
pub use record::PathRecord;
pub use route::{trace_routes, RouteHop, RouteSource, RouteTrace};
pub use table::render_path;
