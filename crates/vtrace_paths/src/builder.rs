//! Fusion of one report path with placement and netlist data.

use crate::error::FusionError;
use crate::metrics::PathMetrics;
use crate::naming::resolve_instance;
use vtrace_netlist::Netlist;
use vtrace_place::{PhysicalBlock, PhysicalBlockLocator};
use vtrace_timing::{NodeType, Path, Point};

/// A report point with the block it was placed in.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedPoint<'a> {
    /// The report point.
    pub point: &'a Point,
    /// The physical block holding the point's object.
    pub block: &'a PhysicalBlock,
    /// Readable instance name, see [`resolve_instance`].
    pub instance: String,
}

/// A report path whose points are all placed.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedPath<'a> {
    /// The report path.
    pub path: &'a Path,
    /// One entry per report point, in order.
    pub points: Vec<EnrichedPoint<'a>>,
    /// `<short>[<id>]` of the startpoint, e.g. `ff[12]`.
    pub start_block: String,
    /// `<short>[<id>]` of the endpoint.
    pub end_block: String,
    /// Sub-circuit models crossed before the endpoint, first use first.
    pub subcircuits: Vec<String>,
    /// Timing split and distances.
    pub metrics: PathMetrics,
}

impl EnrichedPath<'_> {
    /// Returns the `#Path` id.
    pub fn id(&self) -> u32 {
        self.path.id
    }

    /// Returns the enriched startpoint.
    pub fn first(&self) -> &EnrichedPoint<'_> {
        &self.points[0]
    }

    /// Returns the enriched endpoint.
    pub fn last(&self) -> &EnrichedPoint<'_> {
        &self.points[self.points.len() - 1]
    }
}

/// Builds [`EnrichedPath`]s against one locator and an optional netlist.
///
/// The builder only reads its inputs, so one instance can be shared by all
/// fusion workers.
#[derive(Clone, Copy, Debug)]
pub struct PathBuilder<'a> {
    locator: &'a PhysicalBlockLocator,
    netlist: Option<&'a Netlist>,
}

impl<'a> PathBuilder<'a> {
    /// Creates a builder. Without a netlist, instance names are the raw
    /// point names.
    pub fn new(locator: &'a PhysicalBlockLocator, netlist: Option<&'a Netlist>) -> Self {
        Self { locator, netlist }
    }

    /// Enriches one path.
    ///
    /// Fails on the first point whose object is in no placed block.
    pub fn build(&self, path: &'a Path) -> Result<EnrichedPath<'a>, FusionError> {
        let points = path
            .points
            .iter()
            .map(|point| -> Result<EnrichedPoint<'a>, FusionError> {
                let block = self.locator.resolve(&point.name).ok_or_else(|| {
                    FusionError::UnresolvedPoint {
                        path_id: path.id,
                        point: point.name.clone(),
                    }
                })?;
                Ok(EnrichedPoint {
                    point,
                    block,
                    instance: resolve_instance(point, self.netlist),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (start_block, end_block) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (block_label(first), block_label(last)),
            _ => (String::new(), String::new()),
        };
        let metrics = PathMetrics::compute(&points);

        Ok(EnrichedPath {
            path,
            points,
            start_block,
            end_block,
            subcircuits: subcircuit_usage(&path.points),
            metrics,
        })
    }
}

/// `lut[3]`, `ff[12]`, `in[0]`, `dpram[5]`.
fn block_label(point: &EnrichedPoint<'_>) -> String {
    format!("{}[{}]", point.point.node_type.short_label(), point.block.id)
}

/// Distinct sub-circuit models on all points but the last.
fn subcircuit_usage(points: &[Point]) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();
    let before_end = &points[..points.len().saturating_sub(1)];
    for point in before_end {
        if let NodeType::Subcircuit(model) = &point.node_type {
            if !models.contains(model) {
                models.push(model.clone());
            }
        }
    }
    models
}
