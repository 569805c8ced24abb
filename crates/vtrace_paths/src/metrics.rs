//! Timing split and placement distances of an enriched path.

use crate::builder::EnrichedPoint;
use serde::Serialize;

/// Path-level figures derived from the placed points.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PathMetrics {
    /// Number of points on the path, startpoint and endpoint included.
    pub point_count: usize,
    /// Block changes along the path, minus one.
    pub inter_block_count: usize,
    /// Endpoint cumulative delay minus startpoint cumulative delay.
    pub path_time: f64,
    /// Delay of hops that change block.
    pub net_time: f64,
    /// Delay of hops within one block.
    pub pb_time: f64,
    /// Start to end, in tiles.
    pub manhattan_dist: u32,
    /// Start to end, straight line.
    pub euclidean_dist: f64,
    /// Sum of Manhattan distances between consecutive points.
    pub pb2pb_dist: u32,
    /// `pb2pb_dist / manhattan_dist`; 1.0 when start and end share a tile.
    pub ratio_dist: f64,
}

impl PathMetrics {
    /// Computes the metrics of a path's points.
    ///
    /// Every hop is charged to `net_time` when it enters a different block
    /// and to `pb_time` otherwise, with the increment of the point it lands
    /// on. Distances use the block tiles, not the report's own locations.
    pub fn compute(points: &[EnrichedPoint<'_>]) -> Self {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Self::default();
        };

        let mut transitions = 0usize;
        let mut net_time = 0.0;
        let mut pb_time = 0.0;
        let mut pb2pb_dist = 0;
        for hop in points.windows(2) {
            let (from, to) = (&hop[0], &hop[1]);
            if from.block.id == to.block.id {
                pb_time += to.point.t_incr;
            } else {
                net_time += to.point.t_incr;
                transitions += 1;
            }
            pb2pb_dist += from.block.coord.manhattan(to.block.coord);
        }

        let start = first.block.coord;
        let end = last.block.coord;
        let manhattan_dist = start.manhattan(end);
        let ratio_dist = if manhattan_dist == 0 {
            1.0
        } else {
            f64::from(pb2pb_dist) / f64::from(manhattan_dist)
        };

        Self {
            point_count: points.len(),
            inter_block_count: transitions.saturating_sub(1),
            path_time: last.point.t_sum - first.point.t_sum,
            net_time,
            pb_time,
            manhattan_dist,
            euclidean_dist: start.euclidean(end),
            pb2pb_dist,
            ratio_dist,
        }
    }
}
