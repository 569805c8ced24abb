//! Flat, owned export rows of enriched paths.

use crate::builder::EnrichedPath;
use serde::Serialize;

/// One enriched path as a flat row of scalars, for JSON lines or tables.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathRecord {
    /// `#Path` id.
    pub id: u32,
    /// Startpoint name.
    pub start_point: String,
    /// Endpoint name.
    pub end_point: String,
    /// Readable startpoint instance.
    pub start_inst: String,
    /// Readable endpoint instance.
    pub end_inst: String,
    /// Startpoint block label.
    pub start_pb: String,
    /// Endpoint block label.
    pub end_pb: String,
    /// Sub-circuit models crossed, comma separated.
    pub subckts: String,
    /// Startpoint block column.
    pub start_x: u32,
    /// Startpoint block row.
    pub start_y: u32,
    /// Endpoint block column.
    pub end_x: u32,
    /// Endpoint block row.
    pub end_y: u32,
    /// Number of points, startpoint and endpoint included.
    pub point_count: usize,
    /// Block changes minus one.
    pub nb_pbs: usize,
    /// Start to end Manhattan distance.
    pub manhattan_dist: u32,
    /// Start to end Euclidean distance.
    pub euclidean_dist: f64,
    /// Summed point to point distance.
    pub pb2pb_dist: u32,
    /// `pb2pb_dist / manhattan_dist`.
    pub ratio_dist: f64,
    /// Check the path belongs to.
    pub path_type: Option<String>,
    /// Slack.
    pub slack_time: Option<f64>,
    /// Data arrival time.
    pub arrival_time: Option<f64>,
    /// Data required time.
    pub required_time: Option<f64>,
    /// Slack verdict, e.g. `MET` or `VIOLATED`.
    pub constraint: Option<String>,
    /// Startpoint to endpoint delay.
    pub path_time: f64,
    /// Inter-block delay.
    pub net_time: f64,
    /// Intra-block delay.
    pub pb_time: f64,
}

impl EnrichedPath<'_> {
    /// Flattens the path into an owned [`PathRecord`].
    pub fn to_record(&self) -> PathRecord {
        let first = self.first();
        let last = self.last();
        let path = self.path;
        let metrics = &self.metrics;
        PathRecord {
            id: path.id,
            start_point: path.startpoint.clone(),
            end_point: path.endpoint.clone(),
            start_inst: first.instance.clone(),
            end_inst: last.instance.clone(),
            start_pb: self.start_block.clone(),
            end_pb: self.end_block.clone(),
            subckts: self.subcircuits.join(","),
            start_x: first.block.coord.x,
            start_y: first.block.coord.y,
            end_x: last.block.coord.x,
            end_y: last.block.coord.y,
            point_count: metrics.point_count,
            nb_pbs: metrics.inter_block_count,
            manhattan_dist: metrics.manhattan_dist,
            euclidean_dist: metrics.euclidean_dist,
            pb2pb_dist: metrics.pb2pb_dist,
            ratio_dist: metrics.ratio_dist,
            path_type: path.path_type.as_ref().map(ToString::to_string),
            slack_time: path.slack_time,
            arrival_time: path.arrival_time,
            required_time: path.required_time,
            constraint: path.constraint.clone(),
            path_time: metrics.path_time,
            net_time: metrics.net_time,
            pb_time: metrics.pb_time,
        }
    }
}
