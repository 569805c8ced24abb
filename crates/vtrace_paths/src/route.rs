//! Routing of the inter-block hops of an enriched path.
//!
//! The router's output is not parsed here; any [`RouteSource`] that can
//! answer "how was this net routed between these two tiles" can be plugged
//! in.

use crate::builder::EnrichedPath;
use vtrace_common::GridCoord;
use vtrace_place::object_name;

/// The routed wires of one net between a driver and a sink tile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteTrace {
    /// Routing graph nodes from the output pin to the input pin.
    pub node_ids: Vec<u64>,
    /// Tile of each node, parallel to `node_ids`.
    pub coords: Vec<GridCoord>,
    /// Name of the driving block's output pin.
    pub out_pin: Option<String>,
    /// Name of the sink block's input pin.
    pub in_pin: Option<String>,
}

impl RouteTrace {
    /// Returns the number of tile steps the route takes.
    pub fn wire_length(&self) -> u32 {
        self.coords.windows(2).map(|w| w[0].manhattan(w[1])).sum()
    }
}

/// Looks up routed nets.
pub trait RouteSource {
    /// Returns the route of `net` from the output pin at `start` to the input
    /// pin at `end`, or `None` when the net or either pin is unknown.
    fn route(&self, net: &str, start: GridCoord, end: GridCoord) -> Option<RouteTrace>;
}

/// One hop of a path that leaves its block.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteHop<'p> {
    /// Index of the driving point in the path.
    pub from: usize,
    /// Index of the receiving point.
    pub to: usize,
    /// Net name: the object of the driving point.
    pub net: &'p str,
    /// The route, when the source knows it.
    pub trace: Option<RouteTrace>,
}

/// Traces every block change of `path` through `source`.
pub fn trace_routes<'p, R>(path: &'p EnrichedPath<'_>, source: &R) -> Vec<RouteHop<'p>>
where
    R: RouteSource + ?Sized,
{
    path.points
        .windows(2)
        .enumerate()
        .filter(|(_, hop)| hop[0].block.id != hop[1].block.id)
        .map(|(index, hop)| {
            let net = object_name(&hop[0].point.name);
            RouteHop {
                from: index,
                to: index + 1,
                net,
                trace: source.route(net, hop[0].block.coord, hop[1].block.coord),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EnrichedPoint;
    use crate::metrics::PathMetrics;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use vtrace_common::PbId;
    use vtrace_place::PhysicalBlock;
    use vtrace_timing::{NodeType, Path, Point};

    /// Routes known nets as straight L-shaped wires and records every query.
    #[derive(Default)]
    struct MockRouter {
        nets: HashMap<String, u64>,
        queries: RefCell<Vec<(String, GridCoord, GridCoord)>>,
    }

    impl RouteSource for MockRouter {
        fn route(&self, net: &str, start: GridCoord, end: GridCoord) -> Option<RouteTrace> {
            self.queries.borrow_mut().push((net.to_string(), start, end));
            let base = *self.nets.get(net)?;
            let corner = GridCoord::new(end.x, start.y);
            Some(RouteTrace {
                node_ids: vec![base, base + 1, base + 2],
                coords: vec![start, corner, end],
                out_pin: Some("O[0]".to_string()),
                in_pin: Some("I[3]".to_string()),
            })
        }
    }

    fn point(name: &str) -> Point {
        Point {
            name: name.to_string(),
            node_type: NodeType::LogicFunction,
            t_incr: 0.1,
            t_sum: 0.1,
            edge_clock: None,
            coord: None,
        }
    }

    fn block(id: u32, x: u32, y: u32) -> PhysicalBlock {
        PhysicalBlock {
            id: PbId::from_raw(id),
            name: format!("b{id}"),
            coord: GridCoord::new(x, y),
            sub_block: 0,
            pb_type: "clb".to_string(),
        }
    }

    #[test]
    fn one_query_per_block_change() {
        let path = Path {
            id: 1,
            startpoint: "a.Q[0]".to_string(),
            endpoint: "d.in[0]".to_string(),
            path_type: None,
            arrival_time: None,
            required_time: None,
            constraint: None,
            slack_time: None,
            points: vec![point("a.Q[0]"), point("b.in[0]"), point("b.out[0]"), point("d.in[0]")],
        };
        let blocks = [block(0, 1, 1), block(1, 4, 3), block(1, 4, 3), block(2, 6, 3)];
        let points: Vec<EnrichedPoint<'_>> = path
            .points
            .iter()
            .zip(&blocks)
            .map(|(point, block)| EnrichedPoint {
                point,
                block,
                instance: point.name.clone(),
            })
            .collect();
        let metrics = PathMetrics::compute(&points);
        let enriched = EnrichedPath {
            path: &path,
            points,
            start_block: String::new(),
            end_block: String::new(),
            subcircuits: Vec::new(),
            metrics,
        };

        let mut router = MockRouter::default();
        router.nets.insert("a".to_string(), 100);
        let hops = trace_routes(&enriched, &router);

        assert_eq!(hops.len(), 2);
        assert_eq!((hops[0].from, hops[0].to, hops[0].net), (0, 1, "a"));
        assert_eq!((hops[1].from, hops[1].to, hops[1].net), (2, 3, "b"));

        let trace = hops[0].trace.as_ref().unwrap();
        assert_eq!(trace.node_ids, vec![100, 101, 102]);
        assert_eq!(trace.wire_length(), 5);
        assert!(hops[1].trace.is_none());

        let queries = router.queries.borrow();
        assert_eq!(queries[0], ("a".to_string(), GridCoord::new(1, 1), GridCoord::new(4, 3)));
        assert_eq!(queries[1], ("b".to_string(), GridCoord::new(4, 3), GridCoord::new(6, 3)));
    }
}
