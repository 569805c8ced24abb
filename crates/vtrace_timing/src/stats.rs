//! Report-level information, statistics and startpoint groups.

use crate::point::Path;
use indexmap::IndexMap;
use serde::Serialize;

/// Values from the report's comment header.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReportInfo {
    /// `# Unit scale:` in seconds.
    pub unit_scale: Option<f64>,
    /// `# Output precision:` in decimal places.
    pub precision: Option<u32>,
}

/// Arrival time spread of a report sorted worst path first.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReportStats {
    /// Number of parsed paths.
    pub path_count: usize,
    /// Arrival time of the first path.
    pub highest_arrival_time: Option<f64>,
    /// Arrival time of the last path.
    pub lowest_arrival_time: Option<f64>,
    /// `|highest| - |lowest|`.
    pub arrival_time_deviation: Option<f64>,
}

impl ReportStats {
    /// Computes the statistics of `paths`.
    pub fn compute(paths: &[Path]) -> Self {
        let high = paths.first().and_then(|p| p.arrival_time);
        let low = paths.last().and_then(|p| p.arrival_time);
        Self {
            path_count: paths.len(),
            highest_arrival_time: high,
            lowest_arrival_time: low,
            arrival_time_deviation: high.zip(low).map(|(h, l)| h.abs() - l.abs()),
        }
    }
}

/// Paths sharing one startpoint, typically the bits of one bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathGroup {
    /// Endpoints in report order; the first is the group's representative.
    pub endpoints: Vec<String>,
    /// Number of paths in the group.
    pub total: usize,
}

impl PathGroup {
    /// Returns the endpoint of the group's first path.
    pub fn first_endpoint(&self) -> &str {
        &self.endpoints[0]
    }
}

/// Groups keyed by startpoint, in order of first appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathGroups {
    groups: IndexMap<String, PathGroup>,
}

impl PathGroups {
    /// Groups `paths` by startpoint.
    pub fn from_paths(paths: &[Path]) -> Self {
        let mut groups: IndexMap<String, PathGroup> = IndexMap::new();
        for path in paths {
            groups
                .entry(path.startpoint.clone())
                .and_modify(|g| {
                    g.endpoints.push(path.endpoint.clone());
                    g.total += 1;
                })
                .or_insert_with(|| PathGroup {
                    endpoints: vec![path.endpoint.clone()],
                    total: 1,
                });
        }
        Self { groups }
    }

    /// Returns the group of a startpoint.
    pub fn get(&self, startpoint: &str) -> Option<&PathGroup> {
        self.groups.get(startpoint)
    }

    /// Iterates over `(startpoint, group)` in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathGroup)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of distinct startpoints.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no paths.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(id: u32, start: &str, end: &str, arrival: Option<f64>) -> Path {
        Path {
            id,
            startpoint: start.to_string(),
            endpoint: end.to_string(),
            path_type: None,
            arrival_time: arrival,
            required_time: None,
            constraint: None,
            slack_time: None,
            points: Vec::new(),
        }
    }

    #[test]
    fn stats_use_first_and_last_path() {
        let paths = vec![
            path(1, "a", "x", Some(-3.5)),
            path(2, "b", "y", Some(2.0)),
            path(3, "c", "z", Some(1.25)),
        ];
        let stats = ReportStats::compute(&paths);
        assert_eq!(stats.path_count, 3);
        assert_eq!(stats.highest_arrival_time, Some(-3.5));
        assert_eq!(stats.lowest_arrival_time, Some(1.25));
        assert_eq!(stats.arrival_time_deviation, Some(2.25));
    }

    #[test]
    fn stats_of_empty_report() {
        let stats = ReportStats::compute(&[]);
        assert_eq!(stats.path_count, 0);
        assert_eq!(stats.arrival_time_deviation, None);
    }

    #[test]
    fn groups_keep_insertion_order() {
        let paths = vec![
            path(1, "bus[1]", "r1", None),
            path(2, "bus[0]", "r0", None),
            path(3, "bus[1]", "r2", None),
            path(4, "bus[1]", "r3", None),
        ];
        let groups = PathGroups::from_paths(&paths);
        assert_eq!(groups.len(), 2);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["bus[1]", "bus[0]"]);
        let g = groups.get("bus[1]").unwrap();
        assert_eq!(g.total, 3);
        assert_eq!(g.endpoints, vec!["r1", "r2", "r3"]);
        assert_eq!(g.first_endpoint(), "r1");
    }

    #[test]
    fn groups_serialize_as_map() {
        let groups = PathGroups::from_paths(&[path(1, "a", "b", None)]);
        let json = serde_json::to_value(&groups).unwrap();
        assert_eq!(json["a"]["total"], 1);
    }
}
