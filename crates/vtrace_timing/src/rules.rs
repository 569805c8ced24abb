//! Single-line patterns of the timing report.
//!
//! Header and summary lines are matched against [`HEADER_RULES`] in order and
//! the first rule that matches decides what the line is. Every pattern is
//! anchored at the start of the line.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// The field a header or summary line provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderField {
    /// `# Unit scale: 1e-09 seconds`
    UnitScale,
    /// `# Output precision: 3`
    Precision,
    /// `#Path 12`
    PathId,
    /// `Startpoint: a.Q[0] (.latch clocked by clk)`
    Startpoint,
    /// `Endpoint  : b.D[0] (.latch clocked by clk)`
    Endpoint,
    /// `Path Type : setup`
    PathType,
    /// `data arrival time     1.234`
    ArrivalTime,
    /// `data required time    0.987`
    RequiredTime,
    /// `slack (VIOLATED)     -0.247`; ends the path.
    Slack,
}

/// Header rules in priority order.
pub const HEADER_RULES: [(HeaderField, &str); 9] = [
    (HeaderField::UnitScale, r"^# Unit scale: (\S+) seconds"),
    (HeaderField::Precision, r"^# Output precision: (\d+)"),
    (HeaderField::PathId, r"^#Path (\d+)"),
    (HeaderField::Startpoint, r"^Startpoint:\s+(\S+)"),
    (HeaderField::Endpoint, r"^Endpoint\s*:\s+(\S+)"),
    (HeaderField::PathType, r"^Path Type\s*:\s+(\S+)"),
    (HeaderField::ArrivalTime, r"^data arrival time\s+([\d.]+)"),
    (HeaderField::RequiredTime, r"^data required time\s+([\d.-]+)"),
    (HeaderField::Slack, r"^slack\s+\((\w+)\)\s+([\d.-]+)"),
];

static COMPILED_RULES: LazyLock<Vec<(HeaderField, Regex)>> = LazyLock::new(|| {
    HEADER_RULES
        .iter()
        .map(|&(field, pattern)| (field, Regex::new(pattern).unwrap()))
        .collect()
});

/// A point line: name, node type with optional location, optional edge tag,
/// incremental and cumulative delay.
static POINT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\S+)\s+\(([\w.]+)\s*(?:at \((\d+),(\d+)\))?\)\s+(?:\[([\w-]+)\])?\s+([\d.-]+)\s+([\d.-]+)",
    )
    .unwrap()
});

/// The endpoint line: like a point line, without an edge tag.
static END_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+\(([\w.]+)\s*(?:at \((\d+),(\d+)\))?\)\s+([\d.-]+)\s+([\d.-]+)").unwrap()
});

/// A net line: `| (description) incr sum`.
static NET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|\s+\((.+)\)\s+([\d.-]+)\s+([\d.-]+)").unwrap());

/// The text captured by a header rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderMatch<'l> {
    /// Which rule matched.
    pub field: HeaderField,
    /// The value; for [`HeaderField::Slack`] the slack itself.
    pub value: &'l str,
    /// The constraint name of a slack line.
    pub constraint: Option<&'l str>,
}

/// Returns the first header rule matching `line`.
pub fn match_header(line: &str) -> Option<HeaderMatch<'_>> {
    COMPILED_RULES.iter().find_map(|(field, regex)| {
        let caps = regex.captures(line)?;
        let (value, constraint) = match field {
            HeaderField::Slack => (group(&caps, 2)?, Some(group(&caps, 1)?)),
            _ => (group(&caps, 1)?, None),
        };
        Some(HeaderMatch {
            field: *field,
            value,
            constraint,
        })
    })
}

fn group<'l>(caps: &Captures<'l>, index: usize) -> Option<&'l str> {
    caps.get(index).map(|m| m.as_str())
}

/// The raw fields of a point or endpoint line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointMatch<'l> {
    /// Point name.
    pub name: &'l str,
    /// Node type tag.
    pub node_type: &'l str,
    /// `at (x,y)` coordinates.
    pub coord: Option<(&'l str, &'l str)>,
    /// Edge tag without brackets.
    pub edge_clock: Option<&'l str>,
    /// Incremental delay.
    pub incr: &'l str,
    /// Cumulative delay.
    pub sum: &'l str,
}

/// Matches a point line.
pub fn match_point(line: &str) -> Option<PointMatch<'_>> {
    let caps = POINT_LINE.captures(line)?;
    Some(PointMatch {
        name: group(&caps, 1)?,
        node_type: group(&caps, 2)?,
        coord: group(&caps, 3).zip(group(&caps, 4)),
        edge_clock: group(&caps, 5),
        incr: group(&caps, 6)?,
        sum: group(&caps, 7)?,
    })
}

/// Matches an endpoint line and returns its point name.
pub fn match_end(line: &str) -> Option<&str> {
    END_LINE.captures(line).and_then(|caps| group(&caps, 1))
}

/// Matches a net line and returns its incremental delay.
pub fn match_net(line: &str) -> Option<&str> {
    NET_LINE.captures(line).and_then(|caps| group(&caps, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(line: &str) -> Option<HeaderField> {
        match_header(line).map(|m| m.field)
    }

    #[test]
    fn every_header_line_has_its_rule() {
        assert_eq!(field("# Unit scale: 1e-09 seconds"), Some(HeaderField::UnitScale));
        assert_eq!(field("# Output precision: 3"), Some(HeaderField::Precision));
        assert_eq!(field("#Path 12"), Some(HeaderField::PathId));
        assert_eq!(
            field("Startpoint: a.Q[0] (.latch clocked by clk)"),
            Some(HeaderField::Startpoint)
        );
        assert_eq!(
            field("Endpoint  : b.D[0] (.latch clocked by clk)"),
            Some(HeaderField::Endpoint)
        );
        assert_eq!(field("Path Type : setup"), Some(HeaderField::PathType));
        assert_eq!(field("data arrival time   1.234"), Some(HeaderField::ArrivalTime));
        assert_eq!(field("data required time  -0.5"), Some(HeaderField::RequiredTime));
        assert_eq!(field("slack (MET)  0.250"), Some(HeaderField::Slack));
    }

    #[test]
    fn rules_are_in_priority_order() {
        let order: Vec<HeaderField> = HEADER_RULES.iter().map(|(f, _)| *f).collect();
        assert_eq!(
            order,
            vec![
                HeaderField::UnitScale,
                HeaderField::Precision,
                HeaderField::PathId,
                HeaderField::Startpoint,
                HeaderField::Endpoint,
                HeaderField::PathType,
                HeaderField::ArrivalTime,
                HeaderField::RequiredTime,
                HeaderField::Slack,
            ]
        );
    }

    #[test]
    fn no_line_is_claimed_by_a_later_rule() {
        // Each sample line matches its own rule and no earlier one, so the
        // ordering never hides a field.
        let samples = [
            "# Unit scale: 1e-09 seconds",
            "# Output precision: 3",
            "#Path 1",
            "Startpoint: a.Q[0]",
            "Endpoint : y.outpad[0]",
            "Path Type : hold",
            "data arrival time 2.0",
            "data required time 2.5",
            "slack (MET) 0.5",
        ];
        for (index, line) in samples.iter().enumerate() {
            let matching: Vec<usize> = COMPILED_RULES
                .iter()
                .enumerate()
                .filter(|(_, (_, re))| re.is_match(line))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(matching, vec![index], "line {line:?}");
        }
    }

    #[test]
    fn anchored_at_line_start() {
        assert_eq!(field("  #Path 3"), None);
        assert_eq!(field("x Startpoint: a"), None);
    }

    #[test]
    fn negative_arrival_is_not_a_header() {
        // The summary block repeats the arrival time negated.
        assert_eq!(field("data arrival time  -1.234"), None);
    }

    #[test]
    fn slack_captures_constraint() {
        let m = match_header("slack (VIOLATED)   -0.247").unwrap();
        assert_eq!(m.value, "-0.247");
        assert_eq!(m.constraint, Some("VIOLATED"));
    }

    #[test]
    fn point_line_fields() {
        let m = match_point("a.Q[0] (.latch at (1,2)) [clock-to-output]    0.000     0.242")
            .unwrap();
        assert_eq!(m.name, "a.Q[0]");
        assert_eq!(m.node_type, ".latch");
        assert_eq!(m.coord, Some(("1", "2")));
        assert_eq!(m.edge_clock, Some("clock-to-output"));
        assert_eq!(m.incr, "0.000");
        assert_eq!(m.sum, "0.242");

        let m = match_point("n1.in[0] (.names)        0.100     0.342").unwrap();
        assert_eq!(m.coord, None);
        assert_eq!(m.edge_clock, None);
    }

    #[test]
    fn point_line_needs_padding_before_delays() {
        assert!(match_point("n1.in[0] (.names) 0.100 0.342").is_none());
        assert!(match_point("clock clk (rise edge)     0.000     0.000").is_none());
    }

    #[test]
    fn endpoint_line() {
        assert_eq!(match_end("b.D[0] (.latch at (3,4)) 0.000 1.234"), Some("b.D[0]"));
        assert_eq!(match_end("a.Q[0] (.latch) [clock-to-output]  0.0  0.2"), None);
    }

    #[test]
    fn net_line() {
        assert_eq!(match_net("| (intra 'clb' routing)     0.085     1.200"), Some("0.085"));
        assert_eq!(match_net("| (primitive '.names' combinational delay)  0.2  1.4"), Some("0.2"));
        assert_eq!(match_net("n1.in[0] (.names)   0.1   0.2"), None);
    }
}
