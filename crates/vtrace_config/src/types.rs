//! Configuration types deserialized from `vtrace.toml`.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// The top-level analysis configuration parsed from `vtrace.toml`.
///
/// Every section is optional; an empty file analyzes the current directory
/// with the defaults below.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VtraceConfig {
    /// Locations of the four input reports.
    #[serde(default)]
    pub inputs: InputsConfig,
    /// Parsing and fusion settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Where to find the input reports.
///
/// Explicit paths are relative to the directory holding `vtrace.toml`. Any
/// path left out is discovered under [`search_dir`](Self::search_dir).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    /// Root of the recursive search for inputs that are not named explicitly.
    #[serde(default)]
    pub search_dir: Option<PathBuf>,
    /// The synthesized netlist (`.blif` / `.eblif`). Optional.
    #[serde(default)]
    pub netlist: Option<PathBuf>,
    /// The packed netlist (`.net`).
    #[serde(default)]
    pub hierarchy: Option<PathBuf>,
    /// The placement file (`.place`).
    #[serde(default)]
    pub placement: Option<PathBuf>,
    /// The timing report (`.rpt`).
    #[serde(default)]
    pub timing: Option<PathBuf>,
}

/// Parsing and fusion settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Which timing check's report to discover.
    #[serde(default)]
    pub check: CheckType,
    /// Discover the pre-packing timing report instead of the final one.
    #[serde(default)]
    pub pre_pack: bool,
    /// Stop parsing after the path with this id.
    #[serde(default)]
    pub max_paths: Option<u32>,
    /// Number of fusion workers; 0 picks one per core.
    #[serde(default)]
    pub jobs: usize,
    /// Decimal precision used when the report does not state one.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

fn default_precision() -> u32 {
    3
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            check: CheckType::default(),
            pre_pack: false,
            max_paths: None,
            jobs: 0,
            precision: default_precision(),
        }
    }
}

impl AnalysisConfig {
    /// Returns the file name of the timing report this configuration selects,
    /// e.g. `pre_pack.report_timing.hold.rpt`.
    pub fn timing_report_name(&self) -> String {
        let prefix = if self.pre_pack { "pre_pack." } else { "" };
        format!("{prefix}report_timing.{}.rpt", self.check)
    }
}

/// Timing check selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    /// Setup (max-delay) analysis.
    #[default]
    Setup,
    /// Hold (min-delay) analysis.
    Hold,
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckType::Setup => write!(f, "setup"),
            CheckType::Hold => write!(f, "hold"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_names() {
        let mut analysis = AnalysisConfig::default();
        assert_eq!(analysis.timing_report_name(), "report_timing.setup.rpt");
        analysis.check = CheckType::Hold;
        analysis.pre_pack = true;
        assert_eq!(
            analysis.timing_report_name(),
            "pre_pack.report_timing.hold.rpt"
        );
    }

    #[test]
    fn defaults() {
        let config = VtraceConfig::default();
        assert!(config.inputs.search_dir.is_none());
        assert_eq!(config.analysis.precision, 3);
        assert_eq!(config.analysis.jobs, 0);
        assert_eq!(config.analysis.check, CheckType::Setup);
    }
}
