//! Input resolution: turning a configuration into concrete report paths.

use crate::error::ConfigError;
use crate::types::VtraceConfig;
use std::path::{Path, PathBuf};

/// The four report paths an analysis reads, all existing-or-explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    /// The synthesized netlist, when one was named or found.
    pub netlist: Option<PathBuf>,
    /// The packed netlist.
    pub hierarchy: PathBuf,
    /// The placement file.
    pub placement: PathBuf,
    /// The timing report.
    pub timing: PathBuf,
}

/// Resolves the configured inputs relative to `base_dir` (the directory of
/// `vtrace.toml`, or the working directory when there is none).
///
/// Explicitly named files are returned as given, joined onto `base_dir`;
/// they are not checked for existence here so a missing report surfaces as a
/// load error naming that file. Unnamed inputs are discovered by a recursive
/// walk of the search directory, visiting entries in sorted order:
///
/// - netlist: the first `*.eblif`, else the first `*.blif`, else none;
/// - hierarchy: the first `*.net`;
/// - placement: the first `*.place`;
/// - timing: the first file named after [`AnalysisConfig::timing_report_name`](crate::AnalysisConfig::timing_report_name).
pub fn resolve_inputs(config: &VtraceConfig, base_dir: &Path) -> Result<ResolvedInputs, ConfigError> {
    let inputs = &config.inputs;
    let search_dir = match &inputs.search_dir {
        Some(dir) => base_dir.join(dir),
        None => base_dir.to_path_buf(),
    };

    let explicit = |p: &Option<PathBuf>| p.as_ref().map(|p| base_dir.join(p));
    let all_named = inputs.netlist.is_some()
        && inputs.hierarchy.is_some()
        && inputs.placement.is_some()
        && inputs.timing.is_some();

    let mut candidates = Vec::new();
    if !all_named {
        walk_dir(&search_dir, &mut candidates)?;
    }
    let find = |pred: &dyn Fn(&Path) -> bool| candidates.iter().find(|p| pred(p)).cloned();
    let has_ext = |ext: &'static str| move |p: &Path| p.extension().is_some_and(|e| e == ext);

    let missing = |kind: &str| ConfigError::MissingInput {
        kind: kind.to_string(),
        search_dir: search_dir.display().to_string(),
    };

    let netlist = explicit(&inputs.netlist)
        .or_else(|| find(&has_ext("eblif")))
        .or_else(|| find(&has_ext("blif")));
    let hierarchy = explicit(&inputs.hierarchy)
        .or_else(|| find(&has_ext("net")))
        .ok_or_else(|| missing("packed netlist"))?;
    let placement = explicit(&inputs.placement)
        .or_else(|| find(&has_ext("place")))
        .ok_or_else(|| missing("placement"))?;
    let report_name = config.analysis.timing_report_name();
    let timing = explicit(&inputs.timing)
        .or_else(|| find(&|p: &Path| p.file_name().is_some_and(|n| n == report_name.as_str())))
        .ok_or_else(|| missing("timing report"))?;

    Ok(ResolvedInputs {
        netlist,
        hierarchy,
        placement,
        timing,
    })
}

/// Recursively collects every regular file under `dir`, depth first, with the
/// entries of each directory sorted by name.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ConfigError> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use std::fs;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn discovers_inputs_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "run/top.blif");
        touch(dir.path(), "run/top.eblif");
        touch(dir.path(), "run/vpr/top.net");
        touch(dir.path(), "run/vpr/top.place");
        touch(dir.path(), "run/vpr/report_timing.setup.rpt");
        touch(dir.path(), "run/vpr/report_timing.hold.rpt");

        let config = load_config_from_str("[inputs]\nsearch_dir = \"run\"\n").unwrap();
        let resolved = resolve_inputs(&config, dir.path()).unwrap();
        assert_eq!(resolved.netlist, Some(dir.path().join("run/top.eblif")));
        assert_eq!(resolved.hierarchy, dir.path().join("run/vpr/top.net"));
        assert_eq!(resolved.placement, dir.path().join("run/vpr/top.place"));
        assert_eq!(
            resolved.timing,
            dir.path().join("run/vpr/report_timing.setup.rpt")
        );
    }

    #[test]
    fn pre_pack_hold_report() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "top.net");
        touch(dir.path(), "top.place");
        touch(dir.path(), "report_timing.hold.rpt");
        touch(dir.path(), "pre_pack.report_timing.hold.rpt");

        let config =
            load_config_from_str("[analysis]\ncheck = \"hold\"\npre_pack = true\n").unwrap();
        let resolved = resolve_inputs(&config, dir.path()).unwrap();
        assert_eq!(
            resolved.timing,
            dir.path().join("pre_pack.report_timing.hold.rpt")
        );
        assert!(resolved.netlist.is_none());
    }

    #[test]
    fn explicit_paths_skip_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from_str(
            r#"
[inputs]
search_dir = "does/not/exist"
netlist = "a.blif"
hierarchy = "a.net"
placement = "a.place"
timing = "a.rpt"
"#,
        )
        .unwrap();
        let resolved = resolve_inputs(&config, dir.path()).unwrap();
        assert_eq!(resolved.timing, dir.path().join("a.rpt"));
        assert_eq!(resolved.netlist, Some(dir.path().join("a.blif")));
    }

    #[test]
    fn missing_placement_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "top.net");
        touch(dir.path(), "report_timing.setup.rpt");
        let config = load_config_from_str("").unwrap();
        let err = resolve_inputs(&config, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingInput { kind, .. } if kind == "placement"));
    }

    #[test]
    fn missing_search_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from_str("[inputs]\nsearch_dir = \"nope\"\n").unwrap();
        let err = resolve_inputs(&config, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
