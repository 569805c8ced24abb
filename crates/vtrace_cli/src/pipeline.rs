//! Shared pipeline helpers for CLI commands.
//!
//! Every command goes through the same steps:
//!
//! 1. Load `vtrace.toml` (from `--config`, else the working directory)
//! 2. Apply the command-line input overrides
//! 3. Resolve the report paths
//! 4. Load the reports into a [`SourceDb`]
//! 5. Parse them in parallel and build the block locator
//! 6. Render the collected diagnostics

use std::error::Error;
use std::path::{Path, PathBuf};

use vtrace_config::{
    load_config, load_config_file, resolve_inputs, CheckType, ResolvedInputs, VtraceConfig,
    CONFIG_FILE_NAME,
};
use vtrace_diagnostics::{
    Category, Diagnostic, DiagnosticCode, DiagnosticRenderer, DiagnosticSink, TerminalRenderer,
};
use vtrace_netlist::{parse_netlist, Netlist};
use vtrace_place::{parse_hierarchy, parse_placement, PhysicalBlockLocator, PlacementHierarchy};
use vtrace_source::{FileId, LoadError, SourceDb, Span};
use vtrace_timing::{parse_report, ReportOptions, TimingReport};

use crate::{CheckArg, GlobalArgs, InputArgs};

/// A named input file that does not exist.
const INPUT_NOT_FOUND: u16 = 1;
/// A named input file that exists but cannot be read.
const INPUT_UNREADABLE: u16 = 2;

/// Terminal width used for diagnostic source lines.
const RENDER_WIDTH: u16 = 100;

/// The effective configuration and the report paths it resolves to.
pub struct Settings {
    /// Configuration after command-line overrides.
    pub config: VtraceConfig,
    /// Concrete input paths.
    pub inputs: ResolvedInputs,
}

impl Settings {
    /// Parser options from the `[analysis]` section.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            max_paths: self.config.analysis.max_paths,
            default_precision: self.config.analysis.precision,
        }
    }
}

/// Loads the configuration, applies `args` on top of it and resolves the
/// input paths.
pub fn load_settings(args: &InputArgs, global: &GlobalArgs) -> Result<Settings, Box<dyn Error>> {
    let cwd = std::env::current_dir()?;
    let (mut config, base_dir) = match &global.config {
        Some(path) => {
            let path = PathBuf::from(path);
            let base_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| cwd.clone(), Path::to_path_buf);
            (load_config_file(&path)?, base_dir)
        }
        None if cwd.join(CONFIG_FILE_NAME).is_file() => (load_config(&cwd)?, cwd.clone()),
        None => (VtraceConfig::default(), cwd.clone()),
    };
    apply_overrides(&mut config, args, &cwd);
    let inputs = resolve_inputs(&config, &base_dir)?;
    Ok(Settings { config, inputs })
}

/// Replaces configuration values with the ones given on the command line.
///
/// Command-line paths are made absolute against `cwd` so they do not
/// depend on where `vtrace.toml` lives.
fn apply_overrides(config: &mut VtraceConfig, args: &InputArgs, cwd: &Path) {
    let here = |p: &Option<PathBuf>| p.as_ref().map(|p| cwd.join(p));
    let inputs = &mut config.inputs;
    if let Some(dir) = here(&args.search_dir) {
        inputs.search_dir = Some(dir);
    }
    if let Some(path) = here(&args.netlist) {
        inputs.netlist = Some(path);
    }
    if let Some(path) = here(&args.hierarchy) {
        inputs.hierarchy = Some(path);
    }
    if let Some(path) = here(&args.placement) {
        inputs.placement = Some(path);
    }
    if let Some(path) = here(&args.timing) {
        inputs.timing = Some(path);
    }

    let analysis = &mut config.analysis;
    if let Some(check) = args.check {
        analysis.check = match check {
            CheckArg::Setup => CheckType::Setup,
            CheckArg::Hold => CheckType::Hold,
        };
    }
    if args.pre_pack {
        analysis.pre_pack = true;
    }
    if args.max_paths.is_some() {
        analysis.max_paths = args.max_paths;
    }
    if let Some(jobs) = args.jobs {
        analysis.jobs = jobs;
    }
}

/// Everything the fusion step reads.
pub struct Analysis {
    /// The synthesized netlist, when it could be loaded.
    pub netlist: Option<Netlist>,
    /// The packed netlist.
    pub hierarchy: PlacementHierarchy,
    /// Point name to placed block index.
    pub locator: PhysicalBlockLocator,
    /// The parsed timing report.
    pub report: TimingReport,
}

/// Loaded report text and the diagnostics raised while processing it.
pub struct Session {
    /// All loaded inputs.
    pub source_db: SourceDb,
    /// Diagnostics of every stage.
    pub sink: DiagnosticSink,
    verbose: bool,
}

impl Session {
    /// Creates an empty session.
    pub fn new(global: &GlobalArgs) -> Self {
        Self {
            source_db: SourceDb::new(),
            sink: DiagnosticSink::new(),
            verbose: global.verbose,
        }
    }

    /// Loads one input file.
    ///
    /// A file that cannot be loaded is reported and `None` is returned; the
    /// other inputs are still loaded. An optional input is only a warning.
    pub fn load(&mut self, path: &Path, required: bool) -> Option<FileId> {
        if self.verbose {
            eprintln!("   Reading {}", path.display());
        }
        match self.source_db.load_file(path) {
            Ok(file) => Some(file),
            Err(err) => {
                let number = match err {
                    LoadError::NotFound { .. } => INPUT_NOT_FOUND,
                    LoadError::Io { .. } => INPUT_UNREADABLE,
                };
                let code = DiagnosticCode::new(Category::Input, number);
                let diag = if required {
                    Diagnostic::error(code, err.to_string(), Span::DUMMY)
                } else {
                    Diagnostic::warning(code, err.to_string(), Span::DUMMY)
                        .with_note("instance names fall back to the report point names")
                };
                self.sink.emit(diag);
                None
            }
        }
    }

    fn content(&self, file: FileId) -> &str {
        &self.source_db.get_file(file).content
    }

    /// Loads and parses the timing report alone.
    pub fn load_report(&mut self, settings: &Settings) -> Option<TimingReport> {
        let file = self.load(&settings.inputs.timing, true)?;
        let report = parse_report(
            self.content(file),
            file,
            &settings.report_options(),
            &self.sink,
        );
        if self.verbose {
            eprintln!("   Parsed {} path(s)", report.len());
        }
        Some(report)
    }

    /// Loads every input, parses the four reports in parallel and builds
    /// the block locator.
    ///
    /// Returns `None` when a required input is missing or the packed netlist
    /// is unreadable; the reason is in the sink.
    pub fn analyze(&mut self, settings: &Settings) -> Option<Analysis> {
        let inputs = &settings.inputs;
        let netlist_file = inputs
            .netlist
            .as_deref()
            .and_then(|path| self.load(path, false));
        let hierarchy_file = self.load(&inputs.hierarchy, true);
        let placement_file = self.load(&inputs.placement, true);
        let timing_file = self.load(&inputs.timing, true);
        let (hierarchy_file, placement_file, timing_file) =
            (hierarchy_file?, placement_file?, timing_file?);

        let options = settings.report_options();
        let sink = &self.sink;
        let (netlist, (hierarchy, (placement, report))) = rayon::join(
            || netlist_file.map(|file| parse_netlist(self.content(file), file, sink)),
            || {
                rayon::join(
                    || parse_hierarchy(self.content(hierarchy_file)),
                    || {
                        rayon::join(
                            || parse_placement(self.content(placement_file), placement_file, sink),
                            || parse_report(self.content(timing_file), timing_file, &options, sink),
                        )
                    },
                )
            },
        );

        let hierarchy = match hierarchy {
            Ok(hierarchy) => hierarchy,
            Err(err) => {
                sink.emit(err.to_diagnostic(hierarchy_file));
                return None;
            }
        };
        let locator = PhysicalBlockLocator::build(&hierarchy, &placement, sink);

        if self.verbose {
            if let Some(netlist) = &netlist {
                eprintln!("   Parsed {} netlist model(s)", netlist.len());
            }
            eprintln!(
                "   Located {} placed block(s) under {} name(s)",
                locator.blocks().len(),
                locator.name_count()
            );
            eprintln!("   Parsed {} path(s)", report.len());
        }

        Some(Analysis {
            netlist,
            hierarchy,
            locator,
            report,
        })
    }

    /// Renders the collected diagnostics to stderr and returns the exit
    /// code: 1 if any error was emitted, 0 otherwise.
    ///
    /// `--quiet` keeps only errors and drops the summary line.
    pub fn finish(&self, global: &GlobalArgs) -> i32 {
        let renderer = TerminalRenderer::new(global.color, RENDER_WIDTH);
        let diagnostics = self.sink.diagnostics();
        for diag in diagnostics
            .iter()
            .filter(|d| !global.quiet || d.severity.is_error())
        {
            eprintln!("{}", renderer.render(diag, &self.source_db));
        }
        if !global.quiet && !diagnostics.is_empty() {
            eprint!(
                "{}",
                renderer.render_summary(self.sink.error_count(), self.sink.warning_count())
            );
        }

        if self.sink.has_errors() {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    const NET: &str = r#"<block name="top.net" instance="FPGA_packed_netlist[0]">
  <block name="q" instance="clb[0]">
    <block name="q" instance="ff[0]"/>
  </block>
  <block name="out:y" instance="io[1]"/>
</block>"#;

    const PLACE: &str = "q 2 3 0 #0\nout:y 0 3 1 #1\n";

    const REPORT: &str = "\
#Path 1
Startpoint: q.Q[0] (.latch clocked by clk)
Endpoint  : out:y.outpad[0] (.output clocked by virtual_io_clock)
Path Type : setup

Point                                      Incr      Path
--------------------------------------------------------------
q.Q[0] (.latch at (2,3))                  0.124     0.124
| (intra 'clb' routing)                    0.000     0.124
out:y.outpad[0] (.output at (0,3))         0.300     0.424
data arrival time                                    0.424

slack (MET)                                          0.576
";

    fn write_inputs(dir: &Path) {
        fs::write(dir.join("top.net"), NET).unwrap();
        fs::write(dir.join("top.place"), PLACE).unwrap();
        fs::write(dir.join("report_timing.setup.rpt"), REPORT).unwrap();
    }

    fn settings_for(dir: &Path) -> Settings {
        let config = VtraceConfig::default();
        let inputs = resolve_inputs(&config, dir).unwrap();
        Settings { config, inputs }
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = vtrace_config::load_config_from_str(
            "[inputs]\ntiming = \"a.rpt\"\n[analysis]\njobs = 2\n",
        )
        .unwrap();
        let args = InputArgs {
            timing: Some(PathBuf::from("b.rpt")),
            check: Some(CheckArg::Hold),
            max_paths: Some(10),
            ..InputArgs::default()
        };
        apply_overrides(&mut config, &args, Path::new("/work"));
        assert_eq!(config.inputs.timing, Some(PathBuf::from("/work/b.rpt")));
        assert_eq!(config.analysis.check, CheckType::Hold);
        assert_eq!(config.analysis.max_paths, Some(10));
        assert_eq!(config.analysis.jobs, 2);
        assert!(!config.analysis.pre_pack);
    }

    #[test]
    fn analyze_discovered_inputs() {
        let tmp = TempDir::new().unwrap();
        write_inputs(tmp.path());
        let settings = settings_for(tmp.path());
        assert!(settings.inputs.netlist.is_none());

        let mut session = Session::new(&quiet());
        let analysis = session.analyze(&settings).unwrap();
        assert!(analysis.netlist.is_none());
        assert_eq!(analysis.report.len(), 1);
        assert_eq!(analysis.locator.blocks().len(), 2);
        assert!(analysis.locator.resolve("q.Q[0]").is_some());
        assert!(!session.sink.has_errors());
        assert_eq!(session.finish(&quiet()), 0);
    }

    #[test]
    fn missing_netlist_is_a_warning() {
        let tmp = TempDir::new().unwrap();
        write_inputs(tmp.path());
        let mut settings = settings_for(tmp.path());
        settings.inputs.netlist = Some(tmp.path().join("gone.blif"));

        let mut session = Session::new(&quiet());
        let analysis = session.analyze(&settings).unwrap();
        assert!(analysis.netlist.is_none());
        assert_eq!(session.sink.warning_count(), 1);
        assert!(!session.sink.has_errors());
        let diags = session.sink.diagnostics();
        assert_eq!(diags[0].code.to_string(), "I001");
    }

    #[test]
    fn missing_report_stops_analysis() {
        let tmp = TempDir::new().unwrap();
        write_inputs(tmp.path());
        let mut settings = settings_for(tmp.path());
        settings.inputs.timing = tmp.path().join("gone.rpt");
        settings.inputs.placement = tmp.path().join("gone.place");

        let mut session = Session::new(&quiet());
        assert!(session.analyze(&settings).is_none());
        assert_eq!(session.sink.error_count(), 2);
        assert_eq!(session.finish(&quiet()), 1);
    }

    #[test]
    fn broken_hierarchy_is_reported() {
        let tmp = TempDir::new().unwrap();
        write_inputs(tmp.path());
        fs::write(tmp.path().join("top.net"), "<block name=\"top\">").unwrap();
        let settings = settings_for(tmp.path());

        let mut session = Session::new(&quiet());
        assert!(session.analyze(&settings).is_none());
        let diags = session.sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "P001");
    }

    #[test]
    fn report_alone() {
        let tmp = TempDir::new().unwrap();
        write_inputs(tmp.path());
        let settings = settings_for(tmp.path());
        let mut session = Session::new(&quiet());
        let report = session.load_report(&settings).unwrap();
        assert_eq!(report.stats.path_count, 1);
        assert_eq!(session.source_db.len(), 1);
    }
}
