//! End-to-end test helpers for vtrace.
//!
//! Provides [`full_pipeline`], which runs in-memory report text through every
//! stage (parse, locate, fuse) and returns the intermediate results with all
//! diagnostics for assertion in integration tests, and a placed sample
//! design in [`fixtures`].

#![warn(missing_docs)]

pub mod fixtures;

use vtrace_config::VtraceConfig;
use vtrace_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use vtrace_netlist::{parse_netlist, Netlist};
use vtrace_paths::{enrich_paths, EnrichedPath, FusionError, PathBuilder, PathRecord};
use vtrace_place::{parse_hierarchy, parse_placement, PhysicalBlockLocator, PlacementHierarchy};
use vtrace_source::SourceDb;
use vtrace_timing::{parse_report, ReportOptions, TimingReport};

/// The text of the four inputs.
#[derive(Clone, Copy, Debug)]
pub struct Inputs<'a> {
    /// The synthesized netlist, if any.
    pub netlist: Option<&'a str>,
    /// The packed netlist.
    pub hierarchy: &'a str,
    /// The placement.
    pub placement: &'a str,
    /// The timing report.
    pub timing: &'a str,
}

impl Inputs<'static> {
    /// The sample design of [`fixtures`].
    pub fn sample() -> Self {
        Self {
            netlist: Some(fixtures::NETLIST),
            hierarchy: fixtures::HIERARCHY,
            placement: fixtures::PLACEMENT,
            timing: fixtures::TIMING_REPORT,
        }
    }
}

/// Result of running the full parse → locate → fuse pipeline.
pub struct PipelineResult {
    /// The loaded inputs, for rendering diagnostics.
    pub source_db: SourceDb,
    /// The parsed netlist, when one was given.
    pub netlist: Option<Netlist>,
    /// The packed netlist, unless it was unreadable.
    pub hierarchy: Option<PlacementHierarchy>,
    /// The block index; empty when the packed netlist was unreadable.
    pub locator: PhysicalBlockLocator,
    /// The parsed timing report.
    pub report: TimingReport,
    /// One fusion outcome per report path, in report order; empty when the
    /// packed netlist was unreadable.
    pub records: Vec<Result<PathRecord, FusionError>>,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// A builder over this result's locator and netlist.
    pub fn builder(&self) -> PathBuilder<'_> {
        PathBuilder::new(&self.locator, self.netlist.as_ref())
    }

    /// Re-enriches the path with the given id.
    pub fn enrich(&self, id: u32) -> Option<Result<EnrichedPath<'_>, FusionError>> {
        let path = self.report.path(id)?;
        Some(self.builder().build(path))
    }

    /// Returns the record of a successfully enriched path.
    pub fn record(&self, id: u32) -> Option<&PathRecord> {
        self.records
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .find(|r| r.id == id)
    }

    /// Returns the fusion failures.
    pub fn failures(&self) -> Vec<&FusionError> {
        self.records.iter().filter_map(|r| r.as_ref().err()).collect()
    }

    /// Returns the codes of all diagnostics, e.g. `["P004", "F001"]`.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }
}

/// Creates a configuration from `vtrace.toml` text.
pub fn make_config(toml: &str) -> VtraceConfig {
    vtrace_config::load_config_from_str(toml).unwrap()
}

/// Runs the full pipeline with the default configuration.
pub fn full_pipeline(inputs: &Inputs<'_>) -> PipelineResult {
    full_pipeline_with(inputs, &VtraceConfig::default())
}

/// Runs the full pipeline with the given configuration's `[analysis]`
/// settings. Its `[inputs]` section is ignored.
pub fn full_pipeline_with(inputs: &Inputs<'_>, config: &VtraceConfig) -> PipelineResult {
    let mut source_db = SourceDb::new();
    let netlist_file = inputs
        .netlist
        .map(|text| source_db.add_source("top.eblif", text.to_string()));
    let hierarchy_file = source_db.add_source("top.net", inputs.hierarchy.to_string());
    let placement_file = source_db.add_source("top.place", inputs.placement.to_string());
    let timing_file = source_db.add_source("report_timing.setup.rpt", inputs.timing.to_string());

    let sink = DiagnosticSink::new();
    let netlist = netlist_file.map(|file| parse_netlist(&source_db.get_file(file).content, file, &sink));
    let hierarchy = match parse_hierarchy(&source_db.get_file(hierarchy_file).content) {
        Ok(hierarchy) => Some(hierarchy),
        Err(err) => {
            sink.emit(err.to_diagnostic(hierarchy_file));
            None
        }
    };
    let placement = parse_placement(
        &source_db.get_file(placement_file).content,
        placement_file,
        &sink,
    );
    let options = ReportOptions {
        max_paths: config.analysis.max_paths,
        default_precision: config.analysis.precision,
    };
    let report = parse_report(
        &source_db.get_file(timing_file).content,
        timing_file,
        &options,
        &sink,
    );

    let locator = match &hierarchy {
        Some(hierarchy) => PhysicalBlockLocator::build(hierarchy, &placement, &sink),
        None => PhysicalBlockLocator::default(),
    };

    // No fusion without the packed netlist.
    let records: Vec<Result<PathRecord, FusionError>> = if hierarchy.is_some() {
        let builder = PathBuilder::new(&locator, netlist.as_ref());
        enrich_paths(&builder, &report.paths, config.analysis.jobs)
            .unwrap()
            .into_iter()
            .map(|result| result.map(|path| path.to_record()))
            .collect()
    } else {
        Vec::new()
    };
    for err in records.iter().filter_map(|r| r.as_ref().err()) {
        sink.emit(err.to_diagnostic());
    }

    let diagnostics = sink.take_all();
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    PipelineResult {
        source_db,
        netlist,
        hierarchy,
        locator,
        report,
        records,
        has_errors: error_count > 0,
        diagnostics,
        error_count,
        warning_count,
    }
}
