//! Parallel fusion of a whole report.

use crate::builder::{EnrichedPath, PathBuilder};
use crate::error::FusionError;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use vtrace_common::{InternalError, VtraceResult};
use vtrace_timing::Path;

/// Enriches every path on a pool of `jobs` workers (0 picks one per core).
///
/// The result has one entry per input path, in input order; a path that
/// fails does not stop the others. Only a worker pool that cannot be
/// started is an error of the whole batch.
pub fn enrich_paths<'a>(
    builder: &PathBuilder<'a>,
    paths: &'a [Path],
    jobs: usize,
) -> VtraceResult<Vec<Result<EnrichedPath<'a>, FusionError>>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|err| InternalError::new(format!("cannot start fusion workers: {err}")))?;
    Ok(pool.install(|| paths.par_iter().map(|path| builder.build(path)).collect()))
}
