use tracing::info;
use uuid::Uuid;

use crate::{
    query::SqlBuilder,
    resolver::{CellIo, FormulaCall, Resolution, ResolutionCache, Resolver},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub resolved: usize,
    pub failed: usize,
    pub cached: usize,
}

/// One report generation. Owns the position cache, which is cleared when a
/// new pass begins so values never leak between reports.
#[derive(Debug)]
pub struct ReportPass {
    id: Uuid,
    cache: ResolutionCache,
}

impl Default for ReportPass {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPass {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4(), cache: ResolutionCache::new() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ResolutionCache {
        &mut self.cache
    }

    /// Start a new pass: fresh id, empty cache.
    pub fn begin(&mut self) {
        self.id = Uuid::new_v4();
        self.cache.clear();
        info!(pass = %self.id, "report pass started");
    }

    pub fn run(
        &mut self,
        resolver: &Resolver,
        cells: &mut dyn CellIo,
        calls: &[FormulaCall],
        ambient: Option<&SqlBuilder>,
    ) -> PassSummary {
        let mut summary = PassSummary::default();

        for call in calls {
            match resolver.resolve_cell(call, cells, &mut self.cache, ambient) {
                Resolution::Cached(_) => summary.cached += 1,
                Resolution::Computed(value) if value.is_error() => summary.failed += 1,
                Resolution::Computed(_) => summary.resolved += 1,
            }
        }

        info!(
            pass = %self.id,
            resolved = summary.resolved,
            failed = summary.failed,
            cached = summary.cached,
            "report pass finished"
        );
        summary
    }
}
