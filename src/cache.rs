//! Process-wide cached run, swapped atomically on re-run.
//!
//! The cache holds one `Arc<SimulationRun>` behind a `RwLock`. A reader clones
//! the `Arc` and drops the lock immediately, so it keeps a complete run for as
//! long as it likes even while a re-run publishes a newer one. Re-runs compute
//! outside the lock; the write lock is held only for the pointer swap.
//!
//! A failed run publishes nothing: the previous result (if any) stays current.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Result, SlottingError};
use crate::pipeline::{self, BaselineView, OptimizedView, PipelineConfig, SimulationRun};

/// Holder of the current [`SimulationRun`].
#[derive(Debug)]
pub struct ResultCache {
    config: PipelineConfig,
    current: RwLock<Option<Arc<SimulationRun>>>,
}

impl ResultCache {
    /// Empty cache. Nothing is computed until [`warm`](Self::warm) or
    /// [`rerun`](Self::rerun).
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, current: RwLock::new(None) }
    }

    /// Cache populated with a first run, as done at process startup.
    pub fn warm(config: PipelineConfig) -> Result<Self> {
        let cache = Self::new(config);
        cache.rerun()?;
        Ok(cache)
    }

    /// Configuration every run uses.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Recompute the whole pipeline and publish the result.
    ///
    /// With `config.seed == None` every call draws a fresh seed.
    pub fn rerun(&self) -> Result<Arc<SimulationRun>> {
        let run = Arc::new(pipeline::run(&self.config)?);
        let previous = {
            let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
            slot.replace(Arc::clone(&run))
        };
        tracing::debug!(
            seed = run.seed,
            replaced = ?previous.map(|p| p.seed),
            "published simulation run"
        );
        Ok(run)
    }

    /// Most recent run, or `None` before the first one.
    pub fn current(&self) -> Option<Arc<SimulationRun>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Most recent run, or [`SlottingError::NotReady`].
    pub fn ready(&self) -> Result<Arc<SimulationRun>> {
        self.current().ok_or(SlottingError::NotReady)
    }

    /// Read the baseline view of the current run.
    pub fn baseline_view<T>(&self, read: impl FnOnce(BaselineView<'_>) -> T) -> Result<T> {
        let run = self.ready()?;
        Ok(read(run.baseline_view()))
    }

    /// Read the optimized view of the current run.
    pub fn optimized_view<T>(&self, read: impl FnOnce(OptimizedView<'_>) -> T) -> Result<T> {
        let run = self.ready()?;
        Ok(read(run.optimized_view()))
    }

    /// `true` once a run has been published.
    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}
