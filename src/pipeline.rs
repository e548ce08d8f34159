//! One optimization run, end to end.
//!
//! ```text
//! PipelineConfig ──validate──► ProductUniverse
//!                                   │
//!                            OrderGenerator ──► baskets
//!                                   │
//!                 ┌─────────────────┴─────────────────┐
//!          CooccurrenceGraph                       HeatMap
//!                 │   └──────────┬─────────────────────┘
//!            top_edges     SlottingOptimizer ──► optimized Layout
//!                                                baseline_layout ──► baseline Layout
//! ```
//!
//! The run resolves a single master seed (configured, or drawn from the
//! thread RNG) and derives one independent stream per random stage from it.
//! The resolved seed is kept on [`SimulationRun::seed`], so an unseeded run
//! can be replayed exactly by putting that seed back into the config.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::community::{CommunityDetector, SpectralConfig, SpectralDetector};
use crate::error::{Result, SlottingError};
use crate::evaluation::LayoutComparison;
use crate::graph::CooccurrenceGraph;
use crate::heat::HeatMap;
use crate::layout::{baseline_layout, Layout};
use crate::orders::{Basket, OrderGenerator, OrderGeneratorConfig};
use crate::ranking::{top_edges, TopEdge, DEFAULT_TOP_EDGES};
use crate::slotting::{SlottingOptimizer, SlottingPlan};
use crate::universe::ProductUniverse;

/// Stream offsets mixed into the master seed, one per random stage.
const BASELINE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;
const DETECTOR_STREAM: u64 = 0xD1B5_4A32_D192_ED03;

// ─── Config ─────────────────────────────────────────────────────────────────

/// Everything a run needs. No module constant drives a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    /// Size of the synthetic product universe. Default: 50.
    pub product_count: usize,
    /// Baskets generated per run. Default: 1000.
    pub order_count: usize,
    /// Communities requested from the detector (`K`). Default: 10.
    pub community_count: usize,
    /// Relationships reported in the optimized view. Default: 10.
    pub top_edges: usize,
    /// Master seed. `None` draws a fresh one per run. Default: `None`.
    pub seed: Option<u64>,
    /// Basket shape.
    pub orders: OrderGeneratorConfig,
    /// Spectral detector knobs.
    pub spectral: SpectralConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            product_count: 50,
            order_count: 1000,
            community_count: 10,
            top_edges: DEFAULT_TOP_EDGES,
            seed: None,
            orders: OrderGeneratorConfig::default(),
            spectral: SpectralConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.product_count == 0 {
            return Err(SlottingError::EmptyUniverse);
        }
        if self.community_count == 0 {
            return Err(SlottingError::ZeroCommunities);
        }
        if self.community_count > self.product_count {
            return Err(SlottingError::TooManyCommunities {
                requested: self.community_count,
                products: self.product_count,
            });
        }
        Ok(())
    }

    /// Builder-style seed override.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// ─── Result ─────────────────────────────────────────────────────────────────

/// Immutable output of one run.
#[derive(Clone, Debug)]
pub struct SimulationRun {
    /// Master seed the run actually used.
    pub seed: u64,
    /// Product universe.
    pub universe: ProductUniverse,
    /// Generated orders.
    pub baskets: Vec<Basket>,
    /// Co-occurrence graph over `baskets`.
    pub graph: CooccurrenceGraph,
    /// Per-product pick counts over `baskets`.
    pub heat: HeatMap,
    /// Random control layout.
    pub baseline: Layout,
    /// Optimizer output (partition, layout, fallback flag).
    pub plan: SlottingPlan,
    /// Strongest relationships, heaviest first.
    pub top_edges: Vec<TopEdge>,
    /// Pick-span figures for both layouts.
    pub comparison: LayoutComparison,
}

/// Read view of the random layout.
#[derive(Clone, Copy, Debug)]
pub struct BaselineView<'a> {
    /// Product → bin.
    pub layout: &'a Layout,
    /// Product → pick count.
    pub heat: &'a HeatMap,
}

/// Read view of the optimized layout.
#[derive(Clone, Copy, Debug)]
pub struct OptimizedView<'a> {
    /// Product → bin.
    pub layout: &'a Layout,
    /// Product → pick count.
    pub heat: &'a HeatMap,
    /// Strongest relationships, heaviest first.
    pub top_edges: &'a [TopEdge],
}

impl SimulationRun {
    /// The optimized layout.
    pub fn optimized(&self) -> &Layout {
        &self.plan.layout
    }

    /// `{ layout, heat }` for the baseline.
    pub fn baseline_view(&self) -> BaselineView<'_> {
        BaselineView { layout: &self.baseline, heat: &self.heat }
    }

    /// `{ layout, heat, top_edges }` for the optimized layout.
    pub fn optimized_view(&self) -> OptimizedView<'_> {
        OptimizedView { layout: &self.plan.layout, heat: &self.heat, top_edges: &self.top_edges }
    }
}

// ─── Entry points ───────────────────────────────────────────────────────────

/// Run the pipeline with the spectral detector.
pub fn run(config: &PipelineConfig) -> Result<SimulationRun> {
    let seed = resolve_seed(config);
    let detector = SpectralDetector::new(config.spectral.clone(), seed ^ DETECTOR_STREAM);
    run_seeded(config, seed, detector)
}

/// Run the pipeline with a caller-supplied detector.
pub fn run_with_detector<D: CommunityDetector>(
    config: &PipelineConfig,
    detector: D,
) -> Result<SimulationRun> {
    run_seeded(config, resolve_seed(config), detector)
}

fn resolve_seed(config: &PipelineConfig) -> u64 {
    config.seed.unwrap_or_else(|| rand::rng().random())
}

fn run_seeded<D: CommunityDetector>(
    config: &PipelineConfig,
    seed: u64,
    detector: D,
) -> Result<SimulationRun> {
    config.validate()?;

    let universe = ProductUniverse::synthetic(config.product_count);
    let generator = OrderGenerator::new(&universe, config.orders.clone())?;
    let baskets = generator.generate(config.order_count, &mut StdRng::seed_from_u64(seed))?;

    let graph = CooccurrenceGraph::build(&universe, &baskets)?;
    let heat = HeatMap::build(&universe, &baskets)?;
    tracing::debug!(nodes = graph.node_count(), edges = graph.edge_count(), "graph built");

    let baseline = baseline_layout(
        universe.len(),
        &mut StdRng::seed_from_u64(seed.wrapping_add(BASELINE_STREAM)),
    );
    let plan = SlottingOptimizer::new(detector, config.community_count).optimize(&graph, &heat)?;
    let top = top_edges(&graph, config.top_edges);
    let comparison = LayoutComparison::measure(&baseline, &plan.layout, &baskets);

    tracing::info!(
        seed,
        products = universe.len(),
        orders = baskets.len(),
        edges = graph.edge_count(),
        communities = plan.partition.len(),
        fallback = plan.fallback,
        improvement = comparison.span_improvement(),
        "slotting run complete"
    );

    Ok(SimulationRun {
        seed,
        universe,
        baskets,
        graph,
        heat,
        baseline,
        plan,
        top_edges: top,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> PipelineConfig {
        PipelineConfig {
            product_count: 12,
            order_count: 80,
            community_count: 3,
            ..PipelineConfig::default()
        }
        .with_seed(7)
    }

    #[test]
    fn test_default_config_matches_documented_values() {
        let c = PipelineConfig::default();
        assert_eq!((c.product_count, c.order_count, c.community_count, c.top_edges), (50, 1000, 10, 10));
        assert_eq!(c.seed, None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut c = small();
        c.product_count = 0;
        assert_eq!(c.validate(), Err(SlottingError::EmptyUniverse));
        let mut c = small();
        c.community_count = 0;
        assert_eq!(c.validate(), Err(SlottingError::ZeroCommunities));
        let mut c = small();
        c.community_count = 13;
        assert_eq!(
            c.validate(),
            Err(SlottingError::TooManyCommunities { requested: 13, products: 12 })
        );
        assert!(run(&c).is_err());
    }

    #[test]
    fn test_run_records_seed_and_fills_every_stage() {
        let run = run(&small()).unwrap();
        assert_eq!(run.seed, 7);
        assert_eq!(run.baskets.len(), 80);
        assert_eq!(run.heat.len(), 12);
        assert_eq!(run.baseline.len(), 12);
        assert_eq!(run.optimized().len(), 12);
        assert!(run.top_edges.len() <= 10);
        assert_eq!(run.comparison.baseline.orders, 80);
    }

    #[test]
    fn test_unseeded_run_is_replayable() {
        let mut config = small();
        config.seed = None;
        let first = run(&config).unwrap();
        let replay = run(&config.with_seed(first.seed)).unwrap();
        assert_eq!(first.baskets, replay.baskets);
        assert_eq!(first.baseline, replay.baseline);
        assert_eq!(first.plan.layout, replay.plan.layout);
    }

    #[test]
    fn test_views_borrow_from_the_run() {
        let run = run(&small()).unwrap();
        let b = run.baseline_view();
        let o = run.optimized_view();
        assert_eq!(b.layout, &run.baseline);
        assert_eq!(o.layout, &run.plan.layout);
        assert_eq!(o.top_edges, run.top_edges.as_slice());
        assert_eq!(b.heat, o.heat);
    }
}
