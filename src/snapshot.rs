//! Portable snapshot of a [`SimulationRun`] for transport to presentation layers.
//!
//! # JSON shape
//!
//! ```text
//! {
//!   "version": 1,
//!   "seed": 42,
//!   "baseline":  { "bins": { "Product_1": 17, "Product_2": 3, ... } },
//!   "optimized": { "bins": { "Product_1": 1,  "Product_2": 9, ... } },
//!   "heat":      { "Product_1": 88, ... },
//!   "top_edges": [ { "source": "Product_1", "target": "Product_4", "weight": 31 }, ... ]
//! }
//! ```
//!
//! Layouts are stored verbatim as product → bin. Products are keyed by display
//! name, so a snapshot reads without the id mapping. [`LayoutRecord::to_layout`]
//! resolves names against a universe and re-checks the bijection.
//!
//! Requires the `serde` feature.
//!
//! [`SimulationRun`]: crate::pipeline::SimulationRun

use std::collections::BTreeMap;

use crate::error::{Result, SlottingError};
use crate::heat::HeatMap;
use crate::layout::Layout;
use crate::pipeline::SimulationRun;
use crate::ranking::TopEdge;
use crate::universe::{ProductId, ProductUniverse};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Serializable view of one run.
///
/// # Example
///
/// ```rust,ignore
/// use bin_slotting::snapshot::RunSnapshot;
///
/// let snapshot = RunSnapshot::from_run(&run);
/// let json = serde_json::to_string(&snapshot).unwrap();
/// let restored: RunSnapshot = serde_json::from_str(&json).unwrap();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct RunSnapshot {
    /// Always [`SNAPSHOT_VERSION`] for newly created snapshots.
    pub version: u16,
    /// Master seed of the run.
    pub seed: u64,
    /// Random control layout.
    pub baseline: LayoutRecord,
    /// Optimized layout.
    pub optimized: LayoutRecord,
    /// Product name → pick count.
    pub heat: BTreeMap<String, u32>,
    /// Strongest relationships, heaviest first.
    pub top_edges: Vec<EdgeRecord>,
}

/// Product name → bin.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LayoutRecord {
    /// Bin per product name.
    pub bins: BTreeMap<String, u32>,
}

/// One relationship with named endpoints.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    /// Lower product.
    pub source: String,
    /// Higher product.
    pub target: String,
    /// Baskets containing both.
    pub weight: u32,
}

fn name_of(universe: &ProductUniverse, p: ProductId) -> String {
    universe
        .product(p)
        .map(|product| product.name.clone())
        .unwrap_or_else(|| p.to_string())
}

impl LayoutRecord {
    /// Capture `layout` with names from `universe`.
    pub fn from_layout(layout: &Layout, universe: &ProductUniverse) -> Self {
        Self {
            bins: layout.iter().map(|(p, bin)| (name_of(universe, p), bin)).collect(),
        }
    }

    /// Resolve names against `universe` and rebuild the layout.
    ///
    /// Fails on unknown or missing names and on anything that is not a
    /// bijection onto `1..=N`.
    pub fn to_layout(&self, universe: &ProductUniverse) -> Result<Layout> {
        if self.bins.len() != universe.len() {
            return Err(SlottingError::InvalidLayout(format!(
                "record covers {} products, universe has {}",
                self.bins.len(),
                universe.len()
            )));
        }
        let bins = universe
            .iter()
            .map(|product| {
                self.bins.get(&product.name).copied().ok_or_else(|| {
                    SlottingError::InvalidLayout(format!("no bin for {}", product.name))
                })
            })
            .collect::<Result<Vec<u32>>>()?;
        Layout::from_bins(bins)
    }
}

impl EdgeRecord {
    fn from_edge(edge: &TopEdge, universe: &ProductUniverse) -> Self {
        Self {
            source: name_of(universe, edge.source),
            target: name_of(universe, edge.target),
            weight: edge.weight,
        }
    }
}

impl RunSnapshot {
    /// Capture both views of `run`.
    pub fn from_run(run: &SimulationRun) -> Self {
        let universe = &run.universe;
        Self {
            version: SNAPSHOT_VERSION,
            seed: run.seed,
            baseline: LayoutRecord::from_layout(&run.baseline, universe),
            optimized: LayoutRecord::from_layout(&run.plan.layout, universe),
            heat: heat_record(&run.heat, universe),
            top_edges: run.top_edges.iter().map(|e| EdgeRecord::from_edge(e, universe)).collect(),
        }
    }

    /// Heat of the product called `name`.
    pub fn heat_of(&self, name: &str) -> Option<u32> {
        self.heat.get(name).copied()
    }
}

fn heat_record(heat: &HeatMap, universe: &ProductUniverse) -> BTreeMap<String, u32> {
    heat.iter().map(|(p, h)| (name_of(universe, p), h)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_record_restores_layout() {
        let universe = ProductUniverse::synthetic(4);
        let layout = Layout::from_bins(vec![3, 1, 4, 2]).unwrap();
        let record = LayoutRecord::from_layout(&layout, &universe);
        assert_eq!(record.bins.get("Product_1"), Some(&3));
        assert_eq!(record.to_layout(&universe).unwrap(), layout);
    }

    #[test]
    fn test_layout_record_rejects_foreign_names() {
        let universe = ProductUniverse::synthetic(2);
        let mut record = LayoutRecord::from_layout(&Layout::from_bins(vec![1, 2]).unwrap(), &universe);
        record.bins.remove("Product_2");
        record.bins.insert("Product_9".into(), 2);
        assert!(matches!(record.to_layout(&universe), Err(SlottingError::InvalidLayout(_))));
    }

    #[test]
    fn test_layout_record_rejects_broken_bijection() {
        let universe = ProductUniverse::synthetic(2);
        let mut record = LayoutRecord::from_layout(&Layout::from_bins(vec![1, 2]).unwrap(), &universe);
        record.bins.insert("Product_2".into(), 1);
        assert!(record.to_layout(&universe).is_err());
    }
}
