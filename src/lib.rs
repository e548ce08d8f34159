//! # bin-slotting
//!
//! Co-occurrence driven warehouse slotting: products that are ordered together
//! end up in neighbouring bins, and busy products take the early bins.
//!
//! ---
//!
//! ## How it works
//!
//! **Baskets become a graph.** Every order is a small set of products. Folding
//! all orders gives a weighted undirected graph whose edge weight is the number
//! of orders containing both endpoints, plus a per-product pick count (heat).
//!
//! **The graph becomes communities.** A community detector splits the products
//! into `K` groups of mutually co-ordered products. The default detector is
//! normalised-Laplacian spectral clustering; a recursive Stoer-Wagner min-cut
//! detector is available as a seed-free alternative. Any type implementing
//! [`CommunityDetector`] can be plugged in.
//!
//! **Communities become bins.** Communities are laid out one after another,
//! hottest community first, and within a community hotter products come first.
//! Bins are numbered `1..=N` in that order.
//!
//! A uniformly random baseline layout is produced alongside as the control,
//! and both layouts are scored by mean pick span.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! PipelineConfig → ProductUniverse → OrderGenerator → baskets
//!                                                        │
//!                                  ┌─────────────────────┴──────┐
//!                          CooccurrenceGraph                  HeatMap
//!                            │        └──────────┬───────────────┘
//!                        top_edges        SlottingOptimizer ── CommunityDetector
//!                                                │
//!                                         SlottingPlan (Layout)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`universe`] | [`ProductId`], [`ProductUniverse`] | Fixed product set with names and categories |
//! | [`orders`] | [`Basket`], [`OrderGenerator`] | Synthetic basket workload; basket contract for real data |
//! | [`graph`] | [`CooccurrenceAccumulator`], [`CooccurrenceGraph`] | Pair counting, then an immutable weighted graph |
//! | [`heat`] | [`HeatMap`] | Orders per product |
//! | [`community`] | [`CommunityDetector`], [`SpectralDetector`], [`MinCutDetector`] | Partition the graph into `K` groups |
//! | [`linalg`] | [`linalg::SymmetricEigen`] | Jacobi eigen-decomposition for the spectral detector |
//! | [`layout`] | [`Layout`] | Product → bin bijection; random baseline |
//! | [`slotting`] | [`SlottingOptimizer`], [`SlottingPlan`] | Partition → bin ordering |
//! | [`ranking`] | [`TopEdge`] | Heaviest relationships |
//! | [`evaluation`] | [`LayoutComparison`] | Pick-span figures, baseline vs optimized |
//! | [`pipeline`] | [`PipelineConfig`], [`SimulationRun`] | One full run and its read views |
//! | [`cache`] | [`ResultCache`] | Atomically swapped current run |
//! | `snapshot` | `RunSnapshot` | Name-keyed JSON-friendly run snapshot (requires `serde` feature) |
//!
//! ## Quick start
//!
//! ```rust
//! use bin_slotting::{pipeline, PipelineConfig};
//!
//! let config = PipelineConfig { product_count: 20, order_count: 200, community_count: 4, ..Default::default() }
//!     .with_seed(42);
//! let run = pipeline::run(&config).unwrap();
//! assert_eq!(run.optimized().len(), 20);
//! assert!(run.top_edges.windows(2).all(|w| w[0].weight >= w[1].weight));
//! ```
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod community;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod heat;
pub mod layout;
pub mod linalg;
pub mod orders;
pub mod pipeline;
pub mod ranking;
pub mod slotting;
#[cfg(feature = "serde")]
pub mod snapshot;
pub mod universe;

pub use cache::ResultCache;
pub use community::{CommunityDetector, MinCutDetector, Partition, SpectralConfig, SpectralDetector};
pub use error::{Result, SlottingError};
pub use evaluation::{LayoutComparison, PickStats};
pub use graph::{CooccurrenceAccumulator, CooccurrenceGraph, Edge};
pub use heat::HeatMap;
pub use layout::{baseline_layout, Layout};
pub use orders::{Basket, OrderGenerator, OrderGeneratorConfig, MAX_BASKET_SIZE, MIN_BASKET_SIZE};
pub use pipeline::{BaselineView, OptimizedView, PipelineConfig, SimulationRun};
pub use ranking::{top_edges, TopEdge};
pub use slotting::{SlottingOptimizer, SlottingPlan};
pub use universe::{Category, Product, ProductId, ProductUniverse};
