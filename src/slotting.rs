/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Community-based slotting: partition → bin ordering.
//!
//! # Steps
//!
//! 1. Partition the co-occurrence graph into `K` communities with the
//!    configured [`CommunityDetector`].
//! 2. Re-check the partition covers every product exactly once. A violation
//!    is a detector bug and aborts the run.
//! 3. Place communities hottest-first (descending total heat, ties by
//!    smallest member id). Within a community, hotter products take earlier
//!    bins (ties by product id).
//! 4. Concatenate and number bins `1..=N`.
//!
//! The within-community heat sort is a local greedy heuristic, not a global
//! optimum.
//!
//! # Degenerate input
//!
//! An edgeless graph carries no co-occurrence signal. The optimizer skips the
//! detector, logs the fallback, and emits the pure heat-sorted layout.

use core::cmp::Reverse;

use crate::community::{CommunityDetector, Partition};
use crate::error::{Result, SlottingError};
use crate::graph::CooccurrenceGraph;
use crate::heat::HeatMap;
use crate::layout::Layout;
use crate::universe::ProductId;

/// Output of one optimization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlottingPlan {
    /// Communities in placement order (first community holds bin 1).
    pub partition: Partition,
    /// Resulting bin assignment.
    pub layout: Layout,
    /// `true` when the degenerate-graph fallback produced the layout.
    pub fallback: bool,
}

/// Turns a co-occurrence graph and heat map into a bin layout.
#[derive(Clone, Debug)]
pub struct SlottingOptimizer<D: CommunityDetector> {
    detector: D,
    communities: usize,
}

impl<D: CommunityDetector> SlottingOptimizer<D> {
    /// Optimizer that asks `detector` for `communities` groups.
    pub fn new(detector: D, communities: usize) -> Self {
        Self { detector, communities }
    }

    /// Requested community count.
    pub fn communities(&self) -> usize {
        self.communities
    }

    /// The detector in use.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Compute the layout.
    pub fn optimize(&self, graph: &CooccurrenceGraph, heat: &HeatMap) -> Result<SlottingPlan> {
        let n = graph.node_count();
        if n == 0 {
            return Err(SlottingError::EmptyUniverse);
        }
        if self.communities == 0 {
            return Err(SlottingError::ZeroCommunities);
        }
        if self.communities > n {
            return Err(SlottingError::TooManyCommunities { requested: self.communities, products: n });
        }

        let (partition, fallback) = if graph.is_edgeless() {
            tracing::warn!(
                products = n,
                detector = self.detector.name(),
                "co-occurrence graph has no edges; using heat-only layout"
            );
            (Partition::single(n), true)
        } else {
            (self.detector.detect(graph, self.communities)?, false)
        };

        if let Err(err) = partition.validate(n) {
            tracing::error!(detector = self.detector.name(), %err, "detector returned an invalid partition");
            return Err(err);
        }

        let placement = order_communities(&partition, heat);
        let ordering: Vec<ProductId> = placement.iter().flatten().copied().collect();
        let layout = Layout::from_ordering(&ordering)?;

        tracing::debug!(
            detector = self.detector.name(),
            communities = placement.len(),
            fallback,
            "slotting layout computed"
        );
        Ok(SlottingPlan { partition: Partition::from_communities(placement), layout, fallback })
    }
}

/// Communities hottest-first, members hottest-first within each.
fn order_communities(partition: &Partition, heat: &HeatMap) -> Vec<Vec<ProductId>> {
    let mut communities: Vec<Vec<ProductId>> = partition
        .communities()
        .iter()
        .map(|members| {
            let mut members = members.clone();
            members.sort_by_key(|&p| (Reverse(heat.heat(p)), p));
            members
        })
        .collect();

    communities.sort_by_key(|members| {
        let total: u64 = members.iter().map(|&p| u64::from(heat.heat(p))).sum();
        let first = members.iter().min().copied();
        (Reverse(total), first)
    });
    communities
}
