//! Community detection: grouping products that are ordered together.
//!
//! A [`CommunityDetector`] takes the weighted co-occurrence graph and a target
//! community count `K` and returns a [`Partition`]: every product in exactly
//! one community. Two implementations ship:
//!
//! | Detector | Method | Randomness |
//! |----------|--------|------------|
//! | [`SpectralDetector`] | normalised Laplacian → bottom-`K` eigenvectors → k-means | seeded |
//! | [`MinCutDetector`] | recursive Stoer-Wagner bisection | none |
//!
//! Any other algorithm (modularity, label propagation) can be plugged in by
//! implementing the trait. The optimizer re-checks every partition with
//! [`Partition::validate`] and aborts the run on a coverage violation.

pub mod mincut;
pub mod spectral;

pub use mincut::MinCutDetector;
pub use spectral::{SpectralConfig, SpectralDetector};

use crate::error::{Result, SlottingError};
use crate::graph::CooccurrenceGraph;
use crate::universe::ProductId;

// ─── CommunityDetector ──────────────────────────────────────────────────────

/// Pluggable graph partitioning capability.
pub trait CommunityDetector {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Partition `graph` into at most `k` communities.
    ///
    /// Implementations must cover every node exactly once, including isolated
    /// nodes and degenerate (edgeless) graphs. `k` is pre-validated to lie in
    /// `1..=graph.node_count()`.
    fn detect(&self, graph: &CooccurrenceGraph, k: usize) -> Result<Partition>;
}

// ─── Partition ──────────────────────────────────────────────────────────────

/// Community label → members. Label is the position in [`communities`](Self::communities).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    communities: Vec<Vec<ProductId>>,
}

impl Partition {
    /// Wrap explicit communities without checking them.
    ///
    /// Empty communities are dropped and members are sorted. Use
    /// [`validate`](Self::validate) to check coverage.
    pub fn from_communities(communities: Vec<Vec<ProductId>>) -> Self {
        let communities = communities
            .into_iter()
            .filter(|c| !c.is_empty())
            .map(|mut c| {
                c.sort_unstable();
                c
            })
            .collect();
        Self { communities }
    }

    /// Build from per-product labels (`labels[i]` is the label of product `i`).
    ///
    /// Labels are compacted in order of first appearance, so the result does
    /// not depend on the numeric values a detector happened to use.
    pub fn from_labels(labels: &[usize]) -> Self {
        let mut remap: Vec<Option<usize>> = Vec::new();
        let mut communities: Vec<Vec<ProductId>> = Vec::new();
        for (i, &label) in labels.iter().enumerate() {
            if label >= remap.len() {
                remap.resize(label + 1, None);
            }
            let slot = match remap[label] {
                Some(slot) => slot,
                None => {
                    remap[label] = Some(communities.len());
                    communities.push(Vec::new());
                    communities.len() - 1
                }
            };
            communities[slot].push(ProductId::from_index(i));
        }
        Self { communities }
    }

    /// One community holding all `n` products.
    pub fn single(n: usize) -> Self {
        Self::from_communities(vec![(0..n).map(ProductId::from_index).collect()])
    }

    /// Every product in its own community.
    pub fn singletons(n: usize) -> Self {
        Self {
            communities: (0..n).map(|i| vec![ProductId::from_index(i)]).collect(),
        }
    }

    /// Number of non-empty communities.
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    /// `true` if there are no communities.
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Communities in label order; members sorted by id.
    pub fn communities(&self) -> &[Vec<ProductId>] {
        &self.communities
    }

    /// Label of the community containing `p`.
    pub fn community_of(&self, p: ProductId) -> Option<usize> {
        self.communities
            .iter()
            .position(|c| c.binary_search(&p).is_ok())
    }

    /// `true` if `a` and `b` share a community.
    pub fn same_community(&self, a: ProductId, b: ProductId) -> bool {
        match (self.community_of(a), self.community_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Check that the partition covers `0..n` exactly once.
    pub fn validate(&self, n: usize) -> Result<()> {
        let mut seen = vec![false; n];
        for &p in self.communities.iter().flatten() {
            let slot = seen
                .get_mut(p.index())
                .ok_or(SlottingError::PartitionUnknown(p))?;
            if *slot {
                return Err(SlottingError::PartitionDuplicate(p));
            }
            *slot = true;
        }
        match seen.iter().position(|&s| !s) {
            Some(i) => Err(SlottingError::PartitionMissing(ProductId::from_index(i))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_labels_compacts_in_first_seen_order() {
        let p = Partition::from_labels(&[7, 2, 7, 9, 2]);
        assert_eq!(
            p.communities(),
            &[
                vec![ProductId(0), ProductId(2)],
                vec![ProductId(1), ProductId(4)],
                vec![ProductId(3)],
            ]
        );
        assert!(p.validate(5).is_ok());
        assert!(p.same_community(ProductId(1), ProductId(4)));
        assert!(!p.same_community(ProductId(0), ProductId(3)));
    }

    #[test]
    fn test_validate_reports_missing() {
        let p = Partition::from_communities(vec![vec![ProductId(0)], vec![ProductId(2)]]);
        assert_eq!(p.validate(3), Err(SlottingError::PartitionMissing(ProductId(1))));
    }

    #[test]
    fn test_validate_reports_duplicate() {
        let p = Partition::from_communities(vec![
            vec![ProductId(0), ProductId(1)],
            vec![ProductId(1)],
        ]);
        assert_eq!(p.validate(2), Err(SlottingError::PartitionDuplicate(ProductId(1))));
    }

    #[test]
    fn test_validate_reports_unknown() {
        let p = Partition::from_communities(vec![vec![ProductId(0), ProductId(5)]]);
        assert_eq!(p.validate(2), Err(SlottingError::PartitionUnknown(ProductId(5))));
    }

    #[test]
    fn test_single_and_singletons_cover_everything() {
        assert!(Partition::single(4).validate(4).is_ok());
        assert_eq!(Partition::single(4).len(), 1);
        assert!(Partition::singletons(4).validate(4).is_ok());
        assert_eq!(Partition::singletons(4).len(), 4);
    }
}
