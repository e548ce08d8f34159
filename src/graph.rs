//! Co-occurrence graph built from baskets.
//!
//! Nodes are every product in the universe, fixed up front. An edge joins two
//! products that shared at least one basket; its weight is the number of
//! baskets containing both endpoints.
//!
//! Folding happens in a [`CooccurrenceAccumulator`] (pair → count). Only
//! [`CooccurrenceAccumulator::finish`] materialises a [`CooccurrenceGraph`],
//! so a graph is never observed half-built.
//!
//! # Invariants
//!
//! - Every edge has weight ≥ 1.
//! - No self-edges; edges are stored once with `source < target`.
//! - Isolated products are nodes with no incident edges, never absent.

use hashbrown::HashMap;
use ndarray::Array2;

use crate::error::{Result, SlottingError};
use crate::orders::Basket;
use crate::universe::{ProductId, ProductUniverse};

// ─── Edge ───────────────────────────────────────────────────────────────────

/// An undirected weighted edge, stored with `source < target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Lower product id.
    pub source: ProductId,
    /// Higher product id.
    pub target: ProductId,
    /// Number of baskets containing both endpoints.
    pub weight: u32,
}

// ─── Accumulator ────────────────────────────────────────────────────────────

/// Mutable pair-count accumulator; consumed by [`finish`](Self::finish).
#[derive(Clone, Debug)]
pub struct CooccurrenceAccumulator {
    node_count: usize,
    weights: HashMap<(ProductId, ProductId), u32>,
}

impl CooccurrenceAccumulator {
    /// Start an empty accumulator over `node_count` products.
    pub fn new(node_count: usize) -> Self {
        Self { node_count, weights: HashMap::new() }
    }

    /// Fold one basket: every unordered pair gains 1.
    ///
    /// Rejects baskets that reference products outside the universe and leaves
    /// the accumulator untouched in that case.
    pub fn fold(&mut self, basket: &Basket) -> Result<()> {
        if let Some(&bad) = basket.items().iter().find(|p| p.index() >= self.node_count) {
            return Err(SlottingError::UnknownProduct(bad));
        }
        for pair in basket.pairs() {
            *self.weights.entry(pair).or_insert(0) += 1;
        }
        Ok(())
    }

    /// Freeze the counts into an immutable graph.
    pub fn finish(self) -> CooccurrenceGraph {
        let mut edges: Vec<Edge> = self
            .weights
            .into_iter()
            .map(|((source, target), weight)| Edge { source, target, weight })
            .collect();
        edges.sort_unstable_by_key(|e| (e.source, e.target));

        let mut adjacency = vec![Vec::new(); self.node_count];
        for e in &edges {
            adjacency[e.source.index()].push((e.target, e.weight));
            adjacency[e.target.index()].push((e.source, e.weight));
        }
        for list in &mut adjacency {
            list.sort_unstable_by_key(|&(p, _)| p);
        }

        CooccurrenceGraph { node_count: self.node_count, edges, adjacency }
    }
}

// ─── Graph ──────────────────────────────────────────────────────────────────

/// Immutable weighted undirected co-occurrence graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CooccurrenceGraph {
    node_count: usize,
    /// Sorted by `(source, target)`.
    edges: Vec<Edge>,
    /// Per-node neighbour lists sorted by neighbour id.
    adjacency: Vec<Vec<(ProductId, u32)>>,
}

impl CooccurrenceGraph {
    /// Fold every basket into a graph over the whole universe.
    pub fn build(universe: &ProductUniverse, baskets: &[Basket]) -> Result<Self> {
        let mut acc = CooccurrenceAccumulator::new(universe.len());
        for basket in baskets {
            acc.fold(basket)?;
        }
        let graph = acc.finish();
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built co-occurrence graph"
        );
        Ok(graph)
    }

    /// Number of nodes (the universe size).
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of distinct co-occurring pairs.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` when no product ever shared a basket with another.
    pub fn is_edgeless(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges, sorted by `(source, target)`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Weight between `a` and `b`, or `None` if they never co-occurred.
    pub fn weight(&self, a: ProductId, b: ProductId) -> Option<u32> {
        let list = self.adjacency.get(a.index())?;
        list.binary_search_by_key(&b, |&(p, _)| p)
            .ok()
            .map(|i| list[i].1)
    }

    /// Neighbours of `p` with edge weights, sorted by neighbour id.
    pub fn neighbours(&self, p: ProductId) -> &[(ProductId, u32)] {
        self.adjacency.get(p.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum of incident edge weights.
    pub fn degree(&self, p: ProductId) -> u64 {
        self.neighbours(p).iter().map(|&(_, w)| u64::from(w)).sum()
    }

    /// Dense symmetric affinity matrix: `(i, j)` = edge weight, 0 elsewhere,
    /// zero diagonal.
    pub fn affinity_matrix(&self) -> Array2<f64> {
        let n = self.node_count;
        let mut a = Array2::<f64>::zeros((n, n));
        for e in &self.edges {
            let (i, j) = (e.source.index(), e.target.index());
            a[[i, j]] = f64::from(e.weight);
            a[[j, i]] = f64::from(e.weight);
        }
        a
    }

    /// Connected components, each sorted, ordered by smallest member.
    pub fn connected_components(&self) -> Vec<Vec<ProductId>> {
        let n = self.node_count;
        let mut seen = vec![false; n];
        let mut components = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut stack = vec![start];
            let mut members = Vec::new();
            while let Some(u) = stack.pop() {
                members.push(ProductId::from_index(u));
                for &(v, _) in &self.adjacency[u] {
                    if !seen[v.index()] {
                        seen[v.index()] = true;
                        stack.push(v.index());
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }
        components
    }

    /// Subgraph weights restricted to `members`, as a dense matrix indexed by
    /// position in `members`.
    pub fn induced_weights(&self, members: &[ProductId]) -> Vec<Vec<f64>> {
        let k = members.len();
        let mut w = vec![vec![0.0; k]; k];
        for (i, &a) in members.iter().enumerate() {
            for (j, &b) in members.iter().enumerate().skip(i + 1) {
                if let Some(weight) = self.weight(a, b) {
                    w[i][j] = f64::from(weight);
                    w[j][i] = f64::from(weight);
                }
            }
        }
        w
    }
}
