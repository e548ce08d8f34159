//! Strongest pairwise associations.
//!
//! Read-only over the graph. Edges are ranked by descending weight; ties go
//! to the lexicographically smaller `(source, target)` pair, so the ranking is
//! stable across runs on the same graph.

use core::cmp::Reverse;

use crate::graph::CooccurrenceGraph;
use crate::universe::ProductId;

/// Number of relationships reported when the caller does not say otherwise.
pub const DEFAULT_TOP_EDGES: usize = 10;

/// One ranked relationship, `source < target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopEdge {
    /// Lower product id.
    pub source: ProductId,
    /// Higher product id.
    pub target: ProductId,
    /// Baskets containing both.
    pub weight: u32,
}

/// The `limit` heaviest edges, heaviest first.
///
/// Length is `min(limit, graph.edge_count())`.
pub fn top_edges(graph: &CooccurrenceGraph, limit: usize) -> Vec<TopEdge> {
    let mut ranked: Vec<TopEdge> = graph
        .edges()
        .iter()
        .map(|e| TopEdge { source: e.source, target: e.target, weight: e.weight })
        .collect();
    ranked.sort_by_key(|e| (Reverse(e.weight), e.source, e.target));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::Basket;
    use crate::universe::ProductUniverse;

    fn graph(n: usize, baskets: &[&[u32]]) -> CooccurrenceGraph {
        let universe = ProductUniverse::synthetic(n);
        let baskets: Vec<Basket> = baskets
            .iter()
            .map(|ids| Basket::from_products(ids.iter().copied().map(ProductId)).unwrap())
            .collect();
        CooccurrenceGraph::build(&universe, &baskets).unwrap()
    }

    #[test]
    fn test_reference_top_one() {
        let g = graph(3, &[&[0, 1], &[0, 1], &[0, 2]]);
        assert_eq!(
            top_edges(&g, 1),
            vec![TopEdge { source: ProductId(0), target: ProductId(1), weight: 2 }]
        );
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let g = graph(5, &[&[0, 1, 2], &[1, 2], &[1, 2, 3], &[3, 4]]);
        let top = top_edges(&g, 3);
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].weight >= w[1].weight));
        assert_eq!((top[0].source, top[0].target, top[0].weight), (ProductId(1), ProductId(2), 3));
    }

    #[test]
    fn test_ties_break_by_product_id() {
        let g = graph(4, &[&[2, 3], &[0, 1], &[1, 2]]);
        let top = top_edges(&g, 10);
        let pairs: Vec<(u32, u32)> = top.iter().map(|e| (e.source.0, e.target.0)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_limit_larger_than_edge_count() {
        let g = graph(3, &[&[0, 1]]);
        assert_eq!(top_edges(&g, 10).len(), 1);
        assert!(top_edges(&g, 0).is_empty());
    }
}
