//! Community detection by recursive global minimum cut.
//!
//! Starts from one community holding every product and repeatedly bisects the
//! largest splittable community along its Stoer-Wagner global minimum cut,
//! until `K` communities exist. The cut is the thinnest co-occurrence bridge
//! inside that community, so heavily co-ordered products stay together.
//!
//! Disconnected pieces have a cut value of 0 and are separated first. An
//! edgeless community still splits (every cut is 0), which keeps the output
//! at exactly `K` communities for any `K ≤ N`.
//!
//! Fully deterministic; no seed involved.

use super::{CommunityDetector, Partition};
use crate::error::Result;
use crate::graph::CooccurrenceGraph;
use crate::universe::ProductId;

/// Result of one minimum-cut computation on an induced subgraph.
#[derive(Clone, Debug, PartialEq)]
pub struct MinCutResult {
    /// Total weight crossing the cut.
    pub min_cut_value: f64,
    /// Members on one side, sorted.
    pub partition_s: Vec<ProductId>,
    /// Members on the other side, sorted.
    pub partition_complement: Vec<ProductId>,
}

/// Recursive Stoer-Wagner bisection detector.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinCutDetector;

impl MinCutDetector {
    /// New detector.
    pub fn new() -> Self {
        Self
    }

    /// Global minimum cut of the subgraph induced by `members`.
    ///
    /// Returns `None` for fewer than two members.
    pub fn min_cut(&self, graph: &CooccurrenceGraph, members: &[ProductId]) -> Option<MinCutResult> {
        if members.len() < 2 {
            return None;
        }
        let w = graph.induced_weights(members);
        let (value, side) = stoer_wagner(w);

        let mut in_s = vec![false; members.len()];
        for i in side {
            in_s[i] = true;
        }
        let (mut partition_s, mut partition_complement) = (Vec::new(), Vec::new());
        for (i, &p) in members.iter().enumerate() {
            if in_s[i] {
                partition_s.push(p);
            } else {
                partition_complement.push(p);
            }
        }
        partition_s.sort_unstable();
        partition_complement.sort_unstable();
        Some(MinCutResult { min_cut_value: value, partition_s, partition_complement })
    }
}

impl CommunityDetector for MinCutDetector {
    fn name(&self) -> &'static str {
        "min-cut"
    }

    fn detect(&self, graph: &CooccurrenceGraph, k: usize) -> Result<Partition> {
        let n = graph.node_count();
        let mut communities = vec![(0..n).map(ProductId::from_index).collect::<Vec<_>>()];

        while communities.len() < k.min(n) {
            // largest community first; ties go to the lowest smallest-member
            let Some(target) = communities
                .iter()
                .enumerate()
                .filter(|(_, c)| c.len() >= 2)
                .max_by(|(_, a), (_, b)| a.len().cmp(&b.len()).then(b[0].cmp(&a[0])))
                .map(|(i, _)| i)
            else {
                break;
            };

            let members = communities.swap_remove(target);
            let Some(cut) = self.min_cut(graph, &members) else {
                communities.push(members);
                break;
            };
            tracing::trace!(
                size = members.len(),
                cut = cut.min_cut_value,
                "bisected community"
            );
            communities.push(cut.partition_s);
            communities.push(cut.partition_complement);
            communities.sort_unstable_by_key(|c| c.first().copied());
        }

        Ok(Partition::from_communities(communities))
    }
}

// ─── Stoer-Wagner algorithm ─────────────────────────────────────────────────

/// Stoer-Wagner global minimum cut over a dense symmetric weight matrix.
///
/// Returns the cut value and the local indices on one side of it.
/// O(V³) with the dense scan, which is fine for community-sized inputs.
fn stoer_wagner(mut w: Vec<Vec<f64>>) -> (f64, Vec<usize>) {
    let n = w.len();

    // Which original nodes are merged into each super-node.
    let mut merged: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut active = vec![true; n];

    let mut best_cut = f64::INFINITY;
    let mut best_side: Vec<usize> = Vec::new();

    for _phase in 0..(n - 1) {
        let (s, t, cut_val) = min_cut_phase(&w, &active);
        if cut_val < best_cut {
            best_cut = cut_val;
            best_side = merged[t].clone();
        }
        // Merge t into s
        for i in 0..n {
            if active[i] {
                w[s][i] += w[t][i];
                w[i][s] += w[i][t];
            }
        }
        let absorbed = core::mem::take(&mut merged[t]);
        merged[s].extend(absorbed);
        active[t] = false;
    }

    (if best_cut.is_finite() { best_cut } else { 0.0 }, best_side)
}

/// One maximum-adjacency ordering phase.
///
/// Returns `(s, t, cut_of_the_phase)` where `t` is the last node added and `s`
/// the one before it.
fn min_cut_phase(w: &[Vec<f64>], active: &[bool]) -> (usize, usize, f64) {
    let n = w.len();
    let mut in_a = vec![false; n];
    let mut key = vec![0.0_f64; n];

    let Some(first) = (0..n).find(|&i| active[i]) else {
        return (0, 0, 0.0);
    };
    let mut prev = first;
    let mut last = first;

    let active_count = active.iter().filter(|&&a| a).count();
    for step in 0..active_count {
        // most tightly connected node not yet in A; ties go to the lowest index
        let u_opt = (0..n)
            .filter(|&i| active[i] && !in_a[i])
            .max_by(|&a, &b| key[a].total_cmp(&key[b]).then(b.cmp(&a)));
        let Some(u) = u_opt else { break };

        if step > 0 {
            prev = last;
        }
        last = u;
        in_a[u] = true;

        for v in 0..n {
            if active[v] && !in_a[v] {
                key[v] += w[u][v];
            }
        }
    }

    (prev, last, key[last])
}
