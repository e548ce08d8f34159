/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Spectral community detection on the co-occurrence affinity matrix.
//!
//! # Algorithm
//!
//! ```text
//! A            affinity matrix (edge weights, zero diagonal)
//! D            diagonal of weighted degrees
//! L = I − D^-½ A D^-½          normalised Laplacian (isolated rows: D^-½ = 0)
//! U            eigenvectors of the K smallest eigenvalues of L   (n × K)
//! Û            U with each row scaled to unit length
//! labels       k-means++ / Lloyd on the rows of Û, best of `kmeans_restarts`
//! ```
//!
//! The K smallest eigenvectors include the degree-scaled vector at eigenvalue 0.
//! On a connected graph it is constant after row scaling and does not move any
//! product; on a disconnected graph the zero eigenspace is exactly the set of
//! component indicators, which is what lets K well-separated groups fall out.
//!
//! # Degenerate input
//!
//! No edges, `K = 1`, or a single product: no spectral structure to exploit.
//! The detector returns one community holding everything and logs a warning
//! for the edgeless case. The slotting optimizer then degrades to a pure
//! heat-sorted layout.
//!
//! # Determinism
//!
//! Jacobi is deterministic, eigenvectors are sign-normalised, and k-means
//! draws from a `StdRng` seeded with [`SpectralDetector::seed`]. Same graph,
//! same K, same seed → same partition.

use ndarray::{s, Array2, ArrayView1};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CommunityDetector, Partition};
use crate::error::Result;
use crate::graph::CooccurrenceGraph;
use crate::linalg::jacobi_eigen;

/// k-means seed used when none is supplied.
pub const DEFAULT_SPECTRAL_SEED: u64 = 42;

// ─── Config ─────────────────────────────────────────────────────────────────

/// Numerical knobs for the spectral detector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectralConfig {
    /// Cap on Jacobi sweeps. Default: 64.
    pub max_sweeps: u32,
    /// Off-diagonal mass at which Jacobi stops. Default: 1e-10.
    pub tolerance: f64,
    /// Lloyd iterations per k-means restart. Default: 100.
    pub kmeans_iterations: usize,
    /// Independent k-means++ restarts; lowest inertia wins. Default: 10.
    pub kmeans_restarts: usize,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 64,
            tolerance: 1e-10,
            kmeans_iterations: 100,
            kmeans_restarts: 10,
        }
    }
}

// ─── SpectralDetector ───────────────────────────────────────────────────────

/// Normalised-Laplacian spectral clustering.
#[derive(Clone, Debug)]
pub struct SpectralDetector {
    config: SpectralConfig,
    seed: u64,
}

impl SpectralDetector {
    /// Detector with explicit configuration and k-means seed.
    pub fn new(config: SpectralConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    /// Same configuration, different seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Seed driving the k-means initialisation.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Active configuration.
    pub fn config(&self) -> &SpectralConfig {
        &self.config
    }

    /// Row-normalised spectral embedding, `n × min(k, n)`.
    pub fn embed(&self, graph: &CooccurrenceGraph, k: usize) -> Array2<f64> {
        let n = graph.node_count();
        let k = k.min(n);
        let a = graph.affinity_matrix();

        let d_inv_sqrt: Vec<f64> = (0..n)
            .map(|i| {
                let deg = a.row(i).sum();
                if deg > 0.0 { 1.0 / deg.sqrt() } else { 0.0 }
            })
            .collect();

        let mut laplacian = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                let identity = if i == j { 1.0 } else { 0.0 };
                laplacian[[i, j]] = identity - d_inv_sqrt[i] * a[[i, j]] * d_inv_sqrt[j];
            }
        }

        let eig = jacobi_eigen(&laplacian, self.config.max_sweeps, self.config.tolerance);
        if !eig.convergence.converged {
            tracing::debug!(
                sweeps = eig.convergence.sweeps,
                residual = eig.convergence.residual,
                "laplacian eigen-decomposition hit the sweep cap"
            );
        }

        let mut u = eig.vectors.slice(s![.., 0..k]).to_owned();
        for mut row in u.rows_mut() {
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 1e-12 {
                row.mapv_inplace(|x| x / norm);
            }
        }
        u
    }
}

impl Default for SpectralDetector {
    fn default() -> Self {
        Self::new(SpectralConfig::default(), DEFAULT_SPECTRAL_SEED)
    }
}

impl CommunityDetector for SpectralDetector {
    fn name(&self) -> &'static str {
        "spectral"
    }

    fn detect(&self, graph: &CooccurrenceGraph, k: usize) -> Result<Partition> {
        let n = graph.node_count();
        let k = k.min(n);
        if n == 0 {
            return Ok(Partition::from_communities(Vec::new()));
        }
        if k <= 1 {
            return Ok(Partition::single(n));
        }
        if graph.is_edgeless() {
            tracing::warn!(
                products = n,
                requested = k,
                "affinity matrix has no edges; falling back to a single community"
            );
            return Ok(Partition::single(n));
        }

        let embedding = self.embed(graph, k);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (labels, inertia) = kmeans(
            &embedding,
            k,
            self.config.kmeans_iterations,
            self.config.kmeans_restarts,
            &mut rng,
        );
        let partition = Partition::from_labels(&labels);
        tracing::debug!(
            requested = k,
            communities = partition.len(),
            inertia,
            "spectral partition computed"
        );
        Ok(partition)
    }
}

// ─── k-means ────────────────────────────────────────────────────────────────

/// Best-of-`restarts` k-means over the rows of `points`.
///
/// Returns per-row labels in `0..k` and the winning inertia. Ties between
/// restarts keep the earliest.
fn kmeans<R: Rng + ?Sized>(
    points: &Array2<f64>,
    k: usize,
    iterations: usize,
    restarts: usize,
    rng: &mut R,
) -> (Vec<usize>, f64) {
    let mut best: Option<(Vec<usize>, f64)> = None;
    for _ in 0..restarts.max(1) {
        let mut centroids = plus_plus_init(points, k, rng);
        let labels = lloyd(points, &mut centroids, iterations);
        let inertia: f64 = labels
            .iter()
            .enumerate()
            .map(|(i, &c)| sq_dist(points.row(i), centroids.row(c)))
            .sum();
        let better = best.as_ref().map_or(true, |(_, b)| inertia < *b - 1e-12);
        if better {
            best = Some((labels, inertia));
        }
    }
    best.unwrap_or_else(|| (vec![0; points.nrows()], 0.0))
}

/// k-means++ seeding: first centroid uniform, the rest proportional to D².
fn plus_plus_init<R: Rng + ?Sized>(points: &Array2<f64>, k: usize, rng: &mut R) -> Array2<f64> {
    let n = points.nrows();
    let mut chosen: Vec<usize> = Vec::with_capacity(k);
    chosen.push(rng.random_range(0..n));

    let mut dist2 = vec![f64::INFINITY; n];
    while chosen.len() < k {
        if let Some(&last) = chosen.last() {
            for (i, d) in dist2.iter_mut().enumerate() {
                *d = d.min(sq_dist(points.row(i), points.row(last)));
            }
        }
        let next = match WeightedIndex::new(&dist2) {
            Ok(weights) => weights.sample(rng),
            // every remaining point sits on a centroid: take the first unused row
            Err(_) => (0..n).find(|i| !chosen.contains(i)).unwrap_or(0),
        };
        chosen.push(next);
    }

    let mut centroids = Array2::<f64>::zeros((k, points.ncols()));
    for (c, &row) in chosen.iter().enumerate() {
        centroids.row_mut(c).assign(&points.row(row));
    }
    centroids
}

/// Lloyd iterations; empty clusters keep their previous centroid.
fn lloyd(points: &Array2<f64>, centroids: &mut Array2<f64>, iterations: usize) -> Vec<usize> {
    let n = points.nrows();
    let k = centroids.nrows();
    let mut labels = vec![usize::MAX; n];

    for _ in 0..iterations.max(1) {
        let mut changed = false;
        for (i, label) in labels.iter_mut().enumerate() {
            let mut best = 0;
            let mut best_d = f64::INFINITY;
            for c in 0..k {
                let d = sq_dist(points.row(i), centroids.row(c));
                if d < best_d {
                    best_d = d;
                    best = c;
                }
            }
            if *label != best {
                *label = best;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = Array2::<f64>::zeros(centroids.raw_dim());
        let mut counts = vec![0usize; k];
        for (i, &c) in labels.iter().enumerate() {
            counts[c] += 1;
            let mut row = sums.row_mut(c);
            row += &points.row(i);
        }
        for c in 0..k {
            if counts[c] > 0 {
                let mean = sums.row(c).mapv(|x| x / counts[c] as f64);
                centroids.row_mut(c).assign(&mean);
            }
        }
    }
    labels
}

fn sq_dist(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::Basket;
    use crate::universe::{ProductId, ProductUniverse};

    fn clique_graph(groups: &[&[u32]], bridge: Option<(u32, u32)>, n: usize) -> CooccurrenceGraph {
        let universe = ProductUniverse::synthetic(n);
        let mut baskets = Vec::new();
        for group in groups {
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    for _ in 0..5 {
                        baskets.push(Basket::from_products([ProductId(a), ProductId(b)]).unwrap());
                    }
                }
            }
        }
        if let Some((a, b)) = bridge {
            baskets.push(Basket::from_products([ProductId(a), ProductId(b)]).unwrap());
        }
        CooccurrenceGraph::build(&universe, &baskets).unwrap()
    }

    #[test]
    fn test_two_cliques_with_weak_bridge_split_cleanly() {
        let g = clique_graph(&[&[0, 1, 2, 3, 4], &[5, 6, 7, 8, 9]], Some((4, 5)), 10);
        let p = SpectralDetector::default().detect(&g, 2).unwrap();
        assert!(p.validate(10).is_ok());
        assert_eq!(p.len(), 2);
        for i in 1..5 {
            assert!(p.same_community(ProductId(0), ProductId(i)));
            assert!(p.same_community(ProductId(5), ProductId(i + 5)));
        }
        assert!(!p.same_community(ProductId(0), ProductId(5)));
    }

    #[test]
    fn test_three_components_recovered() {
        let g = clique_graph(&[&[0, 3, 6], &[1, 4, 7], &[2, 5, 8]], None, 9);
        let p = SpectralDetector::default().detect(&g, 3).unwrap();
        assert!(p.validate(9).is_ok());
        assert_eq!(p.len(), 3);
        assert!(p.same_community(ProductId(0), ProductId(6)));
        assert!(p.same_community(ProductId(1), ProductId(7)));
        assert!(p.same_community(ProductId(2), ProductId(8)));
        assert!(!p.same_community(ProductId(0), ProductId(1)));
        assert!(!p.same_community(ProductId(1), ProductId(2)));
    }

    #[test]
    fn test_edgeless_graph_falls_back_to_single_community() {
        let universe = ProductUniverse::synthetic(6);
        let g = CooccurrenceGraph::build(&universe, &[]).unwrap();
        let p = SpectralDetector::default().detect(&g, 3).unwrap();
        assert_eq!(p, Partition::single(6));
    }

    #[test]
    fn test_isolated_nodes_are_still_covered() {
        let g = clique_graph(&[&[0, 1, 2], &[3, 4, 5]], None, 9);
        let p = SpectralDetector::default().detect(&g, 4).unwrap();
        assert!(p.validate(9).is_ok());
        assert!(p.len() <= 4);
    }

    #[test]
    fn test_same_seed_same_partition() {
        let g = clique_graph(&[&[0, 1, 2, 3], &[4, 5, 6], &[7, 8, 9, 10, 11]], Some((3, 4)), 12);
        let a = SpectralDetector::default().with_seed(5).detect(&g, 3).unwrap();
        let b = SpectralDetector::default().with_seed(5).detect(&g, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_k_equal_to_n_is_valid() {
        let g = clique_graph(&[&[0, 1], &[2, 3]], Some((1, 2)), 4);
        let p = SpectralDetector::default().detect(&g, 4).unwrap();
        assert!(p.validate(4).is_ok());
    }

    #[test]
    fn test_embedding_rows_are_unit_or_zero() {
        let g = clique_graph(&[&[0, 1, 2], &[3, 4]], None, 6);
        let u = SpectralDetector::default().embed(&g, 2);
        assert_eq!(u.dim(), (6, 2));
        for row in u.rows() {
            let norm: f64 = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!(norm < 1e-9 || (norm - 1.0).abs() < 1e-9, "row norm {}", norm);
        }
    }

    #[test]
    fn test_embedding_clamps_k_to_node_count() {
        let g = clique_graph(&[&[0, 1, 2]], None, 3);
        let u = SpectralDetector::default().embed(&g, 5);
        assert_eq!(u.dim(), (3, 3));
    }
}
