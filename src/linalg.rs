/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Symmetric eigen-decomposition by cyclic Jacobi rotation.
//!
//! The spectral detector needs the bottom of the spectrum of a normalised
//! graph Laplacian. Product universes are small (tens to a few hundred nodes),
//! so a dense Jacobi sweep is exact enough, allocation-light, and fully
//! deterministic for a given input.
//!
//! Each sweep visits every off-diagonal pair `(p, q)` once and applies the
//! rotation that zeroes `a[p][q]`. Iteration stops when the off-diagonal
//! Frobenius mass drops below `tolerance` or `max_sweeps` is reached.

use ndarray::{Array1, Array2};

/// Convergence report for one decomposition.
#[derive(Clone, Debug, PartialEq)]
pub struct JacobiConvergence {
    /// Whether the off-diagonal mass fell below the tolerance.
    pub converged: bool,
    /// Sweeps performed.
    pub sweeps: u32,
    /// Off-diagonal sum of squares after the final sweep.
    pub residual: f64,
}

/// Eigenpairs of a real symmetric matrix, sorted by ascending eigenvalue.
#[derive(Clone, Debug)]
pub struct SymmetricEigen {
    /// Eigenvalues, ascending.
    pub values: Array1<f64>,
    /// Column `k` is the unit eigenvector for `values[k]`.
    pub vectors: Array2<f64>,
    /// How the iteration ended.
    pub convergence: JacobiConvergence,
}

/// Decompose a symmetric matrix.
///
/// Only the symmetric part of `m` is meaningful; callers must pass a square
/// matrix. Ties between equal eigenvalues keep their diagonal order, and each
/// eigenvector is sign-normalised so its largest-magnitude component is
/// positive.
pub fn jacobi_eigen(m: &Array2<f64>, max_sweeps: u32, tolerance: f64) -> SymmetricEigen {
    let n = m.nrows();
    let mut a = m.clone();
    let mut v = Array2::<f64>::eye(n);

    let mut sweeps = 0;
    let mut residual = off_diagonal_mass(&a);
    while residual > tolerance && sweeps < max_sweeps {
        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                // A ← Aᵀ·J column pass, then row pass
                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                a[[p, q]] = 0.0;
                a[[q, p]] = 0.0;

                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
        sweeps += 1;
        residual = off_diagonal_mass(&a);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[i, i]].total_cmp(&a[[j, j]]).then(i.cmp(&j)));

    let mut values = Array1::<f64>::zeros(n);
    let mut vectors = Array2::<f64>::zeros((n, n));
    for (dst, &src) in order.iter().enumerate() {
        values[dst] = a[[src, src]];
        let pivot = (0..n)
            .max_by(|&x, &y| v[[x, src]].abs().total_cmp(&v[[y, src]].abs()).then(y.cmp(&x)))
            .map_or(1.0, |k| v[[k, src]].signum());
        for k in 0..n {
            vectors[[k, dst]] = pivot * v[[k, src]];
        }
    }

    tracing::debug!(n, sweeps, residual, "jacobi eigen-decomposition finished");

    SymmetricEigen {
        values,
        vectors,
        convergence: JacobiConvergence { converged: residual <= tolerance, sweeps, residual },
    }
}

/// Sum of squares of the strictly upper triangle.
fn off_diagonal_mass(a: &Array2<f64>) -> f64 {
    let n = a.nrows();
    let mut sum = 0.0;
    for p in 0..n {
        for q in (p + 1)..n {
            sum += a[[p, q]] * a[[p, q]];
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_eigenpairs(m: &Array2<f64>, eig: &SymmetricEigen, tol: f64) {
        let n = m.nrows();
        for k in 0..n {
            let vk = eig.vectors.column(k);
            let mv = m.dot(&vk);
            for i in 0..n {
                assert!(
                    (mv[i] - eig.values[k] * vk[i]).abs() < tol,
                    "pair {} row {}: {} vs {}",
                    k,
                    i,
                    mv[i],
                    eig.values[k] * vk[i]
                );
            }
        }
    }

    #[test]
    fn test_diagonal_matrix_is_already_decomposed() {
        let m = array![[3.0, 0.0], [0.0, 1.0]];
        let eig = jacobi_eigen(&m, 10, 1e-12);
        assert_eq!(eig.convergence.sweeps, 0);
        assert_eq!(eig.values[0], 1.0);
        assert_eq!(eig.values[1], 3.0);
        assert_eq!(eig.vectors[[1, 0]], 1.0);
    }

    #[test]
    fn test_two_by_two() {
        let m = array![[2.0, 1.0], [1.0, 2.0]];
        let eig = jacobi_eigen(&m, 10, 1e-14);
        assert!((eig.values[0] - 1.0).abs() < 1e-10);
        assert!((eig.values[1] - 3.0).abs() < 1e-10);
        assert_eigenpairs(&m, &eig, 1e-9);
    }

    #[test]
    fn test_path_laplacian() {
        // Laplacian of the path 0-1-2: eigenvalues 0, 1, 3
        let m = array![[1.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 1.0]];
        let eig = jacobi_eigen(&m, 50, 1e-14);
        assert!(eig.convergence.converged);
        assert!(eig.values[0].abs() < 1e-9);
        assert!((eig.values[1] - 1.0).abs() < 1e-9);
        assert!((eig.values[2] - 3.0).abs() < 1e-9);
        assert_eigenpairs(&m, &eig, 1e-8);
    }

    #[test]
    fn test_eigenvectors_are_orthonormal() {
        let m = array![
            [4.0, 1.0, 2.0, 0.5],
            [1.0, 3.0, 0.0, 1.0],
            [2.0, 0.0, 5.0, 1.5],
            [0.5, 1.0, 1.5, 2.0]
        ];
        let eig = jacobi_eigen(&m, 64, 1e-16);
        let gram = eig.vectors.t().dot(&eig.vectors);
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((gram[[i, j]] - expected).abs() < 1e-9);
            }
        }
        assert_eigenpairs(&m, &eig, 1e-8);
    }

    #[test]
    fn test_sign_is_normalised() {
        let m = array![[2.0, -1.0], [-1.0, 2.0]];
        let eig = jacobi_eigen(&m, 10, 1e-14);
        for k in 0..2 {
            let col = eig.vectors.column(k);
            let biggest = col.iter().copied().fold(0.0_f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
            assert!(biggest > 0.0);
        }
    }
}
