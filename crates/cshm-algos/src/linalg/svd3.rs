//! 3×3 SVD by cyclic Jacobi rotations
//!
//! Computes A = U · diag(S) · Vᵀ for a general 3×3 matrix. V and S come from
//! a cyclic Jacobi eigendecomposition of the symmetric matrix AᵀA; U is then
//! recovered column by column as A·vᵢ / σᵢ and completed with cross products
//! when A is rank deficient.
//!
//! The iteration stops when the largest off-diagonal magnitude of AᵀA falls
//! below [`SVD_TOLERANCE`] or after [`MAX_SWEEPS`] sweeps. Hitting the sweep
//! cap is not an error: the current estimate is returned with
//! `converged == false`.
//!
//! All matrices are row-major: `m[row][col]`.

use super::mat3::{cross, dot, normalize, transform, transpose, Mat3, IDENTITY};

/// Convergence threshold on the largest off-diagonal element
pub const SVD_TOLERANCE: f64 = 1e-10;

/// Sweep cap for pathological inputs
pub const MAX_SWEEPS: usize = 100;

/// Singular values below this are treated as zero when building U
const RANK_EPS: f64 = 1e-12;

/// Result of 3×3 SVD decomposition: A = U · diag(S) · Vᵀ
#[derive(Debug, Clone)]
pub struct Svd3 {
    /// Left singular vectors (orthogonal, row-major)
    pub u: Mat3,
    /// Singular values, sorted descending, non-negative
    pub s: [f64; 3],
    /// Right singular vectors transposed (orthogonal, row-major)
    pub vt: Mat3,
    /// Number of Jacobi sweeps performed
    pub sweeps: usize,
    /// Whether the off-diagonal tolerance was reached before the sweep cap
    pub converged: bool,
}

impl Svd3 {
    /// V (right singular vectors as columns)
    pub fn v(&self) -> Mat3 {
        transpose(&self.vt)
    }
}

/// Compute the SVD of a 3×3 matrix
pub fn svd3(a: &Mat3) -> Svd3 {
    // 1. AᵀA is symmetric positive semi-definite
    let ata = gram(a);

    // 2. Eigenvectors of AᵀA are the right singular vectors
    let eig = jacobi_eigen_3x3(&ata);
    if !eig.converged {
        log::debug!(
            "Jacobi SVD hit the {}-sweep cap (off-diagonal {:.3e}); using current estimate",
            MAX_SWEEPS,
            eig.off_diagonal
        );
    }

    // 3. Sort by descending eigenvalue
    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| eig.values[j].total_cmp(&eig.values[i]));

    let v_cols = [eig.vectors[order[0]], eig.vectors[order[1]], eig.vectors[order[2]]];

    // 4. U columns: u_i = A · v_i / s_i. The norm of A · v_i is a more
    // accurate singular value than sqrt(λ_i) when λ_i is tiny.
    let scale = eig.values[order[0]].max(0.0).sqrt().max(1.0);
    let mut s = [0.0f64; 3];
    let mut u_cols = [[0.0f64; 3]; 3];
    let mut rank = 0;
    for i in 0..3 {
        let av = transform(a, &v_cols[i]);
        s[i] = dot(&av, &av).sqrt();
        if s[i] > RANK_EPS * scale {
            u_cols[i] = [av[0] / s[i], av[1] / s[i], av[2] / s[i]];
            rank += 1;
        }
    }

    // Orthonormalize U, completing it with cross products when rank deficient
    match rank {
        0 => u_cols = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        1 => {
            normalize(&mut u_cols[0]);
            u_cols[1] = arbitrary_perpendicular(&u_cols[0]);
            u_cols[2] = cross(&u_cols[0], &u_cols[1]);
        }
        _ => {
            normalize(&mut u_cols[0]);
            let d = dot(&u_cols[0], &u_cols[1]);
            for k in 0..3 {
                u_cols[1][k] -= d * u_cols[0][k];
            }
            normalize(&mut u_cols[1]);
            let completed = cross(&u_cols[0], &u_cols[1]);
            // Keep the sign A · v_2 dictates so that A = U·S·Vᵀ still holds
            let sign = if rank == 3 && dot(&completed, &u_cols[2]) < 0.0 { -1.0 } else { 1.0 };
            u_cols[2] = [sign * completed[0], sign * completed[1], sign * completed[2]];
        }
    }

    // 5. Assemble row-major U and Vᵀ
    let mut u = IDENTITY;
    let mut vt = IDENTITY;
    for col in 0..3 {
        for row in 0..3 {
            u[row][col] = u_cols[col][row];
            vt[col][row] = v_cols[col][row];
        }
    }

    Svd3 {
        u,
        s,
        vt,
        sweeps: eig.sweeps,
        converged: eig.converged,
    }
}

// ============================================================================
// Internal helpers
// ============================================================================

/// AᵀA for a row-major A
fn gram(a: &Mat3) -> Mat3 {
    let mut out = [[0.0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = a[0][i] * a[0][j] + a[1][i] * a[1][j] + a[2][i] * a[2][j];
        }
    }
    out
}

fn arbitrary_perpendicular(v: &[f64; 3]) -> [f64; 3] {
    let candidate = if v[0].abs() < v[1].abs() && v[0].abs() < v[2].abs() {
        [1.0, 0.0, 0.0]
    } else if v[1].abs() < v[2].abs() {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    };
    let mut perp = cross(v, &candidate);
    normalize(&mut perp);
    perp
}

struct Eigen3 {
    values: [f64; 3],
    /// Eigenvectors as columns
    vectors: [[f64; 3]; 3],
    sweeps: usize,
    converged: bool,
    off_diagonal: f64,
}

fn max_off_diagonal(a: &Mat3) -> f64 {
    a[0][1].abs().max(a[0][2].abs()).max(a[1][2].abs())
}

/// Cyclic Jacobi eigenvalue algorithm for a symmetric 3×3 matrix
fn jacobi_eigen_3x3(m: &Mat3) -> Eigen3 {
    let mut a = *m;
    let mut v = IDENTITY;

    let mut sweeps = 0;
    let mut off = max_off_diagonal(&a);
    while off >= SVD_TOLERANCE && sweeps < MAX_SWEEPS {
        for &(p, q) in &[(0usize, 1usize), (0, 2), (1, 2)] {
            if a[p][q] != 0.0 {
                jacobi_rotate(&mut a, &mut v, p, q);
            }
        }
        sweeps += 1;
        off = max_off_diagonal(&a);
    }

    Eigen3 {
        values: [a[0][0], a[1][1], a[2][2]],
        vectors: [
            [v[0][0], v[1][0], v[2][0]],
            [v[0][1], v[1][1], v[2][1]],
            [v[0][2], v[1][2], v[2][2]],
        ],
        sweeps,
        converged: off < SVD_TOLERANCE,
        off_diagonal: off,
    }
}

/// Apply one Jacobi rotation zeroing a[p][q]; accumulate into v.
fn jacobi_rotate(a: &mut Mat3, v: &mut Mat3, p: usize, q: usize) {
    let app = a[p][p];
    let aqq = a[q][q];
    let apq = a[p][q];

    let tau = (aqq - app) / (2.0 * apq);
    let t = if tau >= 0.0 {
        1.0 / (tau + (1.0 + tau * tau).sqrt())
    } else {
        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
    };
    let c = 1.0 / (1.0 + t * t).sqrt();
    let s = t * c;

    a[p][p] = c * c * app - 2.0 * s * c * apq + s * s * aqq;
    a[q][q] = s * s * app + 2.0 * s * c * apq + c * c * aqq;
    a[p][q] = 0.0;
    a[q][p] = 0.0;

    let r = 3 - p - q;
    let arp = a[r][p];
    let arq = a[r][q];
    a[r][p] = c * arp - s * arq;
    a[p][r] = a[r][p];
    a[r][q] = s * arp + c * arq;
    a[q][r] = a[r][q];

    for row in v.iter_mut() {
        let vip = row[p];
        let viq = row[q];
        row[p] = c * vip - s * viq;
        row[q] = s * vip + c * viq;
    }
}
