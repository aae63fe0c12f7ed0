//! Kabsch algorithm for optimal rigid rotation
//!
//! Given two equal-length point sets with a fixed correspondence, finds the
//! proper rotation R (det = +1) minimizing Σ‖R·pᵢ − qᵢ‖². Rotation is about
//! the origin; use [`center_points`] first when the sets are not already
//! centered. For shape measures both sets are metal-centered unit vectors,
//! so no translation is involved.

use crate::linalg::mat3::{determinant, squared_distance, transform, Mat3, IDENTITY};
use crate::linalg::svd3::svd3;
use crate::ShapeError;

/// Result of a Kabsch fit
#[derive(Debug, Clone)]
pub struct KabschResult {
    /// Proper rotation mapping source onto target (row-major)
    pub rotation: Mat3,
    /// RMSD of the rotated source against the target
    pub rmsd: f64,
    /// Number of point pairs used
    pub n_points: usize,
    /// True when V·Uᵀ was a reflection and the third singular vector was flipped
    pub reflection_corrected: bool,
}

/// Best-fit rotation of `source` onto `target` for the given pairing.
///
/// Never fails for matching lengths: an empty set yields identity, and
/// degenerate (collinear or coincident) input yields a best-effort rotation.
pub fn kabsch(source: &[[f64; 3]], target: &[[f64; 3]]) -> Result<KabschResult, ShapeError> {
    let n = source.len();
    if n != target.len() {
        return Err(ShapeError::size_mismatch(target.len(), n));
    }
    if n == 0 {
        return Ok(KabschResult {
            rotation: IDENTITY,
            rmsd: 0.0,
            n_points: 0,
            reflection_corrected: false,
        });
    }

    // 1. Cross-covariance H = Pᵀ·Q, H[j][k] = Σ_i p_i[j] · q_i[k]
    let mut h = [[0.0f64; 3]; 3];
    for (p, q) in source.iter().zip(target.iter()) {
        for j in 0..3 {
            for k in 0..3 {
                h[j][k] += p[j] * q[k];
            }
        }
    }

    // 2. H = U·S·Vᵀ
    let svd = svd3(&h);
    let u = &svd.u;
    let mut v = svd.v();

    // 3. R = V·Uᵀ, flipping V's third column if that yields a reflection
    let mut rotation = v_ut(&v, u);
    let reflection_corrected = determinant(&rotation) < 0.0;
    if reflection_corrected {
        for row in v.iter_mut() {
            row[2] = -row[2];
        }
        rotation = v_ut(&v, u);
    }

    let rmsd = rmsd_after(&rotation, source, target);

    Ok(KabschResult {
        rotation,
        rmsd,
        n_points: n,
        reflection_corrected,
    })
}

/// R[i][j] = Σ_k V[i][k] · U[j][k]
fn v_ut(v: &Mat3, u: &Mat3) -> Mat3 {
    let mut r = [[0.0f64; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            r[i][j] = v[i][0] * u[j][0] + v[i][1] * u[j][1] + v[i][2] * u[j][2];
        }
    }
    r
}

fn rmsd_after(rotation: &Mat3, source: &[[f64; 3]], target: &[[f64; 3]]) -> f64 {
    let sum: f64 = source
        .iter()
        .zip(target.iter())
        .map(|(p, q)| squared_distance(&transform(rotation, p), q))
        .sum();
    (sum / source.len() as f64).sqrt()
}

/// Translate a point set onto its centroid. Returns (centroid, centered points).
pub fn center_points(points: &[[f64; 3]]) -> ([f64; 3], Vec<[f64; 3]>) {
    if points.is_empty() {
        return ([0.0; 3], Vec::new());
    }
    let inv = 1.0 / points.len() as f64;
    let mut c = [0.0f64; 3];
    for p in points {
        for k in 0..3 {
            c[k] += p[k];
        }
    }
    let c = [c[0] * inv, c[1] * inv, c[2] * inv];
    let centered = points
        .iter()
        .map(|p| [p[0] - c[0], p[1] - c[1], p[2] - c[2]])
        .collect();
    (c, centered)
}

/// RMSD between two equal-length point sets without superposition.
///
/// Extra points in the longer slice are ignored.
pub fn rmsd(a: &[[f64; 3]], b: &[[f64; 3]]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b.iter()).map(|(p, q)| squared_distance(p, q)).sum();
    (sum / n as f64).sqrt()
}
