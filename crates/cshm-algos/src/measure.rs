//! Continuous shape measure evaluation
//!
//! For a fixed rotation R, the measure of an actual point set P against a
//! reference Q (both N unit vectors) is
//!
//! ```text
//! S(R) = 100 · min_σ Σᵢ ‖R·pᵢ − q_σ(i)‖² / N
//! ```
//!
//! where the minimum over correspondences σ is taken by the assignment
//! solver. S is zero for a perfect match and grows with distortion.

use crate::align::assignment::{solve_assignment, AssignmentMethod, CostMatrix};
use crate::linalg::mat3::{normalize, squared_distance, transform, Mat3};
use crate::{AlgoResult, ShapeError};

/// Points shorter than this cannot be projected onto the unit sphere
pub const MIN_POINT_LENGTH: f64 = 1e-8;

/// Measure and correspondence at one rotation
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub measure: f64,
    /// `correspondence[i] = j`: actual point i is matched to reference vertex j
    pub correspondence: Vec<usize>,
    pub method: AssignmentMethod,
}

/// Squared-distance cost matrix between rotated actual points and reference vertices
pub fn cost_matrix(rotated: &[[f64; 3]], reference: &[[f64; 3]]) -> CostMatrix {
    let n = rotated.len().min(reference.len());
    CostMatrix::from_fn(n, |i, j| squared_distance(&rotated[i], &reference[j]))
}

/// Evaluate the shape measure of `actual` rotated by `rotation` against `reference`.
///
/// Both sets must have the same length; callers validate this. An empty set
/// evaluates to zero.
pub fn evaluate_rotation(rotation: &Mat3, actual: &[[f64; 3]], reference: &[[f64; 3]]) -> Evaluation {
    let rotated: Vec<[f64; 3]> = actual.iter().map(|p| transform(rotation, p)).collect();
    let cost = cost_matrix(&rotated, reference);
    let n = cost.size();
    let assignment = solve_assignment(&cost);
    let measure = if n == 0 {
        0.0
    } else {
        assignment.total_cost / n as f64 * 100.0
    };
    Evaluation {
        measure,
        correspondence: assignment.mapping,
        method: assignment.method,
    }
}

/// Shape measure for a fixed rotation and a fixed correspondence
pub fn measure_for_correspondence(
    rotation: &Mat3,
    actual: &[[f64; 3]],
    reference: &[[f64; 3]],
    correspondence: &[usize],
) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(correspondence)
        .map(|(p, &j)| squared_distance(&transform(rotation, p), &reference[j]))
        .sum();
    sum / actual.len() as f64 * 100.0
}

/// Project center-relative points onto the unit sphere.
///
/// Fails with [`ShapeError::DegenerateInput`] naming the first point that
/// sits on the center, and with [`ShapeError::EmptyPointSet`] for no points.
pub fn normalize_points(points: &[[f64; 3]]) -> AlgoResult<Vec<[f64; 3]>> {
    if points.is_empty() {
        return Err(ShapeError::EmptyPointSet);
    }
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut v = *p;
            if normalize(&mut v) < MIN_POINT_LENGTH {
                Err(ShapeError::degenerate(i))
            } else {
                Ok(v)
            }
        })
        .collect()
}
