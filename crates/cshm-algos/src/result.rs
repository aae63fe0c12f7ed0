use serde::{Deserialize, Serialize};

use crate::linalg::Mat3;

/// Outcome of matching one point set against one reference geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeResult {
    pub geometry_name: String,
    /// Continuous shape measure, ≥ 0 (0 = perfect match)
    pub measure: f64,
    /// Best rotation applied to the normalized actual points
    pub rotation: Mat3,
    /// `correspondence[i] = j`: actual point i ↔ reference vertex j
    pub correspondence: Vec<usize>,
    /// Normalized actual points after rotation, in input order
    pub aligned_coordinates: Vec<[f64; 3]>,
    /// True when the search was cancelled before completing
    pub cancelled: bool,
}

impl ShapeResult {
    /// Ascending-measure ordering used for rankings
    pub fn cmp_measure(&self, other: &Self) -> std::cmp::Ordering {
        self.measure.total_cmp(&other.measure)
    }
}
