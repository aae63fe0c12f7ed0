//! Shape-matching algorithms for continuous shape measures
//!
//! This crate provides the numerical core used by `cshm-mol`:
//! - Jacobi 3×3 SVD and rotation utilities
//! - Kabsch algorithm for optimal rigid rotation
//! - Point-correspondence assignment
//! - The CShM evaluator and the multi-stage global rotation search
//! - The library of ideal reference polyhedra and per-CN ranking

pub mod align;
pub mod linalg;
pub mod measure;
pub mod optimize;
pub mod ranking;
mod result;
pub mod shapes;

pub use align::{kabsch, solve_assignment, Assignment, AssignmentMethod, CostMatrix, KabschResult};
pub use linalg::{Mat3, Svd3};
pub use measure::{evaluate_rotation, normalize_points, Evaluation};
pub use optimize::{
    evaluate_geometry, evaluate_geometry_with, optimize_rotation, CancelToken, OptimizerConfig,
    Progress, SearchBudget, SearchControl, SearchMode, SearchResult, Stage,
};
pub use ranking::{rank_geometries, rank_geometries_parallel, Ranking, SkippedGeometry};
pub use result::ShapeResult;
pub use shapes::{all_geometries, find_geometry, geometries_for_cn, ReferenceGeometry};

/// Errors from shape-measure computations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    /// Reference vertex count differs from the number of actual points.
    /// Recoverable: rankings skip the geometry and continue.
    #[error("Point count mismatch: reference has {expected} vertices, structure has {actual} points")]
    SizeMismatch { expected: usize, actual: usize },

    /// A point coincides with the coordination center and cannot be normalized
    #[error("Point {index} coincides with the coordination center")]
    DegenerateInput { index: usize },

    #[error("Point set is empty")]
    EmptyPointSet,
}

impl ShapeError {
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    pub fn degenerate(index: usize) -> Self {
        Self::DegenerateInput { index }
    }

    /// Whether the error only concerns one reference geometry
    pub fn is_per_geometry(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. })
    }
}

/// Result type for shape-measure computations
pub type AlgoResult<T> = Result<T, ShapeError>;
