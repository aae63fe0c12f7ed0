//! Rigid alignment and point correspondence
//!
//! - Kabsch algorithm for the optimal rotation under a fixed pairing
//! - Assignment solver for the optimal pairing under a fixed rotation

pub mod assignment;
pub mod kabsch;

pub use assignment::{solve_assignment, Assignment, AssignmentMethod, CostMatrix};
pub use kabsch::{center_points, kabsch, rmsd, KabschResult};
