//! Linear algebra utilities
//!
//! Small fixed-size routines used across the crate:
//!
//! - [`svd3`] - 3×3 SVD via cyclic Jacobi rotations
//! - [`mat3`] - 3×3 row-major rotation helpers (products, Euler and
//!   axis-angle construction, re-orthonormalization)

pub mod mat3;
pub mod svd3;

pub use mat3::{
    axis_angle_rotation, determinant, euler_rotation, mat3_mul, orthonormalize,
    quaternion_rotation, rotate_points, transform, transpose, Mat3, IDENTITY,
};
pub use svd3::{svd3, Svd3};
