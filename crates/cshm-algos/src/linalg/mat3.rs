//! 3×3 row-major matrix utilities
//!
//! Rotation helpers shared by the aligner and the rotation search.
//! All matrices are row-major: `m[row][col]`.

/// Row-major 3×3 matrix
pub type Mat3 = [[f64; 3]; 3];

/// Identity matrix
pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Matrix product: result = a · b
pub fn mat3_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0f64; 3]; 3];
    for row in 0..3 {
        for col in 0..3 {
            out[row][col] = a[row][0] * b[0][col] + a[row][1] * b[1][col] + a[row][2] * b[2][col];
        }
    }
    out
}

/// Transpose
pub fn transpose(m: &Mat3) -> Mat3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Determinant
pub fn determinant(m: &Mat3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Transform a point: result = m · p
#[inline]
pub fn transform(m: &Mat3, p: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * p[0] + m[0][1] * p[1] + m[0][2] * p[2],
        m[1][0] * p[0] + m[1][1] * p[1] + m[1][2] * p[2],
        m[2][0] * p[0] + m[2][1] * p[1] + m[2][2] * p[2],
    ]
}

/// Rotate every point of a set, returning a new set
pub fn rotate_points(m: &Mat3, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
    points.iter().map(|p| transform(m, p)).collect()
}

/// Rotation from roll/pitch/yaw Euler angles (radians).
///
/// Composed as R = Rz(yaw) · Ry(pitch) · Rx(roll).
pub fn euler_rotation(roll: f64, pitch: f64, yaw: f64) -> Mat3 {
    let (sr, cr) = roll.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();
    [
        [cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr],
        [sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr],
        [-sp, cp * sr, cp * cr],
    ]
}

/// Rotation by `angle` radians about `axis` (Rodrigues' formula).
///
/// The axis does not need to be normalized. A zero axis yields identity.
pub fn axis_angle_rotation(axis: &[f64; 3], angle: f64) -> Mat3 {
    let len = norm(axis);
    if len < 1e-15 {
        return IDENTITY;
    }
    let (x, y, z) = (axis[0] / len, axis[1] / len, axis[2] / len);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    [
        [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
        [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
        [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
    ]
}

/// Rotation matrix from a unit quaternion (w, x, y, z)
pub fn quaternion_rotation(w: f64, x: f64, y: f64, z: f64) -> Mat3 {
    [
        [1.0 - 2.0 * (y * y + z * z), 2.0 * (x * y - w * z), 2.0 * (x * z + w * y)],
        [2.0 * (x * y + w * z), 1.0 - 2.0 * (x * x + z * z), 2.0 * (y * z - w * x)],
        [2.0 * (x * z - w * y), 2.0 * (y * z + w * x), 1.0 - 2.0 * (x * x + y * y)],
    ]
}

/// Re-orthonormalize the rows of a near-rotation matrix (Gram-Schmidt).
///
/// Long random walks compose thousands of small rotations; this keeps
/// floating-point drift from accumulating into scale or shear.
pub fn orthonormalize(m: &Mat3) -> Mat3 {
    let mut r0 = m[0];
    if normalize(&mut r0) < 1e-15 {
        return IDENTITY;
    }
    let mut r1 = m[1];
    let d = dot(&r0, &r1);
    for k in 0..3 {
        r1[k] -= d * r0[k];
    }
    if normalize(&mut r1) < 1e-15 {
        return IDENTITY;
    }
    let r2 = cross(&r0, &r1);
    [r0, r1, r2]
}

/// Check whether a matrix is approximately identity
pub fn is_identity(m: &Mat3, tol: f64) -> bool {
    (0..3).all(|i| (0..3).all(|j| (m[i][j] - IDENTITY[i][j]).abs() < tol))
}

/// Rotation angle (radians) of a proper rotation matrix
pub fn rotation_angle(m: &Mat3) -> f64 {
    let trace = m[0][0] + m[1][1] + m[2][2];
    ((trace - 1.0) * 0.5).clamp(-1.0, 1.0).acos()
}

// ============================================================================
// Vector helpers
// ============================================================================

#[inline]
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(v: &[f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

#[inline]
pub fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Normalize in place and return the original length.
/// Vectors shorter than 1e-15 are left untouched.
pub fn normalize(v: &mut [f64; 3]) -> f64 {
    let len = norm(v);
    if len > 1e-15 {
        v[0] /= len;
        v[1] /= len;
        v[2] /= len;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_mat_close(a: &Mat3, b: &Mat3, tol: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert!(
                    (a[i][j] - b[i][j]).abs() < tol,
                    "[{}][{}]: {} vs {}",
                    i, j, a[i][j], b[i][j]
                );
            }
        }
    }

    #[test]
    fn test_mul_identity() {
        let m = euler_rotation(0.3, -0.7, 1.1);
        assert_mat_close(&mat3_mul(&m, &IDENTITY), &m, 1e-15);
        assert_mat_close(&mat3_mul(&IDENTITY, &m), &m, 1e-15);
    }

    #[test]
    fn test_euler_is_rotation() {
        let m = euler_rotation(0.4, 1.2, -2.5);
        assert!((determinant(&m) - 1.0).abs() < 1e-12);
        assert_mat_close(&mat3_mul(&m, &transpose(&m)), &IDENTITY, 1e-12);
    }

    #[test]
    fn test_yaw_rotates_x_to_y() {
        let m = euler_rotation(0.0, 0.0, FRAC_PI_2);
        let p = transform(&m, &[1.0, 0.0, 0.0]);
        assert!((p[0]).abs() < 1e-12 && (p[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_axis_angle_matches_euler() {
        let a = axis_angle_rotation(&[0.0, 0.0, 2.0], 0.8);
        let b = euler_rotation(0.0, 0.0, 0.8);
        assert_mat_close(&a, &b, 1e-12);
        assert!((rotation_angle(&a) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        assert!(is_identity(&axis_angle_rotation(&[0.0; 3], 1.0), 1e-15));
    }

    #[test]
    fn test_quaternion_half_turn() {
        // 180° about z: q = (0, 0, 0, 1)
        let m = quaternion_rotation(0.0, 0.0, 0.0, 1.0);
        assert_mat_close(&m, &euler_rotation(0.0, 0.0, PI), 1e-12);
    }

    #[test]
    fn test_orthonormalize_repairs_drift() {
        let mut m = euler_rotation(0.2, 0.3, 0.4);
        m[0][0] *= 1.01;
        m[1][2] += 0.003;
        let fixed = orthonormalize(&m);
        assert!((determinant(&fixed) - 1.0).abs() < 1e-12);
        assert_mat_close(&mat3_mul(&fixed, &transpose(&fixed)), &IDENTITY, 1e-12);
    }
}
