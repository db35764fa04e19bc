//! Helpers for 2-vectors stored as `[row, col]` components

/// Dot product
pub fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0].mul_add(b[0], a[1] * b[1])
}

/// Euclidean length
pub fn norm(v: [f64; 2]) -> f64 {
    v[0].hypot(v[1])
}

/// Unit vector in the direction of `v`, zero for (near) zero input
pub fn normalize(v: [f64; 2]) -> [f64; 2] {
    let length = norm(v);
    if length > f64::EPSILON {
        [v[0] / length, v[1] / length]
    } else {
        [0.0, 0.0]
    }
}

/// Rotate by 90 degrees, turning a gradient into an isophote direction
pub fn rotate_90(v: [f64; 2]) -> [f64; 2] {
    [-v[1], v[0]]
}

/// Unsigned angle between two vectors in `[0, pi]`
///
/// Zero-length vectors have no direction, so the angle to them is zero.
pub fn angle_between(a: [f64; 2], b: [f64; 2]) -> f64 {
    let lengths = norm(a) * norm(b);
    if lengths <= f64::EPSILON {
        return 0.0;
    }
    (dot(a, b) / lengths).clamp(-1.0, 1.0).acos()
}
