/// Adds two 3-dimensional vectors
pub fn add(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Subtracts `b` from `a`
pub fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Scales a vector by `s`
pub fn scale(v: &[f64; 3], s: f64) -> [f64; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Orthonormal camera frame `(forward, up, right)` for a z-up world.
///
/// Angles are in degrees. `forward` points from the eye towards the look-at
/// point.
pub fn camera_frame(azimuth: f64, elevation: f64) -> ([f64; 3], [f64; 3], [f64; 3]) {
    let (sin_az, cos_az) = azimuth.to_radians().sin_cos();
    let (sin_el, cos_el) = elevation.to_radians().sin_cos();
    let forward = [cos_el * cos_az, cos_el * sin_az, sin_el];
    let up = [-sin_el * cos_az, -sin_el * sin_az, cos_el];
    let right = cross(&forward, &up);
    (forward, up, right)
}

/// Maps a vector given in `(right, forward, up)` camera coordinates to world space
pub fn camera_to_world(vec: &[f64; 3], forward: &[f64; 3], up: &[f64; 3]) -> [f64; 3] {
    let right = cross(forward, up);
    add(
        &add(&scale(&right, vec[0]), &scale(forward, vec[1])),
        &scale(up, vec[2]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn camera_frame_is_orthonormal() {
        for &(az, el) in &[(90.0, -45.0), (0.0, 0.0), (-130.0, 60.0), (17.0, -89.0)] {
            let (forward, up, right) = camera_frame(az, el);
            assert_relative_eq!(dot(&forward, &forward), 1.0, epsilon = 1e-12);
            assert_relative_eq!(dot(&up, &up), 1.0, epsilon = 1e-12);
            assert_relative_eq!(dot(&forward, &up), 0.0, epsilon = 1e-12);
            assert_relative_eq!(dot(&right, &forward), 0.0, epsilon = 1e-12);
            assert_relative_eq!(dot(&right, &up), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn level_camera_looks_along_azimuth() {
        let (forward, up, right) = camera_frame(0.0, 0.0);
        assert_relative_eq!(forward[0], 1.0);
        assert_relative_eq!(up[2], 1.0);
        assert_relative_eq!(right[1], -1.0);
    }

    #[test]
    fn camera_to_world_uses_frame_axes() {
        let (forward, up, right) = camera_frame(30.0, -20.0);
        let world = camera_to_world(&[1.0, 0.0, 0.0], &forward, &up);
        for i in 0..3 {
            assert_relative_eq!(world[i], right[i], epsilon = 1e-12);
        }
        let world = camera_to_world(&[0.0, 2.0, -1.0], &forward, &up);
        let expected = sub(&scale(&forward, 2.0), &up);
        for i in 0..3 {
            assert_relative_eq!(world[i], expected[i], epsilon = 1e-12);
        }
    }
}
