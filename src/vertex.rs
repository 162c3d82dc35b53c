use crate::camera::CameraState;
use crate::math::{multiply_matrix_vector, sub};

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// Points closer than this to the eye are not projected
const NEAR: f64 = 1e-2;

/// Vertex mapped into camera space and onto the character grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in camera space: x right, y up, z forward
    pub position: [f64; 3],
    /// Column and row on the grid, fractional
    pub screen_position: [f64; 2],
}

impl Vertex {
    /// Distance along the view direction
    pub fn depth(&self) -> f64 {
        self.position[2]
    }
}

/// Projects a world point through `camera` onto a `width` x `height` grid.
/// Returns `None` for points behind the near plane.
pub fn project(
    point: &[f64; 3],
    camera: &CameraState,
    width: usize,
    height: usize,
) -> Option<Vertex> {
    let (forward, up, right) = camera.frame();
    let view = [right, up, forward];
    let position = multiply_matrix_vector(&view, &sub(point, &camera.eye()));
    if position[2] < NEAR {
        return None;
    }

    // Focal length in rows; columns are narrower so they get CELL_ASPECT more
    let focal = (height as f64 / 2.0) / (camera.fovy.to_radians() / 2.0).tan();
    let screen_x = width as f64 / 2.0 + position[0] / position[2] * focal * CELL_ASPECT;
    let screen_y = height as f64 / 2.0 - position[1] / position[2] * focal;
    Some(Vertex {
        position,
        screen_position: [screen_x, screen_y],
    })
}
