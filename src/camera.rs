//! Pinhole camera: maps pixel coordinates to ray directions.

use nalgebra::Vector3;

/// Pinhole projection with the camera at the origin looking down -Z.
///
/// The horizontal field of view is fixed by the render settings; the
/// vertical field of view scales with the aspect ratio (height/width) so
/// non-square frames do not distort.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    width: f32,
    height: f32,
    tan_fov_x: f32,
    tan_fov_y: f32,
}

impl Camera {
    pub fn new(width: usize, height: usize, fov: f32) -> Self {
        let w = width as f32;
        let h = height as f32;
        let fov_y = (h / w) * fov;
        Self {
            width: w,
            height: h,
            tan_fov_x: fov.tan(),
            tan_fov_y: fov_y.tan(),
        }
    }

    /// Unnormalized direction through pixel (px, py).
    ///
    /// Screen X spans [-tan fovx, tan fovx); screen Y is negated so row 0
    /// is the top of the frame.
    pub fn project(&self, px: f32, py: f32) -> Vector3<f32> {
        Vector3::new(
            ((2.0 * px - self.width) / self.width) * self.tan_fov_x,
            -((2.0 * py - self.height) / self.height) * self.tan_fov_y,
            -1.0,
        )
    }
}
