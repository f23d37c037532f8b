//! # Orbiting Camera Model
//!
//! The camera orbits the scene centre: a sideways angle, an up-and-over
//! angle (both degrees) and a distance scalar fully describe it. The view
//! matrix, the projection matrix and the ground-plane unprojection used when
//! placing objects are all derived here.
//!
//! The zoom curve is deliberately asymmetric and nonlinear: while the
//! distance is non-negative each step multiplies before adding the fixed
//! increment, which closes fast from far away and flattens near the centre;
//! once the camera passes through the origin the steps become linear. This
//! exact shape is load-bearing for muscle memory and is covered by tests.

use cgmath::{Deg, Matrix2, Matrix4, SquareMatrix, Vector2, Vector4};

/// Converts GL clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

const NEAR_DIST: f32 = 0.05;
const FAR_DIST: f32 = 100.0;
const ZOOM_STEP: f32 = 0.05;

/// Orbit-camera state and matrix derivation.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    /// Rotation sideways around the scene centre, degrees.
    pub sideways_deg: f32,
    /// Rotation up and over the scene centre, degrees.
    pub up_and_over_deg: f32,
    /// Distance from the camera to the scene centre. May go negative once
    /// the camera has zoomed through the origin.
    pub distance: f32,
    width: f32,
    height: f32,
}

impl OrbitCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            sideways_deg: 0.0,
            up_and_over_deg: 20.0,
            distance: 1.5,
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// `translate(0, 0, -distance) * rotateX(up_and_over) * rotateY(sideways)`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(cgmath::Vector3::new(0.0, 0.0, -self.distance))
            * Matrix4::from_angle_x(Deg(self.up_and_over_deg))
            * Matrix4::from_angle_y(Deg(self.sideways_deg))
    }

    /// Frustum projection compensating the narrower window axis so the same
    /// slice of the scene stays visible as the window reshapes.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let proj = if self.width > self.height {
            let r = NEAR_DIST * self.width / self.height;
            cgmath::frustum(-r, r, -NEAR_DIST, NEAR_DIST, NEAR_DIST, FAR_DIST)
        } else {
            let t = NEAR_DIST * self.height / self.width;
            cgmath::frustum(-NEAR_DIST, NEAR_DIST, -t, t, NEAR_DIST, FAR_DIST)
        };
        OPENGL_TO_WGPU_MATRIX * proj
    }

    /// One zoom-in step: `0.8d - 0.05` while non-negative, `d - 0.05` after.
    pub fn zoom_in(&mut self) {
        self.distance = if self.distance < 0.0 {
            self.distance
        } else {
            self.distance * 0.8
        } - ZOOM_STEP;
    }

    /// One zoom-out step: `1.25d + 0.05` while non-negative, `d + 0.05` after.
    pub fn zoom_out(&mut self) {
        self.distance = if self.distance < 0.0 {
            self.distance
        } else {
            self.distance * 1.25
        } + ZOOM_STEP;
    }

    /// Screen-delta frame for XZ dragging: counter-rotates the pointer delta
    /// by the sideways angle so a drag moves the object the way the screen
    /// shows, with the vertical axis flipped and both axes scaled to world
    /// units.
    pub fn drag_frame(&self) -> Matrix2<f32> {
        Matrix2::from_angle(Deg(-self.sideways_deg)) * Matrix2::new(10.0, 0.0, 0.0, -10.0)
    }

    /// World-space XZ point on the ground plane under a window-space pointer
    /// position. Falls back to the origin when the pointer ray misses the
    /// plane (looking dead level) or the view is degenerate.
    pub fn ground_point_under_pointer(&self, cursor_x: f32, cursor_y: f32) -> Vector2<f32> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vector2::new(0.0, 0.0);
        }
        let ndc_x = 2.0 * cursor_x / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor_y / self.height;

        let Some(inverse) = (self.projection_matrix() * self.view_matrix()).invert() else {
            return Vector2::new(0.0, 0.0);
        };

        let near = inverse * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inverse * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w == 0.0 || far.w == 0.0 {
            return Vector2::new(0.0, 0.0);
        }
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        let direction = far - near;
        if direction.y.abs() < f32::EPSILON {
            return Vector2::new(0.0, 0.0);
        }
        let t = -near.y / direction.y;
        let hit = near + direction * t;
        Vector2::new(hit.x, hit.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn zoom_in_follows_exact_curve() {
        let mut camera = OrbitCamera::new(960, 640);
        camera.distance = 1.5;
        camera.zoom_in();
        assert!(close(camera.distance, 0.8 * 1.5 - 0.05));

        camera.distance = 0.0;
        camera.zoom_in();
        assert!(close(camera.distance, -0.05));

        // Linear once past the origin.
        camera.zoom_in();
        assert!(close(camera.distance, -0.1));
    }

    #[test]
    fn zoom_out_follows_exact_curve() {
        let mut camera = OrbitCamera::new(960, 640);
        camera.distance = 2.0;
        camera.zoom_out();
        assert!(close(camera.distance, 1.25 * 2.0 + 0.05));

        camera.distance = -1.0;
        camera.zoom_out();
        assert!(close(camera.distance, -0.95));
    }

    #[test]
    fn view_matrix_is_pure_translation_at_rest() {
        let mut camera = OrbitCamera::new(960, 640);
        camera.sideways_deg = 0.0;
        camera.up_and_over_deg = 0.0;
        camera.distance = 3.0;
        let origin = camera.view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(close(origin.x, 0.0));
        assert!(close(origin.y, 0.0));
        assert!(close(origin.z, -3.0));
    }

    #[test]
    fn centre_of_window_unprojects_near_scene_centre() {
        let camera = OrbitCamera::new(960, 640);
        let hit = camera.ground_point_under_pointer(480.0, 320.0);
        // Looking down over the origin from the default pose, the centre of
        // the window lands close to the centre of the ground plane.
        assert!(hit.x.abs() < 1.0, "x = {}", hit.x);
        assert!(hit.y.abs() < 5.0, "z = {}", hit.y);
    }

    #[test]
    fn drag_frame_counter_rotates_by_sideways_angle() {
        let mut camera = OrbitCamera::new(960, 640);
        camera.sideways_deg = 0.0;
        let moved = camera.drag_frame() * Vector2::new(1.0, 1.0);
        assert!(close(moved.x, 10.0));
        assert!(close(moved.y, -10.0));

        camera.sideways_deg = 90.0;
        let moved = camera.drag_frame() * Vector2::new(1.0, 0.0);
        assert!(moved.x.abs() < 1e-4);
        assert!(close(moved.y, -10.0));
    }
}
