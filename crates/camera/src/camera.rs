use voxrelic_common::TileCoord;
use voxrelic_math::{Mat4, Vec3};

const UP: Vec3 = Vec3::Y;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const PITCH_LIMIT_DEG: f32 = 89.0;

/// First-person camera with a yaw/pitch orientation model.
///
/// Angles are kept in degrees. The derived `forward`/`right` unit vectors
/// are cached and refreshed by every operation that changes yaw or pitch;
/// the view matrix is refreshed once per frame by [`Camera::update_view`].
pub struct Camera {
    pub eye: Vec3,
    yaw: f32,
    pitch: f32,
    forward: Vec3,
    right: Vec3,
    fov: f32,
    /// World units moved per movement keypress.
    pub speed: f32,
    /// Degrees turned per pan keypress.
    pub turn_deg: f32,
    /// Degrees per mouse count.
    pub sensitivity: f32,
    view: Mat4,
    proj: Mat4,
}

impl Camera {
    /// Camera at the spawn pose: inside the south end of the yard with a
    /// slight downward tilt so the ground is visible.
    pub fn new(aspect: f32) -> Self {
        let mut cam = Self {
            eye: Vec3::new(16.0, 3.0, 28.0),
            yaw: 0.0,
            pitch: -5.0,
            forward: -Vec3::Z,
            right: Vec3::X,
            fov: 60.0,
            speed: 0.20,
            turn_deg: 2.8,
            sensitivity: 0.15,
            view: Mat4::IDENTITY,
            proj: Mat4::perspective(60.0, aspect, NEAR, FAR),
        };
        cam.update_basis();
        cam.update_view();
        cam
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn proj(&self) -> &Mat4 {
        &self.proj
    }

    /// Recompute the forward/right basis from the current yaw and pitch.
    fn update_basis(&mut self) {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        self.forward = Vec3::new(sy * cp, sp, -cy * cp).normalized();
        self.right = Vec3::cross(self.forward, UP).normalized();
    }

    /// Relative mouse look. Positive `dy` tilts the view down (inverted-Y
    /// pointer convention); pitch clamps at the limit.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
        self.update_basis();
    }

    pub fn pan_left(&mut self) {
        self.yaw -= self.turn_deg;
        self.update_basis();
    }

    pub fn pan_right(&mut self) {
        self.yaw += self.turn_deg;
        self.update_basis();
    }

    pub fn move_forward(&mut self) {
        self.eye += self.forward * self.speed;
    }

    pub fn move_back(&mut self) {
        self.eye -= self.forward * self.speed;
    }

    pub fn move_left(&mut self) {
        self.eye -= self.right * self.speed;
    }

    pub fn move_right(&mut self) {
        self.eye += self.right * self.speed;
    }

    /// Recompute the view matrix from the current pose. Call once per frame
    /// after movement and look changes, before rendering consumes the matrix.
    pub fn update_view(&mut self) {
        self.view = Mat4::look_at(self.eye, self.eye + self.forward, UP);
    }

    /// Recompute the projection for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let aspect = width as f32 / height.max(1) as f32;
        self.proj = Mat4::perspective(self.fov, aspect, NEAR, FAR);
    }

    /// The tile `distance` world units in front of the eye, the target for
    /// block edits. No bounds check; the grid mutation no-ops out of bounds.
    pub fn cell_in_front(&self, distance: f32) -> TileCoord {
        let p = self.eye + self.forward * distance;
        TileCoord::at(p.x, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn pitch_clamps_regardless_of_input_magnitude() {
        let mut cam = Camera::new(1.0);
        cam.look(0.0, -1.0e6);
        assert_eq!(cam.pitch(), 89.0);
        cam.look(0.0, 1.0e6);
        assert_eq!(cam.pitch(), -89.0);
        cam.look(0.0, f32::MAX);
        assert_eq!(cam.pitch(), -89.0);
    }

    #[test]
    fn forward_never_reaches_the_up_axis() {
        // The clamp keeps look_at out of its degenerate parallel case.
        let mut cam = Camera::new(1.0);
        for dy in [-1.0e5, 1.0e5] {
            cam.look(0.0, dy);
            let dot = cam.forward().dot(Vec3::Y).abs();
            assert!(dot < 0.9999, "forward nearly parallel to up: dot={dot}");
            cam.update_view();
            assert!(!cam.view().m.iter().any(|v| v.is_nan()));
        }
    }

    #[test]
    fn default_pose_looks_down_negative_z() {
        let cam = Camera::new(16.0 / 9.0);
        assert!(cam.forward().z < 0.0);
        assert!(approx(cam.forward().x, 0.0));
        // pitch -5 degrees tilts slightly downward
        assert!(cam.forward().y < 0.0);
        assert!(approx(cam.forward().length(), 1.0));
    }

    #[test]
    fn basis_follows_yaw() {
        let mut cam = Camera::new(1.0);
        cam.look(90.0 / cam.sensitivity, 0.0);
        // yaw 90: forward is +X (sin 90, 0, -cos 90) at pitch 0-ish
        assert!(cam.forward().x > 0.99);
        assert!(approx(Vec3::cross(cam.forward(), Vec3::Y).normalized().dot(cam.right()), 1.0));
    }

    #[test]
    fn pan_turns_by_the_configured_step() {
        let mut cam = Camera::new(1.0);
        let start = cam.yaw();
        cam.pan_right();
        cam.pan_right();
        cam.pan_left();
        assert!(approx(cam.yaw(), start + cam.turn_deg));
    }

    #[test]
    fn movement_steps_along_the_basis() {
        let mut cam = Camera::new(1.0);
        let start = cam.eye;
        cam.move_forward();
        assert!(approx((cam.eye - start).length(), cam.speed));
        cam.move_back();
        assert!((cam.eye - start).length() < 1e-5);

        cam.move_right();
        let lateral = cam.eye - start;
        assert!(approx(lateral.dot(cam.right()), cam.speed));
    }

    #[test]
    fn view_maps_eye_to_origin() {
        let mut cam = Camera::new(1.0);
        cam.look(400.0, -120.0);
        for _ in 0..5 {
            cam.move_forward();
            cam.move_left();
        }
        cam.update_view();
        let m = &cam.view().m;
        let e = cam.eye;
        for row in 0..3 {
            let v = m[row] * e.x + m[4 + row] * e.y + m[8 + row] * e.z + m[12 + row];
            assert!(v.abs() < 1e-4, "row {row}: {v}");
        }
    }

    #[test]
    fn cell_in_front_floors_the_probed_point() {
        let cam = Camera::new(1.0);
        // spawn pose: eye (16, 3, 28) looking roughly down -Z
        let cell = cam.cell_in_front(1.2);
        assert_eq!(cell.x, 16);
        assert_eq!(cell.z, 26);
    }

    #[test]
    fn cell_in_front_handles_negative_coordinates() {
        let mut cam = Camera::new(1.0);
        cam.eye = Vec3::new(0.3, 1.0, 0.3);
        // facing -Z from just inside tile (0,0): the probed point is on z=-1
        let cell = cam.cell_in_front(1.2);
        assert_eq!(cell.z, -1);
    }

    #[test]
    fn resize_changes_only_the_projection() {
        let mut cam = Camera::new(1.0);
        let view_before = *cam.view();
        let proj_before = *cam.proj();
        cam.resize(1920, 1080);
        assert_eq!(*cam.view(), view_before);
        assert_ne!(*cam.proj(), proj_before);
        let oracle = Mat4::perspective(60.0, 1920.0 / 1080.0, 0.1, 1000.0);
        assert_eq!(*cam.proj(), oracle);
    }
}
