use std::fmt;

use serde::Serialize;
use voxrelic_camera::Camera;
use voxrelic_world::World;

/// Exponentially smoothed frames-per-second estimate, seeded at 60.
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    sma: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self { sma: 60.0 }
    }

    /// Fold one frame's delta time into the average and return it.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let fps = 1.0 / dt.max(1e-6);
        self.sma = self.sma * 0.9 + fps * 0.1;
        self.sma
    }

    pub fn fps(&self) -> f32 {
        self.sma
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-frame HUD payload: camera position, smoothed FPS, relic
/// progress, and the active status message.
#[derive(Debug, Clone, Serialize)]
pub struct HudStatus {
    pub position: [f32; 3],
    pub fps: f32,
    pub relics_collected: usize,
    pub relics_total: usize,
    pub message: String,
}

impl HudStatus {
    pub fn gather(camera: &Camera, world: &World, fps: f32, now: f64) -> Self {
        Self {
            position: [camera.eye.x, camera.eye.y, camera.eye.z],
            fps,
            relics_collected: world.relics_collected(),
            relics_total: world.relics_total(),
            message: world.get_message(now),
        }
    }
}

impl fmt::Display for HudStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "pos: ({:.2}, {:.2}, {:.2})",
            self.position[0], self.position[1], self.position[2]
        )?;
        writeln!(f, "fps: {:.0}", self.fps)?;
        write!(f, "relics: {}/{}", self.relics_collected, self.relics_total)?;
        if !self.message.is_empty() {
            write!(f, "\n{}", self.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxrelic_math::Vec3;

    #[test]
    fn fps_counter_converges_toward_the_frame_rate() {
        let mut counter = FpsCounter::new();
        for _ in 0..200 {
            counter.tick(1.0 / 30.0);
        }
        assert!((counter.fps() - 30.0).abs() < 0.5);
    }

    #[test]
    fn fps_counter_guards_against_zero_dt() {
        let mut counter = FpsCounter::new();
        let fps = counter.tick(0.0);
        assert!(fps.is_finite());
    }

    #[test]
    fn status_reflects_camera_and_world() {
        let mut camera = Camera::new(16.0 / 9.0);
        let mut world = World::new();
        camera.eye = Vec3::new(6.5, 1.5, 6.5);
        world.update_game(camera.eye, 10.0);

        let status = HudStatus::gather(&camera, &world, 59.7, 10.0);
        assert_eq!(status.relics_collected, 1);
        assert_eq!(status.relics_total, 5);
        assert!(status.message.contains("1/5"));

        let text = status.to_string();
        assert!(text.contains("pos: (6.50, 1.50, 6.50)"));
        assert!(text.contains("fps: 60"));
        assert!(text.contains("relics: 1/5"));
    }

    #[test]
    fn empty_message_renders_three_lines() {
        let camera = Camera::new(1.0);
        let world = World::new();
        let status = HudStatus::gather(&camera, &world, 60.0, 0.0);
        assert_eq!(status.to_string().lines().count(), 3);
    }
}
