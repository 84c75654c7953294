use glam::Vec3;
use crate::config::CameraConfig;
use crate::model::{Camera, CameraOrbit, PITCH_LIMIT};

/// Handles camera orientation and orbit placement
pub struct CameraController {
    pub mouse_sensitivity: f32,
    /// Point the camera re-aims at after every orbit step
    pub focus: Vec3,
}

impl CameraController {
    pub fn new(cfg: &CameraConfig, focus: Vec3) -> Self {
        Self {
            mouse_sensitivity: cfg.look_sensitivity,
            focus,
        }
    }

    /// Apply mouse look delta to camera
    pub fn apply_look(&self, camera: &mut Camera, dx: f32, dy: f32) {
        camera.yaw += dx * self.mouse_sensitivity;
        camera.pitch = (camera.pitch - dy * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Jump the camera to its orbit position and face the focus point
    pub fn place_on_orbit(&self, camera: &mut Camera, orbit: &CameraOrbit) {
        camera.eye = orbit.position();
        camera.set_look_at(self.focus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(&CameraConfig::default(), Vec3::new(0.0, 3.0, 0.0))
    }

    #[test]
    fn orbit_places_and_aims() {
        let cfg = CameraConfig::default();
        let mut cam = Camera::from_config(&cfg, 800, 600);
        let mut orbit = CameraOrbit::new(0.0, 6.0, cfg.eye_height, 0.1);
        orbit.rotate_left();
        controller().place_on_orbit(&mut cam, &orbit);

        assert!((cam.eye.x - 6.0 * 0.1f32.cos()).abs() < 1e-5);
        assert!((cam.eye.z - 6.0 * 0.1f32.sin()).abs() < 1e-5);
        assert_eq!(cam.eye.y, 1.7);
        let to_hoop = (Vec3::new(0.0, 3.0, 0.0) - cam.eye).normalize();
        assert!((cam.forward() - to_hoop).length() < 1e-4);
    }

    #[test]
    fn look_pitch_is_clamped() {
        let mut cam = Camera::new(800, 600);
        let c = controller();
        c.apply_look(&mut cam, 0.0, -100_000.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        c.apply_look(&mut cam, 500.0, 0.0);
        assert!((cam.yaw - (-std::f32::consts::FRAC_PI_2 + 1.0)).abs() < 1e-5);
    }
}
