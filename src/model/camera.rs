use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Just under π/2 to keep `look_at` away from the up vector
pub const PITCH_LIMIT: f32 = 1.5533;

pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_config(&CameraConfig::default(), width, height)
    }

    /// Standing on the orbit circle, looking down -Z
    pub fn from_config(cfg: &CameraConfig, width: u32, height: u32) -> Self {
        let mut cam = Self {
            eye: Vec3::new(0.0, cfg.eye_height, cfg.orbit_radius),
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            up: Vec3::Y,
            fov_y: cfg.fov_y_deg.to_radians(),
            aspect: 1.0,
            z_near: cfg.z_near,
            z_far: cfg.z_far,
        };
        cam.set_aspect(width, height);
        cam
    }

    pub fn forward(&self) -> Vec3 {
        let cy = self.yaw;
        let cp = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    pub fn target(&self) -> Vec3 { self.eye + self.forward() }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target(), self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }

    pub fn set_look_at(&mut self, target: Vec3) {
        let dir = (target - self.eye).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_behind_the_hoop_looking_forward() {
        let cam = Camera::new(800, 600);
        assert_eq!(cam.eye, Vec3::new(0.0, 1.7, 6.0));
        let f = cam.forward();
        assert!((f - Vec3::NEG_Z).length() < 1e-5);
        assert!((cam.fov_y - 75f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut cam = Camera::new(800, 600);
        cam.eye = Vec3::new(6.0, 1.7, 0.0);
        let hoop = Vec3::new(0.0, 3.0, 0.0);
        cam.set_look_at(hoop);
        let expected = (hoop - cam.eye).normalize();
        assert!((cam.forward() - expected).length() < 1e-4);
    }

    #[test]
    fn look_at_overhead_stops_at_pitch_limit() {
        let mut cam = Camera::new(800, 600);
        cam.set_look_at(cam.eye + Vec3::Y);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        let f = cam.forward();
        assert!(f.is_finite());
        assert!((f.y - PITCH_LIMIT.sin()).abs() < 1e-5);

        cam.set_look_at(cam.eye - Vec3::Y * 3.0);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
        assert!(cam.view_proj().is_finite());
    }

    #[test]
    fn aspect_survives_zero_height() {
        let mut cam = Camera::new(800, 600);
        cam.set_aspect(1024, 0);
        assert!(cam.aspect.is_finite());
    }
}
