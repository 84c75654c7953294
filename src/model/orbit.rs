use glam::Vec3;

/// Average eye height in meters
pub const EYE_HEIGHT: f32 = 1.7;

/// Point on the orbit circle around the court origin at eye height
pub fn orbit_coords(angle: f32, radius: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), EYE_HEIGHT, radius * angle.sin())
}

/// Angle of the camera on its circle around the hoop
#[derive(Debug, Clone)]
pub struct CameraOrbit {
    pub angle: f32,
    pub radius: f32,
    pub height: f32,
    pub step: f32,
}

impl CameraOrbit {
    pub fn new(angle: f32, radius: f32, height: f32, step: f32) -> Self {
        Self { angle, radius, height, step }
    }

    pub fn rotate_left(&mut self) {
        self.angle += self.step;
    }

    pub fn rotate_right(&mut self) {
        self.angle -= self.step;
    }

    pub fn position(&self) -> Vec3 {
        let mut p = orbit_coords(self.angle, self.radius);
        p.y = self.height;
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn coords_at_known_angles() {
        let p = orbit_coords(0.0, 6.0);
        assert_eq!(p, Vec3::new(6.0, 1.7, 0.0));

        let p = orbit_coords(FRAC_PI_2, 6.0);
        assert!(close(p.x, 0.0));
        assert_eq!(p.y, 1.7);
        assert!(close(p.z, 6.0));
    }

    #[test]
    fn each_press_moves_exactly_one_step() {
        let mut orbit = CameraOrbit::new(FRAC_PI_2, 6.0, EYE_HEIGHT, 0.1);
        orbit.rotate_left();
        assert!(close(orbit.angle, FRAC_PI_2 + 0.1));
        orbit.rotate_right();
        orbit.rotate_right();
        assert!(close(orbit.angle, FRAC_PI_2 - 0.1));
    }

    #[test]
    fn position_stays_on_circle() {
        let mut orbit = CameraOrbit::new(0.0, 6.0, EYE_HEIGHT, 0.1);
        for _ in 0..70 {
            orbit.rotate_left();
            let p = orbit.position();
            assert!(close(p.x, 6.0 * orbit.angle.cos()));
            assert!(close(p.z, 6.0 * orbit.angle.sin()));
            assert_eq!(p.y, 1.7);
        }
    }
}
