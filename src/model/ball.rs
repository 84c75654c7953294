use glam::{Quat, Vec3};
use super::scoring::ScoringBox;

/// Opaque handle of a body inside a physics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Position and orientation of a rigid body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl BodyTransform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, rotation: Quat::IDENTITY }
    }

    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

/// Scoring state of a single thrown ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotState {
    #[default]
    Unscored,
    Scored,
}

/// A thrown ball: visual transform mirrored from its physics body
#[derive(Debug, Clone)]
pub struct Ball {
    pub body: BodyId,
    pub transform: BodyTransform,
    pub shot: ShotState,
}

impl Ball {
    pub fn new(body: BodyId, position: Vec3) -> Self {
        Self {
            body,
            transform: BodyTransform::from_translation(position),
            shot: ShotState::Unscored,
        }
    }

    /// Returns true only on the frame the ball first enters the box
    pub fn observe(&mut self, scoring_box: &ScoringBox) -> bool {
        if self.shot == ShotState::Scored || !scoring_box.contains(self.transform.translation) {
            return false;
        }
        self.shot = ShotState::Scored;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_once_even_when_reentering() {
        let hoop = ScoringBox::default();
        let mut ball = Ball::new(BodyId(0), Vec3::new(0.0, 5.0, 0.0));
        assert!(!ball.observe(&hoop));

        ball.transform.translation = Vec3::new(0.0, 2.8, 0.0);
        assert!(ball.observe(&hoop));
        assert_eq!(ball.shot, ShotState::Scored);
        assert!(!ball.observe(&hoop));

        ball.transform.translation = Vec3::new(0.0, 1.0, 0.0);
        assert!(!ball.observe(&hoop));
        ball.transform.translation = Vec3::new(0.1, 2.8, -0.1);
        assert!(!ball.observe(&hoop));
        assert_eq!(ball.shot, ShotState::Scored);
    }

    #[test]
    fn matrix_places_ball() {
        let t = BodyTransform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }
}
