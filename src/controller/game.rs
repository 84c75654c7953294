use glam::Vec3;

use crate::config::GameConfig;
use crate::model::{Ball, BodyId, BodyTransform, CameraOrbit, PowerMeter, ScoringBox, Scoreboard};

/// Where and how fast a released ball starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowRequest {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Everything the player can change during a session
pub struct GameSession {
    pub power: PowerMeter,
    pub orbit: CameraOrbit,
    pub balls: Vec<Ball>,
    pub scoreboard: Scoreboard,
    pub scoring_box: ScoringBox,
}

impl GameSession {
    pub fn new(cfg: &GameConfig) -> Self {
        Self {
            power: PowerMeter::new(cfg.throw.max_power),
            orbit: CameraOrbit::new(
                cfg.camera.initial_angle,
                cfg.camera.orbit_radius,
                cfg.camera.eye_height,
                cfg.camera.orbit_step,
            ),
            balls: Vec::new(),
            scoreboard: Scoreboard::default(),
            scoring_box: ScoringBox::new(cfg.court.scoring_min, cfg.court.scoring_max),
        }
    }

    /// Release the charge: launch from `eye` along `direction`
    pub fn release(&mut self, eye: Vec3, direction: Vec3) -> ThrowRequest {
        let strength = self.power.release();
        ThrowRequest {
            position: eye,
            velocity: direction * strength,
        }
    }

    pub fn add_ball(&mut self, body: BodyId, position: Vec3) {
        self.balls.push(Ball::new(body, position));
    }

    /// Mirror physics transforms onto balls and score new entries.
    /// Returns how many balls scored this frame.
    pub fn sync(&mut self, transforms: &[(BodyId, BodyTransform)]) -> u32 {
        let mut scored = 0;
        for (id, transform) in transforms {
            let Some(ball) = self.balls.iter_mut().find(|b| b.body == *id) else {
                continue;
            };
            ball.transform = *transform;
            if ball.observe(&self.scoring_box) {
                let total = self.scoreboard.record();
                tracing::info!("ball {:?} scored, total {}", id, total);
                scored += 1;
            }
        }
        scored
    }
}
