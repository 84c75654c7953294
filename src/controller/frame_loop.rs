use tracing::{debug, info};

use crate::config::GameConfig;
use crate::model::{court_fixtures, Ball, Camera, Fixture};
use super::camera_controller::CameraController;
use super::game::GameSession;
use super::input::{GameAction, InputState};
use super::physics::PhysicsBackend;

/// What the renderer needs to draw one frame
pub struct FrameView<'a> {
    pub camera: &'a Camera,
    pub balls: &'a [Ball],
    pub clear_color: [f32; 3],
}

/// Draws the scene; the court itself is uploaded once at start-up
pub trait SceneRenderer {
    fn render(&mut self, view: &FrameView<'_>);
}

/// Per-frame summary handed back to the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub dt: f32,
    pub newly_scored: u32,
    pub score: u32,
    /// Bar fill ratio in `[0, 1]`
    pub power_fill: f32,
    pub ball_count: usize,
}

/// Converts host timestamps (milliseconds) into clamped frame deltas (seconds)
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last_ms: None, max_dt }
    }

    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, self.max_dt)
    }
}

/// Main game loop state and update logic
pub struct FrameLoop<P: PhysicsBackend> {
    pub config: GameConfig,
    pub camera: Camera,
    pub session: GameSession,
    pub physics: P,
    pub camera_controller: CameraController,
    pub input_state: InputState,
    fixtures: Vec<Fixture>,
}

impl<P: PhysicsBackend> FrameLoop<P> {
    /// Build the court into `physics` and place the camera at its start position
    pub fn new(config: GameConfig, mut physics: P, width: u32, height: u32) -> Self {
        let fixtures = court_fixtures(&config.court);
        for fixture in &fixtures {
            physics.add_fixture(fixture);
        }
        info!("court built with {} fixtures", fixtures.len());

        Self {
            camera: Camera::from_config(&config.camera, width, height),
            session: GameSession::new(&config),
            camera_controller: CameraController::new(&config.camera, config.court.hoop_position),
            input_state: InputState::new(),
            physics,
            fixtures,
            config,
        }
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn handle_action(&mut self, action: GameAction) {
        match action {
            GameAction::ChargeThrow => {
                self.session.power.charge_tick();
                debug!(
                    "charge {} ({:?})",
                    self.session.power.level(),
                    self.session.power.phase()
                );
            }
            GameAction::ReleaseThrow => {
                let req = self.session.release(self.camera.eye, self.camera.forward());
                let t = &self.config.throw;
                let id = self.physics.spawn_ball(req.position, req.velocity, t.ball_radius, t.ball_mass);
                self.session.add_ball(id, req.position);
                info!("threw ball {:?} at speed {:.1}", id, req.velocity.length());
            }
            GameAction::OrbitLeft => {
                self.session.orbit.rotate_left();
                self.camera_controller.place_on_orbit(&mut self.camera, &self.session.orbit);
                debug!("orbit angle {:.2}", self.session.orbit.angle);
            }
            GameAction::OrbitRight => {
                self.session.orbit.rotate_right();
                self.camera_controller.place_on_orbit(&mut self.camera, &self.session.orbit);
                debug!("orbit angle {:.2}", self.session.orbit.angle);
            }
        }
    }

    /// Look, step physics, mirror transforms, score, render
    pub fn tick<R: SceneRenderer>(&mut self, dt: f32, renderer: &mut R, clear_color: [f32; 3]) -> FrameReport {
        let (dx, dy) = self.input_state.consume_look();
        if dx != 0.0 || dy != 0.0 {
            self.camera_controller.apply_look(&mut self.camera, dx, dy);
        }

        let transforms = self.physics.advance(dt);
        let newly_scored = self.session.sync(&transforms);

        renderer.render(&FrameView {
            camera: &self.camera,
            balls: &self.session.balls,
            clear_color,
        });

        FrameReport {
            dt,
            newly_scored,
            score: self.session.scoreboard.points(),
            power_fill: self.session.power.bar_fill() / 100.0,
            ball_count: self.session.balls.len(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::InputEvent;
    use crate::model::{BodyId, BodyTransform, FixtureKind};
    use glam::Vec3;

    #[derive(Default)]
    struct ScriptedPhysics {
        fixtures: Vec<FixtureKind>,
        spawned: Vec<(Vec3, Vec3)>,
        advanced: Vec<f32>,
        next: Vec<(BodyId, BodyTransform)>,
    }

    impl PhysicsBackend for ScriptedPhysics {
        fn add_fixture(&mut self, fixture: &Fixture) {
            self.fixtures.push(fixture.kind);
        }

        fn spawn_ball(&mut self, position: Vec3, velocity: Vec3, _radius: f32, _mass: f32) -> BodyId {
            self.spawned.push((position, velocity));
            BodyId(self.spawned.len() - 1)
        }

        fn advance(&mut self, dt: f32) -> Vec<(BodyId, BodyTransform)> {
            self.advanced.push(dt);
            self.next.clone()
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<(Vec3, Vec<BodyTransform>, [f32; 3])>,
    }

    impl SceneRenderer for RecordingRenderer {
        fn render(&mut self, view: &FrameView<'_>) {
            self.frames.push((
                view.camera.eye,
                view.balls.iter().map(|b| b.transform).collect(),
                view.clear_color,
            ));
        }
    }

    fn game() -> FrameLoop<ScriptedPhysics> {
        FrameLoop::new(GameConfig::default(), ScriptedPhysics::default(), 800, 600)
    }

    #[test]
    fn court_is_built_into_physics() {
        let g = game();
        assert_eq!(g.physics.fixtures.len(), 4);
        assert_eq!(g.fixtures().len(), 4);
    }

    #[test]
    fn release_spawns_from_camera_along_forward() {
        let mut g = game();
        for _ in 0..10 {
            g.handle_action(GameAction::ChargeThrow);
        }
        g.handle_action(GameAction::ReleaseThrow);

        let (pos, vel) = g.physics.spawned[0];
        assert_eq!(pos, Vec3::new(0.0, 1.7, 6.0));
        assert!((vel - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-4);
        assert_eq!(g.session.power.level(), 0);
        assert_eq!(g.session.balls.len(), 1);
    }

    #[test]
    fn orbit_moves_camera_on_circle() {
        let mut g = game();
        g.handle_action(GameAction::OrbitRight);
        let angle = std::f32::consts::FRAC_PI_2 - 0.1;
        assert!((g.session.orbit.angle - angle).abs() < 1e-6);
        assert!((g.camera.eye.x - 6.0 * angle.cos()).abs() < 1e-5);
        assert!((g.camera.eye.z - 6.0 * angle.sin()).abs() < 1e-5);
        assert_eq!(g.camera.eye.y, 1.7);
    }

    #[test]
    fn tick_syncs_scores_and_renders_once() {
        let mut g = game();
        g.handle_action(GameAction::ReleaseThrow);
        let through_hoop = BodyTransform {
            translation: Vec3::new(0.05, 2.8, -0.05),
            rotation: glam::Quat::from_rotation_z(1.0),
        };
        g.physics.next = vec![(BodyId(0), through_hoop)];

        let mut r = RecordingRenderer::default();
        let first = g.tick(0.016, &mut r, [0.1, 0.2, 0.3]);
        let second = g.tick(0.016, &mut r, [0.1, 0.2, 0.3]);

        assert_eq!(first.newly_scored, 1);
        assert_eq!(first.score, 1);
        assert_eq!(second.newly_scored, 0);
        assert_eq!(second.score, 1);
        assert_eq!(r.frames.len(), 2);
        assert_eq!(r.frames[0].1, vec![through_hoop]);
        assert_eq!(r.frames[0].2, [0.1, 0.2, 0.3]);
        assert_eq!(g.physics.advanced, vec![0.016, 0.016]);
    }

    #[test]
    fn look_is_consumed_on_tick() {
        let mut g = game();
        g.input_state.process_event(&InputEvent::PointerLockChanged { locked: true });
        g.input_state.process_event(&InputEvent::MouseMove { dx: 100.0, dy: 0.0 });
        let yaw = g.camera.yaw;
        g.tick(0.0, &mut RecordingRenderer::default(), [0.0; 3]);
        assert!((g.camera.yaw - (yaw + 0.2)).abs() < 1e-5);
        assert_eq!(g.input_state.look_delta, (0.0, 0.0));
    }

    #[test]
    fn report_carries_power_as_ratio() {
        let mut g = game();
        let mut r = RecordingRenderer::default();
        assert_eq!(g.tick(0.0, &mut r, [0.0; 3]).power_fill, 0.0);

        for _ in 0..3 {
            g.handle_action(GameAction::ChargeThrow);
        }
        let report = g.tick(0.0, &mut r, [0.0; 3]);
        assert!((report.power_fill - 0.1).abs() < 1e-6);
        assert_eq!(crate::view::hud::power_bar_width(report.power_fill), "10%");

        g.handle_action(GameAction::ReleaseThrow);
        assert_eq!(g.tick(0.0, &mut r, [0.0; 3]).power_fill, 0.0);
    }

    #[test]
    fn clock_clamps_deltas() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.tick(1000.0), 0.0);
        assert!((clock.tick(1016.0) - 0.016).abs() < 1e-6);
        assert_eq!(clock.tick(3000.0), 0.1);
        assert_eq!(clock.tick(2000.0), 0.0);
    }
}
