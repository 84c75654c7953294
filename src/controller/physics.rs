use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use std::num::NonZeroUsize;

use crate::config::PhysicsConfig;
use crate::model::{BodyId, BodyTransform, Fixture, FixtureShape};

/// Narrow seam between the game and a rigid-body engine
pub trait PhysicsBackend {
    /// Insert a zero-mass collider for a court piece
    fn add_fixture(&mut self, fixture: &Fixture);

    /// Insert a dynamic ball and give it an initial velocity
    fn spawn_ball(&mut self, position: Vec3, velocity: Vec3, radius: f32, mass: f32) -> BodyId;

    /// Advance by a real frame delta and report every ball's new transform
    fn advance(&mut self, dt: f32) -> Vec<(BodyId, BodyTransform)>;
}

/// Turns variable frame time into whole fixed steps.
///
/// Runs at most `max_sub_steps` per call and keeps the leftover modulo the step.
#[derive(Debug, Clone)]
pub struct FixedStepper {
    pub step: f32,
    pub max_sub_steps: u32,
    accumulator: f32,
}

const FALLBACK_STEP: f32 = 1.0 / 60.0;

impl FixedStepper {
    /// A non-positive or non-finite `step` falls back to 1/60 s
    pub fn new(step: f32, max_sub_steps: u32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            tracing::warn!("invalid fixed step {step}, using {FALLBACK_STEP}");
            FALLBACK_STEP
        };
        Self { step, max_sub_steps, accumulator: 0.0 }
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Number of fixed steps to run for this frame
    pub fn consume(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_sub_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        self.accumulator %= self.step;
        steps
    }
}

/// `PhysicsBackend` backed by a rapier3d world
pub struct RapierWorld {
    gravity: Vector<Real>,
    friction: f32,
    restitution: f32,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    stepper: FixedStepper,
    balls: Vec<RigidBodyHandle>,
}

impl RapierWorld {
    pub fn new(cfg: &PhysicsConfig) -> Self {
        let stepper = FixedStepper::new(cfg.fixed_step, cfg.max_sub_steps);
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = stepper.step;
        integration_parameters.num_solver_iterations = NonZeroUsize::new(4).unwrap_or(NonZeroUsize::MIN);

        Self {
            gravity: vector![cfg.gravity.x, cfg.gravity.y, cfg.gravity.z],
            friction: cfg.friction,
            restitution: cfg.restitution,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            stepper,
            balls: Vec::new(),
        }
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// Current linear velocity of a ball, if the id is known
    pub fn ball_velocity(&self, id: BodyId) -> Option<Vec3> {
        let handle = self.balls.get(id.0)?;
        let v = self.bodies.get(*handle)?.linvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    fn step_once(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn transform_of(&self, handle: RigidBodyHandle) -> Option<BodyTransform> {
        let body = self.bodies.get(handle)?;
        let t = body.translation();
        // nalgebra stores quaternions as (i, j, k, w)
        let q = body.rotation().coords;
        Some(BodyTransform {
            translation: Vec3::new(t.x, t.y, t.z),
            rotation: Quat::from_xyzw(q.x, q.y, q.z, q.w),
        })
    }
}

fn collider_for(shape: &FixtureShape) -> ColliderBuilder {
    match *shape {
        FixtureShape::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        // ring of capsules along the tube's centre line, in the local XY plane
        FixtureShape::Torus { radius, tube, tubular_segments, .. } => {
            let n = tubular_segments.max(3);
            let on_ring = |i: u32| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                point![radius * a.cos(), radius * a.sin(), 0.0]
            };
            let segments = (0..n)
                .map(|i| (Isometry::identity(), SharedShape::capsule(on_ring(i), on_ring(i + 1), tube)))
                .collect();
            ColliderBuilder::compound(segments)
        }
    }
}

impl PhysicsBackend for RapierWorld {
    fn add_fixture(&mut self, fixture: &Fixture) {
        let (axis, angle) = fixture.rotation.to_axis_angle();
        let scaled = axis * angle;
        let body = RigidBodyBuilder::fixed()
            .translation(vector![fixture.position.x, fixture.position.y, fixture.position.z])
            .rotation(vector![scaled.x, scaled.y, scaled.z])
            .build();
        let handle = self.bodies.insert(body);

        let collider = collider_for(&fixture.collider)
            .friction(self.friction)
            .restitution(self.restitution)
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        tracing::debug!("added {:?} collider at {:?}", fixture.kind, fixture.position);
    }

    fn spawn_ball(&mut self, position: Vec3, velocity: Vec3, radius: f32, mass: f32) -> BodyId {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .linvel(vector![velocity.x, velocity.y, velocity.z])
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(radius)
            .mass(mass)
            .friction(self.friction)
            .restitution(self.restitution)
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        self.balls.push(handle);
        BodyId(self.balls.len() - 1)
    }

    fn advance(&mut self, dt: f32) -> Vec<(BodyId, BodyTransform)> {
        let steps = self.stepper.consume(dt);
        for _ in 0..steps {
            self.step_once();
        }

        self.balls
            .iter()
            .enumerate()
            .filter_map(|(i, h)| self.transform_of(*h).map(|t| (BodyId(i), t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CourtConfig, PhysicsConfig};
    use crate::model::court_fixtures;

    const STEP: f32 = 1.0 / 60.0;

    #[test]
    fn stepper_runs_whole_steps() {
        let mut s = FixedStepper::new(STEP, 3);
        assert_eq!(s.consume(STEP * 0.5), 0);
        assert_eq!(s.consume(STEP * 0.6), 1);
        assert!((s.accumulator() - STEP * 0.1).abs() < 1e-6);
    }

    #[test]
    fn stepper_caps_sub_steps_and_drops_backlog() {
        let mut s = FixedStepper::new(STEP, 3);
        assert_eq!(s.consume(STEP * 10.5), 3);
        assert!(s.accumulator() < STEP);
        assert_eq!(s.consume(0.0), 0);
    }

    #[test]
    fn stepper_ignores_negative_time() {
        let mut s = FixedStepper::new(STEP, 3);
        assert_eq!(s.consume(-1.0), 0);
        assert_eq!(s.accumulator(), 0.0);
    }

    #[test]
    fn stepper_replaces_unusable_step() {
        for bad in [0.0, -STEP, f32::NAN, f32::INFINITY] {
            let mut s = FixedStepper::new(bad, 3);
            assert_eq!(s.step, STEP);
            assert_eq!(s.consume(STEP * 1.5), 1);
            assert!(s.accumulator().is_finite());
            assert!((s.accumulator() - STEP * 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn world_with_zero_step_still_moves_balls() {
        let cfg = PhysicsConfig { fixed_step: 0.0, ..PhysicsConfig::default() };
        let mut world = RapierWorld::new(&cfg);
        let id = world.spawn_ball(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, 0.14, 1.0);
        let moved = world.advance(STEP);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].0, id);
        assert!(moved[0].1.translation.y < 5.0);
    }

    fn court_world() -> RapierWorld {
        let mut world = RapierWorld::new(&PhysicsConfig::default());
        for fixture in court_fixtures(&CourtConfig::default()) {
            world.add_fixture(&fixture);
        }
        world
    }

    #[test]
    fn dropped_ball_rests_on_floor() {
        let mut world = court_world();
        let id = world.spawn_ball(Vec3::new(2.0, 2.0, 4.0), Vec3::ZERO, 0.14, 1.0);

        let mut last = None;
        for _ in 0..600 {
            last = world.advance(STEP).into_iter().find(|(b, _)| *b == id);
        }
        let (_, t) = last.unwrap();
        // floor collider top is at y = 0.1
        assert!(t.translation.y > 0.1, "ball fell through floor: {:?}", t.translation);
        assert!(t.translation.y < 0.5, "ball never landed: {:?}", t.translation);
    }

    #[test]
    fn thrown_ball_moves_along_velocity() {
        let mut world = court_world();
        let id = world.spawn_ball(Vec3::new(0.0, 1.7, 6.0), Vec3::new(0.0, 0.0, -5.0), 0.14, 1.0);
        assert_eq!(world.ball_velocity(id).map(|v| v.z), Some(-5.0));

        let moved = world.advance(STEP * 3.0);
        let (_, t) = moved[0];
        assert!(t.translation.z < 6.0);
        assert!(t.translation.y < 1.7);
    }

    #[test]
    fn hoop_ring_is_open_in_the_middle_and_solid_at_the_rim() {
        let mut world = court_world();
        let through = world.spawn_ball(Vec3::new(0.0, 3.5, 0.0), Vec3::ZERO, 0.14, 1.0);
        let on_rim = world.spawn_ball(Vec3::new(0.45, 3.5, 0.0), Vec3::ZERO, 0.14, 1.0);

        let mut last = Vec::new();
        for _ in 0..30 {
            last = world.advance(STEP);
        }
        let y = |id: BodyId| last.iter().find(|(b, _)| *b == id).map(|(_, t)| t.translation.y);
        assert!(y(through).is_some_and(|y| y < 2.5), "centre drop was blocked: {:?}", y(through));
        assert!(y(on_rim).is_some_and(|y| y > 2.9), "rim drop fell through: {:?}", y(on_rim));
    }

    #[test]
    fn advance_reports_every_ball() {
        let mut world = court_world();
        for i in 0..3 {
            world.spawn_ball(Vec3::new(i as f32, 5.0, 4.0), Vec3::ZERO, 0.14, 1.0);
        }
        let ids: Vec<_> = world.advance(STEP).into_iter().map(|(b, _)| b).collect();
        assert_eq!(ids, vec![BodyId(0), BodyId(1), BodyId(2)]);
        assert_eq!(world.ball_count(), 3);
    }
}
