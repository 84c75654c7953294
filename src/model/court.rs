use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::config::CourtConfig;
use super::geometry::{self, TriangleSoup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureKind {
    Floor,
    Post,
    Backboard,
    Hoop,
}

/// Shape of either the visual mesh or the collision volume
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureShape {
    Cuboid { half_extents: Vec3 },
    Torus { radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32 },
}

impl FixtureShape {
    pub fn triangles(&self) -> TriangleSoup {
        match *self {
            FixtureShape::Cuboid { half_extents } => geometry::cuboid(half_extents),
            FixtureShape::Torus { radius, tube, radial_segments, tubular_segments } => {
                geometry::torus(radius, tube, radial_segments, tubular_segments)
            }
        }
    }
}

/// Static court piece: one visual mesh paired with one fixed collider
#[derive(Debug, Clone)]
pub struct Fixture {
    pub kind: FixtureKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub visual: FixtureShape,
    pub collider: FixtureShape,
    pub color: [f32; 3],
    /// Lambert shading when true, flat colour otherwise
    pub lit: bool,
}

const BROWN: [f32; 3] = [0.647, 0.165, 0.165];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const ORANGE: [f32; 3] = [1.0, 0.647, 0.0];

fn cuboid(x: f32, y: f32, z: f32) -> FixtureShape {
    FixtureShape::Cuboid { half_extents: Vec3::new(x, y, z) }
}

/// Build the floor, post, backboard and hoop
pub fn court_fixtures(cfg: &CourtConfig) -> Vec<Fixture> {
    let hoop = FixtureShape::Torus {
        radius: cfg.hoop_radius,
        tube: cfg.hoop_tube,
        radial_segments: cfg.hoop_radial_segments,
        tubular_segments: cfg.hoop_tubular_segments,
    };

    vec![
        Fixture {
            kind: FixtureKind::Floor,
            position: Vec3::new(0.0, 0.0, 4.0),
            rotation: Quat::IDENTITY,
            visual: cuboid(5.0, 0.05, 5.0),
            collider: cuboid(5.0, 0.1, 5.0),
            color: BROWN,
            lit: false,
        },
        Fixture {
            kind: FixtureKind::Post,
            position: Vec3::new(0.0, 1.5, -0.65),
            rotation: Quat::IDENTITY,
            visual: cuboid(0.15, 1.5, 0.15),
            collider: cuboid(0.15, 1.5, 0.15),
            color: BLUE,
            lit: false,
        },
        Fixture {
            kind: FixtureKind::Backboard,
            position: Vec3::new(0.0, 3.3, -0.5),
            rotation: Quat::IDENTITY,
            visual: cuboid(0.915, 0.535, 0.05),
            collider: cuboid(0.915, 0.535, 0.15),
            color: WHITE,
            lit: false,
        },
        Fixture {
            kind: FixtureKind::Hoop,
            position: cfg.hoop_position,
            // Torus is built in XY; lay it flat
            rotation: Quat::from_rotation_x(FRAC_PI_2),
            visual: hoop.clone(),
            collider: hoop,
            color: ORANGE,
            lit: true,
        },
    ]
}
