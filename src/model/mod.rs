// MODEL: Game state and data
pub mod ball;
pub mod camera;
pub mod court;
pub mod geometry;
pub mod orbit;
pub mod power;
pub mod scoring;

pub use ball::{Ball, BodyId, BodyTransform, ShotState};
pub use camera::{Camera, PITCH_LIMIT};
pub use court::{court_fixtures, Fixture, FixtureKind, FixtureShape};
pub use orbit::{orbit_coords, CameraOrbit};
pub use power::{PowerMeter, PowerPhase};
pub use scoring::{is_in_scoring_range, ScoringBox, Scoreboard};
