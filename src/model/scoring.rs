use glam::Vec3;

/// Axis-aligned box approximating the hoop opening
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl ScoringBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inclusive on every face
    pub fn contains(&self, p: Vec3) -> bool {
        in_range(p.x, self.min.x, self.max.x)
            && in_range(p.y, self.min.y, self.max.y)
            && in_range(p.z, self.min.z, self.max.z)
    }
}

impl Default for ScoringBox {
    fn default() -> Self {
        Self::new(Vec3::new(-0.4, 2.75, -0.4), Vec3::new(0.4, 2.85, 0.4))
    }
}

fn in_range(v: f32, lo: f32, hi: f32) -> bool {
    v >= lo && v <= hi
}

/// Whether a point lies in the default hoop opening
pub fn is_in_scoring_range(x: f32, y: f32, z: f32) -> bool {
    ScoringBox::default().contains(Vec3::new(x, y, z))
}

/// Score counter shown to the player
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    points: u32,
}

impl Scoreboard {
    pub fn record(&mut self) -> u32 {
        self.points += 1;
        self.points
    }

    pub fn points(&self) -> u32 {
        self.points
    }
}
