use glam::Vec3;

/// All tunable constants of the game in one place
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub throw: ThrowConfig,
    pub camera: CameraConfig,
    pub court: CourtConfig,
    /// Background colour as a CSS hex string, editable in the debug panel
    pub clear_color: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            throw: ThrowConfig::default(),
            camera: CameraConfig::default(),
            court: CourtConfig::default(),
            clear_color: "#000".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Fixed logical step in seconds
    pub fixed_step: f32,
    /// Upper bound of fixed steps taken per rendered frame
    pub max_sub_steps: u32,
    /// Largest frame delta fed into the stepper
    pub max_frame_dt: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            fixed_step: 1.0 / 60.0,
            max_sub_steps: 3,
            max_frame_dt: 0.1,
            friction: 0.1,
            restitution: 0.7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThrowConfig {
    /// Highest power level; also the launch speed at full charge
    pub max_power: u32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_color: [f32; 3],
}

impl Default for ThrowConfig {
    fn default() -> Self {
        Self {
            max_power: 20,
            ball_radius: 0.14,
            ball_mass: 1.0,
            ball_color: [0.812, 0.325, 0.0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub orbit_radius: f32,
    pub eye_height: f32,
    /// Radians added or removed per orbit key press
    pub orbit_step: f32,
    pub initial_angle: f32,
    pub look_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            z_near: 0.1,
            z_far: 1000.0,
            orbit_radius: 6.0,
            eye_height: crate::model::orbit::EYE_HEIGHT,
            orbit_step: 0.1,
            initial_angle: std::f32::consts::FRAC_PI_2,
            look_sensitivity: 0.002,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CourtConfig {
    pub hoop_position: Vec3,
    pub hoop_radius: f32,
    pub hoop_tube: f32,
    pub hoop_radial_segments: u32,
    pub hoop_tubular_segments: u32,
    /// Inclusive corners of the scoring box
    pub scoring_min: Vec3,
    pub scoring_max: Vec3,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            hoop_position: Vec3::new(0.0, 3.0, 0.0),
            hoop_radius: 0.45,
            hoop_tube: 0.05,
            hoop_radial_segments: 16,
            hoop_tubular_segments: 100,
            scoring_min: Vec3::new(-0.4, 2.75, -0.4),
            scoring_max: Vec3::new(0.4, 2.85, 0.4),
        }
    }
}

/// Parse `#rgb` or `#rrggbb` into components in `0.0..=1.0`
pub fn parse_hex_color(s: &str) -> Option<[f32; 3]> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).ok();
    let [r, g, b] = match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            out
        }
        6 => [channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?],
        _ => return None,
    };
    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}
