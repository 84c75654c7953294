/// Direction the power level moves on the next charge tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rising,
    Falling,
}

/// Coarse view of the meter used for logging and the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerPhase {
    Idle,
    Charging,
    Overcharged,
    Discharging,
}

/// Throw power that oscillates between 0 and `max` while the throw key is held
#[derive(Debug, Clone)]
pub struct PowerMeter {
    level: u32,
    max: u32,
    direction: Direction,
    bar_fill: f32,
}

impl PowerMeter {
    pub fn new(max: u32) -> Self {
        Self {
            level: 0,
            max: max.max(1),
            direction: Direction::Rising,
            bar_fill: 0.0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Percentage shown on the power bar
    pub fn bar_fill(&self) -> f32 {
        self.bar_fill
    }

    pub fn phase(&self) -> PowerPhase {
        if self.level == 0 {
            PowerPhase::Idle
        } else if self.level == self.max {
            PowerPhase::Overcharged
        } else {
            match self.direction {
                Direction::Rising => PowerPhase::Charging,
                Direction::Falling => PowerPhase::Discharging,
            }
        }
    }

    /// One key-down tick. The bar shows the level as it was before the step.
    pub fn charge_tick(&mut self) {
        if self.level == 0 {
            self.direction = Direction::Rising;
        }
        if self.level == self.max {
            self.direction = Direction::Falling;
        }
        self.bar_fill = self.level as f32 / self.max as f32 * 100.0;
        self.level = match self.direction {
            Direction::Rising => self.level + 1,
            Direction::Falling => self.level - 1,
        };
    }

    /// Key-up: hand out the current strength and go back to idle
    pub fn release(&mut self) -> f32 {
        let strength = self.level as f32;
        self.level = 0;
        self.direction = Direction::Rising;
        self.bar_fill = 0.0;
        strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rises_to_max_then_falls_to_zero() {
        let mut meter = PowerMeter::new(20);
        let mut prev = meter.level();
        for _ in 0..20 {
            meter.charge_tick();
            assert!(meter.level() > prev);
            prev = meter.level();
        }
        assert_eq!(meter.level(), 20);
        assert_eq!(meter.phase(), PowerPhase::Overcharged);

        for _ in 0..20 {
            meter.charge_tick();
            assert!(meter.level() < prev);
            prev = meter.level();
        }
        assert_eq!(meter.level(), 0);
        assert_eq!(meter.phase(), PowerPhase::Idle);

        meter.charge_tick();
        assert_eq!(meter.level(), 1);
        assert_eq!(meter.direction(), Direction::Rising);
    }

    #[test]
    fn never_leaves_range_while_held() {
        let mut meter = PowerMeter::new(20);
        for _ in 0..1_000 {
            meter.charge_tick();
            assert!(meter.level() <= 20);
            assert!((0.0..=100.0).contains(&meter.bar_fill()));
        }
    }

    #[test]
    fn phases_follow_direction() {
        let mut meter = PowerMeter::new(20);
        assert_eq!(meter.phase(), PowerPhase::Idle);
        meter.charge_tick();
        assert_eq!(meter.phase(), PowerPhase::Charging);
        for _ in 0..20 {
            meter.charge_tick();
        }
        assert_eq!(meter.level(), 19);
        assert_eq!(meter.phase(), PowerPhase::Discharging);
    }

    #[test]
    fn bar_lags_one_tick_behind_level() {
        let mut meter = PowerMeter::new(20);
        meter.charge_tick();
        assert_eq!(meter.bar_fill(), 0.0);
        meter.charge_tick();
        assert_eq!(meter.bar_fill(), 5.0);
        for _ in 0..19 {
            meter.charge_tick();
        }
        assert_eq!(meter.bar_fill(), 100.0);
    }

    #[test]
    fn release_always_resets() {
        for ticks in [0, 1, 7, 20, 23, 40, 41] {
            let mut meter = PowerMeter::new(20);
            for _ in 0..ticks {
                meter.charge_tick();
            }
            let expected = meter.level() as f32;
            assert_eq!(meter.release(), expected);
            assert_eq!(meter.level(), 0);
            assert_eq!(meter.bar_fill(), 0.0);
            assert_eq!(meter.direction(), Direction::Rising);
        }
    }

    #[test]
    fn release_mid_fall_restarts_rising() {
        let mut meter = PowerMeter::new(20);
        for _ in 0..25 {
            meter.charge_tick();
        }
        assert_eq!(meter.direction(), Direction::Falling);
        meter.release();
        meter.charge_tick();
        assert_eq!(meter.level(), 1);
    }
}
