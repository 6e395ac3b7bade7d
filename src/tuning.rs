//! Game balance tuning
//!
//! Every knob defaults to the stock constants in `consts`. A JSON file may
//! override any subset; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Data-driven balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ball ===
    /// Ball speed before effects (units per reference frame)
    pub ball_speed: f32,
    pub slow_multiplier: f32,
    pub fast_multiplier: f32,

    // === Paddle ===
    /// Maximum paddle travel per reference frame
    pub paddle_speed: f32,
    /// Score popup length (ms)
    pub score_display_ms: f32,

    // === Power-ups ===
    /// Chance a destroyed brick drops a power-up (0.0 - 1.0)
    pub drop_chance: f64,
    pub powerup_fall_speed: f32,
    pub powerup_duration_ms: u64,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_cooldown_ms: u64,

    // === Effects ===
    /// Particles thrown per destroyed brick
    pub particle_count: usize,

    // === Session ===
    pub initial_lives: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_speed: BALL_SPEED_INITIAL,
            slow_multiplier: SLOW_MULTIPLIER,
            fast_multiplier: FAST_MULTIPLIER,

            paddle_speed: PADDLE_SPEED,
            score_display_ms: PADDLE_SCORE_DISPLAY_MS,

            drop_chance: POWERUP_DROP_CHANCE,
            powerup_fall_speed: POWERUP_SPEED,
            powerup_duration_ms: POWERUP_DURATION_MS,

            bullet_speed: BULLET_SPEED,
            bullet_cooldown_ms: BULLET_COOLDOWN_MS,

            particle_count: PARTICLE_COUNT,

            initial_lives: INITIAL_LIVES,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace values the simulation can't run with
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(0.0..=1.0).contains(&self.drop_chance) {
            log::warn!("drop_chance {} out of range, clamping", self.drop_chance);
            self.drop_chance = self.drop_chance.clamp(0.0, 1.0);
        }
        if self.ball_speed <= 0.0 {
            log::warn!("ball_speed must be positive, using {}", defaults.ball_speed);
            self.ball_speed = defaults.ball_speed;
        }
        if self.paddle_speed <= 0.0 {
            log::warn!("paddle_speed must be positive, using {}", defaults.paddle_speed);
            self.paddle_speed = defaults.paddle_speed;
        }
        if self.bullet_speed <= 0.0 {
            log::warn!("bullet_speed must be positive, using {}", defaults.bullet_speed);
            self.bullet_speed = defaults.bullet_speed;
        }
        if self.powerup_fall_speed <= 0.0 {
            log::warn!(
                "powerup_fall_speed must be positive, using {}",
                defaults.powerup_fall_speed
            );
            self.powerup_fall_speed = defaults.powerup_fall_speed;
        }
        if self.slow_multiplier <= 0.0 || self.fast_multiplier <= 0.0 {
            log::warn!("speed multipliers must be positive, using defaults");
            self.slow_multiplier = defaults.slow_multiplier;
            self.fast_multiplier = defaults.fast_multiplier;
        }
        if self.powerup_duration_ms > POWERUP_DURATION_MAX_MS {
            log::warn!(
                "powerup_duration_ms {} too long, capping at {}",
                self.powerup_duration_ms,
                POWERUP_DURATION_MAX_MS
            );
            self.powerup_duration_ms = POWERUP_DURATION_MAX_MS;
        }
        if self.initial_lives == 0 {
            log::warn!("initial_lives must be at least 1");
            self.initial_lives = 1;
        }
        self
    }
}
