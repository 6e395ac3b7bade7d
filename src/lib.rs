//! Brick Breaker - a paddle, a ball and a wall of bricks
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `levels`: Brick layouts consumed at level setup
//! - `renderer`: Sprite keys and the draw-surface interface
//! - `tuning`: Data-driven game balance

pub mod levels;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use levels::{LevelPattern, LevelSet};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Reference frame length. Speeds are expressed in units per reference frame.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 768.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 150.0;
    pub const PADDLE_HEIGHT: f32 = 40.0;
    /// Vertical centre of the paddle
    pub const PADDLE_Y: f32 = SCREEN_HEIGHT - 80.0;
    pub const PADDLE_SPEED: f32 = 10.0;
    /// How long a score popup stays on the paddle (ms)
    pub const PADDLE_SCORE_DISPLAY_MS: f32 = 1500.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 32.0;
    pub const BALL_SPEED_INITIAL: f32 = 6.0;
    /// Gap between a resting ball and the paddle top
    pub const BALL_REST_GAP: f32 = 5.0;
    /// Maximum deflection off the paddle edge (degrees from vertical)
    pub const PADDLE_MAX_BOUNCE_DEG: f32 = 60.0;
    pub const LAUNCH_SPREAD_DEG: f32 = 45.0;
    pub const SPAWN_SPREAD_DEG: f32 = 60.0;

    /// Brick grid
    pub const BRICK_WIDTH: f32 = 96.0;
    pub const BRICK_HEIGHT: f32 = 32.0;
    pub const BRICK_COLS: usize = 9;
    pub const BRICK_PADDING: f32 = 4.0;
    pub const BRICK_TOP_OFFSET: f32 = 80.0;
    pub const BRICK_LEFT_OFFSET: f32 =
        (SCREEN_WIDTH - BRICK_COLS as f32 * (BRICK_WIDTH + BRICK_PADDING)) / 2.0;
    /// Two hits: complete -> cracked -> destroyed
    pub const BRICK_HEALTH: i32 = 2;
    /// Score per brick type (index = type)
    pub const SCORE_VALUES: [u32; 10] = [50, 50, 100, 100, 100, 150, 150, 250, 250, 500];
    /// Score for brick types outside the table
    pub const DEFAULT_BRICK_SCORE: u32 = 50;

    /// Lives
    pub const INITIAL_LIVES: u32 = 3;

    /// Power-ups
    pub const POWERUP_DROP_CHANCE: f64 = 0.20;
    pub const POWERUP_SPEED: f32 = 3.0;
    pub const POWERUP_SIZE: f32 = 40.0;
    pub const POWERUP_DURATION_MS: u64 = 8000;
    /// Longest effect a tuning file may ask for (one hour)
    pub const POWERUP_DURATION_MAX_MS: u64 = 60 * 60 * 1000;
    pub const SLOW_MULTIPLIER: f32 = 0.6;
    pub const FAST_MULTIPLIER: f32 = 1.5;

    /// Bullets
    pub const BULLET_SPEED: f32 = 12.0;
    pub const BULLET_COOLDOWN_MS: u64 = 300;
    pub const BULLET_WIDTH: f32 = 19.0;
    pub const BULLET_HEIGHT: f32 = 41.0;
    /// Bullets spawn this far above the paddle top
    pub const BULLET_SPAWN_OFFSET: f32 = 20.0;

    /// Particles
    pub const PARTICLE_COUNT: usize = 8;
    pub const PARTICLE_SIZE: f32 = 16.0;
    pub const PARTICLE_SPEED_MIN: f32 = 2.0;
    pub const PARTICLE_SPEED_MAX: f32 = 5.0;
    pub const PARTICLE_LIFETIME_MS: f32 = 1000.0;
    pub const PARTICLE_GRAVITY: f32 = 0.3;
}

/// Convert a frame delta in milliseconds into reference-frame units
#[inline]
pub fn dt_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::FRAME_MS
}

/// Unit vector for an angle measured in degrees from straight up
///
/// Screen coordinates grow downward, so 0° is `(0, -1)` and positive
/// angles lean to the right.
#[inline]
pub fn direction_from_vertical(angle_deg: f32) -> glam::Vec2 {
    let rad = angle_deg.to_radians();
    glam::Vec2::new(rad.sin(), -rad.cos())
}
