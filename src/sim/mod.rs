//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `FrameTime` only
//! - Seeded RNG only
//! - Stable iteration order (bricks and pickups keep insertion order)
//! - No rendering or platform dependencies

pub mod bodies;
pub mod bricks;
pub mod collision;
pub mod powerup;
pub mod rect;
pub mod state;
pub mod tick;

pub use bodies::{Ball, Bullet, Paddle, PaddleDisplay, Particle, ScoreTier};
pub use bricks::{Brick, BrickGrid, GridLayout, brick_score};
pub use collision::{Face, resolve_ball_brick};
pub use powerup::{FallingPowerUp, PowerUpKind, PowerUpManager};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState, combo_multiplier};
pub use tick::{FrameTime, TickInput, tick};
