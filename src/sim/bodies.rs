//! Moving bodies: ball, paddle, particles and bullets
//!
//! Each body owns its own motion. Positions are centres unless noted.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;
use super::rect::Rect;
use crate::consts::*;
use crate::{direction_from_vertical, dt_scale};

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Centre position
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub base_speed: f32,
    /// Active speed effect (1.0 = none)
    pub speed_multiplier: f32,
    /// False while resting on the paddle
    pub launched: bool,
}

impl Ball {
    /// Create a ball resting on the paddle
    ///
    /// The spawn velocity is cosmetic; `launch` picks a fresh one.
    pub fn new(paddle_rect: &Rect, base_speed: f32, rng: &mut impl Rng) -> Self {
        let angle = rng.random_range(-SPAWN_SPREAD_DEG..=SPAWN_SPREAD_DEG);
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: direction_from_vertical(angle) * base_speed,
            size: BALL_SIZE,
            base_speed,
            speed_multiplier: 1.0,
            launched: false,
        };
        ball.rest_on(paddle_rect);
        ball
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.size))
    }

    /// Target speed with the active multiplier applied
    pub fn speed(&self) -> f32 {
        self.base_speed * self.speed_multiplier
    }

    pub fn set_top(&mut self, top: f32) {
        self.pos.y = top + self.size / 2.0;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.pos.y = bottom - self.size / 2.0;
    }

    pub fn set_left(&mut self, left: f32) {
        self.pos.x = left + self.size / 2.0;
    }

    pub fn set_right(&mut self, right: f32) {
        self.pos.x = right - self.size / 2.0;
    }

    fn rest_on(&mut self, paddle_rect: &Rect) {
        self.pos.x = paddle_rect.center().x;
        self.set_bottom(paddle_rect.top() - BALL_REST_GAP);
    }

    /// Move the ball one tick and bounce it off the side and top walls
    ///
    /// The bottom edge is open; `is_out` reports when the ball has left.
    pub fn advance(&mut self, dt_ms: f32, paddle_rect: &Rect) {
        if !self.launched {
            self.rest_on(paddle_rect);
            return;
        }

        let speed = self.speed();
        if self.vel.length_squared() > 0.0 {
            self.vel = self.vel.normalize() * speed;
        }

        self.pos += self.vel * dt_scale(dt_ms);

        let half = self.size / 2.0;
        if self.pos.x - half <= 0.0 {
            self.set_left(0.0);
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + half >= SCREEN_WIDTH {
            self.set_right(SCREEN_WIDTH);
            self.vel.x = -self.vel.x.abs();
        }

        if self.pos.y - half <= 0.0 {
            self.set_top(0.0);
            self.vel.y = self.vel.y.abs();
        }
    }

    /// Leave the paddle at a random angle within ±45° of straight up
    pub fn launch(&mut self, rng: &mut impl Rng) {
        self.launched = true;
        let angle = rng.random_range(-LAUNCH_SPREAD_DEG..=LAUNCH_SPREAD_DEG);
        self.vel = direction_from_vertical(angle) * self.base_speed;
    }

    /// Bounce off the paddle, steering by where the ball struck it
    ///
    /// Only a downward-moving ball that overlaps the paddle bounces. Speed is
    /// preserved; the angle from vertical is `relative_hit * 60°`.
    pub fn collide_with_paddle(&mut self, paddle_rect: &Rect) -> bool {
        if !self.rect().intersects(paddle_rect) || self.vel.y <= 0.0 {
            return false;
        }

        let relative_hit = ((self.pos.x - paddle_rect.center().x) / paddle_rect.half_width())
            .clamp(-1.0, 1.0);
        let angle = relative_hit * PADDLE_MAX_BOUNCE_DEG;

        let speed = self.vel.length();
        self.vel = direction_from_vertical(angle) * speed;
        self.set_bottom(paddle_rect.top() - 1.0);
        true
    }

    /// True once the ball's top edge is below the playfield
    pub fn is_out(&self) -> bool {
        self.rect().top() > SCREEN_HEIGHT
    }

    /// Put the ball back on the paddle (after a lost life)
    pub fn reset(&mut self, paddle_rect: &Rect) {
        self.launched = false;
        self.rest_on(paddle_rect);
        self.speed_multiplier = 1.0;
    }

    pub fn set_slow(&mut self) {
        self.speed_multiplier = SLOW_MULTIPLIER;
    }

    pub fn set_fast(&mut self) {
        self.speed_multiplier = FAST_MULTIPLIER;
    }

    pub fn reset_speed(&mut self) {
        self.speed_multiplier = 1.0;
    }
}

/// Score popup tiers shown on the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTier {
    Hundred,
    TwoFifty,
    FiveHundred,
}

impl ScoreTier {
    /// Highest tier the points reach, if any
    pub fn from_points(points: u32) -> Option<Self> {
        match points {
            p if p >= 500 => Some(ScoreTier::FiveHundred),
            p if p >= 250 => Some(ScoreTier::TwoFifty),
            p if p >= 100 => Some(ScoreTier::Hundred),
            _ => None,
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            ScoreTier::Hundred => 100,
            ScoreTier::TwoFifty => 250,
            ScoreTier::FiveHundred => 500,
        }
    }
}

/// What the paddle currently shows, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleDisplay {
    PowerUp(PowerUpKind),
    Score(ScoreTier),
    Default,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Centre position
    pub pos: Vec2,
    pub size: Vec2,
    /// Maximum travel per reference frame
    pub speed: f32,
    /// Latest pointer x the paddle is chasing
    pub target_x: f32,
    pub score_display: Option<ScoreTier>,
    pub score_display_ms: f32,
    /// How long a popup lasts when `show_score` is called
    pub score_display_duration_ms: f32,
    pub active_powerup: Option<PowerUpKind>,
    pub powerup_ms: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self::new(PADDLE_SPEED, PADDLE_SCORE_DISPLAY_MS)
    }
}

impl Paddle {
    /// Centred paddle at the standard height
    pub fn new(speed: f32, score_display_duration_ms: f32) -> Self {
        Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0, PADDLE_Y),
            size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            speed,
            target_x: SCREEN_WIDTH / 2.0,
            score_display: None,
            score_display_ms: 0.0,
            score_display_duration_ms,
            active_powerup: None,
            powerup_ms: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Chase the pointer at capped speed and run the display timers down
    pub fn advance(&mut self, dt_ms: f32, pointer_x: Option<f32>) {
        if let Some(x) = pointer_x {
            self.target_x = x;
        }

        let max_step = self.speed * dt_scale(dt_ms);
        let dx = self.target_x - self.pos.x;
        if dx.abs() > max_step {
            self.pos.x += max_step.copysign(dx);
        } else {
            self.pos.x = self.target_x;
        }

        let half = self.size.x / 2.0;
        self.pos.x = self.pos.x.clamp(half, SCREEN_WIDTH - half);

        if self.score_display.is_some() {
            self.score_display_ms -= dt_ms;
            if self.score_display_ms <= 0.0 {
                self.score_display = None;
            }
        }

        if self.active_powerup.is_some() {
            self.powerup_ms -= dt_ms;
            if self.powerup_ms <= 0.0 {
                self.active_powerup = None;
            }
        }
    }

    /// Flash a score popup for the points just earned
    pub fn show_score(&mut self, points: u32) {
        self.score_display = ScoreTier::from_points(points);
        self.score_display_ms = self.score_display_duration_ms;
    }

    /// Show a collected power-up for `duration_ms`
    pub fn activate_powerup(&mut self, kind: PowerUpKind, duration_ms: f32) {
        self.active_powerup = Some(kind);
        self.powerup_ms = duration_ms;
    }

    /// Power-up beats score popup beats the plain paddle
    pub fn display(&self) -> PaddleDisplay {
        if let Some(kind) = self.active_powerup {
            PaddleDisplay::PowerUp(kind)
        } else if let Some(tier) = self.score_display {
            PaddleDisplay::Score(tier)
        } else {
            PaddleDisplay::Default
        }
    }
}

/// Debris thrown off a destroyed brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age_ms: f32,
    pub lifetime_ms: f32,
    /// Brick type the debris came from (selects the sprite)
    pub kind: u8,
}

impl Particle {
    /// A particle flying off in a random direction
    pub fn burst(center: Vec2, kind: u8, rng: &mut impl Rng) -> Self {
        let angle = rng.random_range(0.0..360.0f32).to_radians();
        let speed = rng.random_range(PARTICLE_SPEED_MIN..=PARTICLE_SPEED_MAX);
        Self {
            pos: center,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            age_ms: 0.0,
            lifetime_ms: PARTICLE_LIFETIME_MS,
            kind,
        }
    }

    /// Age, fall and drift. Returns false once the particle has expired.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        self.age_ms += dt_ms;
        if self.is_expired() {
            return false;
        }

        let scale = dt_scale(dt_ms);
        self.vel.y += PARTICLE_GRAVITY * scale;
        self.pos += self.vel * scale;
        true
    }

    pub fn is_expired(&self) -> bool {
        self.age_ms >= self.lifetime_ms
    }

    /// Opacity, fading linearly from 1 to 0 over the lifetime
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age_ms / self.lifetime_ms).clamp(0.0, 1.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(PARTICLE_SIZE))
    }
}

/// A projectile fired straight up from the paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Centre position
    pub pos: Vec2,
    /// Upward travel per reference frame
    pub speed: f32,
}

impl Bullet {
    /// Spawn a bullet just above the paddle centre
    pub fn from_paddle(paddle_rect: &Rect, speed: f32) -> Self {
        Self {
            pos: Vec2::new(
                paddle_rect.center().x,
                paddle_rect.top() - BULLET_SPAWN_OFFSET,
            ),
            speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.pos.y -= self.speed * dt_scale(dt_ms);
    }

    /// True once the bullet has cleared the top of the playfield
    pub fn is_off_screen(&self) -> bool {
        self.rect().bottom() < 0.0
    }
}
