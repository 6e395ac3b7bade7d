//! Renderer-facing interface
//!
//! The simulation never touches pixels. A host implements `DrawSurface` and
//! receives one call per visible sprite, in back-to-front order.

use serde::Serialize;

use crate::consts::*;
use crate::sim::{GamePhase, GameState, PaddleDisplay, PowerUpKind, Rect, ScoreTier};

/// Paddle skin variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PaddleSprite {
    Slow,
    Fast,
    Bullet,
    Score500,
    Score250,
    Score100,
    Default,
}

impl From<PaddleDisplay> for PaddleSprite {
    fn from(display: PaddleDisplay) -> Self {
        match display {
            PaddleDisplay::PowerUp(PowerUpKind::Slow) => PaddleSprite::Slow,
            PaddleDisplay::PowerUp(PowerUpKind::Fast) => PaddleSprite::Fast,
            PaddleDisplay::PowerUp(PowerUpKind::Bullet) => PaddleSprite::Bullet,
            PaddleDisplay::Score(ScoreTier::FiveHundred) => PaddleSprite::Score500,
            PaddleDisplay::Score(ScoreTier::TwoFifty) => PaddleSprite::Score250,
            PaddleDisplay::Score(ScoreTier::Hundred) => PaddleSprite::Score100,
            PaddleDisplay::Default => PaddleSprite::Default,
        }
    }
}

/// Handle for an image the host loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpriteKey {
    /// Brick of type 0-9, cracked after its first hit
    Brick { kind: u8, cracked: bool },
    /// Debris matching a brick type
    Particle(u8),
    Paddle(PaddleSprite),
    Ball,
    /// One per remaining life
    Heart,
    /// Falling power-up
    Star,
    Bullet,
}

/// Sink for draw calls
pub trait DrawSurface {
    /// Draw `sprite` stretched over `rect` at the given opacity (0.0 - 1.0)
    fn draw(&mut self, sprite: SpriteKey, rect: Rect, alpha: f32);
}

/// Numbers for the overlay text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub combo: u32,
    /// 1-based
    pub level: usize,
    pub level_count: usize,
    pub phase: GamePhase,
    /// Label of the displayed power-up, if any
    pub powerup: Option<&'static str>,
}

const HEART_SIZE: f32 = 40.0;
const HEART_SPACING: f32 = 50.0;
const HEART_TOP: f32 = 20.0;

impl GameState {
    /// Emit every visible sprite, back to front
    pub fn draw(&self, surface: &mut impl DrawSurface) {
        for brick in self.bricks.iter() {
            let sprite = SpriteKey::Brick {
                kind: brick.kind,
                cracked: brick.is_cracked(),
            };
            surface.draw(sprite, brick.rect(), 1.0);
        }

        for particle in &self.particles {
            surface.draw(SpriteKey::Particle(particle.kind), particle.rect(), particle.alpha());
        }

        for pickup in &self.powerups.falling {
            surface.draw(SpriteKey::Star, pickup.rect(), 1.0);
        }

        for bullet in &self.bullets {
            surface.draw(SpriteKey::Bullet, bullet.rect(), 1.0);
        }

        let paddle_sprite = PaddleSprite::from(self.paddle.display());
        surface.draw(SpriteKey::Paddle(paddle_sprite), self.paddle.rect(), 1.0);
        surface.draw(SpriteKey::Ball, self.ball.rect(), 1.0);

        for i in 0..self.lives {
            let x = SCREEN_WIDTH - HEART_SPACING * (i + 1) as f32;
            let rect = Rect::new(x, HEART_TOP, HEART_SIZE, HEART_SIZE);
            surface.draw(SpriteKey::Heart, rect, 1.0);
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            combo: self.combo,
            level: self.level_number(),
            level_count: self.levels.len(),
            phase: self.phase,
            powerup: self.powerups.display_kind().map(|kind| kind.label()),
        }
    }
}
