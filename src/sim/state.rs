//! Game state and session bookkeeping
//!
//! Everything the tick mutates lives here: bodies, bricks, power-ups, score,
//! lives, combo and the top-level phase.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bodies::{Ball, Bullet, Paddle, Particle};
use super::bricks::{BrickGrid, GridLayout};
use super::powerup::{PowerUpKind, PowerUpManager};
use crate::levels::LevelSet;
use crate::tuning::Tuning;

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start input
    Menu,
    /// Active gameplay (ball may still be resting on the paddle)
    Playing,
    /// Game is paused
    Paused,
    /// Out of lives
    GameOver,
    /// Every brick of the current level is gone
    LevelComplete,
    /// Final level cleared
    Win,
}

/// Something that happened during a tick, for audio and UI hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PaddleHit,
    BrickCracked,
    BrickDestroyed { points: u32, combo: u32 },
    LifeLost,
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    BulletFired,
    LevelComplete,
    GameOver,
    Win,
}

/// Score multiplier for the given combo: 1x, 2x from combo 5, 3x from 10...
#[inline]
pub fn combo_multiplier(combo: u32) -> u32 {
    1 + combo / 5
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub levels: LevelSet,
    pub layout: GridLayout,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Brick kills since the last paddle bounce or lost life
    pub combo: u32,
    /// Current level (0-based)
    pub level_index: usize,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: BrickGrid,
    pub particles: Vec<Particle>,
    pub bullets: Vec<Bullet>,
    pub powerups: PowerUpManager,
    /// When the last bullet left the paddle (ms)
    pub last_bullet_ms: Option<u64>,
    /// Most recent tick timestamp (ms)
    pub time_ms: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// New session on the menu with stock tuning and levels
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), LevelSet::builtin())
    }

    /// New session on the menu with custom tuning and levels
    pub fn with_config(seed: u64, tuning: Tuning, levels: LevelSet) -> Self {
        let levels = if levels.is_empty() {
            log::warn!("Empty level set, using stock levels");
            LevelSet::builtin()
        } else {
            levels
        };

        let mut rng = Pcg32::seed_from_u64(seed);
        let paddle = Paddle::new(tuning.paddle_speed, tuning.score_display_ms);
        let ball = Ball::new(&paddle.rect(), tuning.ball_speed, &mut rng);
        let powerups = PowerUpManager::new(
            tuning.drop_chance,
            tuning.powerup_fall_speed,
            tuning.powerup_duration_ms,
        );

        let mut state = Self {
            seed,
            rng,
            lives: tuning.initial_lives,
            tuning,
            levels,
            layout: GridLayout::default(),
            phase: GamePhase::Menu,
            score: 0,
            combo: 0,
            level_index: 0,
            paddle,
            ball,
            bricks: BrickGrid::default(),
            particles: Vec::new(),
            bullets: Vec::new(),
            powerups,
            last_bullet_ms: None,
            time_ms: 0,
            events: Vec::new(),
        };
        state.setup_level();
        state
    }

    /// Reset score, lives and combo and start the first level
    pub fn new_game(&mut self) {
        self.score = 0;
        self.lives = self.tuning.initial_lives;
        self.combo = 0;
        self.level_index = 0;
        self.powerups.clear();
        self.setup_level();
        self.phase = GamePhase::Playing;
        log::info!("New game (seed {})", self.seed);
    }

    /// Rebuild paddle, ball and bricks for the current level
    pub fn setup_level(&mut self) {
        self.particles.clear();
        self.bullets.clear();
        self.powerups.clear();
        self.last_bullet_ms = None;

        self.paddle = Paddle::new(self.tuning.paddle_speed, self.tuning.score_display_ms);
        self.ball = Ball::new(&self.paddle.rect(), self.tuning.ball_speed, &mut self.rng);

        self.bricks = match self.levels.get(self.level_index) {
            Some(pattern) => BrickGrid::from_pattern(pattern, &self.layout),
            None => BrickGrid::default(),
        };
        log::info!(
            "Level {} set up with {} bricks",
            self.level_number(),
            self.bricks.len()
        );
    }

    /// Move on after a cleared level. Returns false when there are no more.
    pub fn advance_level(&mut self) -> bool {
        self.level_index += 1;
        if self.level_index < self.levels.len() {
            self.setup_level();
            self.phase = GamePhase::Playing;
            true
        } else {
            self.level_index = self.levels.len().saturating_sub(1);
            self.phase = GamePhase::Win;
            self.push_event(GameEvent::Win);
            log::info!("All levels cleared! Final score: {}", self.score);
            false
        }
    }

    /// Current level, 1-based for display
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }

    pub fn is_final_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}
