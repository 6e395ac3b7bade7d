//! Per-frame simulation tick
//!
//! Applies phase-changing input, then runs one update pass while playing.
//! Given the same seed, inputs and frame times the result is identical.

use glam::Vec2;

use super::bodies::{Bullet, Particle};
use super::collision::resolve_ball_brick;
use super::powerup::PowerUpKind;
use super::state::{GameEvent, GamePhase, GameState, combo_multiplier};
use crate::consts::FRAME_MS;

/// Timing for one tick, supplied by the host loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous tick (ms)
    pub dt_ms: f32,
    /// Monotonic clock (ms)
    pub now_ms: u64,
}

impl FrameTime {
    pub fn new(dt_ms: f32, now_ms: u64) -> Self {
        Self { dt_ms, now_ms }
    }

    /// Frame `n` of a fixed 60 Hz clock
    pub fn at_frame(n: u64) -> Self {
        Self {
            dt_ms: FRAME_MS,
            now_ms: (n as f64 * FRAME_MS as f64) as u64,
        }
    }
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x position the paddle chases
    pub pointer_x: Option<f32>,
    /// Start a game / launch the ball / continue
    pub launch: bool,
    /// Fire button held (only matters with the Bullet effect)
    pub fire_held: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start over after game over or win
    pub restart: bool,
    /// Continue to the next level after a clear
    pub advance: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, time: FrameTime) {
    state.time_ms = time.now_ms;

    match state.phase {
        GamePhase::Menu => {
            if input.launch || input.restart {
                state.new_game();
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            if input.launch && !state.ball.launched {
                state.ball.launch(&mut state.rng);
            }
        }
        GamePhase::Paused => {
            if input.pause || input.launch {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
            }
        }
        GamePhase::LevelComplete => {
            if input.advance || input.launch {
                state.advance_level();
            }
        }
        GamePhase::GameOver | GamePhase::Win => {
            if input.restart || input.launch {
                state.new_game();
            }
        }
    }

    if state.phase == GamePhase::Playing {
        update_playing(state, input, time);
    }
}

/// One update pass while playing
fn update_playing(state: &mut GameState, input: &TickInput, time: FrameTime) {
    let FrameTime { dt_ms, now_ms } = time;

    state.paddle.advance(dt_ms, input.pointer_x);
    let paddle_rect = state.paddle.rect();

    state.ball.advance(dt_ms, &paddle_rect);

    // Speed effects follow the displayed power-up and must be reapplied every tick
    let display = state.powerups.display_kind();
    match display {
        Some(PowerUpKind::Slow) => state.ball.speed_multiplier = state.tuning.slow_multiplier,
        Some(PowerUpKind::Fast) => state.ball.speed_multiplier = state.tuning.fast_multiplier,
        _ => state.ball.reset_speed(),
    }
    state.paddle.active_powerup = display;

    if state.ball.collide_with_paddle(&paddle_rect) {
        state.combo = 0;
        state.push_event(GameEvent::PaddleHit);
    }

    // Only the first overlapping brick is handled per tick
    if let Some(idx) = state.bricks.first_overlapping(&state.ball.rect()) {
        let destroyed = match state.bricks.get_mut(idx) {
            Some(brick) => {
                resolve_ball_brick(&mut state.ball, &brick.rect());
                brick.hit()
            }
            None => false,
        };
        if destroyed {
            destroy_brick(state, idx, true);
        } else {
            state.push_event(GameEvent::BrickCracked);
        }
    }

    if state.ball.is_out() {
        state.lives = state.lives.saturating_sub(1);
        state.combo = 0;
        state.push_event(GameEvent::LifeLost);
        if state.lives == 0 {
            state.phase = GamePhase::GameOver;
            state.push_event(GameEvent::GameOver);
            log::info!("Game over! Final score: {}", state.score);
            return;
        }
        state.ball.reset(&paddle_rect);
    }

    state.powerups.advance(dt_ms);
    for kind in state.powerups.update(now_ms) {
        log::debug!("Power-up expired: {:?}", kind);
        state.push_event(GameEvent::PowerUpExpired(kind));
    }

    if let Some((kind, duration_ms)) = state.powerups.collect(&paddle_rect, now_ms) {
        log::debug!("Power-up collected: {:?} for {} ms", kind, duration_ms);
        state.paddle.activate_powerup(kind, duration_ms as f32);
        state.push_event(GameEvent::PowerUpCollected(kind));
    }

    state.particles.retain_mut(|p| p.advance(dt_ms));

    let cooldown_elapsed = state
        .last_bullet_ms
        .is_none_or(|last| now_ms.saturating_sub(last) > state.tuning.bullet_cooldown_ms);
    if state.powerups.is_active(PowerUpKind::Bullet) && input.fire_held && cooldown_elapsed {
        state
            .bullets
            .push(Bullet::from_paddle(&paddle_rect, state.tuning.bullet_speed));
        state.last_bullet_ms = Some(now_ms);
        log::debug!("Bullet fired at {} ms", now_ms);
        state.push_event(GameEvent::BulletFired);
    }

    for bullet in &mut state.bullets {
        bullet.advance(dt_ms);
    }
    state.bullets.retain(|b| !b.is_off_screen());

    // Bullets destroy the first brick they touch outright
    let mut i = 0;
    while i < state.bullets.len() {
        let hit = state.bricks.first_overlapping(&state.bullets[i].rect());
        match hit {
            Some(idx) => {
                state.bullets.remove(i);
                destroy_brick(state, idx, false);
            }
            None => i += 1,
        }
    }

    if state.bricks.is_empty() {
        state.phase = GamePhase::LevelComplete;
        state.push_event(GameEvent::LevelComplete);
        log::info!("Level {} complete! Score: {}", state.level_number(), state.score);
    }
}

/// Score a destroyed brick, throw debris and maybe drop a power-up
///
/// The combo is bumped before the multiplier is read, so the fifth kill in
/// a row already scores double.
fn destroy_brick(state: &mut GameState, idx: usize, roll_drop: bool) {
    let brick = state.bricks.remove(idx);

    state.combo += 1;
    let points = brick.score() * combo_multiplier(state.combo);
    state.score += u64::from(points);
    state.paddle.show_score(points);

    let center: Vec2 = brick.rect().center();
    for _ in 0..state.tuning.particle_count {
        state
            .particles
            .push(Particle::burst(center, brick.kind, &mut state.rng));
    }

    if roll_drop {
        if let Some(kind) = state.powerups.maybe_spawn(center, &mut state.rng) {
            log::debug!("Power-up dropped: {:?}", kind);
        }
    }

    state.push_event(GameEvent::BrickDestroyed {
        points,
        combo: state.combo,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::levels::{LevelPattern, LevelSet};
    use crate::sim::Rect;
    use crate::tuning::Tuning;

    fn playing_state(rows: Vec<Vec<i32>>) -> GameState {
        let levels = LevelSet::new(vec![LevelPattern::new(rows)]);
        let mut state = GameState::with_config(42, Tuning::default(), levels);
        state.new_game();
        state
    }

    /// Park a launched ball just under brick `idx`, moving up into it
    fn aim_at_brick(state: &mut GameState, idx: usize) {
        let rect = state.bricks.get(idx).map(|b| b.rect()).expect("brick exists");
        state.ball.launched = true;
        state.ball.pos = Vec2::new(rect.center().x, rect.bottom() + 10.0);
        state.ball.vel = Vec2::new(0.0, -BALL_SPEED_INITIAL);
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &TickInput::default(), FrameTime::at_frame(1));
        assert_eq!(state.phase, GamePhase::Menu);

        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input, FrameTime::at_frame(2));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.ball.launched);

        tick(&mut state, &input, FrameTime::at_frame(3));
        assert!(state.ball.launched);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing_state(vec![vec![0]]);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FrameTime::at_frame(1));
        assert_eq!(state.phase, GamePhase::Paused);

        // Nothing moves while paused
        let paddle_x = state.paddle.pos.x;
        let chase = TickInput {
            pointer_x: Some(0.0),
            ..Default::default()
        };
        tick(&mut state, &chase, FrameTime::at_frame(2));
        assert_eq!(state.paddle.pos.x, paddle_x);

        tick(&mut state, &pause, FrameTime::at_frame(3));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_ball_hit_cracks_then_destroys() {
        let mut state = playing_state(vec![vec![0, -1, 0]]);
        aim_at_brick(&mut state, 0);
        tick(&mut state, &TickInput::default(), FrameTime::at_frame(1));
        assert_eq!(state.bricks.len(), 2);
        assert!(state.bricks.get(0).is_some_and(|b| b.is_cracked()));
        assert!(state.ball.vel.y > 0.0);
        assert!(state.events().contains(&GameEvent::BrickCracked));

        aim_at_brick(&mut state, 0);
        tick(&mut state, &TickInput::default(), FrameTime::at_frame(2));
        assert_eq!(state.bricks.len(), 1);
        assert_eq!(state.combo, 1);
        assert_eq!(state.score, 50);
        assert_eq!(state.particles.len(), PARTICLE_COUNT);
    }

    #[test]
    fn test_only_first_overlapping_brick_is_hit() {
        let mut state = playing_state(vec![vec![0, 0]]);
        let gap_x = state.bricks.get(0).map(|b| b.rect().right() + BRICK_PADDING / 2.0);
        state.ball.launched = true;
        state.ball.pos = Vec2::new(gap_x.expect("brick exists"), BRICK_TOP_OFFSET + 42.0);
        state.ball.vel = Vec2::new(0.0, -BALL_SPEED_INITIAL);

        // The ball overlaps both bricks after moving
        let moved = Rect::from_center(state.ball.pos - Vec2::new(0.0, 6.0), Vec2::splat(BALL_SIZE));
        assert!(state.bricks.iter().all(|b| b.rect().intersects(&moved)));

        tick(&mut state, &TickInput::default(), FrameTime::at_frame(1));

        let health: Vec<i32> = state.bricks.iter().map(|b| b.health).collect();
        assert_eq!(health, vec![1, 2]);
        let cracked = state
            .events()
            .iter()
            .filter(|e| **e == GameEvent::BrickCracked)
            .count();
        assert_eq!(cracked, 1);
    }

    #[test]
    fn test_collect_with_huge_duration() {
        let tuning = Tuning {
            powerup_duration_ms: u64::MAX,
            ..Tuning::default()
        };
        let levels = LevelSet::new(vec![LevelPattern::new(vec![vec![0]])]);
        let mut state = GameState::with_config(9, tuning, levels);
        state.new_game();
        let mut rng = state.rng.clone();
        let pos = state.paddle.pos - Vec2::new(0.0, 30.0);
        state.powerups.spawn(pos, Some(PowerUpKind::Slow), &mut rng);

        tick(&mut state, &TickInput::default(), FrameTime::new(FRAME_MS, 100));
        assert_eq!(state.powerups.expires_at(PowerUpKind::Slow), Some(u64::MAX));

        tick(&mut state, &TickInput::default(), FrameTime::new(FRAME_MS, 10_000_000));
        assert!(state.powerups.is_active(PowerUpKind::Slow));
    }

    #[test]
    fn test_paddle_hit_resets_combo() {
        let mut state = playing_state(vec![vec![0]]);
        state.combo = 4;
        state.ball.launched = true;
        state.ball.pos = Vec2::new(state.paddle.pos.x, state.paddle.rect().top() - 10.0);
        state.ball.vel = Vec2::new(0.0, BALL_SPEED_INITIAL);
        tick(&mut state, &TickInput::default(), FrameTime::at_frame(1));
        assert_eq!(state.combo, 0);
        assert!(state.ball.vel.y < 0.0);
        assert!(state.events().contains(&GameEvent::PaddleHit));
    }

    #[test]
    fn test_slow_effect_applied_to_ball() {
        let mut state = playing_state(vec![vec![0]]);
        state.powerups.activate(PowerUpKind::Slow, 0, 8000);
        state.ball.launched = true;
        state.ball.pos = Vec2::new(500.0, 400.0);
        state.ball.vel = Vec2::new(0.0, -BALL_SPEED_INITIAL);

        tick(&mut state, &TickInput::default(), FrameTime::at_frame(1));
        assert_eq!(state.ball.speed_multiplier, SLOW_MULTIPLIER);
        tick(&mut state, &TickInput::default(), FrameTime::at_frame(2));
        assert!((state.ball.vel.length() - BALL_SPEED_INITIAL * SLOW_MULTIPLIER).abs() < 1e-4);
        assert_eq!(state.paddle.active_powerup, Some(PowerUpKind::Slow));
    }

    #[test]
    fn test_bullet_cooldown() {
        let mut state = playing_state(vec![vec![0]]);
        state.powerups.activate(PowerUpKind::Bullet, 0, 8000);
        let fire = TickInput {
            fire_held: true,
            ..Default::default()
        };

        tick(&mut state, &fire, FrameTime::new(FRAME_MS, 1000));
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &fire, FrameTime::new(FRAME_MS, 1200));
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &fire, FrameTime::new(FRAME_MS, 1300));
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &fire, FrameTime::new(FRAME_MS, 1301));
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_no_bullets_without_effect() {
        let mut state = playing_state(vec![vec![0]]);
        let fire = TickInput {
            fire_held: true,
            ..Default::default()
        };
        tick(&mut state, &fire, FrameTime::at_frame(1));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_destroys_brick_without_drop() {
        let tuning = Tuning {
            drop_chance: 1.0,
            ..Tuning::default()
        };
        let levels = LevelSet::new(vec![LevelPattern::new(vec![vec![2, 2]])]);
        let mut state = GameState::with_config(5, tuning, levels);
        state.new_game();

        let rect = state.bricks.get(0).map(|b| b.rect()).expect("brick exists");
        state.bullets.push(Bullet {
            pos: Vec2::new(rect.center().x, rect.bottom() + 25.0),
            speed: BULLET_SPEED,
        });
        tick(&mut state, &TickInput::default(), FrameTime::at_frame(1));

        assert_eq!(state.bricks.len(), 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 100);
        assert_eq!(state.combo, 1);
        assert!(state.powerups.falling.is_empty());
    }

    #[test]
    fn test_ball_kill_rolls_drop() {
        let tuning = Tuning {
            drop_chance: 1.0,
            ..Tuning::default()
        };
        let levels = LevelSet::new(vec![LevelPattern::new(vec![vec![0, -1, 0]])]);
        let mut state = GameState::with_config(5, tuning, levels);
        state.new_game();
        if let Some(brick) = state.bricks.get_mut(0) {
            brick.health = 1;
        }
        aim_at_brick(&mut state, 0);
        tick(&mut state, &TickInput::default(), FrameTime::at_frame(1));
        assert_eq!(state.powerups.falling.len(), 1);
    }

    #[test]
    fn test_collect_powerup() {
        let mut state = playing_state(vec![vec![0]]);
        let mut rng = state.rng.clone();
        let pos = state.paddle.pos - Vec2::new(0.0, 30.0);
        state.powerups.spawn(pos, Some(PowerUpKind::Fast), &mut rng);

        tick(&mut state, &TickInput::default(), FrameTime::new(FRAME_MS, 100));
        assert!(state.powerups.falling.is_empty());
        assert!(state.powerups.is_active(PowerUpKind::Fast));
        assert_eq!(state.paddle.active_powerup, Some(PowerUpKind::Fast));
        assert!(
            state
                .events()
                .contains(&GameEvent::PowerUpCollected(PowerUpKind::Fast))
        );
    }

    #[test]
    fn test_powerup_expiry_event() {
        let mut state = playing_state(vec![vec![0]]);
        state.powerups.activate(PowerUpKind::Fast, 0, 8000);
        tick(&mut state, &TickInput::default(), FrameTime::new(FRAME_MS, 8000));
        assert!(!state.powerups.is_active(PowerUpKind::Fast));
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PowerUpExpired(PowerUpKind::Fast))
        );
    }

    #[test]
    fn test_level_complete_then_win() {
        let mut state = playing_state(vec![vec![0]]);
        if let Some(brick) = state.bricks.get_mut(0) {
            brick.health = 1;
        }
        aim_at_brick(&mut state, 0);
        tick(&mut state, &TickInput::default(), FrameTime::at_frame(1));
        assert_eq!(state.phase, GamePhase::LevelComplete);

        let advance = TickInput {
            advance: true,
            ..Default::default()
        };
        tick(&mut state, &advance, FrameTime::at_frame(2));
        assert_eq!(state.phase, GamePhase::Win);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, FrameTime::at_frame(3));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let mut inputs = vec![
            TickInput {
                launch: true,
                ..Default::default()
            },
            TickInput {
                launch: true,
                pointer_x: Some(300.0),
                ..Default::default()
            },
        ];
        for i in 0..600 {
            inputs.push(TickInput {
                pointer_x: Some(200.0 + (i % 300) as f32 * 2.0),
                ..Default::default()
            });
        }

        for (frame, input) in inputs.iter().enumerate() {
            let time = FrameTime::at_frame(frame as u64);
            tick(&mut state1, input, time);
            tick(&mut state2, input, time);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.bricks.len(), state2.bricks.len());
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.paddle.pos, state2.paddle.pos);
    }
}
