//! Power-up lifecycle: falling collectibles and timed effects
//!
//! `PowerUpManager` is the only owner of the active-effect set. Everything
//! else asks it questions (`is_active`, `display_kind`) rather than poking
//! at expiry times directly.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::dt_scale;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Slow,
    Fast,
    Bullet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Slow, PowerUpKind::Fast, PowerUpKind::Bullet];

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Slow => "SLOW",
            PowerUpKind::Fast => "FAST",
            PowerUpKind::Bullet => "BULLET",
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A collectible drifting down toward the paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingPowerUp {
    /// Centre position
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

impl FallingPowerUp {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(POWERUP_SIZE))
    }
}

/// Falling collectibles plus the set of active timed effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpManager {
    pub falling: Vec<FallingPowerUp>,
    /// Effect -> absolute expiry time (ms)
    active: BTreeMap<PowerUpKind, u64>,
    pub drop_chance: f64,
    /// Downward travel per reference frame
    pub fall_speed: f32,
    /// Effect length granted on collection (ms)
    pub duration_ms: u64,
}

impl Default for PowerUpManager {
    fn default() -> Self {
        Self::new(POWERUP_DROP_CHANCE, POWERUP_SPEED, POWERUP_DURATION_MS)
    }
}

impl PowerUpManager {
    pub fn new(drop_chance: f64, fall_speed: f32, duration_ms: u64) -> Self {
        Self {
            falling: Vec::new(),
            active: BTreeMap::new(),
            drop_chance,
            fall_speed,
            duration_ms,
        }
    }

    /// Roll the drop chance and, on success, release a random collectible
    pub fn maybe_spawn(&mut self, pos: Vec2, rng: &mut impl Rng) -> Option<PowerUpKind> {
        if rng.random::<f64>() < self.drop_chance {
            Some(self.spawn(pos, None, rng))
        } else {
            None
        }
    }

    /// Release a collectible, random type unless `kind` forces one
    pub fn spawn(
        &mut self,
        pos: Vec2,
        kind: Option<PowerUpKind>,
        rng: &mut impl Rng,
    ) -> PowerUpKind {
        let kind = kind.unwrap_or_else(|| PowerUpKind::random(rng));
        self.falling.push(FallingPowerUp { pos, kind });
        kind
    }

    /// Move collectibles down and drop the ones that left the playfield
    pub fn advance(&mut self, dt_ms: f32) {
        let step = self.fall_speed * dt_scale(dt_ms);
        for p in &mut self.falling {
            p.pos.y += step;
        }
        self.falling.retain(|p| p.rect().top() <= SCREEN_HEIGHT);
    }

    /// Start (or restart) an effect lasting `duration_ms` from `now_ms`
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: u64, duration_ms: u64) {
        self.active.insert(kind, now_ms.saturating_add(duration_ms));
    }

    /// Remove effects whose expiry has passed; returns the ones that just ended
    pub fn update(&mut self, now_ms: u64) -> Vec<PowerUpKind> {
        let expired: Vec<PowerUpKind> = self
            .active
            .iter()
            .filter(|&(_, &end)| now_ms >= end)
            .map(|(&kind, _)| kind)
            .collect();
        for kind in &expired {
            self.active.remove(kind);
        }
        expired
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Effect to show: Bullet beats Slow beats Fast
    pub fn display_kind(&self) -> Option<PowerUpKind> {
        [PowerUpKind::Bullet, PowerUpKind::Slow, PowerUpKind::Fast]
            .into_iter()
            .find(|&kind| self.is_active(kind))
    }

    /// Expiry time of an active effect
    pub fn expires_at(&self, kind: PowerUpKind) -> Option<u64> {
        self.active.get(&kind).copied()
    }

    /// Collect the first collectible touching the paddle, at most one per call
    ///
    /// The collected type is activated for the configured duration.
    pub fn collect(&mut self, paddle_rect: &Rect, now_ms: u64) -> Option<(PowerUpKind, u64)> {
        let idx = self
            .falling
            .iter()
            .position(|p| p.rect().intersects(paddle_rect))?;
        let kind = self.falling.remove(idx).kind;
        self.activate(kind, now_ms, self.duration_ms);
        Some((kind, self.duration_ms))
    }

    /// Drop all collectibles and effects
    pub fn clear(&mut self) {
        self.falling.clear();
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bodies::Paddle;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(2024)
    }

    #[test]
    fn test_spawn_rate_close_to_twenty_percent() {
        let mut manager = PowerUpManager::default();
        let mut rng = rng();
        let trials = 100_000;
        let mut spawned = 0;
        for _ in 0..trials {
            if manager.maybe_spawn(Vec2::new(100.0, 100.0), &mut rng).is_some() {
                spawned += 1;
            }
        }
        let rate = spawned as f64 / trials as f64;
        assert!((rate - 0.20).abs() < 0.01, "rate was {rate}");
        assert_eq!(manager.falling.len(), spawned);
    }

    #[test]
    fn test_random_types_cover_all_kinds() {
        let mut manager = PowerUpManager::default();
        let mut rng = rng();
        for _ in 0..300 {
            manager.spawn(Vec2::ZERO, None, &mut rng);
        }
        for kind in PowerUpKind::ALL {
            assert!(manager.falling.iter().any(|p| p.kind == kind));
        }
    }

    #[test]
    fn test_forced_type() {
        let mut manager = PowerUpManager::default();
        let kind = manager.spawn(Vec2::ZERO, Some(PowerUpKind::Bullet), &mut rng());
        assert_eq!(kind, PowerUpKind::Bullet);
        assert_eq!(manager.falling[0].kind, PowerUpKind::Bullet);
    }

    #[test]
    fn test_falling_removed_below_screen() {
        let mut manager = PowerUpManager::default();
        manager.spawn(Vec2::new(100.0, SCREEN_HEIGHT + 16.5), None, &mut rng());
        manager.advance(FRAME_MS);
        assert_eq!(manager.falling.len(), 1);
        manager.advance(FRAME_MS);
        assert!(manager.falling.is_empty());
    }

    #[test]
    fn test_activation_and_expiry() {
        let mut manager = PowerUpManager::default();
        manager.activate(PowerUpKind::Slow, 1000, 8000);
        assert!(manager.is_active(PowerUpKind::Slow));
        assert_eq!(manager.expires_at(PowerUpKind::Slow), Some(9000));

        assert!(manager.update(8999).is_empty());
        assert_eq!(manager.update(9000), vec![PowerUpKind::Slow]);
        assert!(!manager.is_active(PowerUpKind::Slow));
        assert!(manager.update(20_000).is_empty());
    }

    #[test]
    fn test_reactivation_extends_expiry() {
        let mut manager = PowerUpManager::default();
        manager.activate(PowerUpKind::Fast, 0, 8000);
        manager.activate(PowerUpKind::Fast, 5000, 8000);
        assert!(manager.update(8000).is_empty());
        assert_eq!(manager.update(13_000), vec![PowerUpKind::Fast]);
    }

    #[test]
    fn test_huge_duration_saturates() {
        let mut manager = PowerUpManager::default();
        manager.activate(PowerUpKind::Slow, 5000, u64::MAX);
        assert_eq!(manager.expires_at(PowerUpKind::Slow), Some(u64::MAX));
        assert!(manager.update(u64::MAX - 1).is_empty());
        assert!(manager.is_active(PowerUpKind::Slow));
    }

    #[test]
    fn test_display_priority() {
        let mut manager = PowerUpManager::default();
        assert_eq!(manager.display_kind(), None);

        manager.activate(PowerUpKind::Fast, 0, 8000);
        assert_eq!(manager.display_kind(), Some(PowerUpKind::Fast));
        manager.activate(PowerUpKind::Slow, 0, 8000);
        assert_eq!(manager.display_kind(), Some(PowerUpKind::Slow));
        manager.activate(PowerUpKind::Bullet, 0, 4000);
        assert_eq!(manager.display_kind(), Some(PowerUpKind::Bullet));

        manager.update(4000);
        assert_eq!(manager.display_kind(), Some(PowerUpKind::Slow));
    }

    #[test]
    fn test_collect_one_per_call() {
        let paddle = Paddle::default();
        let mut manager = PowerUpManager::default();
        let mut rng = rng();
        manager.spawn(paddle.pos, Some(PowerUpKind::Slow), &mut rng);
        manager.spawn(paddle.pos, Some(PowerUpKind::Bullet), &mut rng);

        let collected = manager.collect(&paddle.rect(), 500);
        assert_eq!(collected, Some((PowerUpKind::Slow, POWERUP_DURATION_MS)));
        assert_eq!(manager.falling.len(), 1);
        assert_eq!(manager.expires_at(PowerUpKind::Slow), Some(500 + POWERUP_DURATION_MS));
        assert!(!manager.is_active(PowerUpKind::Bullet));
    }

    #[test]
    fn test_collect_misses_far_collectible() {
        let paddle = Paddle::default();
        let mut manager = PowerUpManager::default();
        manager.spawn(Vec2::new(paddle.pos.x, 100.0), None, &mut rng());
        assert_eq!(manager.collect(&paddle.rect(), 0), None);
        assert_eq!(manager.falling.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut manager = PowerUpManager::default();
        manager.spawn(Vec2::ZERO, None, &mut rng());
        manager.activate(PowerUpKind::Bullet, 0, 100);
        manager.clear();
        assert!(manager.falling.is_empty());
        assert_eq!(manager.display_kind(), None);
    }
}
