//! Procedural level generation.
//!
//! Exactly one frontier platform is tracked; once its right edge scrolls
//! within two screen widths of the camera's leading edge a new platform is
//! rolled, and enemies/bombs spawn inside the new platform's span.  Enemy
//! and bomb density therefore follows platform cadence — no explicit
//! difficulty tables.  Background layers tile ahead with the same
//! lookahead.  Every roll goes through the injected RNG, so a seeded run
//! reproduces the exact same world.

use std::ops::Range;

use log::debug;
use rand::Rng;

use crate::entities::{Background, Enemy, Layer, BOMB_W, ENEMY_H, ENEMY_W};
use crate::error::GameError;
use crate::world::World;
use crate::{HEIGHT, WIDTH};

/// Spawn-ahead horizon: two screen widths past the camera's leading edge.
pub const SPAWN_LEAD: f32 = 2.0 * WIDTH;

/// Horizontal overlap between consecutive background tiles, hiding the
/// seam while the layers scroll at fractional speeds.
const TILE_SEAM: f32 = 5.0;

// ── Generator configuration ──────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GenConfig {
    /// Gap between a platform's right edge and the next platform.
    pub gap: Range<f32>,
    pub height: Range<f32>,
    pub length: Range<f32>,
    /// Enemies rolled per new platform: uniform in `0..=max_enemies`.
    pub max_enemies: u32,
    pub enemy_jump_speed: Range<f32>,
    /// Probability a new platform carries a bomb.
    pub bomb_chance: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            gap: 150.0..300.0,
            height: 40.0..110.0,
            length: 150.0..500.0,
            max_enemies: 2,
            enemy_jump_speed: 200.0..350.0,
            bomb_chance: 0.2,
        }
    }
}

impl GenConfig {
    /// Reject configurations that would panic mid-round or produce
    /// degenerate platforms.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.gap.start >= self.gap.end {
            return Err(GameError::BadGeneratorRange("gap range is empty"));
        }
        if self.height.start >= self.height.end || self.height.start <= 0.0 {
            return Err(GameError::BadGeneratorRange(
                "platform height range must be non-empty and positive",
            ));
        }
        if self.length.start >= self.length.end || self.length.start <= 0.0 {
            return Err(GameError::BadGeneratorRange(
                "platform length range must be non-empty and positive",
            ));
        }
        if self.max_enemies > 0
            && self.enemy_jump_speed.start >= self.enemy_jump_speed.end
        {
            return Err(GameError::BadGeneratorRange("enemy jump-speed range is empty"));
        }
        if !(0.0..=1.0).contains(&self.bomb_chance) {
            return Err(GameError::BadGeneratorRange("bomb chance must be within 0..=1"));
        }
        Ok(())
    }
}

// ── Per-frame extension ──────────────────────────────────────────────────────

/// Extend the world ahead of the camera.  Runs before the camera transform
/// is applied so everything spawned this frame snapshots a consistent
/// offset.
pub fn extend(world: &mut World, rng: &mut impl Rng) {
    extend_platforms(world, rng);
    extend_tiles(world);
}

fn extend_platforms(world: &mut World, rng: &mut impl Rng) {
    let Some(frontier) = world.platform(world.frontier) else {
        return;
    };
    if frontier.spr.screen.right() >= SPAWN_LEAD {
        return;
    }

    let cfg = world.cfg.clone();
    let x = frontier.spr.screen.right() + rng.gen_range(cfg.gap);
    let height = rng.gen_range(cfg.height);
    let length = rng.gen_range(cfg.length);
    let id = world.spawn_platform(x, height, length);
    debug!("platform {id}: x={x:.0} height={height:.0} length={length:.0}");

    let top = HEIGHT - height;
    if length > ENEMY_W {
        for _ in 0..rng.gen_range(0..=cfg.max_enemies) {
            let ex = rng.gen_range(x..x + length - ENEMY_W);
            let jump_speed = rng.gen_range(cfg.enemy_jump_speed.clone());
            let flipped = rng.gen_bool(0.5);
            world.enemies.push(Enemy::new(
                (ex, top - ENEMY_H),
                jump_speed,
                flipped,
                world.camera.offset,
            ));
            debug!("enemy at x={ex:.0} jump_speed={jump_speed:.0}");
        }
    }

    if length > BOMB_W && rng.gen_bool(cfg.bomb_chance) {
        let bx = rng.gen_range(x..x + length - BOMB_W);
        world.spawn_bomb((bx, top));
        debug!("bomb at x={bx:.0}");
    }
}

fn extend_tiles(world: &mut World) {
    for layer in Layer::ALL {
        let right = world
            .tiles
            .iter()
            .filter(|t| t.layer == layer)
            .map(|t| t.spr.screen.right())
            .fold(f32::NEG_INFINITY, f32::max);
        if right.is_finite() && right < SPAWN_LEAD {
            let tile = Background::new(layer, right - TILE_SEAM, world.camera.offset);
            world.tiles.push(tile);
        }
    }
}
