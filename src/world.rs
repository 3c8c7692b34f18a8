//! Entity registry and the per-frame update pipeline.
//!
//! The world owns every live entity, partitioned by role.  `step` advances
//! one frame in a fixed stage order the rest of the crate relies on:
//!
//! 1. generator spawn-check (new entities snapshot the current camera
//!    offset);
//! 2. camera transform for every non-target entity;
//! 3. player physics and stomp checks, ending with `camera.set_position`
//!    so later stages see a fresh player rect;
//! 4. enemy physics, homing and stomp checks;
//! 5. bomb trigger/blast resolution;
//! 6. off-screen culling;
//! 7. animation: death clips start the same frame their entity died, all
//!    animators advance, entities whose terminal clip completed are
//!    dropped.
//!
//! Everything is synchronous and single-threaded; one call per rendered
//! frame with a shared delta-time.

use log::debug;
use rand::Rng;

use crate::anim::{Assets, ClipId};
use crate::audio::SoundEvent;
use crate::camera::Camera;
use crate::entities::{
    Background, Bomb, Enemy, Layer, Platform, PlatformId, Player, Rect, DIE_DELAY,
    BOMB_BOOM_DELAY, BOMB_FIRE_DELAY, ENEMY_JUMP_DELAY, ENEMY_LANDING_DELAY, PLAYER_JUMP_DELAY,
    PLAYER_LANDING_DELAY,
};
use crate::error::GameError;
use crate::level::{self, GenConfig};
use crate::physics;
use crate::HEIGHT;

/// Screen x at which the camera stops letting the player advance and
/// starts scrolling the world instead.
pub const FOLLOW_LIMIT: f32 = 600.0;

/// Horizontal distance within which an enemy drifts toward the player.
const ENEMY_SIGHT: f32 = 300.0;

/// Fraction of the remaining distance an enemy closes per second.
const ENEMY_HOMING_RATE: f32 = 2.0;

/// Speed at which an enemy steps right off a neighbour crowding it from
/// the left.
const ENEMY_SEPARATION: f32 = 90.0;

// ── World ────────────────────────────────────────────────────────────────────

pub struct World {
    pub camera: Camera,
    pub player: Option<Player>,
    pub enemies: Vec<Enemy>,
    pub platforms: Vec<Platform>,
    pub bombs: Vec<Bomb>,
    pub tiles: Vec<Background>,
    /// Sound events raised this frame; cleared at the start of each step.
    pub sounds: Vec<SoundEvent>,
    pub assets: Assets,
    pub cfg: GenConfig,
    /// Most recently spawned platform; the generator's frontier.
    pub frontier: PlatformId,
    next_platform_id: PlatformId,
}

impl World {
    pub fn new(assets: Assets, cfg: GenConfig) -> Result<Self, GameError> {
        cfg.validate()?;
        let mut world = World {
            camera: Camera::new(FOLLOW_LIMIT),
            player: None,
            enemies: Vec::new(),
            platforms: Vec::new(),
            bombs: Vec::new(),
            tiles: Vec::new(),
            sounds: Vec::new(),
            assets,
            cfg,
            frontier: 0,
            next_platform_id: 0,
        };
        world.reset();
        Ok(world)
    }

    /// Wholesale reset to the start-of-round layout: one platform, the
    /// player above it, one background tile per layer, zeroed camera.
    pub fn reset(&mut self) {
        self.camera = Camera::new(FOLLOW_LIMIT);
        self.enemies.clear();
        self.platforms.clear();
        self.bombs.clear();
        self.tiles.clear();
        self.sounds.clear();
        self.next_platform_id = 0;

        self.spawn_platform(30.0, 100.0, 500.0);
        self.player = Some(Player::new(
            (50.0, 300.0),
            300.0,
            &self.assets.player,
            self.camera.offset,
        ));
        for layer in Layer::ALL {
            self.tiles.push(Background::new(layer, 0.0, self.camera.offset));
        }
    }

    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn spawn_platform(&mut self, x: f32, height: f32, length: f32) -> PlatformId {
        let id = self.next_platform_id;
        self.next_platform_id += 1;
        self.platforms
            .push(Platform::new(id, x, height, length, self.camera.offset));
        self.frontier = id;
        id
    }

    pub fn spawn_bomb(&mut self, bottom_left: (f32, f32)) {
        self.bombs.push(Bomb::new(bottom_left, self.camera.offset));
    }

    /// Advance the simulation by one frame.  `push` is the single logical
    /// input event; pause lives a level up in `game::Session`.
    pub fn step(&mut self, dt: f32, push: bool, rng: &mut impl Rng) {
        self.sounds.clear();

        // 1. extend the world ahead of the camera
        level::extend(self, rng);

        // 2. camera transform for everything the camera doesn't track
        for p in &mut self.platforms {
            self.camera.apply(&mut p.spr, 1.0);
        }
        for e in &mut self.enemies {
            self.camera.apply(&mut e.spr, 1.0);
        }
        for b in &mut self.bombs {
            self.camera.apply(&mut b.spr, 1.0);
        }
        for t in &mut self.tiles {
            self.camera.apply(&mut t.spr, t.layer.parallax());
        }

        // 3–5. physics and collision resolution
        if let Some(player) = self.player.as_mut() {
            update_player(
                player,
                &self.platforms,
                &mut self.enemies,
                &mut self.camera,
                &mut self.sounds,
                &self.assets,
                dt,
                push,
            );
        }
        update_enemies(
            &mut self.enemies,
            self.player.as_mut(),
            &self.platforms,
            &mut self.sounds,
            &self.assets,
            dt,
        );
        update_bombs(
            &mut self.bombs,
            &mut self.enemies,
            self.player.as_mut(),
            &mut self.sounds,
            &self.assets,
        );

        // 6. off-screen culling
        self.cull();

        // 7. animation stage — after kills, so death clips begin the frame
        // their entity died
        self.animate(dt);
    }

    fn cull(&mut self) {
        let behind = |r: &Rect| r.right() < 0.0;
        let below = |r: &Rect| r.top() > HEIGHT;

        self.platforms.retain(|p| !behind(&p.spr.screen));
        self.tiles.retain(|t| !behind(&t.spr.screen));
        self.bombs
            .retain(|b| !behind(&b.spr.screen) && !below(&b.spr.screen));
        self.enemies
            .retain(|e| !behind(&e.spr.screen) && !below(&e.spr.screen));

        // The player is never culled directly: falling out of the world
        // requests death, and removal waits for the die clip.
        if let Some(p) = self.player.as_mut() {
            if below(&p.spr.screen) {
                p.dying = true;
            }
        }
    }

    fn animate(&mut self, dt: f32) {
        if let Some(p) = self.player.as_mut() {
            if p.dying {
                start_death_clip(
                    &mut p.spr,
                    self.assets.player.frames(ClipId::Die),
                    true,
                    &mut self.sounds,
                    SoundEvent::PlayerDie,
                );
                if p.spr.anim.current_clip() == Some(ClipId::Die) && p.jump_speed != 0.0 {
                    p.jump_speed = 0.0;
                    p.jump_phase = 0.0;
                    p.move_pos.1 = p.pos.1;
                }
            }
            p.spr.anim.advance(dt);
            if p.dying && !p.spr.anim.is_playing() && p.spr.anim.last_done() == Some(ClipId::Die) {
                p.spr.dead = true;
            }
        }
        if self.player.as_ref().is_some_and(|p| p.spr.dead) {
            debug!("player removed after death clip");
            self.player = None;
        }

        for e in &mut self.enemies {
            if e.dying {
                let on_map = e.spr.on_map();
                start_death_clip(
                    &mut e.spr,
                    self.assets.enemy.frames(ClipId::Die),
                    on_map,
                    &mut self.sounds,
                    SoundEvent::EnemyDie,
                );
                if e.spr.anim.current_clip() == Some(ClipId::Die) && e.jump_speed != 0.0 {
                    e.jump_speed = 0.0;
                    e.jump_phase = 0.0;
                    e.move_pos_y = e.pos.1;
                }
            }
            e.spr.anim.advance(dt);
            if e.dying && !e.spr.anim.is_playing() && e.spr.anim.last_done() == Some(ClipId::Die) {
                e.spr.dead = true;
            }
        }
        self.enemies.retain(|e| !e.spr.dead);

        for b in &mut self.bombs {
            b.spr.anim.advance(dt);
        }
        self.bombs.retain(|b| !b.spr.dead);
    }
}

/// Start a die clip unless one is already playing or just completed.
/// `audible` gates the sound, not the clip.
fn start_death_clip(
    spr: &mut crate::entities::Sprite,
    frames: usize,
    audible: bool,
    sounds: &mut Vec<SoundEvent>,
    sound: SoundEvent,
) {
    if spr.anim.current_clip() != Some(ClipId::Die) && spr.anim.last_done() != Some(ClipId::Die) {
        spr.anim.force_start(ClipId::Die, frames, DIE_DELAY);
        if audible {
            sounds.push(sound);
        }
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn update_player(
    p: &mut Player,
    platforms: &[Platform],
    enemies: &mut [Enemy],
    camera: &mut Camera,
    sounds: &mut Vec<SoundEvent>,
    assets: &Assets,
    dt: f32,
    push: bool,
) {
    p.push_phase += dt;
    p.jump_phase += dt;

    if push && !p.dying {
        if p.spr.on_map() {
            sounds.push(SoundEvent::Push);
        }
        p.push_phase = 0.0;
        p.in_push = true;
        p.move_pos.0 = p.pos.0;
    }

    let platform = platforms
        .iter()
        .find(|pl| p.spr.screen.overlaps(&pl.spr.screen));

    // Push advances only in the open: platform contact freezes it until
    // the player clears the edge.
    if p.in_push && platform.is_none() {
        p.pos.0 = p.move_pos.0 + physics::push_offset(p.push_speed, p.push_acc, p.push_phase);
        if p.pos.0 - p.move_pos.0 >= p.push_dist - physics::PUSH_EPS {
            p.in_push = false;
        }
    }

    if let Some(pl) = platform {
        if physics::landing_contact(&p.spr.screen, p.pos.1, &pl.spr.screen) {
            p.airborne = false;
            p.jump_phase = 0.0;
            p.move_pos.1 = pl.spr.screen.top();
            if !p.spr.anim.is_playing() && p.spr.anim.last_done() != Some(ClipId::Landing) {
                if p.spr.on_map() {
                    p.spr.anim.try_start(
                        ClipId::Landing,
                        assets.player.frames(ClipId::Landing),
                        PLAYER_LANDING_DELAY,
                    );
                }
                sounds.push(SoundEvent::PlayerLanding);
                // the bounce chain: touching down immediately relaunches
                p.airborne = true;
            }
        } else {
            let nudge = physics::side_nudge(&p.spr.screen, &pl.spr.screen);
            p.pos.0 += nudge;
            if nudge < 0.0 {
                p.in_push = false;
            }
        }
    }

    if p.airborne {
        p.spr.anim.try_start(
            ClipId::Jump,
            assets.player.frames(ClipId::Jump),
            PLAYER_JUMP_DELAY,
        );
        p.pos.1 = p.move_pos.1 + physics::jump_offset(p.jump_speed, p.jump_phase);
    }

    // Stomp check: landing on an enemy's head kills it.
    if !p.dying {
        for e in enemies.iter_mut() {
            if !e.dying
                && p.spr.screen.overlaps(&e.spr.screen)
                && physics::stomped(&e.spr.screen, &p.spr.screen)
            {
                e.dying = true;
            }
        }
    }

    camera.set_position(p.pos, &mut p.spr.screen);

    // Count each platform whose column the player enters, once.
    for pl in platforms {
        let in_column = pl.spr.screen.left() < p.spr.screen.right()
            && p.spr.screen.left() < pl.spr.screen.right();
        if in_column && p.last_crossed != Some(pl.id) {
            p.level += 1;
            p.last_crossed = Some(pl.id);
        }
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

fn update_enemies(
    enemies: &mut Vec<Enemy>,
    mut player: Option<&mut Player>,
    platforms: &[Platform],
    sounds: &mut Vec<SoundEvent>,
    assets: &Assets,
    dt: f32,
) {
    // Rect snapshot for the pairwise separation pass.
    let rects: Vec<Rect> = enemies.iter().map(|e| e.spr.screen).collect();

    for (i, e) in enemies.iter_mut().enumerate() {
        e.jump_phase += dt;

        let platform = platforms
            .iter()
            .find(|pl| e.spr.screen.overlaps(&pl.spr.screen));
        if let Some(pl) = platform {
            if physics::landing_contact(&e.spr.screen, e.pos.1, &pl.spr.screen) {
                e.airborne = false;
                e.jump_phase = 0.0;
                e.move_pos_y = pl.spr.screen.top();
                if !e.spr.anim.is_playing() && e.spr.anim.last_done() != Some(ClipId::Landing) {
                    e.spr.anim.try_start(
                        ClipId::Landing,
                        assets.enemy.frames(ClipId::Landing),
                        ENEMY_LANDING_DELAY,
                    );
                    if e.spr.on_map() {
                        sounds.push(SoundEvent::EnemyLanding);
                    }
                    e.airborne = true;
                }
            }
        }

        if e.airborne {
            e.spr.anim.try_start(
                ClipId::Jump,
                assets.enemy.frames(ClipId::Jump),
                ENEMY_JUMP_DELAY,
            );
            e.pos.1 = e.move_pos_y + physics::jump_offset(e.jump_speed, e.jump_phase);
        }

        if let Some(pl) = player.as_deref_mut() {
            if !e.dying
                && !pl.dying
                && e.spr.screen.overlaps(&pl.spr.screen)
                && physics::stomped(&pl.spr.screen, &e.spr.screen)
            {
                pl.dying = true;
            }

            // Attenuated homing while the player is in sight.
            if !e.dying {
                let delta = pl.spr.screen.x - e.spr.screen.x;
                if delta.abs() < ENEMY_SIGHT {
                    e.pos.0 += delta * (ENEMY_HOMING_RATE * dt).min(1.0);
                }
            }
        }

        // Step right off a neighbour crowding from the left.
        if !e.dying {
            for (j, r) in rects.iter().enumerate() {
                if j != i && e.spr.screen.overlaps(r) && r.x < e.spr.screen.x {
                    e.pos.0 += ENEMY_SEPARATION * dt;
                    break;
                }
            }
        }

        // Keep the camera baseline in sync with the drift.
        e.spr.start_pos.0 = e.pos.0;
        e.spr.screen.set_bottom(e.pos.1);
    }
}

// ── Bombs ────────────────────────────────────────────────────────────────────

fn update_bombs(
    bombs: &mut [Bomb],
    enemies: &mut [Enemy],
    mut player: Option<&mut Player>,
    sounds: &mut Vec<SoundEvent>,
    assets: &Assets,
) {
    for b in bombs.iter_mut() {
        // Telegraph on first player contact.
        if let Some(pl) = player.as_deref() {
            if pl.spr.screen.overlaps(&b.spr.screen) {
                b.spr.anim.try_start(
                    ClipId::Fire,
                    assets.bomb.frames(ClipId::Fire),
                    BOMB_FIRE_DELAY,
                );
            }
        }

        // Blast once the telegraph completes — the delay is the dodge
        // window, not an oversight.
        if !b.spr.anim.is_playing() && b.spr.anim.last_done() == Some(ClipId::Fire) {
            if let Some(pl) = player.as_deref_mut() {
                if !pl.dying && physics::in_blast(&b.spr.screen, b.radius, &pl.spr.screen) {
                    pl.dying = true;
                }
            }
            for e in enemies.iter_mut() {
                if !e.dying && physics::in_blast(&b.spr.screen, b.radius, &e.spr.screen) {
                    e.dying = true;
                }
            }
            b.spr.anim.try_start(
                ClipId::Boom,
                assets.bomb.frames(ClipId::Boom),
                BOMB_BOOM_DELAY,
            );
            sounds.push(SoundEvent::Boom);
        }

        if !b.spr.anim.is_playing() && b.spr.anim.last_done() == Some(ClipId::Boom) {
            b.spr.dead = true;
        }
    }
}
