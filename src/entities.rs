//! Entity data model — plain structs plus spawn constructors.  All
//! per-frame behavior lives in `world`; the predicates it uses live in
//! `physics`.

use crate::anim::{Animator, ClipId, ClipLibrary};
use crate::HEIGHT;

// ── Entity dimensions (world units) ──────────────────────────────────────────

pub const PLAYER_W: f32 = 40.0;
pub const PLAYER_H: f32 = 60.0;
pub const ENEMY_W: f32 = 40.0;
pub const ENEMY_H: f32 = 40.0;
pub const BOMB_W: f32 = 30.0;
pub const BOMB_H: f32 = 30.0;

/// Blast radius of a bomb, measured centre to centre.
pub const BOMB_RADIUS: f32 = 200.0;

// ── Clip delays (seconds per frame) ──────────────────────────────────────────

pub const PLAYER_JUMP_DELAY: f32 = 0.15;
pub const PLAYER_LANDING_DELAY: f32 = 0.01;
pub const ENEMY_JUMP_DELAY: f32 = 0.1;
pub const ENEMY_LANDING_DELAY: f32 = 0.01;
pub const DIE_DELAY: f32 = 0.05;
pub const BOMB_FIRE_DELAY: f32 = 0.3;
pub const BOMB_BOOM_DELAY: f32 = 0.15;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle; `y` is the top edge, y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Left/top edges inclusive, right/bottom exclusive.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x < self.right() && y >= self.top() && y < self.bottom()
    }
}

// ── Common sprite core ───────────────────────────────────────────────────────

/// State every on-screen entity shares.  `start_pos` is the reference
/// position captured at spawn and `camera_delta` the camera offset at that
/// instant; together they let the camera place the entity every frame
/// without recomputing absolute positions (see `camera::Camera::apply`).
#[derive(Clone, Debug)]
pub struct Sprite {
    pub start_pos: (f32, f32),
    pub camera_delta: f32,
    pub flipped: bool,
    pub anim: Animator,
    /// Screen-space rectangle, refreshed by the camera each frame.
    pub screen: Rect,
    /// Removal mark; entities with `dead` set are dropped at the end of
    /// the frame that set it.
    pub dead: bool,
}

impl Sprite {
    /// `bottom_left` in the spawn-time screen space, like every
    /// constructor below.
    fn new(bottom_left: (f32, f32), w: f32, h: f32, camera_delta: f32, shown: ClipId) -> Self {
        let top = bottom_left.1 - h;
        Sprite {
            start_pos: (bottom_left.0, top),
            camera_delta,
            flipped: false,
            anim: Animator::new(shown),
            screen: Rect::new(bottom_left.0, top, w, h),
            dead: false,
        }
    }

    /// Whether any part of the entity is inside the visible screen span.
    /// Gates landing/death sounds and the player's landing clip.
    pub fn on_map(&self) -> bool {
        self.screen.right() > 0.0 && self.screen.right() < crate::WIDTH + self.screen.w
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub spr: Sprite,
    /// World position of the bottom-left corner; `pos.0` grows without
    /// bound as the run progresses.
    pub pos: (f32, f32),
    /// Landing/push reference: `move_pos.0` is the push origin, `move_pos.1`
    /// the y both jump arcs are computed from.
    pub move_pos: (f32, f32),

    pub jump_phase: f32,
    pub jump_speed: f32,
    pub airborne: bool,

    pub push_phase: f32,
    pub push_speed: f32,
    pub push_dist: f32,
    pub push_acc: f32,
    pub in_push: bool,

    /// Death requested; the entity stays in the world until its die clip
    /// completes, then `spr.dead` is set.
    pub dying: bool,

    /// Platforms crossed this round.
    pub level: u32,
    pub last_crossed: Option<PlatformId>,
}

impl Player {
    pub fn new(
        bottom_left: (f32, f32),
        jump_speed: f32,
        clips: &ClipLibrary,
        camera_delta: f32,
    ) -> Self {
        let mut spr = Sprite::new(bottom_left, PLAYER_W, PLAYER_H, camera_delta, ClipId::Jump);
        spr.anim
            .force_start(ClipId::Jump, clips.frames(ClipId::Jump), PLAYER_JUMP_DELAY);
        let push_speed = 500.0;
        let push_dist = 80.0;
        Player {
            spr,
            pos: bottom_left,
            move_pos: bottom_left,
            jump_phase: 0.0,
            jump_speed,
            airborne: true,
            push_phase: 0.0,
            push_speed,
            push_dist,
            push_acc: crate::physics::push_acc(push_speed, push_dist),
            in_push: false,
            dying: false,
            level: 0,
            last_crossed: None,
        }
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub spr: Sprite,
    /// Kinematic position of the bottom-left corner in the entity's
    /// spawn-time screen space; `pos.0` is re-synced into `start_pos`
    /// every frame so camera math stays consistent while the enemy drifts.
    pub pos: (f32, f32),
    pub move_pos_y: f32,

    pub jump_phase: f32,
    pub jump_speed: f32,
    pub airborne: bool,

    pub dying: bool,
}

impl Enemy {
    pub fn new(bottom_left: (f32, f32), jump_speed: f32, flipped: bool, camera_delta: f32) -> Self {
        let mut spr = Sprite::new(bottom_left, ENEMY_W, ENEMY_H, camera_delta, ClipId::Jump);
        spr.flipped = flipped;
        Enemy {
            spr,
            pos: bottom_left,
            move_pos_y: bottom_left.1,
            jump_phase: 0.0,
            jump_speed,
            airborne: true,
            dying: false,
        }
    }
}

// ── Platform ─────────────────────────────────────────────────────────────────

pub type PlatformId = u64;

/// World-fixed rectangle the player and enemies land on.  Never moves,
/// never animates.
#[derive(Clone, Debug)]
pub struct Platform {
    pub spr: Sprite,
    pub id: PlatformId,
    pub height: f32,
    pub length: f32,
}

impl Platform {
    pub fn new(id: PlatformId, x: f32, height: f32, length: f32, camera_delta: f32) -> Self {
        Platform {
            spr: Sprite::new((x, HEIGHT), length, height, camera_delta, ClipId::Jump),
            id,
            height,
            length,
        }
    }
}

// ── Bomb ─────────────────────────────────────────────────────────────────────

/// Proximity mine: idle until the player touches it, then telegraphs with
/// its fire clip, blasts everything within `radius` when the clip
/// completes, plays boom, and is removed.
#[derive(Clone, Debug)]
pub struct Bomb {
    pub spr: Sprite,
    pub radius: f32,
}

impl Bomb {
    pub fn new(bottom_left: (f32, f32), camera_delta: f32) -> Self {
        Bomb {
            spr: Sprite::new(bottom_left, BOMB_W, BOMB_H, camera_delta, ClipId::Fire),
            radius: BOMB_RADIUS,
        }
    }
}

// ── Background layers ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Sky,
    Back,
    Middle,
    Fore,
    Grass,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Sky,
        Layer::Back,
        Layer::Middle,
        Layer::Fore,
        Layer::Grass,
    ];

    /// Scroll factor relative to the platform plane: background layers lag
    /// behind (< 1), the grass overlay leads (> 1).
    pub fn parallax(self) -> f32 {
        match self {
            Layer::Sky => 0.1,
            Layer::Back => 0.3,
            Layer::Middle => 0.5,
            Layer::Fore => 0.8,
            Layer::Grass => 1.5,
        }
    }
}

/// One screen-wide tile of a parallax layer.
#[derive(Clone, Debug)]
pub struct Background {
    pub spr: Sprite,
    pub layer: Layer,
}

impl Background {
    pub fn new(layer: Layer, x: f32, camera_delta: f32) -> Self {
        Background {
            spr: Sprite::new((x, HEIGHT), crate::WIDTH, HEIGHT, camera_delta, ClipId::Jump),
            layer,
        }
    }
}
