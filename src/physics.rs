//! Pure kinematics and collision predicates.
//!
//! Every function here is a closed form over its arguments — trajectories
//! are recomputed from the phase timer each frame instead of integrated
//! incrementally, so they never accumulate drift.  All randomness and all
//! mutation stay in `world`.

use crate::entities::Rect;

/// Downward acceleration, world units per second squared.
pub const GRAVITY: f32 = 300.0;

/// An entity whose bottom is within this many units of a platform top
/// (while their rects overlap) counts as grounded.
pub const LANDING_TOLERANCE: f32 = 10.0;

/// A push ends once its displacement is within this of `push_dist`.
pub const PUSH_EPS: f32 = 1.0;

/// Horizontal nudge applied per frame while clipping a platform's side.
pub const SIDE_NUDGE: f32 = 2.0;

// ── Jump & push kinematics ───────────────────────────────────────────────────

/// Vertical offset from the landing reference `t` seconds after launch.
/// Negative is up; the arc peaks at `t = jump_speed / GRAVITY`.
pub fn jump_offset(jump_speed: f32, t: f32) -> f32 {
    -jump_speed * t + GRAVITY * t * t / 2.0
}

/// Deceleration that brings a push of initial speed `speed` to a stop
/// exactly `dist` units from its origin.
pub fn push_acc(speed: f32, dist: f32) -> f32 {
    -(speed * speed) / (2.0 * dist)
}

/// Horizontal displacement from the push origin `t` seconds after the
/// trigger.  Peaks at exactly `dist` when `t = 2·dist/speed`, then falls
/// off again; callers stop the push once it comes within [`PUSH_EPS`].
pub fn push_offset(speed: f32, acc: f32, t: f32) -> f32 {
    speed * t + acc * t * t / 2.0
}

// ── Landing & side collision ─────────────────────────────────────────────────

/// Grounded test against one platform: the rects must overlap, and either
/// the entity's bottom sits within [`LANDING_TOLERANCE`] of the platform
/// top (signed, so an entity still slightly above counts) or its
/// horizontal span lies strictly inside the platform's — the second arm
/// stops a fast faller from slipping through near the middle while the
/// tolerance misses.
pub fn landing_contact(entity: &Rect, bottom: f32, platform: &Rect) -> bool {
    if !entity.overlaps(platform) {
        return false;
    }
    bottom - platform.top() <= LANDING_TOLERANCE
        || (platform.left() < entity.left() && entity.left() < platform.right() - entity.w)
}

/// Which way to push an entity that overlaps a platform without being
/// grounded on it.  Positive: nudge right past the platform's right edge;
/// negative: nudge left (and the caller cancels any push in progress).
pub fn side_nudge(entity: &Rect, platform: &Rect) -> f32 {
    if entity.right() > platform.right() {
        SIDE_NUDGE
    } else if entity.left() < platform.left() {
        -SIDE_NUDGE
    } else {
        0.0
    }
}

// ── Kill heuristics ──────────────────────────────────────────────────────────

/// "Landed on top of" test: counts how many of the victim's three top-edge
/// sample points (top-left, top-mid, top-right) fall inside the attacker's
/// rect, and treats exactly two as a stomp.  One means a glancing corner
/// touch; three means full enclosure, which deliberately does not kill.
/// An approximate heuristic, kept rather than replaced with exact
/// containment.
pub fn stomped(victim: &Rect, attacker: &Rect) -> bool {
    let samples = [
        (victim.left(), victim.top()),
        (victim.left() + victim.w / 2.0, victim.top()),
        (victim.right(), victim.top()),
    ];
    let inside = samples
        .iter()
        .filter(|&&(x, y)| attacker.contains_point(x, y))
        .count();
    inside == 2
}

/// Circular blast test: centre-to-centre distance against the bomb radius.
pub fn in_blast(bomb: &Rect, radius: f32, target: &Rect) -> bool {
    let (bx, by) = bomb.center();
    let (tx, ty) = target.center();
    let (dx, dy) = (bx - tx, by - ty);
    (dx * dx + dy * dy).sqrt() <= radius
}
