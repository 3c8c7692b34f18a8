//! Scroll/parallax model.
//!
//! The camera is a single scalar `offset` driven by the tracked entity's
//! world x.  Each entity snapshots the offset at spawn (`camera_delta`);
//! its screen x is then `start_x + (offset − camera_delta) × parallax`
//! every frame, regardless of update order.  The camera never owns the
//! entity it tracks — it only remembers the last world x it was given.

use crate::entities::{Rect, Sprite};

#[derive(Clone, Debug)]
pub struct Camera {
    pub offset: f32,
    pub follow_limit: f32,
    /// Last tracked world x, kept for offset perturbation after the
    /// tracked entity is gone.
    tracked_x: f32,
}

impl Camera {
    pub fn new(follow_limit: f32) -> Self {
        Camera {
            offset: 0.0,
            follow_limit,
            tracked_x: 0.0,
        }
    }

    /// Place the tracked entity from its world position.  Before the
    /// follow limit the entity moves across the screen and the offset
    /// stays put; past it the entity's screen x is pinned at the limit and
    /// the world scrolls instead.  Screen y always follows world y — there
    /// is no vertical scroll.
    pub fn set_position(&mut self, world: (f32, f32), target_screen: &mut Rect) {
        self.tracked_x = world.0;
        if world.0 > self.follow_limit {
            self.offset = self.follow_limit - world.0;
            target_screen.x = self.follow_limit;
        } else {
            target_screen.x = world.0;
        }
        target_screen.set_bottom(world.1);
    }

    /// Refresh a non-target entity's screen x.  Only x: entities manage
    /// their own vertical position.
    pub fn apply(&self, spr: &mut Sprite, parallax: f32) {
        spr.screen.x = spr.start_pos.0 + (self.offset - spr.camera_delta) * parallax;
    }

    /// Perturb the offset by `amount` relative to where the tracked
    /// position would put it.  Drives the game-over glitch jitter.
    pub fn nudge(&mut self, amount: f32) {
        if self.tracked_x > self.follow_limit {
            self.offset = self.follow_limit - self.tracked_x + amount;
        } else {
            self.offset = amount;
        }
    }
}
