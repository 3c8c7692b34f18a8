//! Clip/animation state machine.
//!
//! An [`Animator`] is either idle or playing exactly one named clip.  On
//! completion it records the clip as `last_done`; a clip only (re)starts
//! while idle and only if it differs from `last_done`, which is what stops
//! a grounded entity from replaying its landing clip every frame.  Death
//! clips bypass the rule through [`Animator::force_start`].
//!
//! Frame counts come from the presentation shell: sprite sheets are sliced
//! out there and the core only ever sees per-clip frame totals through a
//! validated [`ClipLibrary`].

use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipId {
    Jump,
    Landing,
    Die,
    Fire,
    Boom,
}

const CLIP_COUNT: usize = 5;

impl ClipId {
    fn index(self) -> usize {
        match self {
            ClipId::Jump => 0,
            ClipId::Landing => 1,
            ClipId::Die => 2,
            ClipId::Fire => 3,
            ClipId::Boom => 4,
        }
    }
}

// ── Clip libraries (asset boundary) ──────────────────────────────────────────

/// Frame counts for the clips one sprite sheet provides.  Built by the
/// shell from its actual art, validated so a zero-frame clip aborts at
/// startup rather than stalling an animator mid-round.
#[derive(Clone, Copy, Debug)]
pub struct ClipLibrary {
    frames: [usize; CLIP_COUNT],
}

impl ClipLibrary {
    pub fn new(clips: &[(ClipId, usize)]) -> Result<Self, GameError> {
        let mut frames = [0usize; CLIP_COUNT];
        for &(clip, count) in clips {
            if count == 0 {
                return Err(GameError::EmptyClip(clip));
            }
            frames[clip.index()] = count;
        }
        Ok(ClipLibrary { frames })
    }

    /// Frame count of a registered clip.  Asking for a clip the sheet never
    /// provided is a programming defect, not a runtime condition.
    pub fn frames(&self, clip: ClipId) -> usize {
        let n = self.frames[clip.index()];
        debug_assert!(n > 0, "clip {clip:?} was never registered");
        n.max(1)
    }
}

/// Clip libraries for every animated entity kind in the world.
#[derive(Clone, Copy, Debug)]
pub struct Assets {
    pub player: ClipLibrary,
    pub enemy: ClipLibrary,
    pub bomb: ClipLibrary,
}

// ── Animator ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct Active {
    clip: ClipId,
    frames: usize,
    frame: usize,
    delay: f32,
    timer: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Animator {
    playing: Option<Active>,
    last_done: Option<ClipId>,
    /// What the renderer should draw right now; persists through idle.
    shown: (ClipId, usize),
}

impl Animator {
    pub fn new(initial: ClipId) -> Self {
        Animator {
            playing: None,
            last_done: None,
            shown: (initial, 0),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    pub fn last_done(&self) -> Option<ClipId> {
        self.last_done
    }

    pub fn current_clip(&self) -> Option<ClipId> {
        self.playing.map(|a| a.clip)
    }

    /// The frame to render: the active clip's current frame, or whatever
    /// was showing when the last clip finished.
    pub fn shown(&self) -> (ClipId, usize) {
        self.shown
    }

    /// Start `clip` under the normal transition rule: only while idle, and
    /// never straight after the same clip completed.  Returns whether the
    /// clip actually started.
    pub fn try_start(&mut self, clip: ClipId, frames: usize, delay: f32) -> bool {
        if self.playing.is_some() || self.last_done == Some(clip) {
            return false;
        }
        self.begin(clip, frames, delay);
        true
    }

    /// Start `clip` unconditionally, interrupting anything in progress.
    /// Used for death clips, which must begin the frame the entity dies.
    pub fn force_start(&mut self, clip: ClipId, frames: usize, delay: f32) {
        self.begin(clip, frames, delay);
    }

    fn begin(&mut self, clip: ClipId, frames: usize, delay: f32) {
        debug_assert!(frames > 0);
        self.playing = Some(Active {
            clip,
            frames,
            frame: 0,
            delay,
            timer: 0.0,
        });
        self.shown = (clip, 0);
    }

    /// Advance the active clip by `dt`.  The last frame is held for one
    /// full delay before the animator goes idle and records `last_done`.
    pub fn advance(&mut self, dt: f32) {
        let Some(active) = self.playing.as_mut() else {
            return;
        };
        active.timer += dt;
        if active.timer <= active.delay {
            return;
        }
        active.timer = 0.0;
        if active.frame + 1 < active.frames {
            active.frame += 1;
            self.shown = (active.clip, active.frame);
        } else {
            self.last_done = Some(active.clip);
            self.playing = None;
        }
    }
}
