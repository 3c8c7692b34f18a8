//! Round/session state machine: playing ⇄ paused → game over → restart.
//!
//! The menu lives in the presentation shell; the session begins in
//! `Playing` and the shell calls [`Session::restart`] for a new round.
//! While the round is over the world keeps stepping (enemies keep
//! bouncing behind the overlay) and the camera jitters at randomized
//! intervals until the shell restarts.

use log::info;
use rand::Rng;

use crate::anim::Assets;
use crate::audio::SoundEvent;
use crate::error::GameError;
use crate::level::GenConfig;
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    GameOver,
}

/// The two logical input events the core consumes per frame.  Everything
/// else (restart, menu navigation) is shell-side state handling.
#[derive(Clone, Copy, Debug, Default)]
pub struct Input {
    pub push: bool,
    pub pause_toggle: bool,
}

pub struct Session {
    pub world: World,
    phase: Phase,
    round_time: f32,
    level: u32,
    /// Countdown to the next game-over camera jolt.
    jitter_left: f32,
}

impl Session {
    pub fn new(assets: Assets, cfg: GenConfig) -> Result<Self, GameError> {
        Ok(Session {
            world: World::new(assets, cfg)?,
            phase: Phase::Playing,
            round_time: 0.0,
            level: 0,
            jitter_left: 0.0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Platforms crossed this round; holds its final value through the
    /// game-over screen.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Elapsed round seconds, frozen from the moment the player starts
    /// dying.
    pub fn round_time(&self) -> f32 {
        self.round_time
    }

    /// Sound events raised by the last frame.
    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.world.sounds)
    }

    /// Full deterministic reset: all entities destroyed and recreated,
    /// camera and counters zeroed.
    pub fn restart(&mut self) {
        self.world.reset();
        self.phase = Phase::Playing;
        self.round_time = 0.0;
        self.level = 0;
        self.jitter_left = 0.0;
        info!("round restarted");
    }

    /// Advance one frame.  Input is consumed before any physics runs.
    pub fn frame(&mut self, dt: f32, input: Input, rng: &mut impl Rng) {
        match self.phase {
            Phase::Playing => {
                let can_pause = self.world.player.as_ref().is_some_and(|p| !p.dying);
                if input.pause_toggle && can_pause {
                    self.phase = Phase::Paused;
                    return;
                }

                self.world.step(dt, input.push, rng);

                if let Some(p) = self.world.player.as_ref() {
                    self.level = p.level;
                    if !p.dying {
                        self.round_time += dt;
                    }
                } else {
                    self.phase = Phase::GameOver;
                    self.jitter_left = 0.0;
                    info!(
                        "game over: level {} after {:.1}s",
                        self.level, self.round_time
                    );
                }
            }
            Phase::Paused => {
                if input.pause_toggle {
                    self.phase = Phase::Playing;
                }
            }
            Phase::GameOver => {
                // The world lives on behind the overlay.
                self.world.step(dt, false, rng);

                self.jitter_left -= dt;
                if self.jitter_left <= 0.0 {
                    self.world.camera.nudge(rng.gen_range(-20.0..20.0));
                    self.jitter_left = rng.gen_range(0.1..3.0);
                }
            }
        }
    }
}
