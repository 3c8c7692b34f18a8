//! Sound-event and volume contract between the core and the audio
//! collaborator.  The core never plays anything: the world pushes
//! [`SoundEvent`]s into a queue the shell drains once per frame, and the
//! shell scales each event's base volume by the user's settings.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundEvent {
    Push,
    PlayerLanding,
    EnemyLanding,
    PlayerDie,
    EnemyDie,
    Boom,
}

impl SoundEvent {
    /// Relative loudness before user settings are applied.
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEvent::Push => 0.4,
            SoundEvent::PlayerLanding => 0.8,
            SoundEvent::EnemyLanding => 0.5,
            SoundEvent::PlayerDie => 1.0,
            SoundEvent::EnemyDie => 0.6,
            SoundEvent::Boom => 0.4,
        }
    }
}

/// Flat volume configuration, persisted by the shell and forwarded to the
/// audio collaborator.  The core itself only defines the shape.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Volumes {
    pub master: f32,
    pub music: f32,
    pub effects: f32,
}

impl Default for Volumes {
    fn default() -> Self {
        Volumes {
            master: 1.0,
            music: 0.7,
            effects: 1.0,
        }
    }
}

impl Volumes {
    /// Final amplitude for one effect event.
    pub fn effect_volume(&self, event: SoundEvent) -> f32 {
        (event.base_volume() * self.master * self.effects).clamp(0.0, 1.0)
    }
}
