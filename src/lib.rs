//! Endless side-view platformer: the player auto-bounces forward over
//! procedurally generated platforms and survives with a single "push"
//! action.  The library is the whole simulation — physics, collisions,
//! camera, generation, round state — stepped one frame at a time by a
//! presentation shell that owns the terminal, the assets and the audio.

pub mod anim;
pub mod audio;
pub mod camera;
pub mod entities;
pub mod error;
pub mod game;
pub mod level;
pub mod physics;
pub mod world;

/// World-space width of one screen, in world units.
pub const WIDTH: f32 = 1000.0;

/// World-space height of one screen.  Y grows downward; `HEIGHT` is the
/// ground line backgrounds and platforms sit on.
pub const HEIGHT: f32 = 500.0;
