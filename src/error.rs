//! Error taxonomy.  Everything here is fatal at startup: a clip with no
//! frames means the art is broken, and bad generator bounds would produce
//! degenerate platforms.  Nothing in the per-frame hot path returns errors.

use thiserror::Error;

use crate::anim::ClipId;

#[derive(Debug, Error)]
pub enum GameError {
    /// The shell registered an animation clip with zero frames.
    #[error("animation clip {0:?} has no frames")]
    EmptyClip(ClipId),

    /// A generator range is empty, inverted, or would produce zero-size
    /// platforms.
    #[error("level generator bounds invalid: {0}")]
    BadGeneratorRange(&'static str),
}
