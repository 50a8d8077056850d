//! Replays recorded wand traces through the gesture sampler and the scene.
mod replay;
mod trace;

pub use replay::*;
pub use trace::*;
