//! Gesture sampling and classification for a tracked wand.
//!
//! The host drives a [`GestureSampler`] through the [`WandInput`] interface: hold start, one tick
//! per frame, hold end. At hold end the sampled path is classified and the resulting
//! [`GestureLabel`] is dispatched to all registered listeners.
mod classifier;
mod config;
mod event;
mod gesture;
mod listeners;
mod sampler;

pub use classifier::*;
pub use config::*;
pub use event::*;
pub use gesture::*;
pub use listeners::*;
pub use sampler::*;

pub use wand_geometry::Vector3;
