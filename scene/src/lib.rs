//! Scene objects that react to wand gestures.
//!
//! Each recognized gesture hides the object at the gesture's index for a while.
mod visibility;

pub use visibility::*;
