//! Platform abstraction layer
//!
//! Browser-independent pieces of the host: input intent and coordinate
//! mapping. Storage lives in `persistence`.

pub mod input;

pub use input::{InputState, to_playfield_x};
