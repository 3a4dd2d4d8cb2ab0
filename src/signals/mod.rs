//! Zero-line crossing detection and signal orchestration.

pub mod crossing;
pub mod engine;

pub use crossing::check_cross;
pub use engine::{CrossingStates, SignalEngine};
