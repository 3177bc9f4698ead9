//! Landmark module for hand pose input
//!
//! Turns the model's per-frame output into pixel landmarks and
//! finger extension states.

mod detector;
pub mod hand;

pub use detector::HandDetector;
pub use hand::{ids, FingerState, Hand};

#[cfg(test)]
pub use hand::Landmark;
