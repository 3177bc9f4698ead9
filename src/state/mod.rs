//! State machine module for gesture mode management
//!
//! Provides an explicit state machine with four modes:
//! - Neutral: Default, nothing engaged
//! - Scroll: Index up scrolls up, index+middle scrolls down
//! - Volume: Thumb/index pinch width sets the master volume
//! - Cursor: Index tip moves the pointer, closing the thumb clicks

mod machine;
mod mapping;

pub use machine::{ControllerSettings, GestureController, Mode, ModeState};
pub use mapping::{CursorArea, PinchRange, VolumeRange};
