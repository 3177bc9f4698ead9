//! Per-frame pipeline
//!
//! Detection, gesture control, actuation and overlay assembly for one frame,
//! carrying the mode state from frame to frame.

use tracing::trace;

use crate::actuate::{ActuateError, Actuator};
use crate::feed::{DaemonMessage, Frame};
use crate::landmarks::HandDetector;
use crate::overlay::FpsMeter;
use crate::state::{GestureController, ModeState};

/// One running gesture session
pub struct Session {
    detector: HandDetector,
    controller: GestureController,
    actuator: Actuator,
    state: ModeState,
    fps: FpsMeter,
    draw_landmarks: bool,
}

impl Session {
    pub fn new(
        detector: HandDetector,
        controller: GestureController,
        actuator: Actuator,
        draw_landmarks: bool,
    ) -> Self {
        Self {
            detector,
            controller,
            actuator,
            state: ModeState::new(),
            fps: FpsMeter::new(),
            draw_landmarks,
        }
    }

    pub fn state(&self) -> ModeState {
        self.state
    }

    /// Run one frame through the pipeline and build its overlay reply
    pub fn process(&mut self, mut frame: Frame) -> Result<DaemonMessage, ActuateError> {
        self.detector.detect(&mut frame, self.draw_landmarks);
        let hand = self.detector.locate_hand(&mut frame);

        let actions = self.controller.step(&mut self.state, hand.as_ref(), &mut frame);
        self.actuator.apply(&actions)?;

        frame.draw(FpsMeter::overlay(self.fps.tick()));
        trace!(seq = frame.seq, actions = actions.len(), mode = %self.state.mode, "frame processed");

        Ok(DaemonMessage::Overlay {
            seq: frame.seq,
            commands: frame.overlay,
        })
    }
}
