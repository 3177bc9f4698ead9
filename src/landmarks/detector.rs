//! Landmark provider over the helper's model output
//!
//! Converts normalized model coordinates into pixel landmarks and adds the
//! optional skeleton/point overlays.

use tracing::{trace, warn};

use crate::feed::{CaptureSettings, Frame};
use crate::overlay::{Color, DrawCommand};

use super::hand::{ids, Hand, Landmark};

/// Hand detector settings and landmark extraction
#[derive(Debug, Clone)]
pub struct HandDetector {
    /// Hands beyond this index are ignored
    pub max_hands: usize,
    /// Minimum confidence for the model to report a hand
    pub detection_confidence: f32,
    /// Minimum confidence to keep tracking a hand between frames
    pub tracking_confidence: f32,
}

impl Default for HandDetector {
    fn default() -> Self {
        Self {
            max_hands: 2,
            detection_confidence: 0.5,
            tracking_confidence: 0.5,
        }
    }
}

impl HandDetector {
    pub fn new(max_hands: usize, detection_confidence: f32, tracking_confidence: f32) -> Self {
        Self {
            max_hands,
            detection_confidence,
            tracking_confidence,
        }
    }

    /// Model settings for the helper, combined with the camera settings
    pub fn capture_settings(&self, camera_index: u32, width: u32, height: u32) -> CaptureSettings {
        CaptureSettings {
            camera_index,
            width,
            height,
            max_hands: self.max_hands,
            detection_confidence: self.detection_confidence,
            tracking_confidence: self.tracking_confidence,
        }
    }

    /// Annotate the frame with the skeleton of every tracked hand
    pub fn detect<'a>(&self, frame: &'a mut Frame, draw: bool) -> &'a Frame {
        if draw {
            let tracked = frame.hands.len().min(self.max_hands);
            frame.draw_all((0..tracked).map(|hand| DrawCommand::HandSkeleton { hand }));
        }
        frame
    }

    /// Pixel landmarks of one hand, empty if there is no such hand
    ///
    /// With `mark` set, a small filled circle is drawn on every landmark.
    pub fn locate(
        &self,
        frame: &mut Frame,
        hand_index: usize,
        include_depth: bool,
        mark: Option<Color>,
    ) -> Vec<Landmark> {
        if hand_index >= self.max_hands {
            return Vec::new();
        }
        let Some(tracked) = frame.hands.get(hand_index) else {
            return Vec::new();
        };

        let (w, h) = (frame.width as f32, frame.height as f32);
        let landmarks: Vec<Landmark> = tracked
            .landmarks
            .iter()
            .enumerate()
            .map(|(id, lm)| Landmark {
                id: id as u8,
                x: (lm.x * w) as i32,
                y: (lm.y * h) as i32,
                z: include_depth.then(|| (lm.z * 1000.0).round() / 1000.0),
            })
            .collect();

        if let Some(color) = mark {
            frame.draw_all(landmarks.iter().map(|lm| DrawCommand::dot(lm.point(), 5, color)));
        }

        landmarks
    }

    /// The first hand as a full 21-point [`Hand`]
    pub fn locate_hand(&self, frame: &mut Frame) -> Option<Hand> {
        let landmarks = self.locate(frame, 0, false, None);
        if landmarks.is_empty() {
            return None;
        }

        let count = landmarks.len();
        let hand = Hand::from_landmarks(landmarks);
        match &hand {
            Some(hand) => trace!(thumb_tip = ?hand.get(ids::THUMB_TIP).point(), "hand located"),
            None => warn!(count, expected = ids::COUNT, "ignoring hand with wrong landmark count"),
        }
        hand
    }
}
