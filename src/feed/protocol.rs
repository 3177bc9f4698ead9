//! Feed helper message protocol definitions
//!
//! All messages are single-line JSON objects tagged by `type`, one per line.

use serde::{Deserialize, Serialize};

use crate::overlay::DrawCommand;

/// Landmark as reported by the model, normalized to the image size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// One hand found by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedHand {
    /// "Left" or "Right" as seen by the model
    #[serde(default)]
    pub handedness: String,

    /// Detection confidence
    #[serde(default)]
    pub score: f32,

    pub landmarks: Vec<NormalizedLandmark>,
}

/// A camera frame with the model's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame sequence number, echoed in the overlay reply
    pub seq: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub hands: Vec<TrackedHand>,

    /// Draw commands accumulated while processing this frame
    #[serde(skip)]
    pub overlay: Vec<DrawCommand>,
}

impl Frame {
    /// Empty frame with no hands
    #[cfg(test)]
    pub fn new(seq: u64, width: u32, height: u32) -> Self {
        Self {
            seq,
            width,
            height,
            hands: Vec::new(),
            overlay: Vec::new(),
        }
    }

    pub fn draw(&mut self, command: DrawCommand) {
        self.overlay.push(command);
    }

    pub fn draw_all(&mut self, commands: impl IntoIterator<Item = DrawCommand>) {
        self.overlay.extend(commands);
    }
}

/// Messages from the helper to the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// A processed camera frame
    Frame(Frame),

    /// Key pressed in the display window
    Key { key: String },

    /// The camera could not be opened or read
    CameraError { message: String },
}

/// Messages from the daemon to the helper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DaemonMessage {
    /// Sent once at startup
    Configure(CaptureSettings),

    /// Annotations for the frame with sequence `seq`
    Overlay { seq: u64, commands: Vec<DrawCommand> },
}

/// Camera and model settings forwarded to the helper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSettings {
    pub camera_index: u32,
    pub width: u32,
    pub height: u32,
    pub max_hands: usize,
    pub detection_confidence: f32,
    pub tracking_confidence: f32,
}
