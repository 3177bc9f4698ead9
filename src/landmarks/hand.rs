//! Hand landmark definitions and finger state tracking
//!
//! Provides the landmark ids of the 21-point hand model and a struct
//! for tracking which fingers are currently extended.

use serde::{Deserialize, Serialize};

/// Landmark ids of the 21-point hand model
pub mod ids {
    pub const THUMB_IP: u8 = 3;
    pub const THUMB_TIP: u8 = 4;
    pub const INDEX_TIP: u8 = 8;
    pub const MIDDLE_TIP: u8 = 12;
    pub const RING_TIP: u8 = 16;
    pub const PINKY_TIP: u8 = 20;

    /// Number of landmarks reported per hand
    pub const COUNT: usize = 21;
}

/// A single landmark in image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Semantic position (0-20)
    pub id: u8,
    /// Pixel column
    pub x: i32,
    /// Pixel row
    pub y: i32,
    /// Depth relative to the wrist, rounded to 3 decimals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    pub fn point(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// One located hand: exactly 21 landmarks ordered by id
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    landmarks: Vec<Landmark>,
}

impl Hand {
    /// Wrap a landmark list, returning `None` unless it holds a full hand
    pub fn from_landmarks(landmarks: Vec<Landmark>) -> Option<Self> {
        if landmarks.len() != ids::COUNT {
            return None;
        }
        Some(Self { landmarks })
    }

    /// Landmark by id
    ///
    /// Ids above 20 are clamped to the pinky tip.
    pub fn get(&self, id: u8) -> &Landmark {
        &self.landmarks[usize::from(id).min(ids::COUNT - 1)]
    }

    #[cfg(test)]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Compute which fingers are extended
    ///
    /// Returns `None` when the thumb tip and pinky tip share a column, since
    /// the hand's facing cannot be told apart and the thumb is undefined.
    pub fn finger_state(&self) -> Option<FingerState> {
        let thumb_tip = self.get(ids::THUMB_TIP).x;
        let thumb_ip = self.get(ids::THUMB_IP).x;
        let pinky_tip = self.get(ids::PINKY_TIP).x;

        let thumb = if thumb_tip > pinky_tip {
            thumb_tip >= thumb_ip
        } else if thumb_tip < pinky_tip {
            thumb_tip <= thumb_ip
        } else {
            return None;
        };

        // A finger is up when its tip sits above the joint two positions back.
        let up = |tip: u8| self.get(tip).y < self.get(tip - 2).y;

        Some(FingerState {
            thumb,
            index: up(ids::INDEX_TIP),
            middle: up(ids::MIDDLE_TIP),
            ring: up(ids::RING_TIP),
            pinky: up(ids::PINKY_TIP),
        })
    }
}

/// Tracks which fingers are currently extended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    /// Build from a thumb-first bit pattern, e.g. `[0, 1, 1, 0, 0]`
    pub const fn from_bits(bits: [u8; 5]) -> Self {
        Self {
            thumb: bits[0] != 0,
            index: bits[1] != 0,
            middle: bits[2] != 0,
            ring: bits[3] != 0,
            pinky: bits[4] != 0,
        }
    }

    pub fn to_bits(self) -> [u8; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.pinky].map(u8::from)
    }

    /// Check if every finger is closed (fist)
    pub fn is_fist(&self) -> bool {
        !self.thumb && !self.fingers_up()
    }

    /// Check if any non-thumb finger is extended
    pub fn fingers_up(&self) -> bool {
        self.index || self.middle || self.ring || self.pinky
    }

    /// Check if only the index finger is extended (scroll up)
    pub fn is_index_only(&self) -> bool {
        *self == Self::from_bits([0, 1, 0, 0, 0])
    }

    /// Check if index and middle are extended (scroll down)
    pub fn is_index_middle(&self) -> bool {
        *self == Self::from_bits([0, 1, 1, 0, 0])
    }

    /// Check if thumb and index are extended (volume pinch)
    pub fn is_pinch(&self) -> bool {
        *self == Self::from_bits([1, 1, 0, 0, 0])
    }

    /// Check if all five fingers are extended (open palm)
    pub fn is_open(&self) -> bool {
        *self == Self::from_bits([1, 1, 1, 1, 1])
    }
}

impl std::fmt::Display for FingerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e] = self.to_bits();
        write!(f, "[{a},{b},{c},{d},{e}]")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Synthetic right hand, palm facing the camera, thumb to the left.
    ///
    /// Each finger is drawn as a vertical column; an extended finger has its
    /// tip above its PIP joint, a closed finger has it below.
    pub(crate) fn hand_with(bits: [u8; 5]) -> Hand {
        let mut points = vec![(0, 0); ids::COUNT];
        // Wrist
        points[0] = (300, 400);

        // Thumb chain 1..=4, pinky tip ends up to the right of it.
        points[1] = (260, 380);
        points[2] = (240, 350);
        points[3] = (220, 320);
        points[4] = if bits[0] != 0 { (200, 300) } else { (240, 320) };

        for (finger, column) in [(1usize, 260), (2, 300), (3, 340), (4, 380)] {
            let base = 1 + finger * 4;
            points[base] = (column, 300);
            points[base + 1] = (column, 260);
            points[base + 2] = if bits[finger] != 0 { (column, 230) } else { (column, 280) };
            points[base + 3] = if bits[finger] != 0 { (column, 200) } else { (column, 290) };
        }

        let landmarks = points
            .into_iter()
            .enumerate()
            .map(|(id, (x, y))| Landmark { id: id as u8, x, y, z: None })
            .collect();
        Hand::from_landmarks(landmarks).unwrap()
    }

    #[test]
    fn test_rejects_partial_hand() {
        let landmarks = vec![Landmark { id: 0, x: 1, y: 1, z: None }; 20];
        assert!(Hand::from_landmarks(landmarks).is_none());
    }

    #[test]
    fn test_fist() {
        let state = hand_with([0, 0, 0, 0, 0]).finger_state().unwrap();
        assert!(state.is_fist());
        assert!(!state.fingers_up());
    }

    #[test]
    fn test_index_only() {
        let state = hand_with([0, 1, 0, 0, 0]).finger_state().unwrap();
        assert!(state.is_index_only());
        assert!(!state.is_index_middle());
        assert!(!state.is_pinch());
    }

    #[test]
    fn test_pinch_and_open() {
        assert!(hand_with([1, 1, 0, 0, 0]).finger_state().unwrap().is_pinch());
        assert!(hand_with([1, 1, 1, 1, 1]).finger_state().unwrap().is_open());
    }

    #[test]
    fn test_thumb_follows_hand_facing() {
        // Mirror the hand so the thumb is on the right of the pinky.
        let hand = hand_with([1, 0, 0, 0, 0]);
        let mirrored: Vec<Landmark> = hand
            .landmarks()
            .iter()
            .map(|lm| Landmark { x: 640 - lm.x, ..*lm })
            .collect();
        let mirrored = Hand::from_landmarks(mirrored).unwrap();
        assert!(mirrored.finger_state().unwrap().thumb);
    }

    #[test]
    fn test_thumb_undetermined_when_aligned_with_pinky() {
        let hand = hand_with([1, 0, 0, 0, 1]);
        let mut landmarks = hand.landmarks().to_vec();
        landmarks[ids::PINKY_TIP as usize].x = landmarks[ids::THUMB_TIP as usize].x;
        let hand = Hand::from_landmarks(landmarks).unwrap();
        assert_eq!(hand.finger_state(), None);
    }

    #[test]
    fn test_display_bits() {
        assert_eq!(FingerState::from_bits([1, 0, 1, 0, 1]).to_string(), "[1,0,1,0,1]");
    }
}
