//! Core gesture state machine implementation
//!
//! Handles transitions between Neutral, Scroll, Volume and Cursor modes
//! based on which fingers are extended, and turns the hand pose of the
//! engaged mode into desktop actions.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::actuate::{Action, ScrollDirection};
use crate::events::ModeEvent;
use crate::feed::Frame;
use crate::landmarks::{ids, FingerState, Hand};
use crate::overlay::{Color, DrawCommand};

use super::mapping::{distance, interp, snap_even, CursorArea, PinchRange, VolumeRange};

/// The four gesture modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// No mode engaged, waiting for a trigger pose
    #[default]
    Neutral,
    /// Index finger scrolls up, index+middle scrolls down
    Scroll,
    /// Thumb-to-index distance sets the master volume
    Volume,
    /// Index tip steers the pointer, closing the thumb clicks
    Cursor,
}

impl Mode {
    /// Upper-case tag used in event names
    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Neutral => "NEUTRAL",
            Mode::Scroll => "SCROLL",
            Mode::Volume => "VOLUME",
            Mode::Cursor => "CURSOR",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Neutral => write!(f, "Neutral"),
            Mode::Scroll => write!(f, "Scroll"),
            Mode::Volume => write!(f, "Volume"),
            Mode::Cursor => write!(f, "Cursor"),
        }
    }
}

/// Mode and latch carried from one frame to the next
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModeState {
    /// Current mode
    pub mode: Mode,
    /// Set while a mode is engaged; blocks re-selection
    pub active: bool,
    /// Time when the current non-Neutral mode was entered
    entered_at: Option<Instant>,
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Fixed parameters of the controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Camera-space rectangle mapped onto the screen
    pub cursor_area: CursorArea,
    /// Thumb-to-index distances mapped onto the volume range
    pub pinch: PinchRange,
    /// Screen size in pixels
    pub screen: (i32, i32),
    /// Volume range, `None` when the platform has no volume control
    pub volume: Option<VolumeRange>,
}

/// Gesture controller that selects modes and emits actions
pub struct GestureController {
    settings: ControllerSettings,
    /// Channel for emitting mode events
    event_tx: broadcast::Sender<ModeEvent>,
}

const LABEL_AT: (i32, i32) = (250, 450);

impl GestureController {
    /// Create a new gesture controller
    pub fn new(settings: ControllerSettings, event_tx: broadcast::Sender<ModeEvent>) -> Self {
        Self { settings, event_tx }
    }

    /// Process one frame
    ///
    /// `hand` is `None` when no hand was found; the mode is then left as is.
    /// Feedback overlays are added to `frame`.
    pub fn step(&self, state: &mut ModeState, hand: Option<&Hand>, frame: &mut Frame) -> Vec<Action> {
        let reading = hand.and_then(|hand| hand.finger_state().map(|fingers| (hand, fingers)));

        if let Some((_, fingers)) = reading {
            debug!(%fingers, mode = %state.mode, active = state.active, "finger state");
            if !state.active {
                self.select_mode(state, fingers);
            }
        }

        let mut actions = Vec::new();
        match state.mode {
            Mode::Neutral => {}
            Mode::Scroll => self.handle_scroll(state, reading, frame, &mut actions),
            Mode::Volume => self.handle_volume(state, reading, frame, &mut actions),
            Mode::Cursor => self.handle_cursor(state, reading, frame, &mut actions),
        }
        actions
    }

    /// Match the trigger poses while no mode is engaged
    fn select_mode(&self, state: &mut ModeState, fingers: FingerState) {
        let next = if fingers.is_fist() {
            Mode::Neutral
        } else if fingers.is_index_only() || fingers.is_index_middle() {
            Mode::Scroll
        } else if fingers.is_pinch() {
            Mode::Volume
        } else if fingers.is_open() {
            Mode::Cursor
        } else {
            return;
        };

        if next != state.mode {
            self.transition_to(state, next);
        }
    }

    fn handle_scroll(
        &self,
        state: &mut ModeState,
        reading: Option<(&Hand, FingerState)>,
        frame: &mut Frame,
        actions: &mut Vec<Action>,
    ) {
        frame.draw(DrawCommand::text(Mode::Scroll.to_string(), LABEL_AT, Color::YELLOW));
        frame.draw(DrawCommand::Rect {
            top_left: (200, 410),
            bottom_right: (245, 460),
            color: Color::WHITE,
            thickness: None,
        });

        let Some((_, fingers)) = reading else {
            return;
        };
        if fingers.is_index_only() {
            frame.draw(DrawCommand::text("U", (200, 455), Color::GREEN));
            actions.push(Action::Scroll { direction: ScrollDirection::Up });
        } else if fingers.is_index_middle() {
            frame.draw(DrawCommand::text("D", (200, 455), Color::RED));
            actions.push(Action::Scroll { direction: ScrollDirection::Down });
        } else if fingers.is_fist() {
            self.transition_to(state, Mode::Neutral);
        }
    }

    fn handle_volume(
        &self,
        state: &mut ModeState,
        reading: Option<(&Hand, FingerState)>,
        frame: &mut Frame,
        actions: &mut Vec<Action>,
    ) {
        frame.draw(DrawCommand::text(Mode::Volume.to_string(), LABEL_AT, Color::YELLOW));

        let Some((hand, fingers)) = reading else {
            return;
        };
        if fingers.pinky {
            self.transition_to(state, Mode::Neutral);
            return;
        }
        let Some(range) = self.settings.volume else {
            return;
        };

        let thumb = hand.get(ids::THUMB_TIP).point();
        let index = hand.get(ids::INDEX_TIP).point();
        let mid = ((thumb.0 + index.0) / 2, (thumb.1 + index.1) / 2);
        let length = distance(thumb, index);

        let level_db = self.settings.pinch.level(length, range);
        let percent = range.percent(level_db);
        let bar_top = interp(level_db, (range.min_db, range.max_db), (400.0, 150.0));

        debug!(length, level_db, percent, "volume pinch");
        actions.push(Action::SetVolume { level_db, percent });

        frame.draw_all([
            DrawCommand::dot(thumb, 10, Color::GOLD),
            DrawCommand::dot(index, 10, Color::GOLD),
            DrawCommand::Line { from: thumb, to: index, color: Color::GOLD, thickness: 3 },
            DrawCommand::dot(mid, 8, Color::GOLD),
        ]);
        if length < self.settings.pinch.near {
            frame.draw(DrawCommand::dot(mid, 11, Color::RED));
        }
        frame.draw_all([
            DrawCommand::Rect {
                top_left: (30, 150),
                bottom_right: (55, 400),
                color: Color::TEAL,
                thickness: Some(3),
            },
            DrawCommand::Rect {
                top_left: (30, bar_top as i32),
                bottom_right: (55, 400),
                color: Color::MINT,
                thickness: None,
            },
            DrawCommand::Text {
                text: format!("{}%", percent as i32),
                at: (25, 430),
                scale: 0.9,
                color: Color::TEAL,
                thickness: 3,
            },
        ]);
    }

    fn handle_cursor(
        &self,
        state: &mut ModeState,
        reading: Option<(&Hand, FingerState)>,
        frame: &mut Frame,
        actions: &mut Vec<Action>,
    ) {
        let area = self.settings.cursor_area;
        frame.draw(DrawCommand::text(Mode::Cursor.to_string(), LABEL_AT, Color::YELLOW));
        frame.draw(DrawCommand::Rect {
            top_left: (area.left, area.top),
            bottom_right: (area.right, area.bottom),
            color: Color::WHITE,
            thickness: Some(3),
        });

        let Some((hand, fingers)) = reading else {
            return;
        };
        if !fingers.fingers_up() {
            self.transition_to(state, Mode::Neutral);
            return;
        }

        let index = hand.get(ids::INDEX_TIP).point();
        let thumb = hand.get(ids::THUMB_TIP).point();
        let (x, y) = area.to_screen(index, self.settings.screen);
        let (x, y) = (snap_even(x), snap_even(y));

        frame.draw(DrawCommand::dot(index, 7, Color::WHITE));
        frame.draw(DrawCommand::dot(thumb, 10, Color::GREEN));
        actions.push(Action::MoveCursor { x, y });

        if !fingers.thumb {
            frame.draw(DrawCommand::dot(thumb, 10, Color::RED));
            actions.push(Action::Click);
        }
    }

    /// Perform a mode transition
    fn transition_to(&self, state: &mut ModeState, new_mode: Mode) {
        let old_mode = state.mode;
        let duration_ms = state
            .entered_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        info!(
            from = %old_mode,
            to = %new_mode,
            duration_ms = duration_ms,
            "mode transition"
        );

        if old_mode != Mode::Neutral {
            self.emit(ModeEvent::Released { mode: old_mode, duration_ms });
        }

        state.mode = new_mode;
        state.active = new_mode != Mode::Neutral;
        state.entered_at = state.active.then(Instant::now);

        if state.active {
            self.emit(ModeEvent::Entered { mode: new_mode });
        }
    }

    fn emit(&self, event: ModeEvent) {
        debug!(?event, "emitting mode event");
        // No subscribers is fine; events are informational.
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::hand::tests::hand_with;
    use crate::landmarks::Landmark;

    const SCREEN: (i32, i32) = (1920, 1080);
    const RANGE: VolumeRange = VolumeRange { min_db: -63.0, max_db: 0.0 };

    fn create_controller() -> (GestureController, broadcast::Receiver<ModeEvent>) {
        let (tx, rx) = broadcast::channel(16);
        let settings = ControllerSettings {
            cursor_area: CursorArea::default(),
            pinch: PinchRange::default(),
            screen: SCREEN,
            volume: Some(RANGE),
        };
        (GestureController::new(settings, tx), rx)
    }

    fn frame() -> Frame {
        Frame::new(1, 640, 480)
    }

    fn step(controller: &GestureController, state: &mut ModeState, bits: [u8; 5]) -> Vec<Action> {
        controller.step(state, Some(&hand_with(bits)), &mut frame())
    }

    fn moved(hand: &Hand, id: u8, point: (i32, i32)) -> Hand {
        let mut landmarks = hand.landmarks().to_vec();
        landmarks[id as usize] = Landmark { id, x: point.0, y: point.1, z: None };
        Hand::from_landmarks(landmarks).unwrap()
    }

    fn set_volume_percent(actions: &[Action]) -> Option<f32> {
        actions.iter().find_map(|a| match a {
            Action::SetVolume { percent, .. } => Some(*percent),
            _ => None,
        })
    }

    #[test]
    fn test_initial_state() {
        let state = ModeState::new();
        assert_eq!(state.mode, Mode::Neutral);
        assert!(!state.active);
    }

    #[test]
    fn test_fist_stays_neutral() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        let actions = step(&controller, &mut state, [0, 0, 0, 0, 0]);
        assert_eq!(state.mode, Mode::Neutral);
        assert!(!state.active);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_neutral_to_scroll() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        let actions = step(&controller, &mut state, [0, 1, 0, 0, 0]);
        assert_eq!(state.mode, Mode::Scroll);
        assert!(state.active);
        // The selecting frame already scrolls.
        assert_eq!(actions, vec![Action::Scroll { direction: ScrollDirection::Up }]);
    }

    #[test]
    fn test_index_middle_selects_scroll_down() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        let actions = step(&controller, &mut state, [0, 1, 1, 0, 0]);
        assert_eq!(state.mode, Mode::Scroll);
        assert_eq!(actions, vec![Action::Scroll { direction: ScrollDirection::Down }]);
    }

    #[test]
    fn test_neutral_to_volume() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        let actions = step(&controller, &mut state, [1, 1, 0, 0, 0]);
        assert_eq!(state.mode, Mode::Volume);
        assert!(state.active);
        assert!(set_volume_percent(&actions).is_some());
    }

    #[test]
    fn test_neutral_to_cursor() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [1, 1, 1, 1, 1]);
        assert_eq!(state.mode, Mode::Cursor);
        assert!(state.active);
    }

    #[test]
    fn test_unmatched_pose_keeps_neutral() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [0, 0, 1, 1, 0]);
        assert_eq!(state.mode, Mode::Neutral);
        assert!(!state.active);
    }

    #[test]
    fn test_active_latch_blocks_reselection() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [0, 1, 0, 0, 0]);

        // Open palm would select Cursor from Neutral, but Scroll is engaged.
        let actions = step(&controller, &mut state, [1, 1, 1, 1, 1]);
        assert_eq!(state.mode, Mode::Scroll);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_scroll_released_by_fist() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [0, 1, 0, 0, 0]);
        step(&controller, &mut state, [0, 0, 0, 0, 0]);
        assert_eq!(state.mode, Mode::Neutral);
        assert!(!state.active);

        // Control is back in Neutral, so a new mode can be selected.
        step(&controller, &mut state, [1, 1, 1, 1, 1]);
        assert_eq!(state.mode, Mode::Cursor);
    }

    #[test]
    fn test_volume_released_by_pinky() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [1, 1, 0, 0, 0]);
        let actions = step(&controller, &mut state, [1, 1, 0, 0, 1]);
        assert_eq!(state.mode, Mode::Neutral);
        assert!(!state.active);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_volume_pinch_bounds() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        let pinch = hand_with([1, 1, 0, 0, 0]);

        // Index tip sits at (260, 200); thumb tips 50px and 200px away.
        let near = moved(&pinch, ids::THUMB_TIP, (220, 230));
        let far = moved(&pinch, ids::THUMB_TIP, (100, 320));

        let actions = controller.step(&mut state, Some(&near), &mut frame());
        assert_eq!(state.mode, Mode::Volume);
        assert_eq!(
            actions,
            vec![Action::SetVolume { level_db: -63.0, percent: 0.0 }]
        );

        let actions = controller.step(&mut state, Some(&far), &mut frame());
        assert_eq!(set_volume_percent(&actions), Some(100.0));
    }

    #[test]
    fn test_volume_without_platform_support() {
        let (tx, _rx) = broadcast::channel(16);
        let controller = GestureController::new(
            ControllerSettings {
                cursor_area: CursorArea::default(),
                pinch: PinchRange::default(),
                screen: SCREEN,
                volume: None,
            },
            tx,
        );
        let mut state = ModeState::new();
        let actions = step(&controller, &mut state, [1, 1, 0, 0, 0]);
        assert_eq!(state.mode, Mode::Volume);
        assert!(actions.is_empty());

        // Release still works without a volume range.
        step(&controller, &mut state, [0, 0, 0, 0, 1]);
        assert_eq!(state.mode, Mode::Neutral);
    }

    #[test]
    fn test_cursor_moves_to_even_pixels() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        let open = hand_with([1, 1, 1, 1, 1]);
        controller.step(&mut state, Some(&open), &mut frame());

        let corner = moved(&open, ids::INDEX_TIP, (620, 350));
        let mut frame = frame();
        let actions = controller.step(&mut state, Some(&corner), &mut frame);
        assert_eq!(actions, vec![Action::MoveCursor { x: 1918, y: 1078 }]);
        assert!(frame.overlay.iter().any(|cmd| matches!(
            cmd,
            DrawCommand::Rect { top_left: (110, 20), bottom_right: (620, 350), .. }
        )));

        let origin = moved(&open, ids::INDEX_TIP, (110, 20));
        let actions = controller.step(&mut state, Some(&origin), &mut frame);
        assert_eq!(actions, vec![Action::MoveCursor { x: 0, y: 0 }]);
    }

    #[test]
    fn test_cursor_clicks_with_closed_thumb() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [1, 1, 1, 1, 1]);

        let actions = step(&controller, &mut state, [0, 1, 1, 1, 1]);
        assert_eq!(state.mode, Mode::Cursor);
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::MoveCursor { .. }));
        assert_eq!(actions[1], Action::Click);
    }

    #[test]
    fn test_cursor_released_when_fingers_close() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [1, 1, 1, 1, 1]);

        // Thumb alone does not keep the cursor engaged.
        let actions = step(&controller, &mut state, [1, 0, 0, 0, 0]);
        assert_eq!(state.mode, Mode::Neutral);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_hand_loss_keeps_mode() {
        let (controller, _) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [1, 1, 1, 1, 1]);

        let mut frame = frame();
        let actions = controller.step(&mut state, None, &mut frame);
        assert_eq!(state.mode, Mode::Cursor);
        assert!(state.active);
        assert!(actions.is_empty());
        // The mode label is still shown.
        assert!(!frame.overlay.is_empty());
    }

    #[test]
    fn test_transition_events() {
        let (controller, mut rx) = create_controller();
        let mut state = ModeState::new();
        step(&controller, &mut state, [0, 1, 0, 0, 0]);
        step(&controller, &mut state, [0, 0, 0, 0, 0]);

        assert_eq!(rx.try_recv().unwrap(), ModeEvent::Entered { mode: Mode::Scroll });
        assert!(matches!(
            rx.try_recv().unwrap(),
            ModeEvent::Released { mode: Mode::Scroll, .. }
        ));
        assert!(rx.try_recv().is_err());
    }
}
