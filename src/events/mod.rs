//! Events module for mode transitions
//!
//! Provides structured event types for mode entry and release.

use serde::{Deserialize, Serialize};

use crate::state::Mode;

/// Events emitted by the gesture controller during transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModeEvent {
    /// A gesture selected a mode and engaged the latch
    Entered { mode: Mode },

    /// A release gesture returned control to Neutral
    Released {
        mode: Mode,
        /// Duration in milliseconds that the mode was engaged
        duration_ms: u64,
    },
}

impl std::fmt::Display for ModeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeEvent::Entered { mode } => write!(f, "{}_ENTERED", mode.tag()),
            ModeEvent::Released { mode, duration_ms } => {
                write!(f, "{}_RELEASED ({}ms)", mode.tag(), duration_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ModeEvent::Released { mode: Mode::Cursor, duration_ms: 1500 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("released"));
        assert!(json.contains("cursor"));
        assert!(json.contains("1500"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"entered","mode":"scroll"}"#;
        let event: ModeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ModeEvent::Entered { mode: Mode::Scroll });
    }

    #[test]
    fn test_event_display() {
        let event = ModeEvent::Entered { mode: Mode::Volume };
        assert_eq!(event.to_string(), "VOLUME_ENTERED");
    }
}
