//! Actuation module for OS-level effects of gestures
//!
//! The gesture controller only decides; everything that touches the OS
//! goes through the [`Desktop`] and [`VolumeController`] capabilities.

mod desktop;
mod volume;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use desktop::{Desktop, DesktopError, EnigoDesktop, LogDesktop};
pub use volume::{platform_volume, VolumeController, VolumeError};

#[cfg(test)]
pub use volume::UnsupportedVolume;

/// Wheel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Desktop effect requested by the gesture controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Scroll { direction: ScrollDirection },
    SetVolume { level_db: f32, percent: f32 },
    MoveCursor { x: i32, y: i32 },
    Click,
}

/// Errors that can occur while applying actions
#[derive(Debug, thiserror::Error)]
pub enum ActuateError {
    #[error(transparent)]
    Desktop(#[from] DesktopError),

    #[error(transparent)]
    Volume(#[from] VolumeError),
}

/// Applies controller actions to the OS
pub struct Actuator {
    desktop: Box<dyn Desktop>,
    volume: Box<dyn VolumeController>,
    /// Wheel notches per scroll action
    scroll_step: i32,
}

impl Actuator {
    pub fn new(desktop: Box<dyn Desktop>, volume: Box<dyn VolumeController>, scroll_step: i32) -> Self {
        Self {
            desktop,
            volume,
            scroll_step,
        }
    }

    /// Apply actions in order, stopping at the first failure
    pub fn apply(&mut self, actions: &[Action]) -> Result<(), ActuateError> {
        for action in actions {
            debug!(?action, "applying action");
            match *action {
                Action::Scroll { direction } => self.desktop.scroll(direction, self.scroll_step)?,
                Action::SetVolume { level_db, .. } => self.volume.set_master_level(level_db)?,
                Action::MoveCursor { x, y } => self.desktop.move_cursor(x, y)?,
                Action::Click => self.desktop.click()?,
            }
        }
        Ok(())
    }
}
