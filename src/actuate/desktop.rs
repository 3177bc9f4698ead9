//! Pointer and wheel injection
//!
//! `EnigoDesktop` drives the real OS input queue. `LogDesktop` only records
//! what would have happened, for dry runs without a display.

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Mouse, Settings};
use tracing::info;

use super::ScrollDirection;

/// Errors from the OS input layer
#[derive(Debug, thiserror::Error)]
pub enum DesktopError {
    #[error("failed to connect to the display server: {0}")]
    Connect(String),

    #[error("input injection failed: {0}")]
    Input(String),
}

/// OS cursor, click and scroll capability
pub trait Desktop {
    /// Main display size in pixels
    fn screen_size(&self) -> Result<(i32, i32), DesktopError>;

    /// Move the pointer to absolute screen coordinates
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), DesktopError>;

    /// Left click at the current pointer position
    fn click(&mut self) -> Result<(), DesktopError>;

    /// Scroll the wheel by `amount` notches
    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), DesktopError>;
}

/// Real desktop input through enigo
pub struct EnigoDesktop {
    enigo: Enigo,
}

impl EnigoDesktop {
    pub fn new() -> Result<Self, DesktopError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| DesktopError::Connect(e.to_string()))?;
        Ok(Self { enigo })
    }
}

fn input_err(e: enigo::InputError) -> DesktopError {
    DesktopError::Input(e.to_string())
}

impl Desktop for EnigoDesktop {
    fn screen_size(&self) -> Result<(i32, i32), DesktopError> {
        self.enigo.main_display().map_err(input_err)
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), DesktopError> {
        self.enigo.move_mouse(x, y, Coordinate::Abs).map_err(input_err)
    }

    fn click(&mut self) -> Result<(), DesktopError> {
        self.enigo.button(Button::Left, Direction::Click).map_err(input_err)
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), DesktopError> {
        // enigo scrolls down for positive lengths
        let length = match direction {
            ScrollDirection::Up => -amount,
            ScrollDirection::Down => amount,
        };
        self.enigo.scroll(length, Axis::Vertical).map_err(input_err)
    }
}

/// Dry-run desktop that logs instead of injecting input
#[derive(Debug)]
pub struct LogDesktop {
    screen: (i32, i32),
}

impl LogDesktop {
    pub fn new(screen: (i32, i32)) -> Self {
        Self { screen }
    }
}

impl Desktop for LogDesktop {
    fn screen_size(&self) -> Result<(i32, i32), DesktopError> {
        Ok(self.screen)
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), DesktopError> {
        info!(x, y, "dry run: move cursor");
        Ok(())
    }

    fn click(&mut self) -> Result<(), DesktopError> {
        info!("dry run: click");
        Ok(())
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), DesktopError> {
        info!(?direction, amount, "dry run: scroll");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_desktop_reports_configured_screen() {
        let mut desktop = LogDesktop::new((1280, 720));
        assert_eq!(desktop.screen_size().unwrap(), (1280, 720));
        assert!(desktop.move_cursor(10, 10).is_ok());
        assert!(desktop.scroll(ScrollDirection::Up, 3).is_ok());
        assert!(desktop.click().is_ok());
    }
}
