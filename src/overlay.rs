//! On-screen feedback drawn by the feed helper
//!
//! The daemon never touches pixels. Each processed frame produces a list of
//! draw commands that the helper renders over the camera image.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);
    pub const RED: Color = Color(255, 0, 0);
    pub const GREEN: Color = Color(0, 255, 0);
    pub const BLUE: Color = Color(0, 0, 255);
    pub const YELLOW: Color = Color(255, 255, 0);
    pub const GOLD: Color = Color(255, 215, 0);
    pub const TEAL: Color = Color(0, 206, 209);
    pub const MINT: Color = Color(127, 255, 215);
}

/// Pixel position in the camera image
pub type Point = (i32, i32);

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DrawCommand {
    Text {
        text: String,
        at: Point,
        scale: f32,
        color: Color,
        thickness: u32,
    },
    Circle {
        center: Point,
        radius: u32,
        color: Color,
        filled: bool,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        thickness: u32,
    },
    /// Outline when `thickness` is set, filled otherwise
    Rect {
        top_left: Point,
        bottom_right: Point,
        color: Color,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thickness: Option<u32>,
    },
    /// The model's landmark skeleton for the given hand
    HandSkeleton { hand: usize },
}

impl DrawCommand {
    pub fn text(text: impl Into<String>, at: Point, color: Color) -> Self {
        DrawCommand::Text {
            text: text.into(),
            at,
            scale: 3.0,
            color,
            thickness: 3,
        }
    }

    pub fn dot(center: Point, radius: u32, color: Color) -> Self {
        DrawCommand::Circle { center, radius, color, filled: true }
    }
}

/// Frames-per-second readout
#[derive(Debug)]
pub struct FpsMeter {
    last: Option<Instant>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Record a frame and return the instantaneous rate
    pub fn tick(&mut self) -> u32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> u32 {
        let fps = match self.last {
            Some(prev) => {
                let secs = now.duration_since(prev).as_secs_f64();
                if secs > 0.0 { (1.0 / secs) as u32 } else { 0 }
            }
            None => 0,
        };
        self.last = Some(now);
        fps
    }

    /// Overlay showing the current rate in the top-right corner
    pub fn overlay(fps: u32) -> DrawCommand {
        DrawCommand::Text {
            text: format!("FPS:{fps}"),
            at: (480, 50),
            scale: 1.0,
            color: Color::BLUE,
            thickness: 2,
        }
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}
