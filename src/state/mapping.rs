//! Linear mappings from hand geometry to actuator values

use serde::{Deserialize, Serialize};

/// Map `x` from `[x0, x1]` onto `[y0, y1]`, clamping outside the input range
pub fn interp(x: f32, (x0, x1): (f32, f32), (y0, y1): (f32, f32)) -> f32 {
    if x <= x0 {
        y0
    } else if x >= x1 {
        y1
    } else {
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }
}

/// Euclidean distance between two pixel positions
pub fn distance(a: (i32, i32), b: (i32, i32)) -> f32 {
    let (dx, dy) = ((b.0 - a.0) as f32, (b.1 - a.1) as f32);
    (dx * dx + dy * dy).sqrt()
}

/// Round a screen coordinate down to an even pixel
pub fn snap_even(v: i32) -> i32 {
    v - v.rem_euclid(2)
}

/// Master volume range in decibels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub min_db: f32,
    pub max_db: f32,
}

impl VolumeRange {
    /// Raise the lower bound to `floor_db`, since the bottom of most
    /// endpoint ranges is inaudible
    pub fn with_floor(self, floor_db: f32) -> Self {
        Self {
            min_db: self.min_db.max(floor_db).min(self.max_db),
            max_db: self.max_db,
        }
    }

    /// Level as a 0-100 percentage of the range
    pub fn percent(&self, level_db: f32) -> f32 {
        interp(level_db, (self.min_db, self.max_db), (0.0, 100.0))
    }
}

/// Thumb-to-index distances mapped onto the volume range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinchRange {
    /// Distance mapped to the minimum level
    pub near: f32,
    /// Distance mapped to the maximum level
    pub far: f32,
}

impl Default for PinchRange {
    fn default() -> Self {
        Self { near: 50.0, far: 200.0 }
    }
}

impl PinchRange {
    pub fn level(&self, distance: f32, range: VolumeRange) -> f32 {
        interp(distance, (self.near, self.far), (range.min_db, range.max_db))
    }
}

/// Camera-space rectangle the index tip moves in to steer the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorArea {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Default for CursorArea {
    fn default() -> Self {
        Self {
            left: 110,
            top: 20,
            right: 620,
            bottom: 350,
        }
    }
}

impl CursorArea {
    /// Map a camera position to screen pixels in `[0, w-1] x [0, h-1]`
    pub fn to_screen(&self, (x, y): (i32, i32), (width, height): (i32, i32)) -> (i32, i32) {
        let sx = interp(
            x as f32,
            (self.left as f32, self.right as f32),
            (0.0, (width - 1) as f32),
        );
        let sy = interp(
            y as f32,
            (self.top as f32, self.bottom as f32),
            (0.0, (height - 1) as f32),
        );
        (sx as i32, sy as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: VolumeRange = VolumeRange { min_db: -63.0, max_db: 0.0 };

    #[test]
    fn test_interp_clamps() {
        assert_eq!(interp(0.0, (50.0, 200.0), (0.0, 10.0)), 0.0);
        assert_eq!(interp(125.0, (50.0, 200.0), (0.0, 10.0)), 5.0);
        assert_eq!(interp(500.0, (50.0, 200.0), (0.0, 10.0)), 10.0);
    }

    #[test]
    fn test_interp_descending_output() {
        assert_eq!(interp(-63.0, (-63.0, 0.0), (400.0, 150.0)), 400.0);
        assert_eq!(interp(0.0, (-63.0, 0.0), (400.0, 150.0)), 150.0);
    }

    #[test]
    fn test_pinch_bounds_map_to_percent_bounds() {
        let pinch = PinchRange::default();
        let near = distance((100, 100), (130, 140));
        let far = distance((100, 100), (220, 260));
        assert_eq!(near, 50.0);
        assert_eq!(far, 200.0);

        assert_eq!(RANGE.percent(pinch.level(near, RANGE)), 0.0);
        assert_eq!(RANGE.percent(pinch.level(far, RANGE)), 100.0);
    }

    #[test]
    fn test_volume_floor() {
        let os = VolumeRange { min_db: -96.0, max_db: 0.0 };
        assert_eq!(os.with_floor(-63.0), RANGE);

        let narrow = VolumeRange { min_db: -20.0, max_db: 0.0 };
        assert_eq!(narrow.with_floor(-63.0), narrow);
    }

    #[test]
    fn test_cursor_corners() {
        let area = CursorArea::default();
        let screen = (1920, 1080);
        assert_eq!(area.to_screen((110, 20), screen), (0, 0));
        assert_eq!(area.to_screen((620, 350), screen), (1919, 1079));
        assert_eq!(area.to_screen((0, 479), screen), (0, 1079));
    }

    #[test]
    fn test_snap_even() {
        assert_eq!(snap_even(1919), 1918);
        assert_eq!(snap_even(1080), 1080);
        assert_eq!(snap_even(0), 0);
    }
}
