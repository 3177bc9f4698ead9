//! Configuration loading and management

use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::state::{CursorArea, PinchRange};

/// Daemon configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Command line of the camera/model helper (protocol in README.md)
    pub helper_command: String,

    /// Camera device index
    pub camera_index: u32,
    /// Requested capture width
    pub camera_width: u32,
    /// Requested capture height
    pub camera_height: u32,

    /// Maximum number of hands the model tracks
    pub max_hands: usize,
    /// Minimum detection confidence
    pub detection_confidence: f32,
    /// Minimum tracking confidence
    pub tracking_confidence: f32,
    /// Draw the landmark skeleton on the preview
    pub draw_landmarks: bool,

    /// Camera rectangle steering the cursor
    pub cursor_area: CursorArea,
    /// Pinch distances mapped onto the volume range
    pub pinch: PinchRange,
    /// Lowest volume level in decibels
    pub volume_floor_db: f32,
    /// Wheel notches per scroll frame
    pub scroll_step: i32,

    /// Key in the preview window that ends the session
    pub quit_key: String,
    /// Log actions instead of injecting input
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            helper_command: "python3 hand_feed.py".to_string(),
            camera_index: 0,
            camera_width: 640,
            camera_height: 480,
            max_hands: 1,
            detection_confidence: 0.85,
            tracking_confidence: 0.8,
            draw_landmarks: true,
            cursor_area: CursorArea::default(),
            pinch: PinchRange::default(),
            volume_floor_db: -63.0,
            scroll_step: 3,
            quit_key: "q".to_string(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(command) = lookup("HANDMODE_HELPER") {
            if command.trim().is_empty() {
                bail!("HANDMODE_HELPER is empty");
            }
            config.helper_command = command;
        }
        if let Some(key) = lookup("HANDMODE_QUIT_KEY") {
            if key.is_empty() {
                bail!("HANDMODE_QUIT_KEY is empty");
            }
            config.quit_key = key;
        }

        parse_into(&lookup, "HANDMODE_CAMERA_INDEX", &mut config.camera_index)?;
        parse_into(&lookup, "HANDMODE_CAMERA_WIDTH", &mut config.camera_width)?;
        parse_into(&lookup, "HANDMODE_CAMERA_HEIGHT", &mut config.camera_height)?;
        parse_into(&lookup, "HANDMODE_MAX_HANDS", &mut config.max_hands)?;
        parse_into(&lookup, "HANDMODE_DETECTION_CONFIDENCE", &mut config.detection_confidence)?;
        parse_into(&lookup, "HANDMODE_TRACKING_CONFIDENCE", &mut config.tracking_confidence)?;
        parse_into(&lookup, "HANDMODE_DRAW_LANDMARKS", &mut config.draw_landmarks)?;
        parse_into(&lookup, "HANDMODE_VOLUME_FLOOR_DB", &mut config.volume_floor_db)?;
        parse_into(&lookup, "HANDMODE_SCROLL_STEP", &mut config.scroll_step)?;
        parse_into(&lookup, "HANDMODE_DRY_RUN", &mut config.dry_run)?;

        if let Some(raw) = lookup("HANDMODE_CURSOR_RECT") {
            let [left, top, right, bottom] = parse_list::<i32, 4>("HANDMODE_CURSOR_RECT", &raw)?;
            if left >= right || top >= bottom {
                bail!("HANDMODE_CURSOR_RECT must be left,top,right,bottom with left<right and top<bottom");
            }
            config.cursor_area = CursorArea { left, top, right, bottom };
        }
        if let Some(raw) = lookup("HANDMODE_PINCH_RANGE") {
            let [near, far] = parse_list::<f32, 2>("HANDMODE_PINCH_RANGE", &raw)?;
            if near >= far {
                bail!("HANDMODE_PINCH_RANGE must be near,far with near<far");
            }
            config.pinch = PinchRange { near, far };
        }

        for (name, value) in [
            ("HANDMODE_DETECTION_CONFIDENCE", config.detection_confidence),
            ("HANDMODE_TRACKING_CONFIDENCE", config.tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} must be within 0.0..=1.0, got {value}");
            }
        }
        if config.max_hands == 0 {
            bail!("HANDMODE_MAX_HANDS must be at least 1");
        }
        if config.scroll_step <= 0 {
            bail!("HANDMODE_SCROLL_STEP must be at least 1, got {}", config.scroll_step);
        }

        Ok(config)
    }
}

fn parse_into<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}"))?;
    }
    Ok(())
}

fn parse_list<T, const N: usize>(key: &str, raw: &str) -> Result<[T; N]>
where
    T: FromStr + Copy + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != N {
        bail!("{key} expects {N} comma separated values, got {raw:?}");
    }
    let mut out = [T::default(); N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid {key} component {part:?}"))?;
    }
    Ok(out)
}
