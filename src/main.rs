//! handmode: hand-gesture desktop control daemon
//!
//! Reads per-frame hand landmarks from a camera/model helper process and
//! maps hand poses onto three desktop modes:
//! - Scroll: index finger up scrolls up, index+middle scrolls down
//! - Volume: thumb/index pinch width sets the master volume (Windows)
//! - Cursor: index tip steers the pointer, closing the thumb clicks
//!
//! A fist (or the mode's release pose) returns to Neutral, from where a new
//! mode can be selected.

mod actuate;
mod config;
mod events;
mod feed;
mod landmarks;
mod lifecycle;
mod overlay;
mod run;
mod session;
mod state;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::actuate::{platform_volume, Actuator, Desktop, EnigoDesktop, LogDesktop};
use crate::config::Config;
use crate::events::ModeEvent;
use crate::feed::{DaemonMessage, Helper};
use crate::landmarks::HandDetector;
use crate::lifecycle::ShutdownSignal;
use crate::session::Session;
use crate::state::{ControllerSettings, GestureController};

/// Screen size assumed by dry runs
const DRY_RUN_SCREEN: (i32, i32) = (1920, 1080);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "handmode starting"
    );

    // Load configuration
    let config = Config::load()?;
    info!(
        helper = %config.helper_command,
        camera = config.camera_index,
        dry_run = config.dry_run,
        "configuration loaded"
    );

    // OS capabilities
    let desktop: Box<dyn Desktop> = if config.dry_run {
        Box::new(LogDesktop::new(DRY_RUN_SCREEN))
    } else {
        Box::new(EnigoDesktop::new()?)
    };
    let screen = desktop.screen_size()?;
    let volume = platform_volume();
    let volume_range = volume.range().map(|r| r.with_floor(config.volume_floor_db));
    info!(?screen, ?volume_range, "desktop capabilities");

    // Controller -> main loop (for logging mode events)
    let (event_tx, mut event_rx) = broadcast::channel::<ModeEvent>(64);

    let controller = GestureController::new(
        ControllerSettings {
            cursor_area: config.cursor_area,
            pinch: config.pinch,
            screen,
            volume: volume_range,
        },
        event_tx,
    );
    let detector = HandDetector::new(
        config.max_hands,
        config.detection_confidence,
        config.tracking_confidence,
    );
    let capture = detector.capture_settings(
        config.camera_index,
        config.camera_width,
        config.camera_height,
    );
    let actuator = Actuator::new(desktop, volume, config.scroll_step);
    let mut session = Session::new(detector, controller, actuator, config.draw_landmarks);

    // Start the camera/model helper
    let mut helper = Helper::spawn(&config.helper_command)?;
    let (reader, writer) = helper.pipes();
    writer.send(&DaemonMessage::Configure(capture)).await?;

    let shutdown = ShutdownSignal::new();

    info!("daemon initialized, entering main loop");

    let outcome = run::run(
        reader,
        writer,
        &mut session,
        &mut event_rx,
        shutdown.wait(),
        &config.quit_key,
    )
    .await;
    if let Ok(exit) = &outcome {
        info!(?exit, "main loop finished");
    }

    // Cleanup
    info!("shutting down...");
    helper.shutdown().await;
    info!(mode = %session.state().mode, "handmode stopped");

    outcome.map(|_| ())
}
