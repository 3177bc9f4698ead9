//! Feed module for talking to the camera/model helper process

mod client;
mod protocol;

pub use client::{FeedError, FeedReader, FeedWriter, Helper};
pub use protocol::{CaptureSettings, DaemonMessage, FeedMessage, Frame};

#[cfg(test)]
pub use protocol::{NormalizedLandmark, TrackedHand};
