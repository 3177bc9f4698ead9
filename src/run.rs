//! Main event loop
//!
//! Drives the session from helper messages until the quit key, the helper
//! going away or a shutdown signal ends it.

use std::future::Future;
use std::io::ErrorKind;

use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::events::ModeEvent;
use crate::feed::{FeedError, FeedMessage, FeedReader, FeedWriter};
use crate::session::Session;

/// Why the loop ended normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    QuitKey,
    HelperClosed,
    Signal,
}

/// What woke the main loop
enum Wake {
    Feed(Result<Option<FeedMessage>, FeedError>),
    Event(Result<ModeEvent, broadcast::error::RecvError>),
    Shutdown(std::io::Result<()>),
}

/// Run frames through `session` until the loop is told to stop
///
/// Helper EOF on either pipe counts as a normal exit; a camera failure
/// and any other error end the loop with an error.
pub async fn run<R, W>(
    reader: &mut FeedReader<R>,
    writer: &mut FeedWriter<W>,
    session: &mut Session,
    events: &mut broadcast::Receiver<ModeEvent>,
    shutdown: impl Future<Output = std::io::Result<()>>,
    quit_key: &str,
) -> Result<Exit>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tokio::pin!(shutdown);

    loop {
        let wake = tokio::select! {
            message = reader.next_message() => Wake::Feed(message),
            event = events.recv() => Wake::Event(event),
            result = &mut shutdown => Wake::Shutdown(result),
        };

        match wake {
            Wake::Feed(Ok(Some(FeedMessage::Frame(frame)))) => {
                let reply = session.process(frame)?;
                match writer.send(&reply).await {
                    Ok(()) => {}
                    Err(FeedError::Io(e)) if e.kind() == ErrorKind::BrokenPipe => {
                        info!("feed helper closed its input");
                        return Ok(Exit::HelperClosed);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Wake::Feed(Ok(Some(FeedMessage::Key { key }))) => {
                if key == quit_key {
                    info!(%key, "quit key pressed");
                    return Ok(Exit::QuitKey);
                }
                debug!(%key, "ignoring key");
            }
            Wake::Feed(Ok(Some(FeedMessage::CameraError { message }))) => {
                error!(%message, "camera failure");
                return Err(anyhow!("camera failure: {message}"));
            }
            Wake::Feed(Ok(None)) => {
                info!("feed helper closed its output");
                return Ok(Exit::HelperClosed);
            }
            Wake::Feed(Err(e)) => return Err(e.into()),
            Wake::Event(Ok(event)) => {
                info!(%event, "mode event");
            }
            Wake::Event(Err(broadcast::error::RecvError::Lagged(n))) => {
                warn!(skipped = n, "mode event receiver lagged");
            }
            Wake::Event(Err(broadcast::error::RecvError::Closed)) => {
                return Err(anyhow!("mode event channel closed"));
            }
            Wake::Shutdown(result) => {
                info!("shutdown signal received");
                return result.map(|()| Exit::Signal).map_err(Into::into);
            }
        }
    }
}
