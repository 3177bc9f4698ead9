//! Feed helper process and line codec
//!
//! The helper owns the camera, the landmark model and the display window.
//! It writes one JSON message per line on stdout and reads overlay replies
//! on stdin.

use std::process::Stdio;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use super::protocol::{DaemonMessage, FeedMessage};

/// Errors that can occur while talking to the feed helper
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("helper command is empty")]
    EmptyCommand,

    #[error("failed to spawn helper `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("helper pipe unavailable: {0}")]
    MissingPipe(&'static str),

    #[error("helper I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed helper message {line:?}: {source}")]
    Decode {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Decodes helper messages from a line stream
pub struct FeedReader<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> FeedReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines() }
    }

    /// Read the next message, `None` once the helper closed its output
    ///
    /// Cancel safe: a partially read line is kept for the next call.
    pub async fn next_message(&mut self) -> Result<Option<FeedMessage>, FeedError> {
        while let Some(line) = self.lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let message = serde_json::from_str(trimmed).map_err(|source| FeedError::Decode {
                line: trimmed.to_string(),
                source,
            })?;
            return Ok(Some(message));
        }
        Ok(None)
    }
}

/// Encodes daemon messages as JSON lines
pub struct FeedWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FeedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn send(&mut self, message: &DaemonMessage) -> Result<(), FeedError> {
        let mut bytes = serde_json::to_vec(message).map_err(FeedError::Encode)?;
        bytes.push(b'\n');
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Running feed helper child process
pub struct Helper {
    child: Child,
    reader: FeedReader<BufReader<ChildStdout>>,
    writer: FeedWriter<ChildStdin>,
}

impl Helper {
    /// Spawn the helper from a whitespace separated command line
    pub fn spawn(command_line: &str) -> Result<Self, FeedError> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or(FeedError::EmptyCommand)?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FeedError::Spawn {
                command: command_line.to_string(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(FeedError::MissingPipe("stdout"))?;
        let stdin = child.stdin.take().ok_or(FeedError::MissingPipe("stdin"))?;

        info!(command = command_line, pid = ?child.id(), "feed helper started");

        Ok(Self {
            child,
            reader: FeedReader::new(BufReader::new(stdout)),
            writer: FeedWriter::new(stdin),
        })
    }

    /// The helper's output and input, borrowed together
    pub fn pipes(
        &mut self,
    ) -> (&mut FeedReader<BufReader<ChildStdout>>, &mut FeedWriter<ChildStdin>) {
        (&mut self.reader, &mut self.writer)
    }

    /// Stop the helper and wait for it to exit
    pub async fn shutdown(mut self) {
        if let Err(e) = self.child.start_kill() {
            debug!(?e, "helper already exited");
        }
        match self.child.wait().await {
            Ok(status) => info!(%status, "feed helper stopped"),
            Err(e) => warn!(?e, "failed to reap feed helper"),
        }
    }
}
