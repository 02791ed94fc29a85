//! The RPMsg device session: open, send, receive with a bounded wait.
//!
//! # Why `O_NONBLOCK` plus `AsyncFd`?
//!
//! RPMsg character devices support `poll`, so the bounded receive wait is
//! implemented with the platform readiness primitive rather than a
//! sleep-and-retry loop.  The descriptor is opened with `O_NONBLOCK` and
//! registered with the tokio reactor through [`AsyncFd`]; `receive` then
//! awaits readability under [`tokio::time::timeout`].  The caller never
//! blocks meaningfully longer than the timeout it asked for.
//!
//! The session is deliberately thin.  One write per send, one read per
//! receive, no short-write verification, and no correlation between a
//! request and the reply it elicits: if an unsolicited message arrives
//! between a send and the following receive, it is surfaced as the reply.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::unix::AsyncFd;
use tokio::time;
use tracing::{debug, trace};

use crate::discovery;
use crate::error::DeviceError;

/// Upper bound on a single inbound read.  Matches the RPMsg buffer size used
/// by the remote firmware; anything beyond this stays queued in the kernel
/// for a subsequent receive.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Default bound on a receive wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// A session with one RPMsg endpoint.
///
/// Holds at most one open handle.  Lifecycle is
/// `{Disconnected} --connect--> {Connected} --close--> {Disconnected}`;
/// send and receive are only valid while connected and there is no
/// reconnection logic.
pub struct DeviceSession {
    path: PathBuf,
    handle: Option<AsyncFd<File>>,
}

impl DeviceSession {
    /// Creates a disconnected session for `device`, or for the first
    /// discovered endpoint when `device` is `None`.
    ///
    /// # Errors
    ///
    /// Propagates discovery failures ([`DeviceError::NoDevice`],
    /// [`DeviceError::NoEndpoint`]) when auto-detection is requested.
    pub fn new(device: Option<PathBuf>) -> Result<Self, DeviceError> {
        let path = match device {
            Some(path) => path,
            None => discovery::discover()?,
        };
        Ok(Self { path, handle: None })
    }

    /// Path of the device node this session targets.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a handle is currently open.
    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Opens the device node read+write, non-blocking, and registers it with
    /// the reactor.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Open`] on any OS-level open failure
    /// (permissions, missing node, busy device).
    pub fn connect(&mut self) -> Result<(), DeviceError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&self.path)
            .map_err(|source| DeviceError::Open {
                path: self.path.clone(),
                source,
            })?;

        let fd = AsyncFd::new(file).map_err(|source| DeviceError::Open {
            path: self.path.clone(),
            source,
        })?;

        debug!(device = %self.path.display(), "device opened");
        self.handle = Some(fd);
        Ok(())
    }

    /// Releases the handle.  Idempotent; a no-op when already disconnected.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!(device = %self.path.display(), "device closed");
        }
    }

    /// Writes `text` to the device as UTF-8 in a single call and returns the
    /// byte count the kernel reports.
    ///
    /// A short write is returned as-is, not retried: the transport delivers
    /// whole buffers or errors, so the count is informational.
    ///
    /// # Errors
    ///
    /// [`DeviceError::NotConnected`] without an open handle,
    /// [`DeviceError::Io`] when the write syscall fails.
    pub fn send(&mut self, text: &str) -> Result<usize, DeviceError> {
        let fd = self.handle.as_ref().ok_or(DeviceError::NotConnected)?;

        let mut file: &File = fd.get_ref();
        let written = file.write(text.as_bytes())?;
        trace!(bytes = written, message = text, "sent");
        Ok(written)
    }

    /// Waits up to `timeout` for the device to become readable, then performs
    /// exactly one read of up to [`MAX_MESSAGE_LEN`] bytes.
    ///
    /// Returns `Ok(None)` when the timeout elapses first — a timeout is an
    /// expected outcome, not an error.  Invalid UTF-8 in the payload is
    /// replaced with U+FFFD rather than rejected.
    ///
    /// # Errors
    ///
    /// [`DeviceError::NotConnected`] without an open handle,
    /// [`DeviceError::Io`] when the readiness wait or the read syscall fails.
    pub async fn receive(&mut self, timeout: Duration) -> Result<Option<String>, DeviceError> {
        let fd = self.handle.as_ref().ok_or(DeviceError::NotConnected)?;

        match time::timeout(timeout, Self::read_chunk(fd)).await {
            Ok(result) => result.map(Some),
            Err(_elapsed) => {
                debug!(?timeout, "no data before timeout");
                Ok(None)
            }
        }
    }

    /// Sends `text`, then waits for one reply.  No atomicity between the two
    /// steps; single-client access to the device is assumed.
    pub async fn send_and_receive(
        &mut self,
        text: &str,
        timeout: Duration,
    ) -> Result<Option<String>, DeviceError> {
        self.send(text)?;
        self.receive(timeout).await
    }

    /// Awaits readability and reads one chunk.
    ///
    /// The readiness guard can report a false positive (another reader drained
    /// the queue, or the kernel coalesced events); `try_io` clears the ready
    /// state on `WouldBlock` and the loop re-arms the wait.
    async fn read_chunk(fd: &AsyncFd<File>) -> Result<String, DeviceError> {
        loop {
            let mut guard = fd.readable().await?;

            match guard.try_io(|inner| {
                let mut buf = [0u8; MAX_MESSAGE_LEN];
                let mut file: &File = inner.get_ref();
                file.read(&mut buf).map(|n| buf[..n].to_vec())
            }) {
                Ok(Ok(bytes)) => {
                    trace!(bytes = bytes.len(), "received");
                    return Ok(String::from_utf8_lossy(&bytes).into_owned());
                }
                Ok(Err(e)) => return Err(DeviceError::Io(e)),
                Err(_would_block) => continue,
            }
        }
    }
}
