//! Error taxonomy for device discovery and session I/O.
//!
//! A receive timeout is deliberately *not* represented here: it is an
//! expected outcome, surfaced as `Ok(None)` by
//! [`DeviceSession::receive`](crate::session::DeviceSession::receive).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating or talking to an RPMsg device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No entry under the device directory matched the `rpmsg` prefix at all.
    /// Usually means the remote firmware has not been started.
    #[error(
        "no RPMsg devices found under {dir}; is the remote firmware loaded?\n\
         try: echo start > /sys/class/remoteproc/remoteproc0/state"
    )]
    NoDevice { dir: PathBuf },

    /// Only control devices (`rpmsg_ctrl*`) were present.  The firmware is
    /// running but has not announced an endpoint yet.
    #[error(
        "no RPMsg endpoint devices under {dir} (control devices present: {controls:?}); \
         the firmware may not have created an endpoint"
    )]
    NoEndpoint { dir: PathBuf, controls: Vec<String> },

    /// The device node could not be opened (permissions, missing node, busy).
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A send or receive was attempted without an open handle.
    #[error("not connected; call connect() first")]
    NotConnected,

    /// A read or write syscall on the open descriptor failed.
    #[error("device I/O error: {0}")]
    Io(#[from] io::Error),
}
