//! # rpmsg-core
//!
//! Shared library for the rpmsg-client utility: RPMsg endpoint discovery and
//! the [`DeviceSession`] that wraps the character device.
//!
//! RPMsg is the Linux inter-processor messaging transport: when a remote
//! coprocessor (for example the Cortex-M core on a BeaglePlay) announces an
//! endpoint, the kernel exposes it as a character device under `/dev` that
//! supports plain `read`/`write`/`poll`.  This crate finds such a device,
//! opens it non-blocking, and exchanges raw UTF-8 text with it.  There is no
//! framing, no acknowledgement protocol, and no request/response correlation;
//! the remote side's own queuing of a single prior write is the only pairing.
//!
//! This crate has no knowledge of the command-line surface.  It is used by
//! the `rpmsg-client` binary and by the integration tests, which substitute a
//! FIFO for the real device node.

pub mod discovery;
pub mod error;
pub mod session;

pub use discovery::{discover, find_endpoint, DEVICE_DIR, DEVICE_PREFIX};
pub use error::DeviceError;
pub use session::{DeviceSession, DEFAULT_TIMEOUT, MAX_MESSAGE_LEN};
