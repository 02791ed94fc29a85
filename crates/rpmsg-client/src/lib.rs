//! # rpmsg-client
//!
//! Front end for talking to a coprocessor over an RPMsg character device:
//! argument parsing, optional TOML configuration, the interactive REPL, and
//! the one-shot batch mode.  All device I/O lives in `rpmsg-core`.

pub mod cli;
pub mod config;
pub mod repl;
