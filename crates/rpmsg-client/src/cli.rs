//! Command-line surface.
//!
//! ```text
//! rpmsg-client                      # interactive REPL (the default)
//! rpmsg-client ping                 # one request/response cycle
//! rpmsg-client echo Hello world     # sends "echo Hello world"
//! rpmsg-client -d /dev/rpmsg1 status
//! rpmsg-client -t 5 ping
//! ```
//!
//! The command token is not validated against a known set: the remote
//! firmware owns the command vocabulary and answers unknown commands with
//! its own notice, so any free-form token is forwarded as-is.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;

/// Name of the pseudo-command that starts the REPL instead of sending.
pub const INTERACTIVE_COMMAND: &str = "interactive";

/// Talk to a coprocessor over an RPMsg character device.
#[derive(Debug, Parser)]
#[command(name = "rpmsg-client", version, about)]
pub struct Cli {
    /// Command to send (e.g. ping, status, echo), or `interactive`
    #[arg(default_value = INTERACTIVE_COMMAND)]
    pub command: String,

    /// Additional arguments appended to the command
    pub args: Vec<String>,

    /// RPMsg device path (auto-detected when omitted)
    #[arg(short, long, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Response timeout in seconds for batch mode
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<f64>,
}

impl Cli {
    /// Whether the REPL was requested rather than a one-shot send.
    pub fn is_interactive(&self) -> bool {
        self.command == INTERACTIVE_COMMAND
    }

    /// Assembles the outbound message: the command token, then any extra
    /// arguments joined by single spaces.
    pub fn message(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// Resolves the batch-mode timeout: the `-t` flag when given, otherwise the
/// configured default.
///
/// Rejects anything that is not a positive, representable number of seconds.
/// `Duration::try_from_secs_f64` does the range check, so an absurd value
/// like `1e30` is an argument error rather than a conversion panic.
///
/// # Errors
///
/// Fails on zero, negative, NaN, or out-of-range values.
pub fn resolve_timeout(flag: Option<f64>, config_secs: f64) -> anyhow::Result<Duration> {
    let secs = flag.unwrap_or(config_secs);
    if secs.is_nan() || secs <= 0.0 {
        bail!("timeout must be a positive number of seconds, got {secs}");
    }
    match Duration::try_from_secs_f64(secs) {
        Ok(timeout) => Ok(timeout),
        Err(_) => bail!("timeout of {secs} seconds is out of range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_defaults_to_interactive() {
        let cli = Cli::try_parse_from(["rpmsg-client"]).expect("parse");

        assert!(cli.is_interactive());
        assert_eq!(cli.device, None);
        assert_eq!(cli.timeout, None);
    }

    #[test]
    fn test_echo_with_args_assembles_message() {
        let cli = Cli::try_parse_from(["rpmsg-client", "echo", "Hello"]).expect("parse");

        assert!(!cli.is_interactive());
        assert_eq!(cli.message(), "echo Hello");
    }

    #[test]
    fn test_multiple_args_join_with_single_spaces() {
        let cli =
            Cli::try_parse_from(["rpmsg-client", "echo", "Hello", "from", "the", "A53"])
                .expect("parse");

        assert_eq!(cli.message(), "echo Hello from the A53");
    }

    #[test]
    fn test_bare_command_is_sent_verbatim() {
        let cli = Cli::try_parse_from(["rpmsg-client", "ping"]).expect("parse");

        assert_eq!(cli.message(), "ping");
    }

    #[test]
    fn test_resolve_timeout_prefers_flag_over_config() {
        let timeout = resolve_timeout(Some(5.0), 2.0).expect("resolve");

        assert_eq!(timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_timeout_falls_back_to_config() {
        let timeout = resolve_timeout(None, 2.0).expect("resolve");

        assert_eq!(timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_resolve_timeout_rejects_non_positive_values() {
        assert!(resolve_timeout(Some(0.0), 2.0).is_err());
        assert!(resolve_timeout(Some(-1.5), 2.0).is_err());
        assert!(resolve_timeout(Some(f64::NAN), 2.0).is_err());
    }

    #[test]
    fn test_resolve_timeout_rejects_oversized_values_without_panicking() {
        // Larger than Duration can represent; must surface as an argument
        // error, whether it came from the flag or the config file.
        assert!(resolve_timeout(Some(1e30), 2.0).is_err());
        assert!(resolve_timeout(None, 1e30).is_err());
        assert!(resolve_timeout(Some(f64::INFINITY), 2.0).is_err());
    }

    #[test]
    fn test_device_and_timeout_flags_parse() {
        let cli = Cli::try_parse_from([
            "rpmsg-client",
            "-d",
            "/dev/rpmsg1",
            "--timeout",
            "5.5",
            "status",
        ])
        .expect("parse");

        assert_eq!(cli.device.as_deref(), Some(std::path::Path::new("/dev/rpmsg1")));
        assert_eq!(cli.timeout, Some(5.5));
        assert_eq!(cli.message(), "status");
    }
}
