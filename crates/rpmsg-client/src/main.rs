//! rpmsg-client entry point.
//!
//! ```text
//! main()
//!  └─ config::load()          -- optional TOML config
//!  └─ DeviceSession::new()    -- explicit path or /dev discovery
//!  └─ connect()
//!  └─ repl::run()             -- `interactive` (the default command)
//!     or one send_and_receive -- batch mode
//! ```
//!
//! Exit codes: 0 success, 1 on timeout in batch mode or any error,
//! 130 on a top-level interrupt.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rpmsg_client::cli::{self, Cli};
use rpmsg_client::config::{self, AppConfig};
use rpmsg_client::repl;
use rpmsg_core::DeviceSession;

const EXIT_TIMEOUT: u8 = 1;
const EXIT_INTERRUPT: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise structured logging.  `RUST_LOG` overrides the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.client.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<ExitCode> {
    // Argument errors are reported before the device node is touched, so a
    // bad `-t` is never masked by a discovery or open failure.
    let timeout = if cli.is_interactive() {
        None
    } else {
        Some(cli::resolve_timeout(cli.timeout, config.client.timeout_secs)?)
    };

    let device = cli.device.clone().or_else(|| config.client.device.clone());

    let mut session = DeviceSession::new(device)?;
    session.connect()?;
    info!(device = %session.path().display(), "connected");

    let code = match timeout {
        None => {
            repl::run(&mut session).await?;
            ExitCode::SUCCESS
        }
        Some(timeout) => batch(&mut session, &cli.message(), timeout).await?,
    };

    session.close();
    Ok(code)
}

/// Sends one assembled command and waits for one reply.
async fn batch(
    session: &mut DeviceSession,
    message: &str,
    timeout: Duration,
) -> anyhow::Result<ExitCode> {
    // A top-level interrupt during the exchange exits with the conventional
    // SIGINT status rather than leaving a half-finished cycle running.
    let reply = tokio::select! {
        result = session.send_and_receive(message, timeout) => result?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            return Ok(ExitCode::from(EXIT_INTERRUPT));
        }
    };

    match reply {
        Some(reply) => {
            println!("{reply}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No response within {} s (timeout)", timeout.as_secs_f64());
            Ok(ExitCode::from(EXIT_TIMEOUT))
        }
    }
}
