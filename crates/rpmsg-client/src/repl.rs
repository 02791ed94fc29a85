//! Interactive mode: a line-oriented REPL over the device session.
//!
//! One line in, one send, one bounded receive, one line (or a timeout
//! notice) out.  Ctrl-C while waiting at the prompt abandons the current
//! line and re-prompts; it never tears the process down from inside the
//! loop.  End-of-input exits cleanly, same as `quit`.

use std::io::Write as _;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::debug;

use rpmsg_core::{DeviceSession, DEFAULT_TIMEOUT};

/// What a single input line asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplAction {
    /// Forward this text to the device.
    Send(String),
    /// Blank input; re-prompt without sending.
    Skip,
    /// Leave the loop.
    Quit,
}

/// Classifies one input line.  Pure so the loop contract is unit testable.
pub fn classify_line(line: &str) -> ReplAction {
    let cmd = line.trim();
    if cmd.is_empty() {
        return ReplAction::Skip;
    }
    if matches!(cmd.to_lowercase().as_str(), "quit" | "exit" | "q") {
        return ReplAction::Quit;
    }
    ReplAction::Send(cmd.to_string())
}

/// Runs the REPL until `quit`, end-of-input, or an I/O failure.
pub async fn run(session: &mut DeviceSession) -> anyhow::Result<()> {
    println!("=== RPMsg interactive mode ===");
    println!("Commands: ping, status, echo <message>, quit");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("rpmsg> ");
        std::io::stdout().flush().context("flush prompt")?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("read input line")?,
            _ = signal::ctrl_c() => {
                println!();
                println!("Interrupted. Type 'quit' to exit.");
                continue;
            }
        };

        let Some(line) = line else {
            // EOF (piped input exhausted, or Ctrl-D at the terminal).
            println!();
            break;
        };

        match classify_line(&line) {
            ReplAction::Skip => continue,
            ReplAction::Quit => {
                println!("Exiting...");
                break;
            }
            ReplAction::Send(message) => {
                debug!(%message, "sending interactive command");
                match session.send_and_receive(&message, DEFAULT_TIMEOUT).await? {
                    Some(reply) => println!("{reply}"),
                    None => println!(
                        "No response within {} s (timeout)",
                        DEFAULT_TIMEOUT.as_secs_f64()
                    ),
                }
                println!();
            }
        }
    }

    Ok(())
}
