//! Interactive command dispatch loop.
//!
//! Three event sources feed the loop: operator input lines, asynchronous
//! controller notifications, and a shutdown trigger. The stdin read runs
//! on its own blocking task and forwards completed lines through a
//! channel, so all three sources are uniformly pollable in one `select!`
//! and a signal never waits on the next keyboard line. Exactly one event
//! is consumed per cycle, and a command action always runs to completion
//! before the next event is considered.

mod commands;

pub use commands::Command;

use std::future::Future;
use std::io::{BufRead, Write};

use console::style;
use tokio::sync::mpsc;
use tracing::debug;

use crate::device::SharedSession;
use crate::error::{Result, WshError};

/// Spawn the blocking stdin reader. Dropping the returned receiver stops
/// the task on its next completed line; the task closing the channel
/// (stdin EOF or read failure) is fatal to the loop.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run dispatch cycles until shutdown or a fatal input-stream failure.
///
/// `shutdown` is typically `tokio::signal::ctrl_c()`; tests inject their
/// own future. On shutdown the session is disconnected before returning,
/// even if the trigger arrives while no line is pending.
pub async fn run_loop(
    session: SharedSession,
    mut lines: mpsc::UnboundedReceiver<String>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let mut notifications = session.subscribe();
    let mut notifications_open = true;
    tokio::pin!(shutdown);

    loop {
        prompt();
        tokio::select! {
            note = notifications.recv(), if notifications_open => {
                match note {
                    Some(note) => println!("{note}"),
                    None => notifications_open = false,
                }
            }
            () = &mut shutdown => {
                debug!("shutdown requested");
                session.disconnect().await;
                return Ok(());
            }
            line = lines.recv() => {
                match line {
                    Some(line) => dispatch_line(&*session, &line).await,
                    None => {
                        return Err(WshError::InputStream(
                            "operator input stream closed".to_string(),
                        ));
                    }
                }
            }
        }
    }
}

/// One `Dispatching` transition: tokenize, look up, validate, run.
async fn dispatch_line(session: &dyn crate::device::DeviceSession, line: &str) {
    let mut words = line.split_whitespace().map(String::from);
    let Some(name) = words.next() else {
        return; // blank line, no output
    };
    let args: Vec<String> = words.collect();

    let Some(command) = Command::lookup(&name) else {
        println!("Could not find command: {name}");
        return;
    };

    // Argument shortfall is a silent no-op, not a usage error.
    if args.len() < command.min_args() {
        return;
    }

    command.run(session, &args).await;
    println!();
}

fn prompt() {
    print!("{} ", style("wattshell>").cyan());
    let _ = std::io::stdout().flush();
}
