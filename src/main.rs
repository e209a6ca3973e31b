//! Wattshell - interactive shell for a network-attached EV charging controller.
#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use wsh::cli::Cli;
use wsh::device::{SharedSession, TcpSession};
use wsh::shell::{self, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = wsh::logging::init(&cli.log) {
        eprintln!("Could not set log level to '{}': {e}", cli.log);
        wsh::logging::init("warn")?;
    }

    let session: SharedSession = Arc::new(TcpSession::new(cli.host, cli.password));

    // Connect eagerly and show the initial snapshot; a failure here is
    // reported and the shell still starts, so the operator can retry with
    // the connect command.
    Command::Connect.run(&*session, &[]).await;
    Command::Status.run(&*session, &[]).await;

    let lines = shell::spawn_stdin_reader();
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    shell::run_loop(session, lines, shutdown).await?;
    Ok(())
}
