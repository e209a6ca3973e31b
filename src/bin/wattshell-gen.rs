//! Alias-table generator binary.
//!
//! Fetches the vendor's property schema, extracts (alias, wire key) pairs,
//! and rewrites `src/mapping/table.rs`. Run from the repository root
//! whenever the vendor publishes a new schema revision; the output is
//! deterministic so the diff shows exactly what changed.
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wsh::gen;

#[derive(Parser, Debug)]
#[command(name = "wattshell-gen", version, about, long_about = None)]
struct Args {
    /// Schema document URL
    #[arg(long, default_value = "https://schema.wattshell.dev/charger.yaml")]
    url: String,

    /// Output path for the generated table
    #[arg(long, default_value = "src/mapping/table.rs")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    wsh::logging::init("info")?;
    let args = Args::parse();

    let bytes = gen::fetch_schema(&args.url).await?;
    let table = gen::parse_schema(&bytes)?;
    let artifact = gen::emit_table(&table);

    // Stage next to the target and rename, so a failed run never leaves a
    // partial artifact behind.
    let staging = args.output.with_extension("rs.tmp");
    std::fs::write(&staging, &artifact)
        .with_context(|| format!("failed to write {}", staging.display()))?;
    std::fs::rename(&staging, &args.output)
        .with_context(|| format!("failed to move artifact into {}", args.output.display()))?;

    info!(
        entries = table.len(),
        output = %args.output.display(),
        "alias table regenerated"
    );
    Ok(())
}
