//! `trowel` command-line entry point.

use clap::Parser;
use trowel_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    trowel_cli::run(Cli::parse()).await
}
