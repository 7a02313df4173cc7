#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod build_bundle;
mod common;
mod prove;
mod verify;

#[derive(Parser, Debug)]
#[command(name = "allowlist")]
#[command(about = "Build allowlist Merkle trees and check inclusion proofs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree and write the root plus every member's proof
    Build(build_bundle::Cli),
    /// Print one member's proof from a bundle
    Prove(prove::Cli),
    /// Check a proof against a root
    Verify(verify::Cli),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => build_bundle::run(&args)?,
        Commands::Prove(args) => prove::run(&args)?,
        Commands::Verify(args) => verify::run(&args)?,
    }

    Ok(())
}
