use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::common::load_bundle;

#[derive(Args, Debug)]
pub struct Cli {
    /// Bundle written by `allowlist build`
    #[arg(short, long)]
    pub bundle: PathBuf,

    /// Member address (hex, 0x prefix optional)
    #[arg(short, long)]
    pub address: String,
}

pub fn run(cli: &Cli) -> Result<()> {
    let bundle = load_bundle(&cli.bundle)?;
    let entry = bundle
        .entry(&cli.address)
        .with_context(|| format!("{} is not in the allowlist", cli.address))?;
    println!("{}", serde_json::to_string_pretty(&entry.proof)?);
    Ok(())
}
