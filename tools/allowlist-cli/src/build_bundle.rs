use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use allowlist::{build_allowlist, DuplicatePolicy, HashAlgorithm, OddNodePolicy, TreeOptions};

use crate::common::{read_addresses, write_file_atomic};

#[derive(Args, Debug)]
pub struct Cli {
    /// File with one hex address per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output bundle (JSON: root and per-address proofs)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Pair hash function
    #[arg(long, value_enum, default_value_t = HashArg::Keccak256)]
    pub hash: HashArg,

    /// Build over addresses in file order instead of sorting them
    #[arg(long)]
    pub keep_order: bool,

    #[arg(long, value_enum, default_value_t = DuplicatesArg::Dedup)]
    pub duplicates: DuplicatesArg,

    /// Handling of the unpaired node on odd-sized levels
    #[arg(long, value_enum, default_value_t = OddArg::CarryUp)]
    pub odd: OddArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum HashArg {
    Keccak256,
    Blake3,
    Sha256,
}

impl From<HashArg> for HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Keccak256 => HashAlgorithm::Keccak256,
            HashArg::Blake3 => HashAlgorithm::Blake3,
            HashArg::Sha256 => HashAlgorithm::Sha256,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DuplicatesArg {
    Keep,
    Dedup,
    Reject,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OddArg {
    CarryUp,
    Duplicate,
}

impl Cli {
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            sort_leaves: !self.keep_order,
            duplicates: match self.duplicates {
                DuplicatesArg::Keep => DuplicatePolicy::Keep,
                DuplicatesArg::Dedup => DuplicatePolicy::Dedup,
                DuplicatesArg::Reject => DuplicatePolicy::Reject,
            },
            odd_node: match self.odd {
                OddArg::CarryUp => OddNodePolicy::CarryUp,
                OddArg::Duplicate => OddNodePolicy::Duplicate,
            },
        }
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let addresses = read_addresses(&cli.input)?;
    info!(count = addresses.len(), input = %cli.input.display(), "read addresses");

    let bundle = build_allowlist(&addresses, cli.hash.into(), cli.tree_options())
        .context("Failed to build allowlist")?;

    let json = bundle.to_json()?;
    write_file_atomic(&cli.output, json.as_bytes())?;

    info!(output = %cli.output.display(), "bundle written");
    println!("{}", bundle.root);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::load_bundle;
    use std::fs;

    #[test]
    fn test_build_writes_bundle() {
        let dir = std::env::temp_dir();
        let input = dir.join(format!("allowlist-build-{}.txt", std::process::id()));
        let output = dir.join(format!("allowlist-build-{}.json", std::process::id()));
        let lines: Vec<String> = (1u8..=5).map(|b| format!("0x{}", hex::encode([b; 20]))).collect();
        fs::write(&input, lines.join("\n")).unwrap();

        let cli = Cli {
            input: input.clone(),
            output: output.clone(),
            hash: HashArg::Keccak256,
            keep_order: false,
            duplicates: DuplicatesArg::Dedup,
            odd: OddArg::CarryUp,
        };
        run(&cli).unwrap();

        let bundle = load_bundle(&output).unwrap();
        assert_eq!(
            bundle.root,
            "0x9d5788cc529290f1546d7d67946d32c0045b5888196830bc0a58809f75e5a5a0"
        );
        assert_eq!(bundle.entries.len(), 5);

        let _ = fs::remove_file(&input);
        let _ = fs::remove_file(&output);
    }

    #[test]
    fn test_tree_options_mapping() {
        let cli = Cli {
            input: PathBuf::new(),
            output: PathBuf::new(),
            hash: HashArg::Blake3,
            keep_order: true,
            duplicates: DuplicatesArg::Reject,
            odd: OddArg::Duplicate,
        };
        let options = cli.tree_options();
        assert!(!options.sort_leaves);
        assert_eq!(options.duplicates, DuplicatePolicy::Reject);
        assert_eq!(options.odd_node, OddNodePolicy::Duplicate);
        assert_eq!(HashAlgorithm::from(cli.hash), HashAlgorithm::Blake3);
    }
}
