use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use allowlist::{parse_address, AllowlistBundle};

/// Read one hex identity per line. Blank lines and `#` comments are skipped.
pub fn read_addresses(path: &Path) -> Result<Vec<Vec<u8>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut addresses = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let address = parse_address(trimmed)
            .with_context(|| format!("line {}: {trimmed}", line_num + 1))?;
        addresses.push(address);
    }
    Ok(addresses)
}

pub fn load_bundle(path: &Path) -> Result<AllowlistBundle> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bundle {}", path.display()))?;
    AllowlistBundle::from_json(&json).context("Invalid bundle")
}

/// Write via a temp file and rename so readers never see a partial file.
pub fn write_file_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move {} into place", tmp.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("allowlist-cli-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_addresses_skips_blank_and_comments() {
        let path = temp_file(
            "addrs.txt",
            "# members\n0x0101010101010101010101010101010101010101\n\n  0202020202020202020202020202020202020202  \n",
        );
        let addresses = read_addresses(&path).unwrap();
        assert_eq!(addresses, vec![vec![1u8; 20], vec![2u8; 20]]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_read_addresses_reports_line() {
        let path = temp_file("bad.txt", "0x0101010101010101010101010101010101010101\n0xnothex\n");
        let err = read_addresses(&path).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_file_atomic() {
        let path = std::env::temp_dir().join(format!("allowlist-cli-{}-out.json", std::process::id()));
        write_file_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"{}");
        assert!(!path.with_extension("tmp").exists());
        let _ = fs::remove_file(&path);
    }
}
