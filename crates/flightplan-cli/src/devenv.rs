//! Developer-environment override collection.
//!
//! Local `.env` files under the settings directories carry developer
//! defaults for manifest variables. Directories are scanned in order and
//! later files override earlier ones; the winning file is recorded with the
//! value so a surprising default can be traced back to its source.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use flightplan_core::transform::instance::DevOverride;

/// How many settings layers an instance flavor pulls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InstanceFlavor {
    /// Single-instance development defaults.
    Basic,
    /// High-availability defaults layered on top of basic.
    Ha,
}

impl std::fmt::Display for InstanceFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InstanceFlavor::Basic => "basic",
            InstanceFlavor::Ha => "ha",
        };
        f.write_str(name)
    }
}

/// The ordered settings directories for a flavor, relative to `root`.
pub fn settings_dirs(root: &Path, flavor: InstanceFlavor) -> Vec<PathBuf> {
    match flavor {
        InstanceFlavor::Basic => vec![root.to_path_buf()],
        InstanceFlavor::Ha => vec![root.to_path_buf(), root.join("ha")],
    }
}

/// Collect `NAME=value` pairs from every `.env` file under the given
/// directories. Missing directories are simply skipped.
pub fn collect_dev_env(dirs: &[PathBuf]) -> Result<BTreeMap<String, DevOverride>> {
    let mut overrides = BTreeMap::new();

    for dir in dirs {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "env"))
            .collect();
        files.sort();

        for file in files {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading env file {}", file.display()))?;
            for line in text.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let line = line.strip_prefix("export ").unwrap_or(line);
                let Some((name, value)) = line.split_once('=') else {
                    continue;
                };
                overrides.insert(
                    name.trim().to_string(),
                    DevOverride {
                        source: file.clone(),
                        value: strip_matching_quotes(value.trim()).to_string(),
                    },
                );
            }
        }
    }

    Ok(overrides)
}

fn strip_matching_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn collects_and_overrides_in_order() {
        let root = tempfile::tempdir().unwrap();
        let ha = root.path().join("ha");
        fs::create_dir(&ha).unwrap();

        fs::write(
            root.path().join("network.env"),
            "# comment\nDOMAIN=example.com\nPORT=80\n",
        )
        .unwrap();
        fs::write(ha.join("network.env"), "export DOMAIN=\"ha.example.com\"\n").unwrap();

        let dirs = settings_dirs(root.path(), InstanceFlavor::Ha);
        let env = collect_dev_env(&dirs).unwrap();

        assert_eq!(env["PORT"].value, "80");
        assert_eq!(env["DOMAIN"].value, "ha.example.com");
        assert_eq!(env["DOMAIN"].source, ha.join("network.env"));
    }

    #[test]
    fn basic_flavor_skips_ha_layer() {
        let root = tempfile::tempdir().unwrap();
        let ha = root.path().join("ha");
        fs::create_dir(&ha).unwrap();
        fs::write(root.path().join("a.env"), "X=1\n").unwrap();
        fs::write(ha.join("a.env"), "X=2\n").unwrap();

        let env =
            collect_dev_env(&settings_dirs(root.path(), InstanceFlavor::Basic)).unwrap();
        assert_eq!(env["X"].value, "1");
    }

    #[test]
    fn missing_directory_is_not_an_error() {
        let env = collect_dev_env(&[PathBuf::from("/no/such/dir")]).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn non_env_files_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("notes.txt"), "X=1\n").unwrap();
        let env = collect_dev_env(&[root.path().to_path_buf()]).unwrap();
        assert!(env.is_empty());
    }
}
