use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

fn is_workspace_manifest(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|s| s.lines().any(|l| l.trim() == "[workspace]"))
        .unwrap_or(false)
}

/// Closest ancestor of `start` (inclusive) holding a workspace `Cargo.toml`.
fn find_workspace_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_dir() {
        start.to_path_buf()
    } else {
        start.parent().unwrap_or(start).to_path_buf()
    };

    loop {
        if is_workspace_manifest(&dir.join("Cargo.toml")) {
            return Some(dir);
        }

        if !dir.pop() {
            break;
        }
    }

    None
}

pub fn workspace_root() -> Result<PathBuf> {
    let start = std::env::current_dir()?;
    find_workspace_upwards(&start)
        .or_else(|| find_workspace_upwards(Path::new(env!("CARGO_MANIFEST_DIR"))))
        .ok_or_else(|| anyhow!("workspace Cargo.toml not found (run from within the repo or pass --config)"))
}
