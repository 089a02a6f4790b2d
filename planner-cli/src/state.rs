use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const HOME_DIR: &str = ".expense-planner";

/// State directory: `--home` if given, else `$HOME/.expense-planner`.
pub fn planner_home(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    let home = std::env::var("HOME").context("HOME is not set (pass --home <dir>)")?;
    Ok(PathBuf::from(home).join(HOME_DIR))
}

pub fn ensure_planner_home(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = planner_home(override_dir)?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn log_path(home: &Path) -> PathBuf {
    home.join("planner.log")
}

/// Relative storage files live under the state directory.
pub fn resolve_in_home(home: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        home.join(p)
    }
}
