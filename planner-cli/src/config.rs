use anyhow::{Context, Result};
use planner_core::{STORAGE_KEY, SystemClock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::state::{config_path, resolve_in_home};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageSection,
    pub display: DisplaySection,
    pub clock: ClockSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSection {
    /// Key-value file, relative to the state directory unless absolute
    pub file: String,
    /// Slot holding the statement list
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySection {
    pub balance_suffix: String,
    pub amount_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ClockSection {
    /// IANA zone for entry dates (e.g. "Europe/Prague"); system zone when unset
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            file: "storage.json".to_string(),
            key: STORAGE_KEY.to_string(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            balance_suffix: "czk".to_string(),
            amount_suffix: "Kc".to_string(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn storage_path(&self, home: &Path) -> PathBuf {
        resolve_in_home(home, &self.storage.file)
    }

    pub fn clock(&self) -> Result<SystemClock> {
        match self.clock.timezone.as_deref().map(str::trim) {
            Some(tz) if !tz.is_empty() => {
                SystemClock::with_timezone(tz).context("config.toml [clock].timezone")
            }
            _ => Ok(SystemClock::local()),
        }
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

/// Read `config.toml` from the state directory; a missing file means defaults.
pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    match fs::read_to_string(&p) {
        Ok(s) => parse_config(&s).with_context(|| format!("in {}", p.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(err) => Err(err).with_context(|| format!("read {}", p.display())),
    }
}

const CONFIG_HEADER: &str = "\
# expense planner settings
# storage.file is resolved against the state directory unless absolute.
# clock.timezone takes an IANA name such as \"Europe/Prague\".

";

/// Render a config the way `config init` writes it
fn render_config(cfg: &Config) -> Result<String> {
    let body = toml::to_string_pretty(cfg).context("serialize config")?;
    Ok(format!("{CONFIG_HEADER}{body}"))
}

#[derive(Debug, PartialEq)]
pub enum InitOutcome {
    Written(PathBuf),
    /// An existing file is never overwritten
    Kept(PathBuf),
}

pub fn init_config(home: &Path) -> Result<InitOutcome> {
    let p = config_path(home);
    if p.exists() {
        return Ok(InitOutcome::Kept(p));
    }
    let text = render_config(&Config::default())?;
    fs::write(&p, text).with_context(|| format!("write {}", p.display()))?;
    tracing::info!(path = %p.display(), "default config written");
    Ok(InitOutcome::Written(p))
}

pub fn show_config(cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    print!("{}", s);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let cfg = parse_config(
            r#"
            [display]
            balance_suffix = "EUR"

            [clock]
            timezone = "Europe/Prague"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.display.balance_suffix, "EUR");
        assert_eq!(cfg.display.amount_suffix, "Kc");
        assert_eq!(cfg.storage.key, "@DATA/Statements");
        assert_eq!(cfg.clock.timezone.as_deref(), Some("Europe/Prague"));
        assert!(cfg.clock().is_ok());
    }

    #[test]
    fn test_bad_timezone_is_reported() {
        let cfg = parse_config("[clock]\ntimezone = \"Nowhere/Special\"\n").unwrap();
        assert!(cfg.clock().is_err());
    }

    #[test]
    fn test_default_serializes_back() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_storage_path_resolution() {
        let cfg = Config::default();
        assert_eq!(
            cfg.storage_path(Path::new("/home/u/.expense-planner")),
            PathBuf::from("/home/u/.expense-planner/storage.json")
        );
    }

    fn scratch_home(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "planner-cli-config-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_init_writes_once_then_keeps() {
        let home = scratch_home("init");
        let p = config_path(&home);

        assert_eq!(init_config(&home).unwrap(), InitOutcome::Written(p.clone()));
        let written = fs::read_to_string(&p).unwrap();
        assert!(written.starts_with("# expense planner settings"));
        assert_eq!(load_config(&home).unwrap(), Config::default());

        fs::write(&p, "[log]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(init_config(&home).unwrap(), InitOutcome::Kept(p.clone()));
        assert_eq!(load_config(&home).unwrap().log.level, "debug");

        let _ = fs::remove_dir_all(&home);
    }

    #[test]
    fn test_missing_config_loads_defaults() {
        let home = scratch_home("missing");
        assert_eq!(load_config(&home).unwrap(), Config::default());
        let _ = fs::remove_dir_all(&home);
    }

    #[test]
    fn test_broken_config_names_the_file() {
        let home = scratch_home("broken");
        fs::write(config_path(&home), "[display\n").unwrap();
        let err = format!("{:#}", load_config(&home).unwrap_err());
        assert!(err.contains("config.toml"), "{err}");
        let _ = fs::remove_dir_all(&home);
    }
}
