use anyhow::{bail, Context, Result};
use ledgerlens_sheets::SourceIds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SPREADSHEET_ID: &str = "LEDGERLENS_SPREADSHEET_ID";
pub const ENV_GID_PURCHASES: &str = "LEDGERLENS_GID_CLIENTES";
pub const ENV_GID_BIRTHDAYS: &str = "LEDGERLENS_GID_ANIVERSARIOS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub sheets: SheetsSection,
    pub analytics: AnalyticsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetsSection {
    /// Id of the shared spreadsheet (the long token in its URL)
    pub spreadsheet_id: String,
    /// Tab gid of the purchase ledger
    pub purchases_gid: String,
    /// Tab gid of the birthday registry
    pub birthdays_gid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSection {
    /// IANA timezone used to decide what "today" is
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheets: SheetsSection {
                spreadsheet_id: String::new(),
                purchases_gid: "0".to_string(),
                birthdays_gid: String::new(),
            },
            analytics: AnalyticsSection {
                timezone: "America/Sao_Paulo".to_string(),
            },
        }
    }
}

impl Config {
    /// Overlay values from the environment, when set and non-empty.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_SPREADSHEET_ID) {
            self.sheets.spreadsheet_id = v;
        }
        if let Some(v) = get(ENV_GID_PURCHASES) {
            self.sheets.purchases_gid = v;
        }
        if let Some(v) = get(ENV_GID_BIRTHDAYS) {
            self.sheets.birthdays_gid = v;
        }
    }

    pub fn source_ids(&self) -> SourceIds {
        SourceIds::new(&self.sheets.purchases_gid, &self.sheets.birthdays_gid)
    }

    /// Both gids plus the spreadsheet id are needed to query Google Sheets.
    pub fn require_remote(&self) -> Result<()> {
        if self.sheets.spreadsheet_id.trim().is_empty() {
            bail!(
                "spreadsheet_id is not configured; run `ledgerlens init` and edit the \
                 config, or set {ENV_SPREADSHEET_ID}"
            );
        }
        if self.sheets.birthdays_gid.trim().is_empty() {
            bail!("birthdays_gid is not configured; set {ENV_GID_BIRTHDAYS}");
        }
        Ok(())
    }
}

/// `~/.ledgerlens/config.toml`; nothing is created on disk.
pub fn config_file() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ledgerlens").join("config.toml"))
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// File config (or defaults) with environment overrides applied.
pub fn load_config() -> Result<Config> {
    let mut cfg = load_config_from(&config_file()?)?;
    cfg.apply_env(|k| std::env::var(k).ok());
    Ok(cfg)
}

/// Write the default config to `p` unless a file is already there.
/// Returns whether a file was written.
pub fn write_default_config(p: &Path) -> Result<bool> {
    if p.exists() {
        return Ok(false);
    }
    if let Some(dir) = p.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(true)
}
