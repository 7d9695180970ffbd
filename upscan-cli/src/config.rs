use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use upscan_core::FoodRules;
use upscan_ingest::{Account, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};

use crate::state::{ensure_upscan_home, upscan_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSection,
    pub food: FoodRules,
    /// Registry order is the fetch order for `--all`
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub page_size: u32,
    /// IANA zone used to turn `--since` / `--until` dates into timestamps
    pub timezone: String,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timezone: "Australia/Brisbane".to_string(),
            timeout_secs: 30,
            log_level: "warn".to_string(),
        }
    }
}

impl ApiSection {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid timezone {:?} in config: {e}", self.timezone))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(upscan_home()?.join("config.toml"))
}

/// Read the config at `path` (or the default location); defaults when the file is absent
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => {
            ensure_upscan_home()?;
            config_path()?
        }
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    println!("Add your accounts as [[accounts]] entries with a name and id.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg = parse_config(
            r#"
[api]
timezone = "Australia/Sydney"

[[accounts]]
name = "GROCERIES"
id = "acc-groceries"

[[accounts]]
name = "RENT"
id = "acc-rent"
"#,
        )
        .unwrap();

        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.api.page_size, 100);
        assert_eq!(cfg.api.tz().unwrap(), chrono_tz::Australia::Sydney);
        assert_eq!(cfg.accounts.len(), 2);
        assert_eq!(cfg.accounts[1].name, "RENT");
        assert_eq!(cfg.food, FoodRules::default());
    }

    #[test]
    fn test_food_overrides() {
        let cfg = parse_config(
            r#"
[food]
keywords = ["iga", "aldi"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.food.keywords, vec!["iga", "aldi"]);
        assert_eq!(cfg.food.parent_category, "good-life");
    }

    #[test]
    fn test_bad_timezone_is_error() {
        let cfg = parse_config("[api]\ntimezone = \"Mars/Olympus\"\n").unwrap();
        assert!(cfg.api.tz().is_err());
    }

    #[test]
    fn test_default_round_trips() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg = parse_config(&s).unwrap();
        assert_eq!(cfg.api.timezone, "Australia/Brisbane");
        assert!(cfg.accounts.is_empty());
    }
}
