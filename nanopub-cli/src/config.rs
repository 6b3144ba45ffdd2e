use anyhow::{Context, Result};
use nanopub_core::TranslatorOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_nanopub_home, nanopub_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogSection,
    /// Per-translator option tables, keyed by translator id.
    pub translators: BTreeMap<String, toml::Table>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `tracing` filter directive used when RUST_LOG is unset.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Options for the translator `id`; empty when the config has no table for it.
    pub fn translator_options(&self, id: &str) -> Result<TranslatorOptions> {
        match self.translators.get(id) {
            Some(table) => TranslatorOptions::from_serializable(table)
                .with_context(|| format!("[translators.{id}] in config")),
            None => Ok(TranslatorOptions::new()),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(nanopub_home()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => ensure_nanopub_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }

    let mut cfg = Config::default();
    let mut tsv = toml::Table::new();
    tsv.insert("malformed_lines".to_string(), toml::Value::String("reject".to_string()));
    cfg.translators.insert("tsv".to_string(), tsv);

    save_config(&p, &cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
