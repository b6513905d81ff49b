// cli/src/badgectl/config.rs
// Simulator configuration (TOML)
// - fs_root: host directory mounted as the badge filesystem
// - log_level: kernel console level (error, warn, info, debug, trace)
// - touch_events: values returned by successive input polls in companion-app mode
// - repl: "friendly" or "raw"

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub fs_root: PathBuf,
    pub log_level: String,
    pub touch_events: Vec<u32>,
    pub repl: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fs_root: PathBuf::from("."),
            log_level: "info".into(),
            touch_events: vec![0, 0, 1],
            repl: "friendly".into(),
        }
    }
}

impl SimConfig {
    /// Load `path`, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        let mut cfg: SimConfig =
            toml::from_str(&raw).map_err(|source| CliError::Config { path: path.into(), source })?;
        if cfg.fs_root.is_relative() {
            if let Some(dir) = path.parent() {
                cfg.fs_root = dir.join(&cfg.fs_root);
            }
        }
        Ok(cfg)
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    pub fn raw_repl(&self) -> bool {
        self.repl.eq_ignore_ascii_case("raw")
    }
}
