//! User configuration loaded from `config.toml`

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::services::font::{RenderOptions, VerticalAlign};
use crate::types::{GhstampError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Project directories (config, data) for ghstamp
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "GitHub", "ghstamp")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name given to the template created at session start
    pub default_name: String,
    /// Blank columns between rendered glyphs
    pub spacing: usize,
    pub align: VerticalAlign,
    /// Where the TUI writes exports (current directory when unset)
    pub export_dir: Option<PathBuf>,
    /// flexi_logger spec, e.g. "info" or "debug"
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_name: "my-design".to_string(),
            spacing: 1,
            align: VerticalAlign::Center,
            export_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from the platform config dir; defaults when no file exists
    pub fn load() -> Result<Self> {
        match project_dirs() {
            Some(dirs) => Self::load_from(&dirs.config_dir().join(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            GhstampError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| GhstampError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            spacing: self.spacing,
            align: self.align,
        }
    }

    /// Directory exports are written to
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
