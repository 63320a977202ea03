//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bstviz/bstviz.toml`
//! 3. Local config: file passed via `--config`
//! 4. Environment variables: `BSTVIZ_*` prefix, `__` for nesting
//!    (e.g. `BSTVIZ_CANVAS__CELL_WIDTH=6`, `BSTVIZ_KEYS="5,3,8"`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Key, TreeBuilder};

/// Upper bound for `canvas.cell_width`.
pub const MAX_CELL_WIDTH: usize = 64;

/// Upper bound for `canvas.row_height`.
pub const MAX_ROW_HEIGHT: usize = 16;

/// Upper bound for the number of keys in a random tree.
pub const MAX_RANDOM_SIZE: usize = 1_000_000;

/// Character-grid rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanvasConfig {
    /// Characters per layout column
    pub cell_width: usize,
    /// Text lines per layout row (the lines between rows carry connectors)
    pub row_height: usize,
    /// Colorize highlighted nodes
    pub color: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            cell_width: 4,
            row_height: 2,
            color: true,
        }
    }
}

/// Random tree generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RandomConfig {
    /// Number of distinct keys, drawn from `0..=size`
    pub size: usize,
    /// Fixed seed for reproducible trees
    pub seed: Option<u64>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            size: 20,
            seed: None,
        }
    }
}

/// Raw canvas config for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCanvasConfig {
    pub cell_width: Option<usize>,
    pub row_height: Option<usize>,
    pub color: Option<bool>,
}

/// Raw random config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRandomConfig {
    pub size: Option<usize>,
    pub seed: Option<u64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub keys: Option<Vec<Key>>,
    pub canvas: RawCanvasConfig,
    pub random: RawRandomConfig,
}

/// Unified configuration for bstviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Keys of the tree shown when no key source is given, in insertion order
    pub keys: Vec<Key>,
    pub canvas: CanvasConfig,
    pub random: RandomConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keys: vec![60, 45, 70, 46, 75, 47, 80, 48, 76, 85, 49, 77, 84],
            canvas: CanvasConfig::default(),
            random: RandomConfig::default(),
        }
    }
}

/// Get the XDG config directory for bstviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bstviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bstviz.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            keys: overlay.keys.clone().unwrap_or_else(|| self.keys.clone()),
            canvas: CanvasConfig {
                cell_width: overlay.canvas.cell_width.unwrap_or(self.canvas.cell_width),
                row_height: overlay.canvas.row_height.unwrap_or(self.canvas.row_height),
                color: overlay.canvas.color.unwrap_or(self.canvas.color),
            },
            random: RandomConfig {
                size: overlay.random.size.unwrap_or(self.random.size),
                seed: overlay.random.seed.or(self.random.seed),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file given on the command line
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/bstviz/bstviz.toml`
    /// 3. Local config file
    /// 4. Environment variables: `BSTVIZ_*` prefix
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // an explicitly named file must exist
        if let Some(local_path) = local {
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;

        Ok(current)
    }

    /// Apply BSTVIZ_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BSTVIZ")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("keys") {
            settings.keys = TreeBuilder::new()
                .parse_keys(&val)
                .map_err(|e| ApplicationError::Config {
                    message: format!("BSTVIZ_KEYS: {e}"),
                })?;
        }
        if let Ok(val) = config.get_int("canvas.cell_width") {
            settings.canvas.cell_width = to_usize("canvas.cell_width", val)?;
        }
        if let Ok(val) = config.get_int("canvas.row_height") {
            settings.canvas.row_height = to_usize("canvas.row_height", val)?;
        }
        if let Ok(val) = config.get_bool("canvas.color") {
            settings.canvas.color = val;
        }
        if let Ok(val) = config.get_int("random.size") {
            settings.random.size = to_usize("random.size", val)?;
        }
        if let Ok(val) = config.get_int("random.seed") {
            settings.random.seed = Some(to_seed(val)?);
        }

        Ok(settings)
    }

    /// Reject settings the renderer or the random generator cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        check_range("canvas.cell_width", self.canvas.cell_width, 1, MAX_CELL_WIDTH)?;
        check_range("canvas.row_height", self.canvas.row_height, 1, MAX_ROW_HEIGHT)?;
        check_range("random.size", self.random.size, 0, MAX_RANDOM_SIZE)?;
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# bstviz configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bstviz/bstviz.toml
#   Local:  file passed with --config
#   Env:    BSTVIZ_* environment variables (e.g. BSTVIZ_CANVAS__CELL_WIDTH=6)

# Keys of the demo tree, inserted in this order
# keys = [60, 45, 70, 46, 75, 47, 80, 48, 76, 85, 49, 77, 84]

[canvas]
# Characters per layout column
# cell_width = 4

# Text lines per tree level
# row_height = 2

# Colorize highlighted routes
# color = true

[random]
# Number of distinct keys for --random without a size
# size = 20

# Fixed seed for reproducible random trees
# seed = 42
"#
        .to_string()
    }
}

fn to_usize(name: &str, val: i64) -> Result<usize, ApplicationError> {
    usize::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{name} must not be negative: {val}"),
    })
}

fn to_seed(val: i64) -> Result<u64, ApplicationError> {
    u64::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("random.seed must not be negative: {val}"),
    })
}

fn check_range(name: &str, val: usize, min: usize, max: usize) -> Result<(), ApplicationError> {
    if (min..=max).contains(&val) {
        Ok(())
    } else {
        Err(ApplicationError::Config {
            message: format!("{name} must be between {min} and {max}, got {val}"),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
