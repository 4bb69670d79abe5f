use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-project directory that marks the project root.
pub const PROJECT_DIR: &str = ".needs";

/// Snapshot file read when the config names none.
pub const DEFAULT_SNAPSHOT: &str = "data.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    /// Snapshot file, taken relative to the project root unless absolute.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// How many entities the entity chart keeps after ranking.
    #[serde(default = "default_top_entities")]
    pub top_entities: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_entities: default_top_entities(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Preferred output mode (`pretty`, `text`, `json`).
    #[serde(default)]
    pub output: Option<String>,
}

/// Find the project root by walking up from `start` looking for a
/// `.needs` directory.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load `.needs/config.toml` under `project_root`. A missing file is not
/// an error; it yields pure defaults.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(PROJECT_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config from the platform config directory.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("needs/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// The snapshot file commands should read: an explicit flag wins, then
/// the project config, then `data.json` at the project root.
#[must_use]
pub fn resolve_snapshot_path(
    flag: Option<&Path>,
    config: &ProjectConfig,
    project_root: &Path,
) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match &config.snapshot {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => project_root.join(path),
        None => project_root.join(DEFAULT_SNAPSHOT),
    }
}

const fn default_top_entities() -> usize {
    crate::stats::TOP_ENTITIES
}
