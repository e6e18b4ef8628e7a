use crate::{EquivalencyConfig, EquivalencyError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "requiv.toml";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: EquivalencyConfig,
    pub path: PathBuf,
    pub exists: bool,
    /// Loaded from the working directory rather than the user config dir
    pub project_local: bool,
}

/// Load the configuration from `./requiv.toml` if present, otherwise from
/// the user configuration directory. A missing file yields the defaults.
pub fn load_config() -> Result<LoadedConfig, EquivalencyError> {
    let (path, project_local) = resolve_config_path()?;
    let mut loaded = load_config_from(&path)?;
    loaded.project_local = project_local;
    Ok(loaded)
}

pub fn load_config_from(path: &Path) -> Result<LoadedConfig, EquivalencyError> {
    let exists = path.exists();

    let config = if exists {
        let data = fs::read_to_string(path)?;
        toml::from_str(&data).map_err(|e| EquivalencyError::Serialization(e.to_string()))?
    } else {
        EquivalencyConfig::default()
    };

    if config.max_recursion_depth == 0 && !config.allow_infinite_recursion {
        return Err(EquivalencyError::Config(
            "max_recursion_depth must be at least 1".to_string(),
        ));
    }

    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        exists,
        project_local: false,
    })
}

pub fn ensure_config(path: &Path) -> Result<LoadedConfig, EquivalencyError> {
    let loaded = load_config_from(path)?;
    if !loaded.exists {
        save_config(&loaded.path, &loaded.config)?;
    }
    Ok(loaded)
}

pub fn save_config(path: &Path, config: &EquivalencyConfig) -> Result<(), EquivalencyError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(config)
        .map_err(|e| EquivalencyError::Serialization(e.to_string()))?;
    fs::write(path, data)?;
    Ok(())
}

pub fn user_config_path() -> Result<PathBuf, EquivalencyError> {
    let dirs = ProjectDirs::from("", "aecs4u", "requiv")
        .ok_or_else(|| EquivalencyError::Config("Unable to determine config directory".to_string()))?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn resolve_config_path() -> Result<(PathBuf, bool), EquivalencyError> {
    if let Some(local) = project_config_path() {
        if local.exists() {
            return Ok((local, true));
        }
    }

    Ok((user_config_path()?, false))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
}
