use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::CoreResult;

const DEFAULT_DIR_NAME: &str = ".rentdesk";
const HOME_ENV: &str = "RENTDESK_HOME";
const DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "config.json";

/// Resolves on-disk locations relative to an application root.
pub struct PathResolver;

impl PathResolver {
    /// Application root: `$RENTDESK_HOME`, else `~/.rentdesk`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    /// Directory holding one JSON file per storage bucket.
    pub fn data_dir_in(base: &Path) -> PathBuf {
        base.join(DATA_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> CoreResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
