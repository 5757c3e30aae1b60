use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::pagination::DEFAULT_PAGE_SIZE;

const DEFAULT_DB_NAME: &str = "trivia.db";
pub const DB_ENV: &str = "TRIVIA_DB";
pub const PAGE_SIZE_ENV: &str = "TRIVIA_PAGE_SIZE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TRIVIA_PAGE_SIZE must be a positive integer, got '{0}'")]
    InvalidPageSize(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub page_size: usize,
}

impl Config {
    /// Resolves settings from an explicit database path, then the environment,
    /// then the per-user config directory.
    pub fn load(db_override: Option<&Path>) -> Result<Self, ConfigError> {
        let db_path = match db_override {
            Some(path) => path.to_path_buf(),
            None => default_db_path(),
        };

        let page_size = match std::env::var(PAGE_SIZE_ENV) {
            Ok(raw) => parse_page_size(&raw)?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Ok(Self { db_path, page_size })
    }
}

fn parse_page_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidPageSize(raw.to_string())),
    }
}

fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_ENV) {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trivia");

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DB_NAME)
}
