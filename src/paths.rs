//! Common paths for quill data storage
//!
//! All quill data is stored under ~/.config/quill/ on all platforms:
//! - config.toml - User configuration
//! - quill.sqlite - Article database

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the quill data directory (~/.config/quill/)
///
/// This is consistent across all platforms for simplicity.
pub fn quill_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let quill_dir = home.join(".config").join("quill");
    fs::create_dir_all(&quill_dir).context("Failed to create quill directory")?;
    Ok(quill_dir)
}

/// Get the config file path (~/.config/quill/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(quill_dir()?.join("config.toml"))
}

/// Get the database file path (~/.config/quill/quill.sqlite)
pub fn database_path() -> Result<PathBuf> {
    Ok(quill_dir()?.join("quill.sqlite"))
}

/// Default directory for downloaded papers (~/.config/quill/papers/)
///
/// Not created here; the fetcher creates it lazily on first download.
pub fn default_download_dir() -> Result<PathBuf> {
    Ok(quill_dir()?.join("papers"))
}
