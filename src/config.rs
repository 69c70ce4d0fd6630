//! Configuration module for quill

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::paths;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// arXiv topic codes to follow (joined into one feed request)
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,

    /// Directory for downloaded papers; defaults to the data directory
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// Auto-refresh interval in seconds (0 = manual only)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Key bindings for the TUI
    #[serde(default)]
    pub keys: KeyBindings,
}

/// Single-character key bindings, remappable from the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Move down
    #[serde(default = "default_next")]
    pub next: char,
    /// Move up
    #[serde(default = "default_previous")]
    pub previous: char,
    /// Quit the application
    #[serde(default = "default_quit")]
    pub quit: char,
    /// Toggle bookmark on the selected article
    #[serde(default = "default_bookmark")]
    pub bookmark: char,
    /// Download the selected article's PDF
    #[serde(default = "default_download")]
    pub download: char,
    /// Open the selected article in the browser
    #[serde(default = "default_open_link")]
    pub open_link: char,
    /// Refresh the feed
    #[serde(default = "default_refresh")]
    pub refresh: char,
    /// Create a project
    #[serde(default = "default_create_project")]
    pub create_project: char,
    /// Delete the selected project
    #[serde(default = "default_delete_project")]
    pub delete_project: char,
    /// Link/unlink the selected article to a project
    #[serde(default = "default_link_project")]
    pub link_project: char,
    /// Toggle the detail pane
    #[serde(default = "default_show_detail")]
    pub show_detail: char,
}

fn default_topics() -> Vec<String> {
    ["hep-ph", "hep-ex", "hep-lat", "hep-th"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_refresh_interval() -> u64 {
    0 // Manual refresh by default
}

fn default_next() -> char {
    'j'
}

fn default_previous() -> char {
    'k'
}

fn default_quit() -> char {
    'q'
}

fn default_bookmark() -> char {
    'b'
}

fn default_download() -> char {
    'd'
}

fn default_open_link() -> char {
    'o'
}

fn default_refresh() -> char {
    'r'
}

fn default_create_project() -> char {
    'p'
}

fn default_delete_project() -> char {
    'x'
}

fn default_link_project() -> char {
    'n'
}

fn default_show_detail() -> char {
    'a'
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: default_next(),
            previous: default_previous(),
            quit: default_quit(),
            bookmark: default_bookmark(),
            download: default_download(),
            open_link: default_open_link(),
            refresh: default_refresh(),
            create_project: default_create_project(),
            delete_project: default_delete_project(),
            link_project: default_link_project(),
            show_detail: default_show_detail(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topics: default_topics(),
            download_dir: None,
            refresh_interval_secs: default_refresh_interval(),
            keys: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Resolve the download directory (configured or default)
    pub fn download_dir(&self) -> Result<PathBuf> {
        match &self.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::default_download_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.topics, default_topics());
        assert_eq!(config.keys.quit, 'q');
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.topics = vec!["cs.LG".to_string()];
        config.keys.quit = 'Q';
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.topics, vec!["cs.LG".to_string()]);
        assert_eq!(reloaded.keys.quit, 'Q');
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "topics = [\"math.CO\"]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.topics, vec!["math.CO".to_string()]);
        assert_eq!(config.keys.next, 'j');
        assert_eq!(config.refresh_interval_secs, 0);
    }
}
