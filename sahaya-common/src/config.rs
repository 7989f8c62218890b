//! Configuration loading and root folder resolution
//!
//! The root folder is the per-install data directory holding the SQLite
//! database and the optional `sahaya.toml` config file. Resolution follows
//! a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `SAHAYA_ROOT_FOLDER` environment variable
//! 3. `SAHAYA_ROOT` environment variable
//! 4. `root_folder` key in the TOML config file
//! 5. OS-dependent compiled default (fallback)
//!
//! Missing config files never abort startup; resolution degrades to the
//! compiled default with a log line naming the source that won.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "sahaya.db";

/// Config file name, looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "sahaya.toml";

/// Logging section of the TOML config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive passed to the tracing subscriber (e.g. "info")
    pub level: String,
    /// Optional log file; stderr when absent
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// On-disk TOML configuration schema
///
/// Every field is optional so a partial (or missing) file still parses;
/// later additions deserialize as `None` from older files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub gemini_api_key: Option<String>,
}

impl TomlConfig {
    /// Parse a config file, returning an error for unreadable or invalid TOML
    pub fn load(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Compiled-in defaults used when no other configuration source exists
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    /// OS-dependent defaults
    pub fn for_current_platform() -> CompiledDefaults {
        let root_folder = if cfg!(target_os = "linux") {
            // ~/.local/share/sahaya (or /var/lib/sahaya for system-wide)
            dirs::data_local_dir()
                .map(|d| d.join("sahaya"))
                .unwrap_or_else(|| PathBuf::from("/var/lib/sahaya"))
        } else if cfg!(target_os = "macos") {
            // ~/Library/Application Support/sahaya
            dirs::data_dir()
                .map(|d| d.join("sahaya"))
                .unwrap_or_else(|| PathBuf::from("/Library/Application Support/sahaya"))
        } else if cfg!(target_os = "windows") {
            // %LOCALAPPDATA%\sahaya
            dirs::data_local_dir()
                .map(|d| d.join("sahaya"))
                .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\sahaya"))
        } else {
            PathBuf::from("./sahaya_data")
        };

        CompiledDefaults {
            root_folder,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Resolves the root folder from CLI, environment, config file and defaults
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_override: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_override: Option<PathBuf>) -> RootFolderResolver {
        RootFolderResolver { cli_override }
    }

    /// Resolve the root folder; never fails, falls back to compiled defaults
    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_override {
            let shadowed = Self::other_sources_present();
            if !shadowed.is_empty() {
                tracing::warn!(
                    shadowed = ?shadowed,
                    "root folder set on command line; ignoring other sources"
                );
            }
            tracing::info!(root_folder = %path.display(), "root folder from command line");
            return path.clone();
        }

        // Priority 2/3: Environment variables
        for var in ["SAHAYA_ROOT_FOLDER", "SAHAYA_ROOT"] {
            if let Ok(path) = std::env::var(var) {
                if !path.is_empty() {
                    tracing::info!(root_folder = %path, source = var, "root folder from environment");
                    return PathBuf::from(path);
                }
            }
        }

        // Priority 4: TOML config file
        if let Some(config_path) = Self::config_file_path() {
            if let Ok(config) = TomlConfig::load(&config_path) {
                if let Some(root) = config.root_folder {
                    tracing::info!(
                        root_folder = %root.display(),
                        config_file = %config_path.display(),
                        "root folder from config file"
                    );
                    return root;
                }
            }
        }

        // Priority 5: OS-dependent compiled default
        let defaults = CompiledDefaults::for_current_platform();
        tracing::info!(
            root_folder = %defaults.root_folder.display(),
            "root folder from compiled default"
        );
        defaults.root_folder
    }

    /// Platform config file: user config dir first, then the system path
    pub fn config_file_path() -> Option<PathBuf> {
        if let Some(user) = dirs::config_dir().map(|d| d.join("sahaya").join(CONFIG_FILE_NAME)) {
            if user.exists() {
                return Some(user);
            }
        }
        if cfg!(target_os = "linux") {
            let system = PathBuf::from("/etc/sahaya").join(CONFIG_FILE_NAME);
            if system.exists() {
                return Some(system);
            }
        }
        None
    }

    fn other_sources_present() -> Vec<&'static str> {
        let mut present = Vec::new();
        for var in ["SAHAYA_ROOT_FOLDER", "SAHAYA_ROOT"] {
            if std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false) {
                present.push(var);
            }
        }
        if Self::config_file_path().is_some() {
            present.push("config file");
        }
        present
    }
}

/// Prepares a resolved root folder for use: directory creation and
/// database path construction
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> RootFolderInitializer {
        RootFolderInitializer { root }
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE_NAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }

    /// Create the root folder (and parents) if missing; idempotent
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }
}
