//! Settings file persistence for Vellum
//!
//! This module handles loading and saving the settings file to a
//! platform-specific directory with graceful fallback to defaults: a
//! missing, empty, or corrupted settings file must never keep the editing
//! surface from coming up.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "vellum";

/// Settings file name
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Backup settings file name (used during atomic writes)
const SETTINGS_BACKUP_NAME: &str = "settings.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\vellum\`
/// - **macOS**: `~/Library/Application Support/vellum/`
/// - **Linux**: `~/.config/vellum/`
///
/// # Errors
///
/// Returns `Error::DirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::DirNotFound)
}

/// Get the full path to the settings file.
pub fn get_settings_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(SETTINGS_FILE_NAME))
}

/// Ensure the configuration directory exists, creating it if necessary.
fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir()?;

    if !config_dir.exists() {
        debug!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(&config_dir).map_err(|e| Error::ConfigSave {
            path: config_dir.clone(),
            source: Box::new(e),
        })?;
    }

    Ok(config_dir)
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from the default settings file location.
///
/// 1. If the file exists and is valid JSON, load and validate it
/// 2. If the file doesn't exist or is empty, return defaults
/// 3. If the file is corrupted, log a warning and return defaults
pub fn load_settings() -> Settings {
    get_settings_file_path()
        .and_then(|path| load_settings_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load settings")
}

/// Load settings from an explicit path.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!("Settings file not found at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    debug!("Loading settings from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Settings file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
        warn!(
            "Settings file at {} contains invalid JSON: {}",
            path.display(),
            e
        );
        Error::Parse {
            message: format!("Failed to parse settings file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("Settings loaded successfully from {}", path.display());
    Ok(settings.validate())
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Save settings to the default settings file location.
///
/// The write is atomic: the JSON is written to a sibling backup file first,
/// then renamed over the original, so a crash mid-save never leaves a
/// truncated settings file behind.
///
/// # Errors
///
/// - `Error::DirNotFound`: config directory cannot be determined
/// - `Error::ConfigSave`: failed to write the settings file
pub fn save_settings(settings: &Settings) -> Result<()> {
    let config_dir = ensure_config_dir()?;
    save_settings_to(&config_dir.join(SETTINGS_FILE_NAME), settings)
}

/// Save settings to an explicit path using the atomic write pattern.
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    let backup_path = path.with_file_name(SETTINGS_BACKUP_NAME);

    debug!("Saving settings to: {}", path.display());

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    // Write to backup file first (atomic write pattern)
    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    // Replace original with backup
    fs::rename(&backup_path, path).map_err(|e| Error::ConfigSave {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    info!("Settings saved successfully to {}", path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
