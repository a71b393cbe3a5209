// BookWise platform paths
// Resolves where the database and settings file live.

use std::env;
use std::path::PathBuf;

/// Overrides the data directory on every platform.
pub const DATA_DIR_ENV: &str = "BOOKWISE_DATA_DIR";

/// Returns the directory holding `bookwise.db` and `settings.json`.
///
/// - `$BOOKWISE_DATA_DIR` when set
/// - **Linux**: `$XDG_DATA_HOME/bookwise` or `~/.local/share/bookwise`
/// - **macOS**: `~/Library/Application Support/BookWise`
/// - **Windows**: `%APPDATA%/BookWise`
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    default_data_dir()
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir())
}

#[cfg(target_os = "macos")]
fn default_data_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("BookWise")
}

#[cfg(target_os = "windows")]
fn default_data_dir() -> PathBuf {
    env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
        .join("BookWise")
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("bookwise"),
        _ => home_dir().join(".local").join("share").join("bookwise"),
    }
}
