//! Centralized path definitions for sectionwatch
//!
//! The bot keeps no local state; its watch table lives in memory and on the
//! wiki. The only file it reads is its configuration:
//!
//! ```text
//! $SECTIONWATCH_CONFIG                 # explicit override
//! ~/.config/sectionwatch/              # otherwise (platform config dir)
//! └── config.toml
//! ```

use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "SECTIONWATCH_CONFIG";

/// Environment variable holding the bot password
pub const PASSWORD_ENV: &str = "SECTIONWATCH_PASSWORD";

/// Config directory name under the platform config dir
const CONFIG_DIR: &str = "sectionwatch";

/// Config filename
const CONFIG_FILE: &str = "config.toml";

/// Get the sectionwatch config directory.
///
/// Returns `<config dir>/sectionwatch/`, falling back to `~/.sectionwatch/`
/// on platforms without a config dir.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir().map_or_else(
        || dirs::home_dir().unwrap_or_else(|| PathBuf::from("~")).join(format!(".{CONFIG_DIR}")),
        |dir| dir.join(CONFIG_DIR),
    )
}

/// Get the config file path.
///
/// `$SECTIONWATCH_CONFIG` wins when set and non-empty.
#[must_use]
pub fn config_file() -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => config_dir().join(CONFIG_FILE),
    }
}
