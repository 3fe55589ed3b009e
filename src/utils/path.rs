use std::path::{Path, PathBuf};

/// Environment variable that redirects the config directory (used by tests).
pub const CONFIG_DIR_ENV: &str = "GENFRAME_CONFIG_DIR";

/// Get the home directory, with fallback to "/"
pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Get the config directory path (~/.config/genframe, regardless of OS)
pub fn get_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    get_home_dir().join(".config").join("genframe")
}

/// Get the config file path (~/.config/genframe/config.toml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Get the log directory (platform cache dir, falling back to home)
pub fn get_log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(get_home_dir)
        .join("genframe")
}

/// Expand a leading `~` to the home directory.
///
/// Other paths are returned unchanged so that bare program names still go
/// through `PATH` lookup.
pub fn expand_path(path: &Path) -> PathBuf {
    let home_dir = get_home_dir();

    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home_dir,
        Ok(rest) => home_dir.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Format a path for display (show ~ for home)
pub fn format_path_for_display(path: &Path) -> String {
    let home_dir = get_home_dir();

    if let Ok(relative) = path.strip_prefix(&home_dir) {
        if relative.as_os_str().is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", relative.to_string_lossy())
        }
    } else {
        path.to_string_lossy().to_string()
    }
}
