use std::path::PathBuf;

/// Environment variable that overrides the data directory
pub const HOME_ENV: &str = "WROK_HOME";

/// Resolve the data directory: `$WROK_HOME`, else `~/.wrok`
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wrok")
}

pub fn config_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("config.toml")
}

pub fn log_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("logs")
}
