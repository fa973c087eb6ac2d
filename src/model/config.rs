use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub shimmer: ShimmerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color overrides keyed by theme slot, as `#RRGGBB`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Rows reserved for chrome around the task table
    #[serde(default = "default_page_margin")]
    pub page_margin: u16,
    /// Terminal width below which the list drops to compact columns
    #[serde(default = "default_compact_width")]
    pub compact_width: u16,
    /// Terminal width at which the timer shows the details panel
    #[serde(default = "default_split_width")]
    pub timer_split_width: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            colors: HashMap::new(),
            page_margin: default_page_margin(),
            compact_width: default_compact_width(),
            timer_split_width: default_split_width(),
        }
    }
}

fn default_page_margin() -> u16 {
    12
}

fn default_compact_width() -> u16 {
    105
}

fn default_split_width() -> u16 {
    90
}

/// How the shimmer picks colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Truecolor when `COLORTERM=truecolor`, ANSI 256 otherwise
    #[default]
    Auto,
    #[serde(alias = "24bit")]
    TrueColor,
    #[serde(alias = "256")]
    Ansi256,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShimmerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub reduce_motion: bool,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_width_ratio")]
    pub width_ratio: f64,
    #[serde(default = "default_cycle_ms")]
    pub cycle_ms: u64,
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    #[serde(default)]
    pub color: ColorMode,
}

impl Default for ShimmerConfig {
    fn default() -> Self {
        ShimmerConfig {
            enabled: true,
            reduce_motion: false,
            tick_ms: default_tick_ms(),
            width_ratio: default_width_ratio(),
            cycle_ms: default_cycle_ms(),
            pause_ms: default_pause_ms(),
            color: ColorMode::Auto,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tick_ms() -> u64 {
    100
}

fn default_width_ratio() -> f64 {
    0.25
}

fn default_cycle_ms() -> u64 {
    1800
}

fn default_pause_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// An `EnvFilter` directive such as `warn` or `wrok=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
