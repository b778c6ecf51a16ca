use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::client::{DomainIntervals, FetchMode, HistoryCapacities};
use crate::metrics::{DiskAggregation, SlotPolicy};
use crate::server::ServerSettings;

pub const PORT_ENV: &str = "PORT";
pub const SERVER_URL_ENV: &str = "HOSTWATCH_SERVER_URL";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
    pub intervals: IntervalsConfig,
    pub history: HistoryConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSource {
    #[default]
    Modules,
    Fixed,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub disk_aggregation: DiskAggregation,
    pub slot_policy: SlotSource,
    pub fixed_slots: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0".to_string(),
            port: 5000,
            disk_aggregation: DiskAggregation::PrimaryVolume,
            slot_policy: SlotSource::Modules,
            fixed_slots: 2,
        }
    }
}

impl ServerConfig {
    pub fn settings(&self) -> ServerSettings {
        ServerSettings {
            disk_aggregation: self.disk_aggregation,
            slot_policy: match self.slot_policy {
                SlotSource::Modules => SlotPolicy::Modules,
                SlotSource::Fixed => SlotPolicy::Fixed(self.fixed_slots),
            },
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server_url: String,
    pub fetch_mode: FetchMode,
    /// 0 disables the timeout.
    pub request_timeout_ms: u64,
    pub tick_rate_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            server_url: "http://localhost:5000".to_string(),
            fetch_mode: FetchMode::Parallel,
            request_timeout_ms: 0,
            tick_rate_ms: 250,
        }
    }
}

impl DashboardConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(16))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntervalsConfig {
    pub process_ms: u64,
    pub cpu_ms: u64,
    pub memory_ms: u64,
    pub disk_ms: u64,
    pub gpu_ms: u64,
    /// Single timer used in all-or-nothing mode.
    pub batch_ms: u64,
}

impl Default for IntervalsConfig {
    fn default() -> Self {
        IntervalsConfig {
            process_ms: 2000,
            cpu_ms: 1000,
            memory_ms: 1000,
            disk_ms: 2000,
            gpu_ms: 2000,
            batch_ms: 2000,
        }
    }
}

impl IntervalsConfig {
    pub fn to_intervals(&self) -> DomainIntervals {
        DomainIntervals {
            process: Duration::from_millis(self.process_ms),
            cpu: Duration::from_millis(self.cpu_ms),
            memory: Duration::from_millis(self.memory_ms),
            disk: Duration::from_millis(self.disk_ms),
            gpu: Duration::from_millis(self.gpu_ms),
            batch: Duration::from_millis(self.batch_ms),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub cpu: usize,
    pub memory: usize,
    pub disk: usize,
    pub gpu: usize,
    pub overview: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        let defaults = HistoryCapacities::default();
        HistoryConfig {
            cpu: defaults.cpu,
            memory: defaults.memory,
            disk: defaults.disk,
            gpu: defaults.gpu,
            overview: defaults.overview,
        }
    }
}

impl HistoryConfig {
    pub fn capacities(&self) -> HistoryCapacities {
        HistoryCapacities {
            cpu: self.cpu,
            memory: self.memory,
            disk: self.disk,
            gpu: self.gpu,
            overview: self.overview,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
    /// auto, truecolor, 256 or mono.
    pub color_support: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
            color_support: "auto".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub help: String,
    pub refresh: String,
    pub next_tab: String,
    pub prev_tab: String,
    pub cycle_theme: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            help: "?".to_string(),
            refresh: "r".to_string(),
            next_tab: "Tab".to_string(),
            prev_tab: "BackTab".to_string(),
            cycle_theme: "t".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub json: bool,
    /// Log file for the dashboard, which cannot write to the terminal.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl Config {
    /// Applies `PORT` and `HOSTWATCH_SERVER_URL` from `lookup`. Unparsable values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup(PORT_ENV).and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = lookup(SERVER_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.dashboard.server_url = url;
        }
    }
}

pub fn parse_key(spec: &str) -> Option<KeyCode> {
    let trimmed = spec.trim();
    match trimmed.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeyCode::Enter),
        "esc" | "escape" => return Some(KeyCode::Esc),
        "tab" => return Some(KeyCode::Tab),
        "backtab" | "shift+tab" => return Some(KeyCode::BackTab),
        "space" => return Some(KeyCode::Char(' ')),
        "backspace" => return Some(KeyCode::Backspace),
        "left" => return Some(KeyCode::Left),
        "right" => return Some(KeyCode::Right),
        "f5" => return Some(KeyCode::F(5)),
        _ => {}
    }
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeyCode::Char(c)),
        _ => None,
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hostwatch").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.disk_aggregation, DiskAggregation::PrimaryVolume);
        assert_eq!(config.server.settings().slot_policy, SlotPolicy::Modules);
        assert_eq!(config.dashboard.server_url, "http://localhost:5000");
        assert_eq!(config.dashboard.fetch_mode, FetchMode::Parallel);
        assert_eq!(config.dashboard.request_timeout(), None);
        assert_eq!(config.intervals.cpu_ms, 1000);
        assert_eq!(config.intervals.process_ms, 2000);
        assert_eq!(config.history.cpu, 30);
        assert_eq!(config.history.overview, 60);
        assert_eq!(config.colors.theme, "dark");
        assert_eq!(config.keybinds.quit, "q");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[server]
port = 8080
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        // Other fields should be defaults
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.history.disk, 10);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[server]
bind = "127.0.0.1"
disk_aggregation = "sum"
slot_policy = "fixed"
fixed_slots = 4

[dashboard]
server_url = "http://nas.local:5000"
fetch_mode = "all-or-nothing"
request_timeout_ms = 1500

[intervals]
cpu_ms = 500

[history]
gpu = 40

[colors]
theme = "light"

[keybinds]
quit = "x"

[logging]
json = true
file = "/tmp/hostwatch.log"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.address(), "127.0.0.1:5000");
        let settings = config.server.settings();
        assert_eq!(settings.disk_aggregation, DiskAggregation::Sum);
        assert_eq!(settings.slot_policy, SlotPolicy::Fixed(4));
        assert_eq!(config.dashboard.fetch_mode, FetchMode::AllOrNothing);
        assert_eq!(
            config.dashboard.request_timeout(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(
            config.intervals.to_intervals().cpu,
            Duration::from_millis(500)
        );
        assert_eq!(config.history.capacities().gpu, 40);
        assert_eq!(config.colors.theme, "light");
        assert_eq!(config.keybinds.quit, "x");
        assert!(config.logging.json);
        assert_eq!(
            config.logging.file.as_deref(),
            Some(Path::new("/tmp/hostwatch.log"))
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "PORT" => Some("7070".to_string()),
            "HOSTWATCH_SERVER_URL" => Some("http://10.0.0.2:7070".to_string()),
            _ => None,
        });
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.dashboard.server_url, "http://10.0.0.2:7070");
    }

    #[test]
    fn bad_env_port_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn keys_parse() {
        assert_eq!(parse_key("q"), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("Tab"), Some(KeyCode::Tab));
        assert_eq!(parse_key("BackTab"), Some(KeyCode::BackTab));
        assert_eq!(parse_key("Escape"), Some(KeyCode::Esc));
        assert_eq!(parse_key("?"), Some(KeyCode::Char('?')));
        assert_eq!(parse_key("ctrl+q"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("hostwatch_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.server.port, 5000);
        let _ = std::fs::remove_file(&temp);
    }

    #[test]
    fn unknown_enum_value_returns_default() {
        let temp = std::env::temp_dir().join("hostwatch_test_bad_enum.toml");
        std::fs::write(&temp, "[server]\nport = 6000\ndisk_aggregation = \"largest\"\n").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.server.port, 5000);
        let _ = std::fs::remove_file(&temp);
    }
}
