use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub navigation: NavigationConfig,
    pub window: WindowConfig,
    /// Quick links rendered above the search input
    pub category: Vec<CategoryLink>,
}

/// Which search backend answers queries
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// `GET {endpoint}?{query_param}={query}`
    Http,
    /// Local command printing JSONL records
    Command,
}

/// How to pass the query to a search command
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Stdin,
    Arg,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub backend: SearchBackend,
    pub endpoint: Option<String>,
    pub query_param: String,
    /// Command + arguments for the command backend
    pub command: Vec<String>,
    pub input: InputMode,
    pub timeout_ms: u64,
    /// Quiet period before a typed query is sent
    pub debounce_ms: u64,
    /// Queries shorter than this (in characters) are never sent
    pub min_query_chars: usize,
    /// Idle time before results are dismissed once the query is empty
    pub inactivity_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Site root that destination paths are joined to
    pub base_url: String,
    /// Path prefix for record pages (e.g. "/questions")
    pub path_prefix: String,
    /// Opener command; the URL is appended as the last argument
    pub open_command: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryLink {
    pub name: String,
    /// Site-relative path or absolute URL
    pub link: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn inactivity(&self) -> Duration {
        Duration::from_millis(self.inactivity_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            navigation: NavigationConfig::default(),
            window: WindowConfig::default(),
            category: vec![
                CategoryLink {
                    name: "SONiC".to_string(),
                    link: "/topics/sonic-amp-netops?id=31927".to_string(),
                },
                CategoryLink {
                    name: "AI Assistant".to_string(),
                    link: "/topics/ai-network-assistant-network-copilot?id=32110".to_string(),
                },
                CategoryLink {
                    name: "Observability".to_string(),
                    link: "/topics/sonic-amp-netops?id=31927".to_string(),
                },
            ],
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: SearchBackend::Http,
            endpoint: None,
            query_param: "q".to_string(),
            command: Vec::new(),
            input: InputMode::default(),
            timeout_ms: 5000,
            debounce_ms: 300,
            min_query_chars: 3,
            inactivity_ms: 7000,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            path_prefix: "/questions".to_string(),
            open_command: vec![default_opener().to_string()],
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 520.0,
        }
    }
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

pub fn load_from(path: &Path) -> Config {
    load_path(path)
}

pub fn load() -> Config {
    match config_path() {
        Some(path) => load_path(&path),
        None => {
            tracing::warn!("Could not determine home directory, using defaults");
            Config::default()
        }
    }
}

fn load_path(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to parse config: {}, using defaults", e);
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file: {}, using defaults", e);
            Config::default()
        }
    }
}

fn config_path() -> Option<PathBuf> {
    // ~/.config/ (XDG convention) on every platform
    Some(
        dirs::home_dir()?
            .join(".config")
            .join("scout")
            .join("config.toml"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_timings() {
        let config = Config::default();
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.inactivity(), Duration::from_secs(7));
        assert_eq!(config.search.min_query_chars, 3);
        assert_eq!(config.category.len(), 3);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [search]
            backend = "command"
            command = ["forum-search", "--jsonl"]
            input = "arg"

            [navigation]
            base_url = "https://community.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.search.backend, SearchBackend::Command);
        assert_eq!(config.search.input, InputMode::Arg);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.navigation.path_prefix, "/questions");
        assert_eq!(config.window.width, 720.0);
    }

    #[test]
    fn categories_replace_defaults() {
        let config: Config = toml::from_str(
            r#"
            [[category]]
            name = "Routing"
            link = "/topics/routing?id=1"
            "#,
        )
        .unwrap();
        assert_eq!(config.category.len(), 1);
        assert_eq!(config.category[0].name, "Routing");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_from(Path::new("/nonexistent/scout/config.toml"));
        assert_eq!(config.search.query_param, "q");
    }
}
