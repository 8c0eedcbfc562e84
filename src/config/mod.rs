use crate::constants::{DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Remote REST backend that owns deals, votes, comments, saved deals and reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    #[serde(default = "default_backend_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_backend_user_agent")]
    pub user_agent: String,
}

fn default_backend_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_backend_timeout_seconds() -> u64 {
    15
}

fn default_backend_user_agent() -> String {
    "DealDive/0.1".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_seconds: default_backend_timeout_seconds(),
            user_agent: default_backend_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geo_enabled")]
    pub enabled: bool,
    #[serde(default = "default_geocoding_url")]
    pub base_url: String,
    #[serde(default = "default_geocoding_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoding_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_rate_limit_seconds")]
    pub rate_limit_seconds: f64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_geo_enabled() -> bool {
    true
}

fn default_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_geocoding_user_agent() -> String {
    "DealDive/0.1 (deal map)".to_string()
}

fn default_geocoding_timeout_seconds() -> u64 {
    10
}

fn default_rate_limit_seconds() -> f64 {
    1.0
}

fn default_cache_capacity() -> usize {
    10_000
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: default_geo_enabled(),
            base_url: default_geocoding_url(),
            user_agent: default_geocoding_user_agent(),
            timeout_seconds: default_geocoding_timeout_seconds(),
            rate_limit_seconds: default_rate_limit_seconds(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_lat")]
    pub default_lat: f64,
    #[serde(default = "default_center_lng")]
    pub default_lng: f64,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

fn default_center_lat() -> f64 {
    DEFAULT_MAP_CENTER.0
}

fn default_center_lng() -> f64 {
    DEFAULT_MAP_CENTER.1
}

fn default_zoom() -> u8 {
    DEFAULT_MAP_ZOOM
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_lat: default_center_lat(),
            default_lng: default_center_lng(),
            default_zoom: default_zoom(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub map: MapConfig,
}

impl Config {
    fn apply_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DEALDIVE_BACKEND_URL") {
            if !url.trim().is_empty() {
                self.backend.base_url = url;
            }
        }
        self
    }
}

pub fn load_config(config_path: &Path) -> Config {
    let config = if !config_path.exists() {
        Config::default()
    } else {
        match fs::read_to_string(config_path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring invalid config {:?}: {}", config_path, e);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    };

    config.apply_env_overrides()
}

pub fn save_default_config(config_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).map_err(|e| std::io::Error::other(e.to_string()))?;
    fs::write(config_path, yaml)
}
