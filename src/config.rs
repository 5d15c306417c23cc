use std::env;
use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

const DEFAULT_BASE_URL: &str = "https://airapi.airly.eu";

#[derive(Deserialize)]
pub struct Airly {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Deserialize)]
pub struct GeoRef {
    pub lat: f64,
    pub long: f64,
}

/// Default query parameters used when calling the provider
#[derive(Deserialize)]
pub struct QueryParameters {
    pub installation_id: Option<u64>,
    #[serde(default = "no_limit")]
    pub max_distance_km: f64,
    #[serde(default = "no_results_limit")]
    pub max_results: i64,
}

#[derive(Deserialize)]
pub struct WebhookParameters {
    pub url: String,
    pub username: String,
}

#[derive(Deserialize)]
pub struct Files {
    pub cache_dir: String,
}

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
    #[serde(default)]
    pub use_cache: bool,
    #[serde(default)]
    pub refresh_cache: bool,
}

#[derive(Deserialize)]
pub struct Config {
    pub airly: Airly,
    pub geo_ref: GeoRef,
    pub query: QueryParameters,
    pub webhook: WebhookParameters,
    pub files: Files,
    pub general: General,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn no_limit() -> f64 {
    -1.0
}

fn no_results_limit() -> i64 {
    -1
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// An `AIRLY_API_KEY` environment variable, if set, replaces the api key from the file.
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {

    let toml = fs::read_to_string(config_path)?;
    let mut config: Config = toml::from_str(&toml)?;

    if let Ok(api_key) = env::var("AIRLY_API_KEY") {
        config.airly.api_key = api_key;
    }

    Ok(config)
}
