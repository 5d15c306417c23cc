use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ConfigError::File: {0}")]
    File(#[from] std::io::Error),
    #[error("ConfigError::Document: {0}")]
    Document(#[from] toml::de::Error),
    #[error("ConfigError::Logging: {0}")]
    Logging(String),
}

/// Errors from reading or writing cached provider responses
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("CacheError::NotFound: no cached response for {0}")]
    NotFound(String),
    #[error("CacheError::File: {0}")]
    File(#[from] std::io::Error),
    #[error("CacheError::Document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Errors from turning a provider payload into a weather snapshot
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("WeatherError::Document: {0}")]
    Document(#[from] serde_json::Error),
    #[error("WeatherError::DateTime: unable to parse '{0}'")]
    DateTime(String),
    #[error("WeatherError::Provider: {0}")]
    Provider(String),
}

#[derive(Error, Debug)]
#[error("MyAirInitError: {0}")]
pub struct MyAirInitError(pub String);

impl From<ConfigError> for MyAirInitError {
    fn from(e: ConfigError) -> Self {
        MyAirInitError(e.to_string())
    }
}
impl From<CacheError> for MyAirInitError {
    fn from(e: CacheError) -> Self {
        MyAirInitError(e.to_string())
    }
}
