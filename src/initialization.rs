use log::info;
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::errors::MyAirInitError;
use crate::manager_airly::Airly;
use crate::manager_webhook::Webhook;

pub struct Mgr {
    pub airly: Airly,
    pub cache: ResponseCache,
    pub webhook: Webhook,
}

/// Instantiates the Airly client, the response cache and the webhook
///
/// # Arguments
///
/// * 'config' - loaded configuration
pub fn init(config: &Config) -> Result<Mgr, MyAirInitError> {
    info!("myair version: {}", env!("CARGO_PKG_VERSION"));

    if config.airly.api_key.is_empty() {
        return Err(MyAirInitError("no Airly api key configured".to_string()));
    }

    let airly = Airly::new(&config.airly.api_key, &config.airly.base_url);
    let cache = ResponseCache::new(&config.files.cache_dir)?;
    let webhook = Webhook::new(&config.webhook.url, &config.webhook.username);

    Ok(Mgr { airly, cache, webhook })
}
