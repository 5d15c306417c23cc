use std::env;
use std::process::exit;
use anyhow::Result;
use log::{debug, error, info, warn};
use crate::cache::CachedSites;
use crate::config::{load_config, Config};
use crate::initialization::{init, Mgr};
use crate::logging::setup_logger;
use crate::manager_airly::{EndpointKind, RawResponse};
use crate::models::airly_installation::Installation;
use crate::models::airly_meta::{MetaIndex, MetaMeasurement};
use crate::models::discord::Embed;
use crate::weather::{Channel, WeatherSnapshot};

mod cache;
mod config;
mod errors;
mod initialization;
mod logging;
mod manager_airly;
mod manager_webhook;
mod models;
mod weather;

fn main() {
    let config_path = env::var("CONFIG_PATH").unwrap_or("config.toml".to_string());

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => { eprintln!("Error loading configuration {}: {}", config_path, e); exit(1); }
    };

    if let Err(e) = setup_logger(&config.general) {
        eprintln!("Error setting up logging: {}", e);
        exit(1);
    }

    if let Err(e) = run(&config) {
        error!("{}", e);
        exit(2);
    }
}

/// Gets the latest measurement, from the provider or the cache, and posts a summary
/// of it to the webhook
///
/// # Arguments
///
/// * 'config' - loaded configuration
fn run(config: &Config) -> Result<()> {
    let mgr = init(config)?;

    if config.general.refresh_cache {
        let sites = CachedSites::new(&mgr.airly, &mgr.cache, &config.geo_ref, &config.query);
        sites.save_all()?;
        log_cached(&sites.load_all()?);
    }

    let (kind, response) = measurement_response(config, &mgr)?;
    let snapshot = WeatherSnapshot::from_response(&response)?;
    info!("{}: measurement processed for {}", kind, snapshot.date_time().unwrap_or("unknown time"));
    log_particulates(&snapshot);

    let mut content = snapshot.to_string();
    if let Some(installation) = source_installation(config, &mgr) {
        content = format!("{}\n{}", installation.display_name(), content);
    }

    let embed = snapshot.primary_index().and_then(|index| {
        Embed::from_index(index)
            .map_err(|e| warn!("sending without embed: {}", e))
            .ok()
    });

    mgr.webhook.send(content, embed);

    Ok(())
}

/// Returns the measurement for the configured installation, or for the one nearest
/// the configured location if no installation is given.
/// Fresh responses are also written to the cache.
///
/// # Arguments
///
/// * 'config' - loaded configuration
/// * 'mgr' - managers
fn measurement_response(config: &Config, mgr: &Mgr) -> Result<(EndpointKind, RawResponse)> {
    let kind = match config.query.installation_id {
        Some(_) => EndpointKind::Measurement,
        None => EndpointKind::MeasurementNearest,
    };

    if config.general.use_cache {
        return Ok((kind, mgr.cache.load(kind)?));
    }

    let response = match config.query.installation_id {
        Some(id) => mgr.airly.get_measurement(id),
        None => mgr.airly.get_measurement_nearest(config.geo_ref.lat, config.geo_ref.long, config.query.max_distance_km),
    };

    if response.is_success() {
        if let Err(e) = mgr.cache.store(kind, &response) {
            warn!("{}: response not cached: {}", kind, e);
        }
    }

    Ok((kind, response))
}

/// Looks up the installation the measurement came from, failures are logged and
/// result in None
///
/// # Arguments
///
/// * 'config' - loaded configuration
/// * 'mgr' - managers
fn source_installation(config: &Config, mgr: &Mgr) -> Option<Installation> {
    let installation = match (config.query.installation_id, config.general.use_cache) {
        (Some(_), true) => mgr.cache.load(EndpointKind::Installation)
            .map_err(|e| e.to_string())
            .and_then(|r| r.json::<Installation>().map_err(|e| e.to_string())),
        (Some(id), false) => mgr.airly.get_installation(id)
            .json::<Installation>()
            .map_err(|e| e.to_string()),
        (None, true) => mgr.cache.load(EndpointKind::InstallationsNearest)
            .map_err(|e| e.to_string())
            .and_then(|r| nearest(&r)),
        (None, false) => nearest(&mgr.airly.get_installations_nearest(
            config.geo_ref.lat, config.geo_ref.long, config.query.max_distance_km, 1)),
    };

    match installation {
        Ok(i) => Some(i),
        Err(e) => { warn!("installation unknown: {}", e); None }
    }
}

fn nearest(response: &RawResponse) -> Result<Installation, String> {
    response.json::<Vec<Installation>>()
        .map_err(|e| e.to_string())?
        .into_iter()
        .next()
        .ok_or("no installation nearby".to_string())
}

/// Logs what the cache holds after a refresh
fn log_cached(responses: &[(EndpointKind, RawResponse)]) {
    for (kind, response) in responses {
        match kind {
            EndpointKind::MetaIndexes => match response.json::<Vec<MetaIndex>>() {
                Ok(indexes) => {
                    info!("{}: {} index types", kind, indexes.len());
                    for index in indexes {
                        for level in index.levels {
                            debug!("{}: {}", index.name, level);
                        }
                    }
                },
                Err(e) => warn!("{}: {}", kind, e),
            },
            EndpointKind::MetaMeasurements => match response.json::<Vec<MetaMeasurement>>() {
                Ok(types) => info!("{}: {}", kind,
                    types.iter().map(|t| t.to_string())
                        .collect::<Vec<String>>().join(", ")),
                Err(e) => warn!("{}: {}", kind, e),
            },
            _ => debug!("{}: status {:?}", kind, response.status()),
        }
    }
}

/// Logs particulate readings against their standards
fn log_particulates(snapshot: &WeatherSnapshot) {
    for channel in [Channel::Pm1, Channel::Pm10, Channel::Pm25] {
        let Some(value) = snapshot.reading(channel) else { continue };
        match snapshot.standard(channel.api_name()) {
            Some(s) => info!("{}: {:.1} {}, {} limit {}", channel, value, channel.unit(), s.authority, s.limit),
            None => info!("{}: {:.1} {}", channel, value, channel.unit()),
        }
    }
}
