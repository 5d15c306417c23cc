use std::fs;
use std::path::{Path, PathBuf};
use log::{info, warn};
use crate::config::{GeoRef, QueryParameters};
use crate::errors::CacheError;
use crate::manager_airly::{Airly, EndpointKind, RawResponse, Request};

/// Installation used when none is configured
const DEFAULT_INSTALLATION_ID: u64 = 7468;

/// Stores the latest raw response per endpoint kind, one file each.
/// There is no expiry, a store always replaces what was there.
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Returns a cache writing to the given directory, creating it if needed
    ///
    /// # Arguments
    ///
    /// * 'cache_dir' - directory to hold the cache files
    pub fn new(cache_dir: &str) -> Result<ResponseCache, CacheError> {
        let dir = PathBuf::from(cache_dir);
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn file_path(&self, kind: EndpointKind) -> PathBuf {
        self.dir.join(format!("data_{}.json", kind.name()))
    }

    /// Saves a response, replacing any earlier response of the same kind
    ///
    /// # Arguments
    ///
    /// * 'kind' - the endpoint the response came from
    /// * 'response' - the response to save
    pub fn store(&self, kind: EndpointKind, response: &RawResponse) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(response)?;
        fs::write(self.file_path(kind), json)?;

        Ok(())
    }

    /// Loads the latest saved response of the given kind
    ///
    /// # Arguments
    ///
    /// * 'kind' - the endpoint to load the response for
    pub fn load(&self, kind: EndpointKind) -> Result<RawResponse, CacheError> {
        let file_path = self.file_path(kind);

        if Path::new(&file_path).exists() {
            let json = fs::read_to_string(file_path)?;
            let response: RawResponse = serde_json::from_str(&json)?;

            Ok(response)
        } else {
            Err(CacheError::NotFound(kind.to_string()))
        }
    }
}

/// Fetches responses from the provider into the cache and reads them back,
/// using the configured location and query parameters
pub struct CachedSites<'a> {
    airly: &'a Airly,
    cache: &'a ResponseCache,
    requests: Vec<Request>,
}

impl<'a> CachedSites<'a> {
    /// # Arguments
    ///
    /// * 'airly' - client used when refreshing
    /// * 'cache' - where responses are kept
    /// * 'geo_ref' - location used for nearest and point queries
    /// * 'query' - installation id and limits used for the queries
    pub fn new(airly: &'a Airly, cache: &'a ResponseCache, geo_ref: &GeoRef, query: &QueryParameters) -> Self {
        Self { airly, cache, requests: default_requests(geo_ref, query) }
    }

    /// Calls every endpoint and stores each response, failed ones included
    ///
    pub fn save_all(&self) -> Result<(), CacheError> {
        for request in &self.requests {
            let response = self.fetch(request);
            if !response.is_success() {
                warn!("storing failed response for {}", request.kind());
            }
            self.cache.store(request.kind(), &response)?;
        }
        info!("cache refreshed with {} responses", self.requests.len());

        Ok(())
    }

    fn fetch(&self, request: &Request) -> RawResponse {
        match *request {
            Request::Installation { installation_id } =>
                self.airly.get_installation(installation_id),
            Request::InstallationsNearest { lat, long, max_distance_km, max_results } =>
                self.airly.get_installations_nearest(lat, long, max_distance_km, max_results),
            Request::Measurement { installation_id } =>
                self.airly.get_measurement(installation_id),
            Request::MeasurementNearest { lat, long, max_distance_km } =>
                self.airly.get_measurement_nearest(lat, long, max_distance_km),
            Request::MeasurementPoint { lat, long } =>
                self.airly.get_measurement_point(lat, long),
            Request::MetaIndexes => self.airly.get_meta_indexes(),
            Request::MetaMeasurements => self.airly.get_meta_measurements(),
        }
    }

    /// Loads every cached response in endpoint order
    ///
    pub fn load_all(&self) -> Result<Vec<(EndpointKind, RawResponse)>, CacheError> {
        EndpointKind::ALL
            .iter()
            .map(|&kind| Ok((kind, self.cache.load(kind)?)))
            .collect()
    }
}

/// Builds one request per endpoint kind from configuration
///
/// # Arguments
///
/// * 'geo_ref' - location used for nearest and point queries
/// * 'query' - installation id and limits used for the queries
pub fn default_requests(geo_ref: &GeoRef, query: &QueryParameters) -> Vec<Request> {
    let installation_id = query.installation_id.unwrap_or(DEFAULT_INSTALLATION_ID);

    vec![
        Request::Installation { installation_id },
        Request::InstallationsNearest {
            lat: geo_ref.lat,
            long: geo_ref.long,
            max_distance_km: query.max_distance_km,
            max_results: query.max_results,
        },
        Request::Measurement { installation_id },
        Request::MeasurementNearest { lat: geo_ref.lat, long: geo_ref.long, max_distance_km: query.max_distance_km },
        Request::MeasurementPoint { lat: geo_ref.lat, long: geo_ref.long },
        Request::MetaIndexes,
        Request::MetaMeasurements,
    ]
}
