pub mod errors;

use std::fmt;
use std::time::Duration;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use ureq::Agent;
use crate::manager_airly::errors::AirlyError;

/// Logical provider endpoints, one per kind of query.
/// The name doubles as key for cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Installation,
    InstallationsNearest,
    Measurement,
    MeasurementNearest,
    MeasurementPoint,
    MetaIndexes,
    MetaMeasurements,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 7] = [
        EndpointKind::Installation,
        EndpointKind::InstallationsNearest,
        EndpointKind::Measurement,
        EndpointKind::MeasurementNearest,
        EndpointKind::MeasurementPoint,
        EndpointKind::MetaIndexes,
        EndpointKind::MetaMeasurements,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EndpointKind::Installation => "installation_metadata",
            EndpointKind::InstallationsNearest => "installations_metadata",
            EndpointKind::Measurement => "measurement_by_id",
            EndpointKind::MeasurementNearest => "measurement_nearest",
            EndpointKind::MeasurementPoint => "measurement_point",
            EndpointKind::MetaIndexes => "meta_indexes",
            EndpointKind::MetaMeasurements => "meta_measurements",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fully parameterized provider query
///
/// Negative `max_distance_km` and `max_results` mean "no limit" to the provider
/// and are passed on as is.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Installation { installation_id: u64 },
    InstallationsNearest { lat: f64, long: f64, max_distance_km: f64, max_results: i64 },
    Measurement { installation_id: u64 },
    MeasurementNearest { lat: f64, long: f64, max_distance_km: f64 },
    MeasurementPoint { lat: f64, long: f64 },
    MetaIndexes,
    MetaMeasurements,
}

impl Request {
    pub fn kind(&self) -> EndpointKind {
        match self {
            Request::Installation { .. } => EndpointKind::Installation,
            Request::InstallationsNearest { .. } => EndpointKind::InstallationsNearest,
            Request::Measurement { .. } => EndpointKind::Measurement,
            Request::MeasurementNearest { .. } => EndpointKind::MeasurementNearest,
            Request::MeasurementPoint { .. } => EndpointKind::MeasurementPoint,
            Request::MetaIndexes => EndpointKind::MetaIndexes,
            Request::MetaMeasurements => EndpointKind::MetaMeasurements,
        }
    }

    /// API path excluding the domain
    pub fn path(&self) -> String {
        match self {
            Request::Installation { installation_id } => format!("/v2/installations/{}", installation_id),
            Request::InstallationsNearest { .. } => "/v2/installations/nearest".to_string(),
            Request::Measurement { .. } => "/v2/measurements/installation".to_string(),
            Request::MeasurementNearest { .. } => "/v2/measurements/nearest".to_string(),
            Request::MeasurementPoint { .. } => "/v2/measurements/point".to_string(),
            Request::MetaIndexes => "/v2/meta/indexes".to_string(),
            Request::MetaMeasurements => "/v2/meta/measurements".to_string(),
        }
    }

    /// Endpoint specific query parameters, the api key is not included
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Request::InstallationsNearest { lat, long, max_distance_km, max_results } => vec![
                ("lat", lat.to_string()),
                ("lng", long.to_string()),
                ("maxDistanceKM", max_distance_km.to_string()),
                ("maxResults", max_results.to_string()),
            ],
            Request::Measurement { installation_id } => vec![
                ("installationId", installation_id.to_string()),
            ],
            Request::MeasurementNearest { lat, long, max_distance_km } => vec![
                ("lat", lat.to_string()),
                ("lng", long.to_string()),
                ("maxDistanceKM", max_distance_km.to_string()),
            ],
            Request::MeasurementPoint { lat, long } => vec![
                ("lat", lat.to_string()),
                ("lng", long.to_string()),
            ],
            Request::Installation { .. } | Request::MetaIndexes | Request::MetaMeasurements => Vec::new(),
        }
    }
}

/// Outcome of a provider call.
///
/// `Failure` carries the http status when the provider answered with anything but 200,
/// and no status when the request never got an answer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum RawResponse {
    Success { status: u16, body: String },
    Failure { status: Option<u16>, detail: String },
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, RawResponse::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RawResponse::Success { status, .. } => Some(*status),
            RawResponse::Failure { status, .. } => *status,
        }
    }

    /// Returns the body of a successful response
    pub fn body(&self) -> Result<&str, AirlyError> {
        match self {
            RawResponse::Success { body, .. } => Ok(body.as_str()),
            RawResponse::Failure { status, detail } => Err(AirlyError::Provider {
                status: *status,
                detail: detail.to_string(),
            }),
        }
    }

    /// Deserializes the body of a successful response
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AirlyError> {
        Ok(serde_json::from_str(self.body()?)?)
    }
}

/// Client for the Airly sensor data API
///
/// See https://developer.airly.eu/docs
pub struct Airly {
    agent: Agent,
    base_url: String,
    api_key: String,
}

impl Airly {
    /// Returns an Airly struct ready for querying the API
    ///
    /// # Arguments
    ///
    /// * 'api_key' - api key attached to every request
    /// * 'base_url' - scheme and host of the API, e.g. https://airapi.airly.eu
    pub fn new(api_key: &str, base_url: &str) -> Airly {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build();

        let agent = config.into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Metadata of a single installation
    ///
    /// # Arguments
    ///
    /// * 'installation_id' - installation identifier
    pub fn get_installation(&self, installation_id: u64) -> RawResponse {
        self.get(&Request::Installation { installation_id })
    }

    /// Installations closest to a given point, sorted by distance to that point
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude as decimal degree, e.g. 50.062006
    /// * 'long' - longitude as decimal degree, e.g. 19.940984
    /// * 'max_distance_km' - all installations must be within this distance, negative means no limit
    /// * 'max_results' - maximum number of installations, negative means no limit
    pub fn get_installations_nearest(&self, lat: f64, long: f64, max_distance_km: f64, max_results: i64) -> RawResponse {
        self.get(&Request::InstallationsNearest { lat, long, max_distance_km, max_results })
    }

    /// Measurements for the installation given by installation_id
    ///
    /// # Arguments
    ///
    /// * 'installation_id' - installation identifier
    pub fn get_measurement(&self, installation_id: u64) -> RawResponse {
        self.get(&Request::Measurement { installation_id })
    }

    /// Measurements for the installation closest to a given location
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude as decimal degree
    /// * 'long' - longitude as decimal degree
    /// * 'max_distance_km' - the installation must be within this distance, negative means no limit
    pub fn get_measurement_nearest(&self, lat: f64, long: f64, max_distance_km: f64) -> RawResponse {
        self.get(&Request::MeasurementNearest { lat, long, max_distance_km })
    }

    /// Approximate measurements for any location.
    ///
    /// The provider interpolates the values from sensors up to 1.5 km away, weighted
    /// inversely to their distance from the given point.
    ///
    /// # Arguments
    ///
    /// * 'lat' - latitude as decimal degree
    /// * 'long' - longitude as decimal degree
    pub fn get_measurement_point(&self, lat: f64, long: f64) -> RawResponse {
        self.get(&Request::MeasurementPoint { lat, long })
    }

    /// All index types supported by the API along with their levels
    ///
    pub fn get_meta_indexes(&self) -> RawResponse {
        self.get(&Request::MetaIndexes)
    }

    /// All measurement types supported by the API along with their names and units
    ///
    pub fn get_meta_measurements(&self) -> RawResponse {
        self.get(&Request::MetaMeasurements)
    }

    /// Sends the given request. Any failure is logged and returned as a
    /// `RawResponse::Failure`, it is up to the caller to check the outcome.
    ///
    /// # Arguments
    ///
    /// * 'request' - the query to send
    fn get(&self, request: &Request) -> RawResponse {
        match self.get_request(request) {
            Ok(response) => {
                match &response {
                    RawResponse::Success { .. } => debug!("{}: ok", request.kind()),
                    RawResponse::Failure { status, detail } =>
                        error!("{}: error with request, status {:?}: {}", request.kind(), status, detail),
                }
                response
            },
            Err(e) => {
                error!("{}: error with request: {}", request.kind(), e);
                RawResponse::Failure { status: None, detail: e.to_string() }
            }
        }
    }

    /// Builds a request and sends it as a GET.
    ///
    /// # Arguments
    ///
    /// * 'request' - the query to send
    fn get_request(&self, request: &Request) -> Result<RawResponse, ureq::Error> {
        let url = format!("{}{}", self.base_url, request.path());

        let mut response = self.agent
            .get(url)
            .header("Accept", "application/json")
            .query("apikey", &self.api_key)
            .query_pairs(request.query())
            .call()?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        if status == 200 {
            Ok(RawResponse::Success { status, body })
        } else {
            Ok(RawResponse::Failure { status: Some(status), detail: body })
        }
    }
}
