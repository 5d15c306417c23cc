use serde::{Deserialize};

#[derive(Deserialize)]
pub struct MeasurementValue {
    pub name: String,
    pub value: Option<f64>,
}

#[derive(Deserialize)]
pub struct MeasurementIndex {
    pub name: String,
    pub value: Option<f64>,
    pub level: String,
    pub description: String,
    pub color: String,
}

#[derive(Deserialize)]
pub struct MeasurementStandard {
    pub name: String,
    pub pollutant: String,
    pub limit: f64,
    pub percent: Option<f64>,
}

#[derive(Deserialize)]
pub struct AveragedValues {
    #[serde(rename = "fromDateTime")]
    pub from_date_time: String,
    #[serde(rename = "tillDateTime")]
    pub till_date_time: String,
    pub values: Vec<MeasurementValue>,
    #[serde(default)]
    pub indexes: Vec<MeasurementIndex>,
    #[serde(default)]
    pub standards: Vec<MeasurementStandard>,
}

/// Measurements document as returned by the `/v2/measurements/*` endpoints.
/// Only the current window is of interest, history and forecast are ignored.
#[derive(Deserialize)]
pub struct Measurements {
    pub current: AveragedValues,
}
