use std::fmt;
use serde::{Deserialize};

#[derive(Deserialize, Debug, Clone)]
pub struct IndexLevel {
    #[serde(rename = "minValue")]
    pub min_value: Option<f64>,
    #[serde(rename = "maxValue")]
    pub max_value: Option<f64>,
    pub values: String,
    pub level: String,
    pub description: String,
    pub color: String,
}

impl fmt::Display for IndexLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or("-".to_string());
        write!(f, "{} {} ({}..{}) {}: {}",
               self.level, self.values, bound(self.min_value), bound(self.max_value), self.color, self.description)
    }
}

/// An index type supported by the provider, from `/v2/meta/indexes`
#[derive(Deserialize, Debug, Clone)]
pub struct MetaIndex {
    pub name: String,
    pub levels: Vec<IndexLevel>,
}

/// A measurement type supported by the provider, from `/v2/meta/measurements`
#[derive(Deserialize, Debug, Clone)]
pub struct MetaMeasurement {
    pub name: String,
    pub label: String,
    pub unit: String,
}

impl fmt::Display for MetaMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.name, self.label, self.unit)
    }
}
