use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use crate::errors::WeatherError;
use crate::manager_airly::RawResponse;
use crate::models::airly_measurements::Measurements;

/// Format used for every timestamp stored in a snapshot
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Index preferred when a single index is to represent the snapshot
pub const PRIMARY_INDEX: &str = "AIRLY_CAQI";

/// Pollutant and weather channels kept from a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pm1,
    Pm10,
    Pm25,
    Pressure,
    Humidity,
    Temperature,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Pm1,
        Channel::Pm10,
        Channel::Pm25,
        Channel::Pressure,
        Channel::Humidity,
        Channel::Temperature,
    ];

    /// Name used by the provider in measurement values
    pub fn api_name(&self) -> &'static str {
        match self {
            Channel::Pm1 => "PM1",
            Channel::Pm10 => "PM10",
            Channel::Pm25 => "PM25",
            Channel::Pressure => "PRESSURE",
            Channel::Humidity => "HUMIDITY",
            Channel::Temperature => "TEMPERATURE",
        }
    }

    pub fn from_api_name(name: &str) -> Option<Channel> {
        Channel::ALL.into_iter().find(|c| c.api_name() == name)
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Channel::Pm1 | Channel::Pm10 | Channel::Pm25 => "µg/m³",
            Channel::Pressure => "hPa",
            Channel::Humidity => "%",
            Channel::Temperature => "°C",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Channel::Pm1 => write!(f, "PM1"),
            Channel::Pm10 => write!(f, "PM10"),
            Channel::Pm25 => write!(f, "PM2.5"),
            Channel::Pressure => write!(f, "Pressure"),
            Channel::Humidity => write!(f, "Humidity"),
            Channel::Temperature => write!(f, "Temperature"),
        }
    }
}

/// One optional value per channel, unknown until reported
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings([Option<f64>; 6]);

impl Readings {
    pub fn get(&self, channel: Channel) -> Option<f64> {
        self.0[channel as usize]
    }

    pub fn set(&mut self, channel: Channel, value: Option<f64>) {
        self.0[channel as usize] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, Option<f64>)> + '_ {
        Channel::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthIndex {
    pub name: String,
    pub value: Option<f64>,
    pub level: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Standard {
    pub authority: String,
    pub limit: f64,
    pub percent: Option<f64>,
}

/// Air quality and weather at one place for one time window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    date_time: Option<String>,
    readings: Readings,
    indexes: HashMap<String, HealthIndex>,
    standards: HashMap<String, Standard>,
}

impl WeatherSnapshot {
    pub fn new() -> WeatherSnapshot {
        Self::default()
    }

    /// Creates a snapshot from a provider response
    ///
    /// # Arguments
    ///
    /// * 'response' - raw response from any of the measurement endpoints
    pub fn from_response(response: &RawResponse) -> Result<WeatherSnapshot, WeatherError> {
        let body = response.body().map_err(|e| WeatherError::Provider(e.to_string()))?;

        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(body)?;

        Ok(snapshot)
    }

    /// Processes a measurement document and replaces all state in the snapshot.
    ///
    /// Values for channels not kept by the snapshot are dropped, indexes and standards
    /// are keyed by index name and pollutant respectively where a later entry replaces
    /// an earlier one. If the document can't be processed the snapshot is left as is.
    ///
    /// # Arguments
    ///
    /// * 'json' - measurement document as returned by the provider
    pub fn process(&mut self, json: &str) -> Result<(), WeatherError> {
        let measurements: Measurements = serde_json::from_str(json)?;
        let current = measurements.current;

        // Parsed for validation only, the till time represents the snapshot
        normalize_date_time(&current.from_date_time)?;
        let date_time = normalize_date_time(&current.till_date_time)?;

        let mut readings = Readings::default();
        for value in current.values {
            if let Some(channel) = Channel::from_api_name(&value.name) {
                readings.set(channel, value.value);
            }
        }

        let mut indexes: HashMap<String, HealthIndex> = HashMap::new();
        for index in current.indexes {
            indexes.insert(index.name.clone(), HealthIndex {
                name: index.name,
                value: index.value,
                level: index.level,
                description: index.description,
                color: index.color,
            });
        }

        let mut standards: HashMap<String, Standard> = HashMap::new();
        for standard in current.standards {
            standards.insert(standard.pollutant, Standard {
                authority: standard.name,
                limit: standard.limit,
                percent: standard.percent,
            });
        }

        *self = WeatherSnapshot { date_time: Some(date_time), readings, indexes, standards };

        Ok(())
    }

    pub fn date_time(&self) -> Option<&str> {
        self.date_time.as_deref()
    }

    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn reading(&self, channel: Channel) -> Option<f64> {
        self.readings.get(channel)
    }

    pub fn indexes(&self) -> &HashMap<String, HealthIndex> {
        &self.indexes
    }

    pub fn index(&self, name: &str) -> Option<&HealthIndex> {
        self.indexes.get(name)
    }

    /// Returns the preferred index if present, otherwise the first by name
    pub fn primary_index(&self) -> Option<&HealthIndex> {
        self.index(PRIMARY_INDEX)
            .or_else(|| self.indexes.values().min_by(|a, b| a.name.cmp(&b.name)))
    }

    pub fn standards(&self) -> &HashMap<String, Standard> {
        &self.standards
    }

    pub fn standard(&self, pollutant: &str) -> Option<&Standard> {
        self.standards.get(pollutant)
    }
}

/// Plain text summary, one line per item
impl fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Air quality at {}", self.date_time.as_deref().unwrap_or("unknown time"))?;

        for (channel, value) in self.readings().iter() {
            if let Some(v) = value {
                writeln!(f, "{}: {:.1} {}", channel, v, channel.unit())?;
            }
        }

        let mut indexes = self.indexes().values().collect::<Vec<&HealthIndex>>();
        indexes.sort_by(|a, b| a.name.cmp(&b.name));
        for index in indexes {
            match index.value {
                Some(v) => writeln!(f, "{}: {:.0} ({}) {}", index.name, v, index.level, index.description)?,
                None => writeln!(f, "{}: - ({}) {}", index.name, index.level, index.description)?,
            }
        }

        let mut standards = self.standards().iter().collect::<Vec<(&String, &Standard)>>();
        standards.sort_by(|a, b| a.0.cmp(b.0));
        for (pollutant, standard) in standards {
            write!(f, "{} {} limit: {}", standard.authority, pollutant, standard.limit)?;
            if let Some(percent) = standard.percent {
                write!(f, " ({:.0}% of limit)", percent)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses a timestamp in any of the ISO 8601 like formats the provider may use and
/// returns it formatted as `YYYY-MM-DD HH:MM:SS`. The wall clock time is kept as given,
/// i.e. no conversion between time zones is made.
///
/// # Arguments
///
/// * 'date_time' - the timestamp to normalize
pub fn normalize_date_time(date_time: &str) -> Result<String, WeatherError> {
    let s = date_time.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local().format(DATE_TIME_FORMAT).to_string());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt.naive_local().format(DATE_TIME_FORMAT).to_string());
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.format(DATE_TIME_FORMAT).to_string());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
        .ok_or(WeatherError::DateTime(date_time.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(values: &str, indexes: &str, standards: &str) -> String {
        format!(r#"{{
            "current": {{
                "fromDateTime": "2023-05-01T09:00:00Z",
                "tillDateTime": "2023-05-01T10:00:00Z",
                "values": [{}],
                "indexes": [{}],
                "standards": [{}]
            }},
            "history": [],
            "forecast": []
        }}"#, values, indexes, standards)
    }

    const CAQI_LOW: &str = r##"{"name": "AIRLY_CAQI", "value": 35.53, "level": "LOW",
        "description": "Air is quite good.", "advice": "Take a walk!", "color": "#D1CF1E"}"##;
    const CAQI_HIGH: &str = r##"{"name": "AIRLY_CAQI", "value": 80.1, "level": "HIGH",
        "description": "Air is bad.", "color": "#EF7120"}"##;
    const WHO_PM25: &str = r#"{"name": "WHO", "pollutant": "PM25", "limit": 25, "percent": 92.18, "averaging": "24h"}"#;
    const EU_PM25: &str = r#"{"name": "EU", "pollutant": "PM25", "limit": 25.5}"#;
    const WHO_PM10: &str = r#"{"name": "WHO", "pollutant": "PM10", "limit": 50, "percent": 60.2}"#;

    #[test]
    fn test_each_channel_updates_only_itself() {
        for channel in Channel::ALL {
            let value = format!(r#"{{"name": "{}", "value": 42.5}}"#, channel.api_name());
            let mut snapshot = WeatherSnapshot::new();
            snapshot.process(&payload(&value, "", "")).unwrap();

            for (c, v) in snapshot.readings().iter() {
                if c == channel {
                    assert_eq!(v, Some(42.5), "channel {} should be set", c);
                } else {
                    assert_eq!(v, None, "channel {} should be untouched when setting {}", c, channel);
                }
            }
        }
    }

    #[test]
    fn test_unknown_channel_is_ignored() {
        let values = r#"{"name": "NO2", "value": 11.0}, {"name": "PM1", "value": 3.2}"#;
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload(values, "", "")).unwrap();

        assert_eq!(snapshot.reading(Channel::Pm1), Some(3.2));
        assert_eq!(snapshot.readings().iter().filter(|(_, v)| v.is_some()).count(), 1);
    }

    #[test]
    fn test_till_date_time_is_normalized() {
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload("", "", "")).unwrap();

        assert_eq!(snapshot.date_time(), Some("2023-05-01 10:00:00"));
    }

    #[test]
    fn test_missing_values_is_rejected_without_mutation() {
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload(r#"{"name": "PM10", "value": 20.0}"#, CAQI_LOW, WHO_PM25)).unwrap();
        let before = snapshot.clone();

        let json = r#"{"current": {"fromDateTime": "2023-05-01T10:00:00Z",
                                    "tillDateTime": "2023-05-01T11:00:00Z"}}"#;
        let result = snapshot.process(json);

        assert!(matches!(result, Err(WeatherError::Document(_))));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_bad_date_time_is_rejected_without_mutation() {
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload(r#"{"name": "PM10", "value": 20.0}"#, "", "")).unwrap();
        let before = snapshot.clone();

        let json = payload(r#"{"name": "PM10", "value": 99.0}"#, "", "")
            .replace("2023-05-01T10:00:00Z", "yesterday");
        let result = snapshot.process(&json);

        assert!(matches!(result, Err(WeatherError::DateTime(_))));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_bad_from_date_time_is_rejected() {
        let mut snapshot = WeatherSnapshot::new();
        let json = payload(r#"{"name": "PM10", "value": 99.0}"#, "", "")
            .replace("2023-05-01T09:00:00Z", "not a time");

        let result = snapshot.process(&json);

        assert!(matches!(result, Err(WeatherError::DateTime(_))));
        assert_eq!(snapshot.date_time(), None);
    }

    #[test]
    fn test_malformed_json_is_document_error() {
        let mut snapshot = WeatherSnapshot::new();
        assert!(matches!(snapshot.process("{\"current\": "), Err(WeatherError::Document(_))));
        assert_eq!(snapshot, WeatherSnapshot::new());
    }

    #[test]
    fn test_duplicate_index_keeps_later_entry() {
        let indexes = format!("{}, {}", CAQI_LOW, CAQI_HIGH);
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload("", &indexes, "")).unwrap();

        assert_eq!(snapshot.indexes().len(), 1);
        let index = snapshot.index("AIRLY_CAQI").unwrap();
        assert_eq!(index.value, Some(80.1));
        assert_eq!(index.level, "HIGH");
        assert_eq!(index.color, "#EF7120");
    }

    #[test]
    fn test_duplicate_standard_keeps_later_entry() {
        let standards = format!("{}, {}, {}", WHO_PM25, WHO_PM10, EU_PM25);
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload("", "", &standards)).unwrap();

        assert_eq!(snapshot.standards().len(), 2);
        let pm25 = snapshot.standard("PM25").unwrap();
        assert_eq!(pm25.authority, "EU");
        assert_eq!(pm25.limit, 25.5);
        assert_eq!(pm25.percent, None);
        assert_eq!(snapshot.standard("PM10").unwrap().authority, "WHO");
    }

    #[test]
    fn test_missing_indexes_and_standards_are_empty() {
        let json = r#"{"current": {"fromDateTime": "2023-05-01T09:00:00Z",
                                    "tillDateTime": "2023-05-01T10:00:00Z",
                                    "values": [{"name": "TEMPERATURE", "value": 14.2}]}}"#;
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(json).unwrap();

        assert!(snapshot.indexes().is_empty());
        assert!(snapshot.standards().is_empty());
        assert_eq!(snapshot.reading(Channel::Temperature), Some(14.2));
    }

    #[test]
    fn test_reprocessing_replaces_all_state() {
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload(r#"{"name": "PM1", "value": 5.0}"#, CAQI_LOW, WHO_PM25)).unwrap();
        snapshot.process(&payload(r#"{"name": "HUMIDITY", "value": 71.0}"#, "", "")).unwrap();

        assert_eq!(snapshot.reading(Channel::Pm1), None);
        assert_eq!(snapshot.reading(Channel::Humidity), Some(71.0));
        assert!(snapshot.indexes().is_empty());
        assert!(snapshot.standards().is_empty());
    }

    #[test]
    fn test_null_index_value_is_unknown() {
        let index = r##"{"name": "AIRLY_CAQI", "value": null, "level": "UNKNOWN",
            "description": "Sorry, there is no data available.", "color": "#999999"}"##;
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload("", index, "")).unwrap();

        assert_eq!(snapshot.primary_index().unwrap().value, None);
    }

    #[test]
    fn test_from_failed_response_is_provider_error() {
        let response = RawResponse::Failure { status: Some(429), detail: "too many requests".to_string() };
        assert!(matches!(WeatherSnapshot::from_response(&response), Err(WeatherError::Provider(_))));
    }

    #[test]
    fn test_from_successful_response() {
        let response = RawResponse::Success {
            status: 200,
            body: payload(r#"{"name": "PRESSURE", "value": 1012.9}"#, CAQI_LOW, ""),
        };
        let snapshot = WeatherSnapshot::from_response(&response).unwrap();

        assert_eq!(snapshot.reading(Channel::Pressure), Some(1012.9));
        assert_eq!(snapshot.primary_index().unwrap().level, "LOW");
    }

    #[test]
    fn test_normalize_date_time_formats() {
        let expected = "2023-05-01 10:00:00";
        for input in [
            "2023-05-01T10:00:00Z",
            "2023-05-01T10:00:00.000Z",
            "2023-05-01T10:00:00+02:00",
            "2023-05-01T10:00:00.123",
            "2023-05-01 10:00:00",
            "2023-05-01T10:00",
        ] {
            assert_eq!(normalize_date_time(input).unwrap(), expected, "input {}", input);
        }
        assert_eq!(normalize_date_time("2023-05-01").unwrap(), "2023-05-01 00:00:00");
        assert!(normalize_date_time("01/05/2023 at ten").is_err());
    }

    #[test]
    fn test_summary_lists_known_values() {
        let values = r#"{"name": "PM25", "value": 23.04}, {"name": "TEMPERATURE", "value": 14.21}"#;
        let mut snapshot = WeatherSnapshot::new();
        snapshot.process(&payload(values, CAQI_LOW, WHO_PM25)).unwrap();

        let summary = snapshot.to_string();
        assert!(summary.starts_with("Air quality at 2023-05-01 10:00:00\n"));
        assert!(summary.contains("PM2.5: 23.0 µg/m³\n"));
        assert!(summary.contains("Temperature: 14.2 °C\n"));
        assert!(!summary.contains("Humidity"));
        assert!(summary.contains("AIRLY_CAQI: 36 (LOW) Air is quite good.\n"));
        assert!(summary.contains("WHO PM25 limit: 25 (92% of limit)\n"));
    }
}
