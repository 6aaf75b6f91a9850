use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient;

/// A single sample from the per-session weather series.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherObservation {
    #[serde(deserialize_with = "lenient::instant")]
    pub timestamp: DateTime<Utc>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub humidity_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub wind_speed_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub precipitation_mm: Option<f64>,
}

impl WeatherObservation {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temperature_c: None,
            humidity_pct: None,
            wind_speed_ms: None,
            precipitation_mm: None,
        }
    }

    pub fn with_temperature_c(mut self, temperature_c: f64) -> Self {
        self.temperature_c = Some(temperature_c);
        self
    }
}

#[test]
fn parses_weather_series() {
    let json = r#"[
        {"timestamp": "2024-06-02T06:00:00Z", "temperature_c": 14.5, "humidity_pct": 71, "wind_speed_ms": "3.4", "precipitation_mm": 0},
        {"timestamp": "2024-06-02T07:00:00Z", "temperature_c": "--"}
    ]"#;

    let series: Vec<WeatherObservation> = serde_json::from_str(json).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].wind_speed_ms, Some(3.4));
    assert_eq!(series[0].precipitation_mm, Some(0.0));
    assert_eq!(series[1].temperature_c, None);
    assert_eq!(series[1].humidity_pct, None);
}
