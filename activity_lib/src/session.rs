use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient;

/// One recorded activity as served by the session-listing service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub id: i64,
    #[serde(deserialize_with = "lenient::instant")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "lenient::instant")]
    pub end_time: DateTime<Utc>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub sport: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_hr: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub steps: Option<u64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub spo2_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lon: Option<f64>,
}

impl Session {
    /// A session with only the required fields set.
    pub fn new(id: i64, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            id,
            start_time,
            end_time,
            sport: None,
            distance_km: None,
            calories: None,
            avg_hr: None,
            steps: None,
            spo2_pct: None,
            lat: None,
            lon: None,
        }
    }

    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }

    pub fn with_distance_km(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }

    pub fn with_spo2_pct(mut self, spo2_pct: f64) -> Self {
        self.spo2_pct = Some(spo2_pct);
        self
    }
}
