use chrono::{DateTime, Utc};

pub const PLACEHOLDER: &str = "-";

/// Minutes between `start` and `end`. Negative spans count as zero.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = (end - start).num_milliseconds();
    (millis as f64 / 60_000.0).max(0.0)
}

/// Minutes per km, only defined for a positive distance and duration.
pub fn pace(distance_km: Option<f64>, duration_min: f64) -> Option<f64> {
    let distance_km = distance_km?;
    if distance_km > 0.0 && duration_min > 0.0 && distance_km.is_finite() && duration_min.is_finite() {
        Some(duration_min / distance_km)
    } else {
        None
    }
}

/// Renders a pace as `M:SS/km`, or the placeholder when there is none.
pub fn format_pace(pace: Option<f64>) -> String {
    let Some(pace) = pace.filter(|p| p.is_finite() && *p > 0.0) else {
        return PLACEHOLDER.to_string();
    };

    let mut minutes = pace.trunc() as u64;
    let mut seconds = ((pace - pace.trunc()) * 60.0).round() as u64;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }

    format!("{minutes}:{seconds:02}/km")
}
