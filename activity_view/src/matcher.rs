use activity_lib::weather::WeatherObservation;
use chrono::{DateTime, Utc};

/// Finds the observation closest in time to `target`.
///
/// Ties go to the observation that comes first in the slice, regardless of
/// whether the slice is sorted.
pub fn nearest_observation(observations: &[WeatherObservation], target: DateTime<Utc>) -> Option<&WeatherObservation> {
    let (first, rest) = observations.split_first()?;

    let distance = |observation: &WeatherObservation| (observation.timestamp - target).abs();

    let mut best = first;
    let mut best_distance = distance(first);
    for observation in rest {
        let d = distance(observation);
        if d < best_distance {
            best = observation;
            best_distance = d;
        }
    }

    Some(best)
}
