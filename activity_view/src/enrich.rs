use activity_lib::session::Session;
use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

use crate::metrics::{duration_minutes, pace};

pub const DEFAULT_COACHES: [&str; 4] = ["Alex Moreno", "Ingrid Holm", "Sam Okafor", "Mei Tanaka"];
pub const DEFAULT_TRAINING_TYPES: [&str; 5] = ["Endurance", "Intervals", "Recovery", "Tempo", "Strength"];

pub const SYNTHETIC_SPO2: std::ops::RangeInclusive<u32> = 94..=99;
pub const SYNTHETIC_VO2MAX: std::ops::RangeInclusive<u32> = 45..=64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabelError {
    #[error("coach table is empty")]
    EmptyCoaches,
    #[error("training type table is empty")]
    EmptyTrainingTypes,
}

/// The label sets rows are assigned from, cyclically by row index.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTables {
    coaches: Vec<String>,
    training_types: Vec<String>,
}

impl LabelTables {
    pub fn new(coaches: Vec<String>, training_types: Vec<String>) -> Result<Self, LabelError> {
        if coaches.is_empty() {
            return Err(LabelError::EmptyCoaches);
        }
        if training_types.is_empty() {
            return Err(LabelError::EmptyTrainingTypes);
        }

        Ok(Self { coaches, training_types })
    }

    pub fn coach(&self, index: usize) -> &str {
        &self.coaches[index % self.coaches.len()]
    }

    pub fn training_type(&self, index: usize) -> &str {
        &self.training_types[index % self.training_types.len()]
    }
}

impl Default for LabelTables {
    fn default() -> Self {
        Self {
            coaches: DEFAULT_COACHES.iter().map(|s| s.to_string()).collect(),
            training_types: DEFAULT_TRAINING_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A session together with everything the table shows for it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSession {
    pub session: Session,
    pub duration_min: f64,
    /// Minutes per km.
    pub pace: Option<f64>,
    pub blood_oxygen: f64,
    pub coach: String,
    pub training_type: String,
    pub vo2max: u32,
}

impl EnrichedSession {
    pub fn id(&self) -> i64 {
        self.session.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.session.start_time
    }
}

/// Enriches the session at position `index` of the listing.
pub fn enrich_session<R: Rng>(session: &Session, index: usize, labels: &LabelTables, rng: &mut R) -> EnrichedSession {
    let duration_min = duration_minutes(session.start_time, session.end_time);

    let blood_oxygen = match session.spo2_pct {
        Some(spo2) => spo2,
        None => rng.random_range(SYNTHETIC_SPO2) as f64,
    };

    EnrichedSession {
        session: session.clone(),
        duration_min,
        pace: pace(session.distance_km, duration_min),
        blood_oxygen,
        coach: labels.coach(index).to_string(),
        training_type: labels.training_type(index).to_string(),
        vo2max: rng.random_range(SYNTHETIC_VO2MAX),
    }
}

/// Enriches a whole listing, one row per session in the same order.
pub fn enrich_sessions<R: Rng>(sessions: &[Session], labels: &LabelTables, rng: &mut R) -> Vec<EnrichedSession> {
    sessions
        .iter()
        .enumerate()
        .map(|(index, session)| enrich_session(session, index, labels, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn sessions(count: usize) -> Vec<Session> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                let start = base + Duration::days(i as i64);
                Session::new(i as i64 + 1, start, start + Duration::minutes(40))
            })
            .collect()
    }

    fn labels(coaches: &[&str]) -> LabelTables {
        LabelTables::new(
            coaches.iter().map(|s| s.to_string()).collect(),
            vec!["Endurance".into(), "Tempo".into()],
        )
        .unwrap()
    }

    #[test]
    fn coaches_cycle_by_index() {
        let labels = labels(&["a", "b", "c"]);
        let rows = enrich_sessions(&sessions(5), &labels, &mut StdRng::seed_from_u64(1));

        let coaches: Vec<&str> = rows.iter().map(|r| r.coach.as_str()).collect();
        assert_eq!(coaches, ["a", "b", "c", "a", "b"]);

        let training: Vec<&str> = rows.iter().map(|r| r.training_type.as_str()).collect();
        assert_eq!(training, ["Endurance", "Tempo", "Endurance", "Tempo", "Endurance"]);
    }

    #[test]
    fn preserves_order_and_input() {
        let input = sessions(4);
        let before = input.clone();
        let rows = enrich_sessions(&input, &LabelTables::default(), &mut StdRng::seed_from_u64(2));

        assert_eq!(input, before);
        let ids: Vec<i64> = rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, [1, 2, 3, 4]);
        assert!(rows.iter().all(|r| r.duration_min == 40.0));
    }

    #[test]
    fn synthetic_fields_in_range() {
        let rows = enrich_sessions(&sessions(200), &LabelTables::default(), &mut StdRng::seed_from_u64(3));
        for row in rows {
            assert!((94.0..=99.0).contains(&row.blood_oxygen));
            assert_eq!(row.blood_oxygen.fract(), 0.0);
            assert!((45..=64).contains(&row.vo2max));
        }
    }

    #[test]
    fn measured_blood_oxygen_passes_through() {
        let input: Vec<Session> = sessions(1).into_iter().map(|s| s.with_spo2_pct(91.5)).collect();
        let rows = enrich_sessions(&input, &LabelTables::default(), &mut StdRng::seed_from_u64(4));
        assert_eq!(rows[0].blood_oxygen, 91.5);
    }

    #[test]
    fn same_seed_same_rows() {
        let input = sessions(6);
        let a = enrich_sessions(&input, &LabelTables::default(), &mut StdRng::seed_from_u64(9));
        let b = enrich_sessions(&input, &LabelTables::default(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn pace_derived_from_distance() {
        let input: Vec<Session> = sessions(2)
            .into_iter()
            .enumerate()
            .map(|(i, s)| if i == 0 { s.with_distance_km(8.0) } else { s.with_distance_km(0.0) })
            .collect();
        let rows = enrich_sessions(&input, &LabelTables::default(), &mut StdRng::seed_from_u64(5));
        assert_eq!(rows[0].pace, Some(5.0));
        assert_eq!(rows[1].pace, None);
    }

    #[test]
    fn empty_tables_rejected() {
        assert_eq!(LabelTables::new(vec![], vec!["x".into()]), Err(LabelError::EmptyCoaches));
        assert_eq!(LabelTables::new(vec!["x".into()], vec![]), Err(LabelError::EmptyTrainingTypes));
        assert_eq!(LabelError::EmptyCoaches.to_string(), "coach table is empty");
        assert_eq!(LabelError::EmptyTrainingTypes.to_string(), "training type table is empty");
    }
}
