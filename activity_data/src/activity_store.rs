use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use activity_lib::{session::Session, weather::WeatherObservation};

use crate::{DataError, SESSIONS_PATH, WEATHER_PATH};

/// Read-only view of the recorded sessions and their weather series.
#[derive(Clone)]
pub struct ActivityStore {
    sessions: Arc<Vec<Session>>,
    weather: Arc<HashMap<i64, Vec<WeatherObservation>>>,
}

impl ActivityStore {
    /// Opens the data files under the project root.
    pub async fn start() -> Result<Self, DataError> {
        let root: PathBuf = project_root::get_project_root()
            .map_err(|err| DataError::Io(format!("Failed to find project root: {err}")))?;
        Self::open(&root).await
    }

    /// Opens `sessions.json` and `weather.json` in the data dir under `root`.
    /// A missing weather file means no session has weather.
    pub async fn open(root: &Path) -> Result<Self, DataError> {
        let sessions_path = root.join(SESSIONS_PATH);
        let sessions_json = tokio::fs::read_to_string(&sessions_path)
            .await
            .map_err(|err| DataError::Io(format!("Failed to read {:?}: {err}", sessions_path)))?;
        let mut sessions: Vec<Session> = serde_json::from_str(&sessions_json)
            .map_err(|err| DataError::Parse(format!("Failed to parse {:?}: {err}", sessions_path)))?;
        sessions.sort_by_key(|session| session.start_time);

        let weather_path = root.join(WEATHER_PATH);
        let weather = if weather_path.exists() {
            let weather_json = tokio::fs::read_to_string(&weather_path)
                .await
                .map_err(|err| DataError::Io(format!("Failed to read {:?}: {err}", weather_path)))?;
            serde_json::from_str::<HashMap<i64, Vec<WeatherObservation>>>(&weather_json)
                .map_err(|err| DataError::Parse(format!("Failed to parse {:?}: {err}", weather_path)))?
        } else {
            tracing::warn!("No weather file at {:?}", weather_path);
            HashMap::new()
        };

        tracing::info!("Loaded {} sessions and weather for {} of them", sessions.len(), weather.len());

        Ok(Self::from_parts(sessions, weather))
    }

    pub fn from_parts(sessions: Vec<Session>, weather: HashMap<i64, Vec<WeatherObservation>>) -> Self {
        Self {
            sessions: Arc::new(sessions),
            weather: Arc::new(weather),
        }
    }

    pub fn get_sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// The weather series of a known session. Sessions without recorded
    /// weather get an empty series.
    pub fn get_session_weather(&self, session_id: i64) -> Result<&[WeatherObservation], DataError> {
        if !self.sessions.iter().any(|session| session.id == session_id) {
            return Err(DataError::UnknownSession(session_id));
        }

        Ok(self.weather.get(&session_id).map(Vec::as_slice).unwrap_or(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DATA_DIR;

    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("activity_data_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(root.join(DATA_DIR)).unwrap();
        root
    }

    const SESSIONS: &str = r#"[
        {"id": 2, "start_time": "2024-05-02T07:00:00Z", "end_time": "2024-05-02T07:40:00Z", "distance_km": 8},
        {"id": 1, "start_time": "2024-05-01T07:00:00Z", "end_time": "2024-05-01T08:00:00Z", "distance_km": "bad"}
    ]"#;

    const WEATHER: &str = r#"{
        "1": [{"timestamp": "2024-05-01T07:00:00Z", "temperature_c": 11.5}]
    }"#;

    #[tokio::test]
    async fn opens_data_files() {
        let root = scratch_root("open");
        std::fs::write(root.join(SESSIONS_PATH), SESSIONS).unwrap();
        std::fs::write(root.join(WEATHER_PATH), WEATHER).unwrap();

        let store = ActivityStore::open(&root).await.unwrap();
        let ids: Vec<i64> = store.get_sessions().iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 2]);
        assert_eq!(store.get_sessions()[0].distance_km, None);

        assert_eq!(store.get_session_weather(1).unwrap().len(), 1);
        assert!(store.get_session_weather(2).unwrap().is_empty());
        assert_eq!(store.get_session_weather(3), Err(DataError::UnknownSession(3)));

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn weather_file_is_optional() {
        let root = scratch_root("no_weather");
        std::fs::write(root.join(SESSIONS_PATH), SESSIONS).unwrap();
        let _ = std::fs::remove_file(root.join(WEATHER_PATH));

        let store = ActivityStore::open(&root).await.unwrap();
        assert!(store.get_session_weather(1).unwrap().is_empty());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn missing_sessions_file_fails() {
        let root = scratch_root("missing");
        let _ = std::fs::remove_file(root.join(SESSIONS_PATH));

        assert!(matches!(ActivityStore::open(&root).await, Err(DataError::Io(_))));

        std::fs::remove_dir_all(root).unwrap();
    }
}
