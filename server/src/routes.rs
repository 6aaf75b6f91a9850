use std::sync::Arc;

use activity_data::DataError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::server_state::ServerState;

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/sessions", get(get_sessions))
        .route("/sessions/{session_id}/weather", get(get_session_weather))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn get_sessions(State(state): State<Arc<ServerState>>) -> Response {
    Json(state.store.get_sessions()).into_response()
}

pub async fn get_session_weather(State(state): State<Arc<ServerState>>, Path(session_id): Path<i64>) -> Response {
    match state.store.get_session_weather(session_id) {
        Ok(weather) => Json(weather).into_response(),
        Err(DataError::UnknownSession(_)) => {
            tracing::warn!("Weather requested for unknown session {}", session_id);
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            tracing::error!("Failed to get weather for session {}: {}", session_id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use activity_data::ActivityStore;
    use activity_lib::{session::Session, weather::WeatherObservation};
    use axum::body::to_bytes;

    use super::*;

    fn state() -> Arc<ServerState> {
        let start = "2024-07-01T06:00:00Z".parse().unwrap();
        let end = "2024-07-01T07:00:00Z".parse().unwrap();
        let sessions = vec![Session::new(5, start, end)];
        let weather = HashMap::from([(5, vec![WeatherObservation::new(start).with_temperature_c(13.0)])]);

        Arc::new(ServerState {
            store: ActivityStore::from_parts(sessions, weather),
        })
    }

    async fn body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn lists_sessions() {
        let response = get_sessions(State(state())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body(response).await;
        assert_eq!(json[0]["id"], 5);
        assert_eq!(json[0]["distance_km"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn serves_weather_series() {
        let response = get_session_weather(State(state()), Path(5)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body(response).await;
        assert_eq!(json[0]["temperature_c"], 13.0);

        let parsed: Vec<WeatherObservation> = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let response = get_session_weather(State(state()), Path(6)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
