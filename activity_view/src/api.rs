use activity_lib::{session::Session, weather::WeatherObservation};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("could not read response: {0}")]
    Decode(String),
}

/// The two services the view talks to.
#[allow(async_fn_in_trait)]
pub trait SessionApi {
    async fn get_sessions(&self) -> Result<Vec<Session>, ApiError>;

    async fn get_session_weather(&self, session_id: i64) -> Result<Vec<WeatherObservation>, ApiError>;
}

pub struct HttpSessionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn make_request<ReturnType>(&self, path: &str) -> Result<ReturnType, ApiError>
    where
        ReturnType: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| ApiError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        response.json::<ReturnType>().await.map_err(|err| ApiError::Decode(err.to_string()))
    }
}

impl SessionApi for HttpSessionApi {
    async fn get_sessions(&self) -> Result<Vec<Session>, ApiError> {
        self.make_request("/sessions").await
    }

    async fn get_session_weather(&self, session_id: i64) -> Result<Vec<WeatherObservation>, ApiError> {
        self.make_request(&format!("/sessions/{session_id}/weather")).await
    }
}

#[test]
fn error_messages() {
    assert_eq!(ApiError::Request("timeout".into()).to_string(), "request failed: timeout");
    assert_eq!(ApiError::Status(502).to_string(), "service responded with status 502");
    assert_eq!(ApiError::Decode("eof".into()).to_string(), "could not read response: eof");
}

#[test]
fn trims_trailing_slash() {
    let api = HttpSessionApi::new("http://localhost:8080/");
    assert_eq!(api.base_url, "http://localhost:8080");
}
