use std::{borrow::Cow, collections::HashMap};

use activity_lib::{session::Session, weather::WeatherObservation};
use rand::Rng;

use crate::{
    api::ApiError,
    columns::{Column, VisibilitySet},
    enrich::{enrich_sessions, EnrichedSession, LabelTables},
    filter::{filter_by_range, DateRange, RangeError},
    matcher::nearest_observation,
};

/// Everything the session table needs: rows, filter, visible columns,
/// selection and the weather fetched so far.
#[derive(Debug, Clone)]
pub struct ViewState {
    rows: Vec<EnrichedSession>,
    range: DateRange,
    visibility: VisibilitySet,
    selected: Option<i64>,
    weather: HashMap<i64, Vec<WeatherObservation>>,
    loading: bool,
    error: Option<String>,
    labels: LabelTables,
}

/// The selected row together with the observation nearest its start.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetail<'a> {
    pub row: &'a EnrichedSession,
    pub weather: Option<&'a WeatherObservation>,
}

impl ViewState {
    pub fn new(labels: LabelTables) -> Self {
        Self {
            rows: Vec::new(),
            range: DateRange::default(),
            visibility: VisibilitySet::default(),
            selected: None,
            weather: HashMap::new(),
            loading: true,
            error: None,
            labels,
        }
    }

    /// Applies the outcome of the session listing fetch.
    pub fn finish_load<R: Rng>(&mut self, result: Result<Vec<Session>, ApiError>, rng: &mut R) {
        self.loading = false;

        match result {
            Ok(sessions) => {
                self.rows = enrich_sessions(&sessions, &self.labels, rng);
                self.error = None;
                tracing::info!("Loaded {} sessions", self.rows.len());
            }
            Err(err) => {
                tracing::error!("Failed to load sessions: {err}");
                self.rows.clear();
                self.error = Some(err.to_string());
            }
        }
    }

    /// Marks a row as selected. Returns the id whose weather still has to be
    /// fetched, if any.
    pub fn select(&mut self, session_id: i64) -> Option<i64> {
        if !self.rows.iter().any(|row| row.id() == session_id) {
            tracing::warn!("Ignoring selection of unknown session {session_id}");
            return None;
        }

        self.selected = Some(session_id);

        if self.weather.contains_key(&session_id) {
            None
        } else {
            Some(session_id)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Caches a fetched weather series. An id that already has a series keeps it.
    pub fn weather_loaded(&mut self, session_id: i64, observations: Vec<WeatherObservation>) {
        tracing::debug!("Weather for session {session_id}: {} observations", observations.len());
        self.weather.entry(session_id).or_insert(observations);
    }

    pub fn weather_failed(&mut self, session_id: i64, err: &ApiError) {
        tracing::warn!("Failed to fetch weather for session {session_id}: {err}");
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    /// Sets the range from calendar-date inputs. On a bad input the current
    /// range is kept.
    pub fn set_range_from_dates(&mut self, lower: &str, upper: &str) -> Result<(), RangeError> {
        self.range = DateRange::from_dates(lower, upper)?;
        Ok(())
    }

    pub fn toggle_column(&mut self, column: Column) {
        self.visibility.toggle(column);
    }

    pub fn visible_rows(&self) -> Cow<'_, [EnrichedSession]> {
        filter_by_range(&self.rows, &self.range)
    }

    pub fn rows(&self) -> &[EnrichedSession] {
        &self.rows
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn visibility(&self) -> &VisibilitySet {
        &self.visibility
    }

    pub fn visibility_mut(&mut self) -> &mut VisibilitySet {
        &mut self.visibility
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&EnrichedSession> {
        let id = self.selected?;
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn cached_weather(&self, session_id: i64) -> Option<&[WeatherObservation]> {
        self.weather.get(&session_id).map(Vec::as_slice)
    }

    /// Nearest cached observation to the row's start, looked up on every call.
    pub fn nearest_weather(&self, row: &EnrichedSession) -> Option<&WeatherObservation> {
        nearest_observation(self.cached_weather(row.id())?, row.start_time())
    }

    pub fn selected_weather(&self) -> Option<&WeatherObservation> {
        self.nearest_weather(self.selected()?)
    }

    pub fn selected_detail(&self) -> Option<SessionDetail<'_>> {
        let row = self.selected()?;
        Some(SessionDetail {
            row,
            weather: self.nearest_weather(row),
        })
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(LabelTables::default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 10, 6, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn two_sessions() -> Vec<Session> {
        vec![
            Session::new(1, at(0), at(60)).with_distance_km(10.0).with_sport("running"),
            Session::new(2, at(24 * 60), at(24 * 60 + 45)).with_distance_km(0.0),
        ]
    }

    fn loaded() -> ViewState {
        let mut state = ViewState::default();
        state.finish_load(Ok(two_sessions()), &mut StdRng::seed_from_u64(7));
        state
    }

    fn series(minutes: &[i64]) -> Vec<WeatherObservation> {
        minutes
            .iter()
            .map(|m| WeatherObservation::new(at(*m)).with_temperature_c(*m as f64))
            .collect()
    }

    #[test]
    fn starts_loading_and_empty() {
        let state = ViewState::default();
        assert!(state.is_loading());
        assert!(state.visible_rows().is_empty());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn load_enriches_rows() {
        let state = loaded();
        assert!(!state.is_loading());
        assert_eq!(state.rows()[0].pace, Some(6.0));
        assert_eq!(state.rows()[1].pace, None);
        assert_eq!(state.visible_rows().len(), 2);
    }

    #[test]
    fn failed_load_surfaces_message() {
        let mut state = ViewState::default();
        state.finish_load(Err(ApiError::Status(503)), &mut StdRng::seed_from_u64(7));
        assert!(!state.is_loading());
        assert!(state.rows().is_empty());
        assert_eq!(state.error(), Some("service responded with status 503"));
    }

    #[test]
    fn toggles_and_range_before_load() {
        let mut state = ViewState::default();
        state.toggle_column(Column::Pace);
        state.set_range_from_dates("2024-04-10", "").unwrap();
        assert!(state.visibility().is_visible(Column::Pace));
        assert!(state.visible_rows().is_empty());
    }

    #[test]
    fn select_requests_weather_once() {
        let mut state = loaded();
        assert_eq!(state.select(1), Some(1));
        state.weather_loaded(1, series(&[-30, 10, 50]));
        assert_eq!(state.select(1), None);
        assert_eq!(state.selected().map(|r| r.id()), Some(1));
    }

    #[test]
    fn failed_weather_is_retried() {
        let mut state = loaded();
        assert_eq!(state.select(2), Some(2));
        state.weather_failed(2, &ApiError::Request("timeout".into()));
        assert_eq!(state.cached_weather(2), None);
        assert_eq!(state.select(2), Some(2));
    }

    #[test]
    fn weather_lands_in_its_own_slot() {
        let mut state = loaded();
        state.select(1);
        state.select(2);
        // Resolve out of order.
        state.weather_loaded(2, series(&[24 * 60]));
        state.weather_loaded(1, series(&[5]));

        assert_eq!(state.cached_weather(1).unwrap()[0].timestamp, at(5));
        assert_eq!(state.cached_weather(2).unwrap()[0].timestamp, at(24 * 60));
    }

    #[test]
    fn cache_is_insert_only() {
        let mut state = loaded();
        state.weather_loaded(1, series(&[5]));
        state.weather_loaded(1, series(&[90]));
        assert_eq!(state.cached_weather(1).unwrap()[0].timestamp, at(5));
    }

    #[test]
    fn selected_weather_is_nearest() {
        let mut state = loaded();
        state.select(1);
        state.weather_loaded(1, series(&[-30, 10, 50]));

        let detail = state.selected_detail().unwrap();
        assert_eq!(detail.row.id(), 1);
        assert_eq!(detail.weather.unwrap().timestamp, at(10));
        assert_eq!(state.selected_weather().unwrap().temperature_c, Some(10.0));
    }

    #[test]
    fn unknown_selection_ignored() {
        let mut state = loaded();
        assert_eq!(state.select(99), None);
        assert!(state.selected().is_none());
    }

    #[test]
    fn range_filters_visible_rows() {
        let mut state = loaded();
        state.set_range_from_dates("2024-04-11", "2024-04-11").unwrap();
        let ids: Vec<i64> = state.visible_rows().iter().map(|r| r.id()).collect();
        assert_eq!(ids, [2]);

        assert!(state.set_range_from_dates("04/11/2024", "").is_err());
        assert_eq!(state.visible_rows().len(), 1);

        state.set_range(DateRange::default());
        assert_eq!(state.visible_rows().len(), 2);
    }
}
