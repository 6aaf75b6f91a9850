//! Drives a [`ViewState`] against a [`SessionApi`].
//!
//! Everything runs on one thread. Weather fetches are spawned with
//! [`tokio::task::spawn_local`], so a [`SessionView`] must live inside a
//! [`tokio::task::LocalSet`]. Fetch results come back as [`ViewMsg`]s over a
//! channel and are applied in [`SessionView::update`]. When the view is dropped
//! the channel closes and late results are discarded.

use std::rc::Rc;

use activity_lib::{session::Session, weather::WeatherObservation};
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    api::{ApiError, SessionApi},
    enrich::LabelTables,
    view_state::ViewState,
};

#[derive(Debug)]
pub enum ViewMsg {
    SessionsLoaded(Result<Vec<Session>, ApiError>),
    WeatherLoaded(i64, Result<Vec<WeatherObservation>, ApiError>),
}

pub struct SessionView<A: SessionApi + 'static> {
    api: Rc<A>,
    state: ViewState,
    rng: StdRng,
    tx: UnboundedSender<ViewMsg>,
    rx: UnboundedReceiver<ViewMsg>,
    in_flight: usize,
}

impl<A: SessionApi + 'static> SessionView<A> {
    pub fn new(api: Rc<A>, labels: LabelTables, rng: StdRng) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            api,
            state: ViewState::new(labels),
            rng,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// A view with the default label tables and an OS-seeded generator.
    pub fn with_defaults(api: Rc<A>) -> Self {
        Self::new(api, LabelTables::default(), StdRng::from_os_rng())
    }

    /// Fetches the session listing and builds the rows.
    pub async fn load(&mut self) {
        tracing::info!("Loading sessions");
        let result = self.api.get_sessions().await;
        self.update(ViewMsg::SessionsLoaded(result));
    }

    /// Selects a session and starts its weather fetch unless it is cached.
    pub fn select(&mut self, session_id: i64) {
        let Some(session_id) = self.state.select(session_id) else {
            return;
        };

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::task::spawn_local(async move {
            let result = api.get_session_weather(session_id).await;
            if tx.send(ViewMsg::WeatherLoaded(session_id, result)).is_err() {
                tracing::debug!("View closed before weather for session {session_id} arrived");
            }
        });
    }

    /// Selects a session without fetching anything, showing whatever weather
    /// is already cached for it.
    pub fn select_cached(&mut self, session_id: i64) {
        let _ = self.state.select(session_id);
    }

    pub fn update(&mut self, msg: ViewMsg) {
        match msg {
            ViewMsg::SessionsLoaded(result) => {
                self.state.finish_load(result, &mut self.rng);
            }
            ViewMsg::WeatherLoaded(session_id, result) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                match result {
                    Ok(observations) => self.state.weather_loaded(session_id, observations),
                    Err(err) => self.state.weather_failed(session_id, &err),
                }
            }
        }
    }

    /// Applies results that have already arrived without waiting.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.update(msg);
            applied += 1;
        }
        applied
    }

    /// Waits until every weather fetch started so far has reported back.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            let Some(msg) = self.rx.recv().await else {
                break;
            };
            self.update(msg);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }
}
