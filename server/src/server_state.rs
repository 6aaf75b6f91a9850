use activity_data::ActivityStore;

pub struct ServerState {
    pub store: ActivityStore,
}
