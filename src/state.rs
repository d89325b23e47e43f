use crate::models::MoodTable;
use crate::repository::MoodLogRepository;
use crate::store::SheetStore;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the dashboard knows between requests. `table` is `None` until a load
/// succeeds, and again after a failed reload.
#[derive(Debug, Default)]
pub struct Session {
    pub table: Option<MoodTable>,
    pub last_update: Option<DateTime<Local>>,
}

#[derive(Clone)]
pub struct AppState {
    pub repository: MoodLogRepository,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self {
            repository: MoodLogRepository::new(store),
            session: Arc::new(Mutex::new(Session::default())),
        }
    }
}
