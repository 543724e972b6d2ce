use db::DBService;

pub mod auth;
pub mod error;
pub mod file_logging;
pub mod middleware;
pub mod routes;
pub mod uploads;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }
}
