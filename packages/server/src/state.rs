use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    /// Absent when no store is configured or the store was unreachable at
    /// startup; the mail sink then takes over for submissions.
    pub db: Option<DatabaseConnection>,
    pub mailer: Option<Mailer>,
    pub config: AppConfig,
}

impl AppState {
    /// The store connection, or `STORE_UNAVAILABLE` for operations that
    /// cannot fall back.
    pub fn db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db.as_ref().ok_or(AppError::StoreUnavailable)
    }
}
