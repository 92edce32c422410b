use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::repositories::progress::{PgProgressStore, ProgressStore};

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    progress: Arc<dyn ProgressStore>,
}

impl AppState {
    /// Production wiring: progress records live in the same Postgres pool.
    pub(crate) fn new(settings: Settings, db: PgPool) -> Self {
        let progress: Arc<dyn ProgressStore> = Arc::new(PgProgressStore::new(db.clone()));
        Self::with_progress_store(settings, db, progress)
    }

    pub(crate) fn with_progress_store(
        settings: Settings,
        db: PgPool,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, progress }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn progress(&self) -> &dyn ProgressStore {
        self.inner.progress.as_ref()
    }
}
