use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthService;
use crate::forum::{QaService, QaStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub qa: QaService,
    pub auth: Arc<AuthService>,
    /// Whether `POST /auth/create-admin` is mounted
    pub allow_admin_bootstrap: bool,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn QaStore>, auth: AuthService, allow_admin_bootstrap: bool) -> Self {
        Self {
            qa: QaService::new(store),
            auth: Arc::new(auth),
            allow_admin_bootstrap,
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Arc<dyn QaStore> {
        self.qa.store()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
