use std::sync::Arc;

use crate::audit::AuditService;
use crate::config::Config;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub audit: AuditService,
}
