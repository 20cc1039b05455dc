use std::sync::Arc;

use crate::config::AppConfig;

/// Shared server state. The dataset itself is never cached here: every
/// request reloads the source file and recomputes from scratch.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}
