use crate::config::{Config, DB_CONNECTION_KEY};
use crate::store::{RiverStore, SqlServerStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct AppState {
    // `None` when the key is absent or blank; requests then fail with 500.
    pub connection_string: Option<String>,
    pub store: Arc<dyn RiverStore>,
}

impl AppState {
    pub fn new(connection_string: Option<String>, store: Arc<dyn RiverStore>) -> Self {
        let connection_string = connection_string.filter(|s| !s.trim().is_empty());
        AppState {
            connection_string,
            store,
        }
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let connect_timeout = cfg.connect_timeout_secs.map(Duration::from_secs);
        debug!("Database connect timeout: {:?}", connect_timeout);

        let state = AppState::new(
            cfg.connection_string(DB_CONNECTION_KEY).map(str::to_string),
            Arc::new(SqlServerStore::new(connect_timeout)),
        );
        if state.connection_string.is_some() {
            info!("Connection string '{}' resolved", DB_CONNECTION_KEY);
        } else {
            warn!(
                "Connection string '{}' not configured; /api/river will answer 500",
                DB_CONNECTION_KEY
            );
        }
        Ok(state)
    }
}
