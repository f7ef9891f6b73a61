use crate::error::RiverError;
use crate::river::RiverRecord;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// `GET /api/river`: up to five rivers ordered by `river_id`.
pub async fn river_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RiverRecord>>, RiverError> {
    debug!("Received river request");

    let connection_string = state
        .connection_string
        .as_deref()
        .ok_or(RiverError::ConfigurationMissing)?;

    let rivers = state.store.fetch_rivers(connection_string).await?;
    info!("Returning {} river record(s)", rivers.len());
    Ok(Json(rivers))
}

pub async fn health_handler() -> impl IntoResponse {
    // Does not touch the database.
    Json(json!({ "status": "ok" }))
}
