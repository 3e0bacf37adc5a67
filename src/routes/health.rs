use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;

/// Health check endpoint
///
/// Returns the health status of the server and its local storage.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    // Check storage by attempting a read
    let store = state.store.clone();
    let storage_status = tokio::task::spawn_blocking(move || {
        if store.storage_available() {
            "connected"
        } else {
            "disconnected"
        }
    })
    .await
    .unwrap_or("error");

    Json(json!({
        "status": if storage_status == "connected" { "healthy" } else { "unhealthy" },
        "storage": storage_status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
