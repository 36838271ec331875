use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::AppState;

/// `GET /api/health`
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": Utc::now(),
    }))
}

/// `GET /api/classifier/status`
///
/// Reports configuration only; no request is made to the model.
pub async fn classifier_status(State(state): State<AppState>) -> Json<Value> {
    let message = if state.classifier_configured {
        "Image classifier is configured"
    } else {
        "Image classifier token not configured, image analysis is disabled"
    };

    Json(json!({
        "success": true,
        "data": {
            "configured": state.classifier_configured,
            "message": message,
        }
    }))
}
