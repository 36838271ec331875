use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::RecommendationInput,
};

fn bad_upload(e: MultipartError) -> AppError {
    AppError::InvalidInput(format!("Malformed upload: {}", e))
}

/// Collects the `image`, `text` and `mood` parts; unknown parts are ignored
async fn read_input(mut multipart: Multipart) -> AppResult<RecommendationInput> {
    let mut input = RecommendationInput::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let is_image = field
                    .content_type()
                    .map_or(true, |content_type| content_type.starts_with("image/"));
                if !is_image {
                    return Err(AppError::InvalidInput(
                        "Only image files are allowed".to_string(),
                    ));
                }
                let bytes = field.bytes().await.map_err(bad_upload)?;
                input.image = Some(bytes.to_vec());
            }
            Some("text") => input.text = Some(field.text().await.map_err(bad_upload)?),
            Some("mood") => input.mood = Some(field.text().await.map_err(bad_upload)?),
            _ => {}
        }
    }

    Ok(input)
}

/// `POST /api/movies/recommend`
pub async fn recommend(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Value>> {
    let input = read_input(multipart).await?;

    tracing::info!(
        image_bytes = input.image.as_ref().map_or(0, Vec::len),
        text = input.text_hint().is_some(),
        mood = ?input.mood_hint(),
        "Recommendation requested"
    );

    let result = state.orchestrator.recommend(input).await?;
    let total_results = result.movies.len();

    let mut data = json!({
        "movies": result.movies,
        "aiAnalysis": result.analysis,
        "totalResults": total_results,
    });
    if let Some(message) = result.message {
        data["message"] = Value::String(message);
    }

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}
