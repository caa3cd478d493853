//! Media upload signing endpoint

use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};
use shared::error::AppError;

use crate::auth::EducatorIdentity;
use crate::error::ServiceResult;
use crate::media;
use crate::state::AppState;

// ── GET /api/media/upload-params ──

/// Hand the browser everything it needs for a direct upload to the media
/// service; the API secret itself never leaves the server.
pub async fn upload_params(
    State(state): State<AppState>,
    Extension(identity): Extension<EducatorIdentity>,
) -> ServiceResult<Json<Value>> {
    let timestamp = shared::util::now_millis() / 1000;
    let folder = format!("{}/{}", state.media_upload_folder, identity.educator_id);

    let signature = media::sign_upload_params(&state.media_api_secret, &folder, timestamp)
        .map_err(AppError::internal)?;

    Ok(Json(json!({
        "apiKey": state.media_api_key,
        "timestamp": timestamp,
        "folder": folder,
        "signature": signature,
    })))
}
