//! Student roster endpoints

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::AppError;

use crate::auth::EducatorIdentity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

// ── POST /api/students ──

#[derive(Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: Option<String>,
}

pub async fn create_student(
    State(state): State<AppState>,
    Extension(identity): Extension<EducatorIdentity>,
    Json(req): Json<CreateStudentRequest>,
) -> ServiceResult<Json<Value>> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name is required").into());
    }
    let email = req
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    if email.as_deref().is_some_and(|e| !e.contains('@')) {
        return Err(AppError::validation("Invalid email").into());
    }

    let student_id = uuid::Uuid::new_v4().to_string();
    let now = shared::util::now_millis();

    db::students::create(
        &state.pool,
        &student_id,
        &identity.educator_id,
        name,
        email.as_deref(),
        now,
    )
    .await?;

    tracing::info!(
        educator_id = %identity.educator_id,
        student_id = %student_id,
        "Student added to roster"
    );

    Ok(Json(json!({ "student_id": student_id })))
}

// ── GET /api/students ──

pub async fn list_students(
    State(state): State<AppState>,
    Extension(identity): Extension<EducatorIdentity>,
) -> ServiceResult<Json<Value>> {
    let students = db::students::list_with_seats(&state.pool, &identity.educator_id).await?;
    Ok(Json(json!({ "students": students })))
}
