//! Tenant storefront resolution for the SPA shell
//!
//! The frontend calls this with the page's hostname to decide whether to
//! render an educator storefront or the global marketing site.

use axum::extract::{Query, State};
use axum::{Json, http::HeaderMap};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};

use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::tenant;

#[derive(Deserialize)]
pub struct ResolveQuery {
    /// Local-development override, only honored for localhost hosts
    pub tenant: Option<String>,
}

// ── GET /api/site/resolve ──

pub async fn resolve_site(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
    headers: HeaderMap,
) -> ServiceResult<Json<Value>> {
    let host = headers
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let Some(slug) = tenant::resolve_slug(host, query.tenant.as_deref(), &state.base_app_domain)
    else {
        // Global marketing site
        return Ok(Json(json!({ "tenant": null })));
    };

    let educator = db::educators::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TenantNotFound))?;

    Ok(Json(json!({
        "tenant": slug,
        "educatorId": educator.id,
        "name": educator.name,
    })))
}
