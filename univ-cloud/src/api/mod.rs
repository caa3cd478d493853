//! API routes for univ-cloud

pub mod auth;
pub mod billing;
pub mod health;
pub mod media;
pub mod site;
pub mod students;
pub mod webhook;

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::auth::educator_auth::educator_auth_middleware;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Billing + roster management (JWT authenticated, EDUCATOR/ADMIN)
    let protected = Router::new()
        .route("/billing/verify-payment", post(billing::verify_payment))
        .route("/billing/assign-seat", post(billing::assign_seat))
        .route("/billing/revoke-seat", post(billing::revoke_seat))
        .route(
            "/billing/create-subscription",
            post(billing::create_subscription),
        )
        .route("/billing/subscription", get(billing::subscription_overview))
        .route(
            "/api/students",
            post(students::create_student).get(students::list_students),
        )
        .route("/api/media/upload-params", get(media::upload_params))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            educator_auth_middleware,
        ));

    // Public educator authentication (no auth)
    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    // Gateway webhook (signature-verified, raw body)
    let webhook = Router::new().route("/billing/webhook", post(webhook::handle_webhook));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/site/resolve", get(site::resolve_site))
        .merge(auth_routes)
        .merge(webhook)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
