//! Billing endpoints: payment verification, seat allocation, subscription lifecycle

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};

use crate::auth::EducatorIdentity;
use crate::db;
use crate::db::seats::SeatAssignment;
use crate::error::ServiceResult;
use crate::razorpay;
use crate::state::AppState;

// ── POST /billing/verify-payment ──

#[derive(Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_payment_id: Option<String>,
    pub razorpay_subscription_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

/// Synchronous confirmation right after checkout, for immediate UI feedback.
///
/// Marks the subscription active on a valid signature; the webhook remains
/// authoritative and will confirm (or correct) the state asynchronously.
pub async fn verify_payment(
    State(state): State<AppState>,
    Extension(identity): Extension<EducatorIdentity>,
    Json(req): Json<VerifyPaymentRequest>,
) -> ServiceResult<Json<Value>> {
    let (Some(payment_id), Some(subscription_id), Some(signature)) = (
        req.razorpay_payment_id.as_deref().filter(|s| !s.is_empty()),
        req.razorpay_subscription_id
            .as_deref()
            .filter(|s| !s.is_empty()),
        req.razorpay_signature.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "razorpay_payment_id, razorpay_subscription_id and razorpay_signature are required",
        )
        .into());
    };

    razorpay::verify_payment_signature(
        payment_id,
        subscription_id,
        signature,
        &state.razorpay.key_secret,
    )
    .map_err(|e| {
        // Logged as potential fraud: a signed confirmation should never mismatch
        tracing::warn!(
            educator_id = %identity.educator_id,
            payment_id = payment_id,
            error = e,
            "Payment confirmation rejected"
        );
        AppError::new(ErrorCode::SignatureMismatch)
    })?;

    let now = shared::util::now_millis();
    let patch = db::subscriptions::SubscriptionPatch {
        status: Some("active"),
        quantity: None,
        razorpay_subscription_id: Some(subscription_id),
        plan_key: None,
        current_end_at: None,
        start_at: None,
        event: "payment.verified",
        now,
    };
    db::subscriptions::upsert_merge(&state.pool, &identity.educator_id, &patch).await?;
    db::subscription_map::insert(&state.pool, subscription_id, &identity.educator_id, now).await?;

    let detail = json!({ "payment_id": payment_id, "subscription_id": subscription_id });
    let _ = db::audit::log(
        &state.pool,
        &identity.educator_id,
        "payment_verified",
        Some(&detail),
        Some(&identity.email),
        now,
    )
    .await;

    tracing::info!(
        educator_id = %identity.educator_id,
        subscription_id = subscription_id,
        "Payment verified, subscription active"
    );

    Ok(Json(json!({ "ok": true, "status": "active" })))
}

// ── POST /billing/assign-seat ──

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSeatRequest {
    pub student_id: String,
}

pub async fn assign_seat(
    State(state): State<AppState>,
    Extension(identity): Extension<EducatorIdentity>,
    Json(req): Json<AssignSeatRequest>,
) -> ServiceResult<Json<Value>> {
    let student_id = req.student_id.trim();
    if student_id.is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, "studentId is required").into(),
        );
    }

    let now = shared::util::now_millis();
    let outcome = db::seats::assign(
        &state.pool,
        &identity.educator_id,
        student_id,
        &identity.educator_id,
        now,
    )
    .await?;

    match outcome {
        SeatAssignment::Assigned => {
            let detail = json!({ "student_id": student_id });
            let _ = db::audit::log(
                &state.pool,
                &identity.educator_id,
                "seat_assigned",
                Some(&detail),
                Some(&identity.email),
                now,
            )
            .await;
            Ok(Json(json!({ "ok": true })))
        }
        SeatAssignment::AlreadyActive => {
            Ok(Json(json!({ "ok": true, "alreadyAssigned": true })))
        }
        SeatAssignment::NoSubscription => Err(AppError::new(ErrorCode::NoSubscription).into()),
        SeatAssignment::NotUsable => Err(AppError::with_message(
            ErrorCode::SubscriptionNotActive,
            "subscription not active",
        )
        .into()),
        SeatAssignment::LimitZero => {
            Err(AppError::with_message(ErrorCode::SeatLimitZero, "seat limit is zero").into())
        }
        SeatAssignment::StudentNotFound => {
            Err(AppError::with_message(ErrorCode::StudentNotFound, "student not found").into())
        }
        SeatAssignment::LimitReached => {
            Err(AppError::with_message(ErrorCode::SeatLimitReached, "seat limit reached").into())
        }
    }
}

// ── POST /billing/revoke-seat ──

pub async fn revoke_seat(
    State(state): State<AppState>,
    Extension(identity): Extension<EducatorIdentity>,
    Json(req): Json<AssignSeatRequest>,
) -> ServiceResult<Json<Value>> {
    let student_id = req.student_id.trim();
    if student_id.is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, "studentId is required").into(),
        );
    }

    let now = shared::util::now_millis();
    let revoked = db::seats::revoke(&state.pool, &identity.educator_id, student_id, now).await?;
    if revoked {
        let detail = json!({ "student_id": student_id });
        let _ = db::audit::log(
            &state.pool,
            &identity.educator_id,
            "seat_revoked",
            Some(&detail),
            Some(&identity.email),
            now,
        )
        .await;
    }

    Ok(Json(json!({ "ok": true })))
}

// ── POST /billing/create-subscription ──

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub plan_key: String,
    pub quantity: i32,
}

pub async fn create_subscription(
    State(state): State<AppState>,
    Extension(identity): Extension<EducatorIdentity>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> ServiceResult<Json<Value>> {
    let Some(plan_id) = razorpay::resolve_plan(&state.razorpay, &req.plan_key) else {
        return Err(AppError::validation(format!("unknown plan: {}", req.plan_key)).into());
    };
    if req.quantity < 1 {
        return Err(AppError::validation("quantity must be at least 1").into());
    }

    let now = shared::util::now_millis();
    let start_at = now + razorpay::TRIAL_DAYS * 24 * 60 * 60 * 1000;

    let subscription_id = razorpay::create_subscription(
        &state.razorpay,
        plan_id,
        req.quantity,
        start_at / 1000,
        &identity.educator_id,
    )
    .await
    .map_err(|e| {
        tracing::error!(%e, "Failed to create Razorpay subscription");
        AppError::new(ErrorCode::PaymentSetupFailed)
    })?;

    let sub = db::subscriptions::CreateSubscription {
        educator_id: &identity.educator_id,
        razorpay_subscription_id: &subscription_id,
        plan_key: &req.plan_key,
        quantity: req.quantity,
        start_at,
        now,
    };
    db::subscriptions::create(&state.pool, &sub).await?;
    db::subscription_map::insert(&state.pool, &subscription_id, &identity.educator_id, now)
        .await?;

    let detail = json!({ "plan_key": req.plan_key, "quantity": req.quantity });
    let _ = db::audit::log(
        &state.pool,
        &identity.educator_id,
        "subscription_created",
        Some(&detail),
        Some(&identity.email),
        now,
    )
    .await;

    tracing::info!(
        educator_id = %identity.educator_id,
        subscription_id = %subscription_id,
        plan = %req.plan_key,
        "Subscription created, trial running"
    );

    Ok(Json(json!({ "subscription_id": subscription_id, "status": "created" })))
}

// ── GET /billing/subscription ──

pub async fn subscription_overview(
    State(state): State<AppState>,
    Extension(identity): Extension<EducatorIdentity>,
) -> ServiceResult<Json<Value>> {
    let sub = db::subscriptions::find_by_educator(&state.pool, &identity.educator_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NoSubscription))?;

    let used_seats = db::seats::count_active(&state.pool, &identity.educator_id).await?;
    let now = shared::util::now_millis();

    Ok(Json(json!({
        "status": sub.status,
        "planKey": sub.plan_key,
        "quantity": sub.quantity,
        "usedSeats": used_seats,
        "usable": shared::billing::is_usable(&sub.status, sub.start_at, now),
        "currentEndAt": sub.current_end_at,
        "startAt": sub.start_at,
    })))
}
