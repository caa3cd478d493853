//! Razorpay webhook handler
//!
//! POST /billing/webhook — handles gateway events (raw body for signature
//! verification). One event carries up to three optional entities
//! (subscription, invoice, payment); each present entity is merge-upserted
//! independently, so redelivery of the same event is idempotent without a
//! deduplication table.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde_json::Value;

use crate::state::AppState;
use crate::{db, razorpay};

/// Handle incoming Razorpay webhook events
///
/// Must receive the raw body (not JSON) for HMAC signature verification.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    // 1. Get X-Razorpay-Signature header
    let sig_header = match headers
        .get("x-razorpay-signature")
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => {
            tracing::warn!("Missing X-Razorpay-Signature header");
            return StatusCode::UNAUTHORIZED;
        }
    };

    // 2. Verify signature over the exact bytes as received
    if let Err(e) =
        razorpay::verify_webhook_signature(&body, sig_header, &state.razorpay.webhook_secret)
    {
        tracing::warn!(error = e, "Webhook signature verification failed");
        return StatusCode::UNAUTHORIZED;
    }

    // 3. Parse JSON event
    let event: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return StatusCode::BAD_REQUEST;
        }
    };

    let event_name = event["event"].as_str().unwrap_or("");
    tracing::info!(event = event_name, "Received Razorpay webhook");

    let subscription = entity(&event, "subscription");
    let invoice = entity(&event, "invoice");
    let payment = entity(&event, "payment");

    // 4. Resolve the owning educator: entity notes first, then the
    //    subscription-id map for events that omit them (some invoice events)
    let sub_id = subscription_id_of(subscription, invoice, payment);
    let educator_id = match resolve_educator(&state, [subscription, invoice, payment], sub_id).await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(%e, "DB error resolving webhook educator");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let Some(educator_id) = educator_id else {
        // Deliberate terminal state: acknowledge so the gateway stops
        // retrying, change nothing
        tracing::info!(event = event_name, "No educator resolvable for event, dropped");
        return StatusCode::OK;
    };

    let now = shared::util::now_millis();

    // 5. Entity upserts are independent and order-insensitive
    if let Some(sub) = subscription {
        if let Err(e) = apply_subscription_entity(&state, &educator_id, sub, event_name, now).await
        {
            tracing::error!(%e, "Failed to upsert subscription from webhook");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }

    if let Some(inv) = invoice {
        if let Err(e) = record_billing_entity(&state, &educator_id, inv, event_name, now).await {
            tracing::error!(%e, "Failed to record invoice from webhook");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }

    if let Some(pay) = payment {
        if let Err(e) = record_billing_entity(&state, &educator_id, pay, event_name, now).await {
            tracing::error!(%e, "Failed to record payment from webhook");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }

    let detail = serde_json::json!({ "event": event_name, "subscription_id": sub_id });
    let _ = db::audit::log(&state.pool, &educator_id, "webhook_event", Some(&detail), None, now)
        .await;

    StatusCode::OK
}

/// Extract `payload.<kind>.entity` from the event envelope
fn entity<'a>(event: &'a Value, kind: &str) -> Option<&'a Value> {
    event
        .get("payload")
        .and_then(|p| p.get(kind))
        .and_then(|k| k.get("entity"))
}

/// Educator id carried in entity notes
///
/// Subscriptions created by this service write `notes.educator_id`; the
/// legacy checkout flow wrote `notes.educatorId`, still accepted.
fn educator_from_notes(entity: &Value) -> Option<&str> {
    let notes = entity.get("notes")?;
    notes
        .get("educator_id")
        .or_else(|| notes.get("educatorId"))
        .and_then(|v| v.as_str())
}

/// Gateway subscription id carried by the event: the subscription entity's
/// own id, or the `subscription_id` field on invoice/payment entities
fn subscription_id_of<'a>(
    subscription: Option<&'a Value>,
    invoice: Option<&'a Value>,
    payment: Option<&'a Value>,
) -> Option<&'a str> {
    if let Some(id) = subscription.and_then(|s| s["id"].as_str()) {
        return Some(id);
    }
    invoice
        .and_then(|i| i["subscription_id"].as_str())
        .or_else(|| payment.and_then(|p| p["subscription_id"].as_str()))
}

async fn resolve_educator(
    state: &AppState,
    entities: [Option<&Value>; 3],
    sub_id: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    for ent in entities.into_iter().flatten() {
        if let Some(id) = educator_from_notes(ent) {
            return Ok(Some(id.to_string()));
        }
    }
    match sub_id {
        Some(id) => db::subscription_map::find_educator(&state.pool, id).await,
        None => Ok(None),
    }
}

/// Merge the subscription entity into the educator's subscription record
async fn apply_subscription_entity(
    state: &AppState,
    educator_id: &str,
    sub: &Value,
    event_name: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    let plan_key = sub["plan_id"]
        .as_str()
        .and_then(|p| razorpay::plan_key_for(&state.razorpay, p));

    let patch = db::subscriptions::SubscriptionPatch {
        status: sub["status"].as_str(),
        quantity: sub["quantity"].as_i64().map(|q| q as i32),
        razorpay_subscription_id: sub["id"].as_str(),
        plan_key,
        // Gateway timestamps are in seconds
        current_end_at: sub["current_end"].as_i64().map(|s| s * 1000),
        start_at: sub["start_at"].as_i64().map(|s| s * 1000),
        event: event_name,
        now,
    };
    db::subscriptions::upsert_merge(&state.pool, educator_id, &patch).await?;

    // Keep the recovery map current for later invoice/payment events
    if let Some(id) = sub["id"].as_str() {
        db::subscription_map::insert(&state.pool, id, educator_id, now).await?;
    }
    Ok(())
}

/// Record an invoice or payment entity in the append-only billing audit table
async fn record_billing_entity(
    state: &AppState,
    educator_id: &str,
    ent: &Value,
    event_name: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    let Some(id) = ent["id"].as_str() else {
        tracing::warn!(event = event_name, "Billing entity missing id, skipped");
        return Ok(());
    };

    let record = db::invoices::UpsertInvoice {
        id,
        educator_id,
        amount: ent["amount"].as_i64(),
        currency: ent["currency"].as_str(),
        status: ent["status"].as_str(),
        event: event_name,
        payload: ent,
        now,
    };
    db::invoices::upsert(&state.pool, &record).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_subscription() -> Value {
        serde_json::json!({
            "event": "subscription.activated",
            "created_at": 1_700_000_000,
            "payload": {
                "subscription": {
                    "entity": {
                        "id": "sub_1",
                        "status": "active",
                        "quantity": 5,
                        "plan_id": "plan_basic_monthly",
                        "current_end": 1_702_000_000,
                        "notes": { "educatorId": "edu_1" },
                    }
                }
            }
        })
    }

    #[test]
    fn test_entity_extraction() {
        let event = event_with_subscription();
        let sub = entity(&event, "subscription").unwrap();
        assert_eq!(sub["id"].as_str(), Some("sub_1"));
        assert_eq!(sub["quantity"].as_i64(), Some(5));
        assert!(entity(&event, "invoice").is_none());
        assert!(entity(&event, "payment").is_none());
    }

    #[test]
    fn test_educator_from_notes_both_spellings() {
        let legacy = serde_json::json!({ "notes": { "educatorId": "edu_1" } });
        assert_eq!(educator_from_notes(&legacy), Some("edu_1"));

        let current = serde_json::json!({ "notes": { "educator_id": "edu_2" } });
        assert_eq!(educator_from_notes(&current), Some("edu_2"));

        // snake_case wins when both are present
        let both = serde_json::json!({
            "notes": { "educator_id": "edu_a", "educatorId": "edu_b" }
        });
        assert_eq!(educator_from_notes(&both), Some("edu_a"));

        let none = serde_json::json!({ "notes": {} });
        assert_eq!(educator_from_notes(&none), None);
        let no_notes = serde_json::json!({ "id": "sub_1" });
        assert_eq!(educator_from_notes(&no_notes), None);
    }

    #[test]
    fn test_subscription_id_prefers_subscription_entity() {
        let sub = serde_json::json!({ "id": "sub_1" });
        let inv = serde_json::json!({ "id": "inv_1", "subscription_id": "sub_2" });
        assert_eq!(
            subscription_id_of(Some(&sub), Some(&inv), None),
            Some("sub_1")
        );
    }

    #[test]
    fn test_subscription_id_falls_back_to_invoice_then_payment() {
        let inv = serde_json::json!({ "id": "inv_1", "subscription_id": "sub_2" });
        let pay = serde_json::json!({ "id": "pay_1", "subscription_id": "sub_3" });
        assert_eq!(subscription_id_of(None, Some(&inv), Some(&pay)), Some("sub_2"));
        assert_eq!(subscription_id_of(None, None, Some(&pay)), Some("sub_3"));
        assert_eq!(subscription_id_of(None, None, None), None);
    }
}
