use sqlx::PgPool;

/// Subscription record, one per educator
#[derive(sqlx::FromRow)]
#[allow(dead_code)]
pub struct Subscription {
    pub educator_id: String,
    pub status: String,
    pub quantity: i32,
    pub razorpay_subscription_id: Option<String>,
    pub plan_key: Option<String>,
    pub current_end_at: Option<i64>,
    pub start_at: Option<i64>,
    pub last_event: Option<String>,
    pub last_event_at: Option<i64>,
}

pub async fn find_by_educator(
    pool: &PgPool,
    educator_id: &str,
) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        "SELECT educator_id, status, quantity, razorpay_subscription_id, plan_key,
            current_end_at, start_at, last_event, last_event_at
            FROM subscriptions
            WHERE educator_id = $1",
    )
    .bind(educator_id)
    .fetch_optional(pool)
    .await
}

pub struct CreateSubscription<'a> {
    pub educator_id: &'a str,
    pub razorpay_subscription_id: &'a str,
    pub plan_key: &'a str,
    pub quantity: i32,
    pub start_at: i64,
    pub now: i64,
}

/// Record a freshly created gateway subscription (trial running until start_at)
pub async fn create(pool: &PgPool, sub: &CreateSubscription<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO subscriptions (educator_id, status, quantity, razorpay_subscription_id,
            plan_key, start_at, last_event, last_event_at, updated_at)
         VALUES ($1, 'created', $2, $3, $4, $5, 'subscription.created', $6, $6)
         ON CONFLICT (educator_id) DO UPDATE SET
            status = 'created', quantity = $2, razorpay_subscription_id = $3,
            plan_key = $4, start_at = $5, current_end_at = NULL,
            last_event = 'subscription.created', last_event_at = $6, updated_at = $6",
    )
    .bind(sub.educator_id)
    .bind(sub.quantity)
    .bind(sub.razorpay_subscription_id)
    .bind(sub.plan_key)
    .bind(sub.start_at)
    .bind(sub.now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Field patch carried by a gateway event; `None` leaves the stored value untouched.
pub struct SubscriptionPatch<'a> {
    pub status: Option<&'a str>,
    pub quantity: Option<i32>,
    pub razorpay_subscription_id: Option<&'a str>,
    pub plan_key: Option<&'a str>,
    pub current_end_at: Option<i64>,
    pub start_at: Option<i64>,
    /// Originating event name, stored for audit
    pub event: &'a str,
    pub now: i64,
}

/// Merge-upsert the educator's subscription record
///
/// Keyed by educator id; absent fields keep their stored values, which makes
/// redelivery of the same event idempotent.
pub async fn upsert_merge(
    pool: &PgPool,
    educator_id: &str,
    patch: &SubscriptionPatch<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO subscriptions (educator_id, status, quantity, razorpay_subscription_id,
            plan_key, current_end_at, start_at, last_event, last_event_at, updated_at)
         VALUES ($1, COALESCE($2, 'created'), COALESCE($3, 0), $4, $5, $6, $7, $8, $9, $9)
         ON CONFLICT (educator_id) DO UPDATE SET
            status = COALESCE($2, subscriptions.status),
            quantity = COALESCE($3, subscriptions.quantity),
            razorpay_subscription_id = COALESCE($4, subscriptions.razorpay_subscription_id),
            plan_key = COALESCE($5, subscriptions.plan_key),
            current_end_at = COALESCE($6, subscriptions.current_end_at),
            start_at = COALESCE($7, subscriptions.start_at),
            last_event = $8,
            last_event_at = $9,
            updated_at = $9",
    )
    .bind(educator_id)
    .bind(patch.status)
    .bind(patch.quantity)
    .bind(patch.razorpay_subscription_id)
    .bind(patch.plan_key)
    .bind(patch.current_end_at)
    .bind(patch.start_at)
    .bind(patch.event)
    .bind(patch.now)
    .execute(pool)
    .await?;
    Ok(())
}
