use sqlx::PgPool;

/// Gateway subscription id → owning educator id.
///
/// Written once when the subscription is created (or first confirmed);
/// `ON CONFLICT DO NOTHING` keeps the mapping effectively immutable, so at
/// most one educator ever owns a given gateway subscription id.
pub async fn insert(
    pool: &PgPool,
    razorpay_subscription_id: &str,
    educator_id: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO razorpay_subscription_map (razorpay_subscription_id, educator_id, created_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (razorpay_subscription_id) DO NOTHING",
    )
    .bind(razorpay_subscription_id)
    .bind(educator_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Recover the owning educator for webhook events that lack notes
pub async fn find_educator(
    pool: &PgPool,
    razorpay_subscription_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT educator_id FROM razorpay_subscription_map WHERE razorpay_subscription_id = $1",
    )
    .bind(razorpay_subscription_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.0))
}
